use std::io::Write;

use lab_curves::domain::{BlankRowPolicy, ShapePolicy};
use lab_curves::error::AppError;
use lab_curves::io::{LoadOptions, all_series, load};
use tempfile::NamedTempFile;

fn write_csv(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_even_columns_give_half_as_many_pairs() {
    let file = write_csv("a,b,c,d,e,f\n1,2,3,4,5,6\n7,8,9,10,11,12\n");
    let flat = load(file.path(), LoadOptions::default()).unwrap();
    assert_eq!(flat.column_count, 6);
    assert_eq!(flat.pair_count, 3);
    assert_eq!(flat.samples.len(), 12);
}

#[test]
fn test_deinterleave_reconstructs_columns() {
    let file = write_csv("x1,y1,x2,y2\n1,10,100,1000\n2,20,200,2000\n3,30,300,3000\n");
    let flat = load(file.path(), LoadOptions::default()).unwrap();
    let series = all_series(&flat, ShapePolicy::Strict).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].x, vec![1.0, 2.0, 3.0]);
    assert_eq!(series[0].y, vec![10.0, 20.0, 30.0]);
    assert_eq!(series[1].x, vec![100.0, 200.0, 300.0]);
    assert_eq!(series[1].y, vec![1000.0, 2000.0, 3000.0]);
    assert_eq!(series[1].label, "Measurement 2");
}

#[test]
fn test_missing_cells_become_zero() {
    let file = write_csv("x1,y1,x2,y2\n1,2,3,4\n5,6,,\n");
    let flat = load(file.path(), LoadOptions::default()).unwrap();
    assert_eq!(flat.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 0.0]);
    assert!(flat.samples.iter().all(|v| v.is_finite()));
}

#[test]
fn test_blank_rows_kept_or_dropped() {
    let file = write_csv("x,y\n1,2\n,\n3,6\n");

    let keep = load(file.path(), LoadOptions::default()).unwrap();
    assert_eq!(keep.samples, vec![1.0, 2.0, 0.0, 0.0, 3.0, 6.0]);

    let drop = load(
        file.path(),
        LoadOptions {
            blank_rows: BlankRowPolicy::Drop,
            ..LoadOptions::default()
        },
    )
    .unwrap();
    assert_eq!(drop.samples, vec![1.0, 2.0, 3.0, 6.0]);
    assert_eq!(keep.pair_count, drop.pair_count);
}

#[test]
fn test_semicolon_separator() {
    let file = write_csv("x;y\n1;2\n2;4\n");
    let flat = load(
        file.path(),
        LoadOptions {
            separator: b';',
            ..LoadOptions::default()
        },
    )
    .unwrap();
    assert_eq!(flat.pair_count, 1);
    assert_eq!(flat.samples, vec![1.0, 2.0, 2.0, 4.0]);
}

#[test]
fn test_odd_columns_strict_vs_truncate() {
    let file = write_csv("a,b,c\n1,2,3\n4,5,6\n7,8,9\n");
    let flat = load(file.path(), LoadOptions::default()).unwrap();
    assert_eq!(flat.pair_count, 1);

    let err = all_series(&flat, ShapePolicy::Strict).unwrap_err();
    assert!(matches!(err, AppError::ShapeMismatch { .. }));
    assert_eq!(err.exit_code(), 3);

    let series = all_series(&flat, ShapePolicy::Truncate).unwrap();
    // samples = 1..=9, stride 2: x = 1,3,5,7,9 and y = 2,4,6,8.
    assert_eq!(series[0].x.len(), series[0].y.len());
    assert_eq!(series[0].x, vec![1.0, 3.0, 5.0, 7.0]);
    assert_eq!(series[0].y, vec![2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn test_missing_file_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("nope.csv"), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_header_only_file_is_empty_data() {
    let file = write_csv("x,y\n");
    let err = load(file.path(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::EmptyData { .. }));

    let file = write_csv("");
    let err = load(file.path(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, AppError::EmptyData { .. }));
}
