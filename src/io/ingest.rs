//! CSV ingest and flattening.
//!
//! This module turns a delimited text file of paired measurement columns into:
//!
//! - a `RawTable` (one parse, header + numeric cells, missing cells as `NaN`)
//! - `FlatSamples` (row-major flattening with `NaN -> 0.0`)
//! - per-measurement `MeasurementSeries` (strided de-interleave)
//!
//! Design goals:
//! - **Single read**: the header and the values come from the same reader pass
//! - **Explicit policies** for blank rows and uneven shapes
//! - **No fitting logic here**

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, warn};

use crate::domain::{BlankRowPolicy, FlatSamples, MeasurementSeries, RawTable, ShapePolicy};
use crate::error::AppError;

/// Ingest options for `load`.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub separator: u8,
    pub blank_rows: BlankRowPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            blank_rows: BlankRowPolicy::Keep,
        }
    }
}

/// Load a file and flatten it into zero-filled row-major samples.
pub fn load(path: &Path, options: LoadOptions) -> Result<FlatSamples, AppError> {
    let table = read_table(path, options.separator)?;
    let flat = flatten(&table, options.blank_rows);
    debug!(
        "'{}': {} rows x {} columns -> {} samples, {} pairs",
        path.display(),
        table.row_count(),
        table.column_count(),
        flat.samples.len(),
        flat.pair_count
    );
    Ok(flat)
}

/// Parse a delimited file into a `RawTable`.
pub fn read_table(path: &Path, separator: u8) -> Result<RawTable, AppError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => AppError::io(format!("Failed to open '{}'", path.display()), e),
    })?;

    let table = parse_table(file, separator)?;

    if table.column_count() == 0 {
        return Err(AppError::EmptyData {
            path: path.to_path_buf(),
            reason: "no columns in header".to_string(),
        });
    }
    if table.row_count() == 0 {
        return Err(AppError::EmptyData {
            path: path.to_path_buf(),
            reason: "no data rows".to_string(),
        });
    }

    Ok(table)
}

/// Parse delimited text from any reader. Empty tables are returned as-is.
pub fn parse_table<R: Read>(rdr: R, separator: u8) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header_name)
        .collect();

    // A header row of a single empty field is what an empty file looks like.
    let headers = if headers.iter().all(String::is_empty) {
        Vec::new()
    } else {
        headers
    };

    let width = headers.len();
    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header, lines are 1-based.
        let line = idx + 2;
        let record = result?;
        if is_blank_line(&record) {
            continue;
        }
        rows.push(parse_record(&record, width, line));
    }

    Ok(RawTable { headers, rows })
}

/// Flatten a table row-major, apply the blank-row policy and zero-fill missing cells.
pub fn flatten(table: &RawTable, blank_rows: BlankRowPolicy) -> FlatSamples {
    let mut samples = Vec::with_capacity(table.row_count() * table.column_count());
    let mut dropped = 0usize;

    for row in &table.rows {
        if blank_rows == BlankRowPolicy::Drop && is_blank_row(row) {
            dropped += 1;
            continue;
        }
        samples.extend(row.iter().map(|&v| if v.is_nan() { 0.0 } else { v }));
    }

    if dropped > 0 {
        debug!("dropped {dropped} blank rows");
    }

    FlatSamples {
        samples,
        pair_count: table.column_count() / 2,
        column_count: table.column_count(),
    }
}

/// Extract measurement `i` (0-based) from flattened samples.
///
/// x-values are every `2 * pair_count`-th sample starting at `2i`, y-values
/// start at `2i + 1`.
pub fn series(flat: &FlatSamples, i: usize, shape: ShapePolicy) -> Result<MeasurementSeries, AppError> {
    let stride = 2 * flat.pair_count;
    if flat.pair_count == 0 || i >= flat.pair_count {
        return Err(AppError::InvalidConfig(format!(
            "Measurement index {i} out of range ({} pairs).",
            flat.pair_count
        )));
    }

    // An odd column count misaligns every row after the first even when the
    // total happens to divide.
    if flat.column_count != stride || flat.samples.len() % stride != 0 {
        match shape {
            ShapePolicy::Strict => {
                return Err(AppError::ShapeMismatch {
                    samples: flat.samples.len(),
                    stride,
                });
            }
            ShapePolicy::Truncate => {
                warn!(
                    "{} samples do not divide into strides of {stride}; truncating",
                    flat.samples.len()
                );
            }
        }
    }

    let mut x: Vec<f64> = flat.samples.iter().skip(2 * i).step_by(stride).copied().collect();
    let mut y: Vec<f64> = flat.samples.iter().skip(2 * i + 1).step_by(stride).copied().collect();
    let n = x.len().min(y.len());
    x.truncate(n);
    y.truncate(n);

    Ok(MeasurementSeries::new(i + 1, format!("Measurement {}", i + 1), x, y))
}

/// Extract every measurement in order.
pub fn all_series(flat: &FlatSamples, shape: ShapePolicy) -> Result<Vec<MeasurementSeries>, AppError> {
    (0..flat.pair_count).map(|i| series(flat, i, shape)).collect()
}

/// A whitespace-only line arrives as one empty field; a `,`-only row has more.
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

fn is_blank_row(row: &[f64]) -> bool {
    row.iter().all(|v| v.is_nan())
}

fn parse_record(record: &StringRecord, width: usize, line: usize) -> Vec<f64> {
    (0..width)
        .map(|col| match record.get(col) {
            None | Some("") => f64::NAN,
            Some(cell) => cell.parse::<f64>().unwrap_or_else(|_| {
                warn!("line {line}, column {}: '{cell}' is not a number; treating as missing", col + 1);
                f64::NAN
            }),
        })
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> RawTable {
        parse_table(text.as_bytes(), b',').unwrap()
    }

    #[test]
    fn parses_missing_and_bad_cells_as_nan() {
        let t = table("a,b\n1,\n2,x\n3\n");
        assert_eq!(t.headers, vec!["a", "b"]);
        assert_eq!(t.row_count(), 3);
        assert!(t.rows[0][1].is_nan());
        assert!(t.rows[1][1].is_nan());
        // Short rows are padded.
        assert_eq!(t.rows[2].len(), 2);
        assert!(t.rows[2][1].is_nan());
    }

    #[test]
    fn textually_empty_lines_are_skipped() {
        let t = table("a,b\n1,2\n\n3,4\n");
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn whitespace_only_lines_are_skipped_but_comma_rows_kept() {
        let t = table("x,y\n1,2\n   \n3,6\n");
        assert_eq!(t.rows, vec![vec![1.0, 2.0], vec![3.0, 6.0]]);

        let t = table("x,y\n1,2\n , \n3,6\n");
        assert_eq!(t.row_count(), 3);
        assert!(t.rows[1].iter().all(|v| v.is_nan()));

        let flat = flatten(&table("x,y\n1,2\n   \n3,6\n"), BlankRowPolicy::Keep);
        assert_eq!(flat.samples, vec![1.0, 2.0, 3.0, 6.0]);
    }

    #[test]
    fn header_bom_is_stripped() {
        let t = table("\u{feff}Number #1,Voltage #1\n1,2\n");
        assert_eq!(t.headers[0], "Number #1");
    }

    #[test]
    fn custom_separator() {
        let t = parse_table("a;b\n1.5;2.5\n".as_bytes(), b';').unwrap();
        assert_eq!(t.rows, vec![vec![1.5, 2.5]]);
    }

    #[test]
    fn flatten_zero_fills_and_counts_pairs() {
        let t = table("x1,y1,x2,y2\n1,2,,4\n");
        let flat = flatten(&t, BlankRowPolicy::Keep);
        assert_eq!(flat.samples, vec![1.0, 2.0, 0.0, 4.0]);
        assert_eq!(flat.pair_count, 2);
    }

    #[test]
    fn odd_column_count_truncates_pair_count() {
        let t = table("a,b,c\n1,2,3\n");
        assert_eq!(flatten(&t, BlankRowPolicy::Keep).pair_count, 1);
    }

    #[test]
    fn series_de_interleaves_by_stride() {
        let t = table("x1,y1,x2,y2\n1,10,5,50\n2,20,6,60\n");
        let flat = flatten(&t, BlankRowPolicy::Keep);
        let s = series(&flat, 1, ShapePolicy::Strict).unwrap();
        assert_eq!(s.index, 2);
        assert_eq!(s.label, "Measurement 2");
        assert_eq!(s.x, vec![5.0, 6.0]);
        assert_eq!(s.y, vec![50.0, 60.0]);
    }

    #[test]
    fn index_out_of_range_is_an_error() {
        let t = table("x1,y1\n1,2\n");
        let flat = flatten(&t, BlankRowPolicy::Keep);
        assert!(series(&flat, 1, ShapePolicy::Strict).is_err());
    }
}
