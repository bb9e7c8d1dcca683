//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - turns them into option structs
//! - runs the plot / scan pipelines
//! - writes optional files and opens the viewer

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};

use crate::cli::{Command, PlotArgs, SampleArgs, ScanArgs};
use crate::data::{Transform, generate_sample, write_table_csv};
use crate::domain::{OutputOptions, PlotOptions, SampleConfig, ScanOptions};
use crate::error::AppError;
use crate::io::write_fits_json;

pub mod pipeline;

/// Entry point for the `lab` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Plot(args) => handle_plot(args),
        Command::Scan(args) => handle_scan(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let options = plot_options_from_args(&args)?;
    let flat = pipeline::load_pairs(&args.file, &options)?;
    let run = pipeline::render(flat, &options)?;
    info!(
        "{}",
        crate::report::format_load_summary(&args.file, &run.flat, &run.series)
    );

    if let Some(fits) = &run.fits {
        debug!("\n{}", crate::report::format_fit_table(fits));
    }
    if let (Some(path), Some(fits)) = (&options.export_fits, &run.fits) {
        write_fits_json(path, &args.file, options.transform.name(), &run.series, fits)?;
    }
    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let options = scan_options_from_args(&args)?;
    let figures = pipeline::run_scan(&args.dir, &options)?;

    for scan in &figures {
        if let Some(path) = &scan.save_path {
            crate::plot::write_svg(&scan.figure, path)?;
        }
        if options.show {
            let notes = vec![format!("{} ({} runs)", scan.source.display(), scan.runs.len())];
            crate::tui::show(&scan.figure, &notes)?;
        }
    }
    println!("{} file(s) processed", figures.len());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let table = generate_sample(&config)?;
    write_table_csv(&args.out, &table)?;
    println!(
        "wrote {} runs ({} rows) to '{}'",
        table.column_count() / 2,
        table.row_count(),
        args.out.display()
    );
    Ok(())
}

pub fn plot_options_from_args(args: &PlotArgs) -> Result<PlotOptions, AppError> {
    if !(args.panel_size.is_finite() && args.panel_size > 0.0) {
        return Err(AppError::InvalidConfig("Panel size must be > 0.".to_string()));
    }
    let transform = Transform::from_kind(args.transform, args.plate_distance)?;
    if args.no_fit && args.export_fits.is_some() {
        return Err(AppError::InvalidConfig(
            "`--export-fits` needs fits; drop `--no-fit`.".to_string(),
        ));
    }

    Ok(PlotOptions {
        separator: separator_byte(args.sep)?,
        title: args.title.clone(),
        x_label: args.x_label.clone(),
        y_label: args.y_label.clone(),
        panel_size: args.panel_size,
        show_fit: !args.no_fit,
        degree: args.degree,
        transform,
        blank_rows: args.blank_rows,
        shape: args.shape,
        export_fits: args.export_fits.clone(),
        output: OutputOptions {
            save_path: save_path(&args.file, args.save_dir.as_deref(), args.save_name.as_deref()),
            show: !args.no_show,
        },
    })
}

pub fn scan_options_from_args(args: &ScanArgs) -> Result<ScanOptions, AppError> {
    Ok(ScanOptions {
        experiment: args.experiment,
        separator: separator_byte(args.sep)?,
        xerr: args.xerr,
        yerr: args.yerr,
        inverse: args.inverse,
        extrapolate: args.extrapolate,
        figures_dir: args.save.then(|| args.figures_dir.clone()),
        show: !args.no_show,
    })
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        experiment: args.experiment,
        runs: args.runs,
        points: args.points,
        seed: args.seed,
        noise: args.noise,
    }
}

fn separator_byte(sep: char) -> Result<u8, AppError> {
    u8::try_from(sep)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| AppError::InvalidConfig(format!("Separator '{sep}' must be a single ASCII character.")))
}

/// `<save_dir>/<save_name>.svg`; either part alone is enough to enable saving.
///
/// A missing name falls back to the input file stem, a missing directory to
/// the current one.
fn save_path(input: &Path, dir: Option<&Path>, name: Option<&str>) -> Option<PathBuf> {
    if dir.is_none() && name.is_none() {
        return None;
    }
    let stem = name.map(str::to_string).unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "graph".to_string())
    });
    let dir = dir.map(Path::to_path_buf).unwrap_or_default();
    Some(dir.join(format!("{stem}.svg")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn plot_args(argv: &[&str]) -> PlotArgs {
        let mut full = vec!["lab", "plot"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Plot(args) => args,
            _ => panic!("expected plot"),
        }
    }

    #[test]
    fn plot_options_follow_flags() {
        let args = plot_args(&["data.csv", "--sep", ";", "--no-fit", "--no-show", "--degree", "2"]);
        let options = plot_options_from_args(&args).unwrap();
        assert_eq!(options.separator, b';');
        assert!(!options.show_fit);
        assert!(!options.output.show);
        assert_eq!(options.degree, 2);
        assert!(options.output.save_path.is_none());
    }

    #[test]
    fn save_path_defaults_to_input_stem() {
        let args = plot_args(&["runs/VQ1.csv", "--save-dir", "figs"]);
        let options = plot_options_from_args(&args).unwrap();
        assert_eq!(options.output.save_path, Some(PathBuf::from("figs/VQ1.svg")));

        let args = plot_args(&["VQ1.csv", "--save-name", "capacitor"]);
        let options = plot_options_from_args(&args).unwrap();
        assert_eq!(options.output.save_path, Some(PathBuf::from("capacitor.svg")));
    }

    #[test]
    fn charge_density_needs_distance() {
        let args = plot_args(&["d.csv", "--transform", "charge-density"]);
        let err = plot_options_from_args(&args).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn export_fits_conflicts_with_no_fit() {
        let args = plot_args(&["d.csv", "--no-fit", "--export-fits", "fits.json"]);
        assert!(matches!(plot_options_from_args(&args), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let args = plot_args(&["d.csv", "--sep", "§"]);
        assert!(matches!(plot_options_from_args(&args), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn scan_saves_only_when_requested() {
        let parse = |argv: &[&str]| match Cli::parse_from(argv).command {
            Command::Scan(args) => scan_options_from_args(&args).unwrap(),
            _ => panic!("expected scan"),
        };
        assert!(parse(&["lab", "scan", "data"]).figures_dir.is_none());
        assert_eq!(
            parse(&["lab", "scan", "data", "--save"]).figures_dir,
            Some(PathBuf::from("figures"))
        );
    }
}
