//! Shared plotting pipelines used by the CLI front-end and the integration tests.
//!
//! The `run_*` / `plot_flat` functions only compute (no printing, no terminal,
//! no files); `render` and the CLI handlers add the outputs on top:
//!
//! - panel plot: load -> flatten -> de-interleave -> transform -> fit -> figure
//! - scan: find files -> read table -> named pairs -> transform -> overlay figure

use std::path::{Path, PathBuf};

use log::info;

use crate::data::Transform;
use crate::domain::{FitResult, FlatSamples, MeasurementSeries, PlotOptions, ScanOptions};
use crate::error::AppError;
use crate::fit::fit_all;
use crate::io::{LoadOptions, all_series, discover_pairs, find_files, load, named_series, read_table};
use crate::plot::{Figure, overlay_figure, panel_figure, write_svg};
use crate::report::format_fit_lines;

/// All computed outputs of a single panel plot.
#[derive(Debug, Clone)]
pub struct PlotRun {
    pub flat: FlatSamples,
    /// Series after the transform, in measurement order.
    pub series: Vec<MeasurementSeries>,
    /// Present when fit display is enabled.
    pub fits: Option<Vec<FitResult>>,
    pub figure: Figure,
    /// One diagnostic line per fit.
    pub fit_lines: Vec<String>,
}

/// Execute the panel pipeline for one file, without side effects.
pub fn run_plot(path: &Path, options: &PlotOptions) -> Result<PlotRun, AppError> {
    plot_flat(load_pairs(path, options)?, options)
}

/// Load and flatten a file, requiring at least one x/y pair.
pub fn load_pairs(path: &Path, options: &PlotOptions) -> Result<FlatSamples, AppError> {
    let flat = load(
        path,
        LoadOptions {
            separator: options.separator,
            blank_rows: options.blank_rows,
        },
    )?;
    if flat.pair_count == 0 {
        return Err(AppError::EmptyData {
            path: path.to_path_buf(),
            reason: format!("{} column(s) is not enough for an x/y pair", flat.column_count),
        });
    }
    Ok(flat)
}

/// De-interleave, transform, fit and lay out already flattened samples.
pub fn plot_flat(flat: FlatSamples, options: &PlotOptions) -> Result<PlotRun, AppError> {
    let series: Vec<MeasurementSeries> = all_series(&flat, options.shape)?
        .into_iter()
        .map(|s| options.transform.apply(s))
        .collect();

    let fits = if options.show_fit {
        Some(fit_all(&series, options.degree)?)
    } else {
        None
    };
    let fit_lines = fits.as_deref().map(format_fit_lines).unwrap_or_default();
    let figure = panel_figure(&series, fits.as_deref(), options);

    Ok(PlotRun {
        flat,
        series,
        fits,
        figure,
        fit_lines,
    })
}

/// `plot_flat` followed by its outputs: fit lines on stdout, the SVG file when
/// a save path is configured and the terminal viewer when enabled.
pub fn render(flat: FlatSamples, options: &PlotOptions) -> Result<PlotRun, AppError> {
    let run = plot_flat(flat, options)?;

    for line in &run.fit_lines {
        println!("{line}");
    }
    if let Some(path) = &options.output.save_path {
        write_svg(&run.figure, path)?;
    }
    if options.output.show {
        crate::tui::show(&run.figure, &run.fit_lines)?;
    }
    Ok(run)
}

/// Overlay figure for one experiment file.
#[derive(Debug, Clone)]
pub struct ScanFigure {
    pub source: PathBuf,
    pub runs: Vec<MeasurementSeries>,
    pub figure: Figure,
    /// Where the figure should be saved, if saving is enabled.
    pub save_path: Option<PathBuf>,
}

/// Build the overlay figure for one experiment file.
pub fn run_scan_file(path: &Path, options: &ScanOptions) -> Result<ScanFigure, AppError> {
    let experiment = options.experiment;
    let table = read_table(path, options.separator)?;
    let pairs = discover_pairs(&table.headers, experiment.x_quantity(), experiment.y_quantity())?;
    if pairs.is_empty() {
        return Err(AppError::MissingColumn {
            name: crate::io::column_name(experiment.x_quantity(), 1),
        });
    }

    let transform = if options.inverse {
        Transform::Inverse
    } else {
        Transform::Identity
    };
    let runs: Vec<MeasurementSeries> = pairs
        .iter()
        .map(|pair| transform.apply(named_series(&table, pair, !options.inverse)))
        .collect();

    let stem = file_stem(path);
    let figure = overlay_figure(&stem, &runs, options);
    let save_path = options
        .figures_dir
        .as_ref()
        .map(|dir| dir.join(format!("{stem}.svg")));

    info!("'{}': {} runs", path.display(), runs.len());
    Ok(ScanFigure {
        source: path.to_path_buf(),
        runs,
        figure,
        save_path,
    })
}

/// Build overlay figures for every matching file in `dir`, in name order.
pub fn run_scan(dir: &Path, options: &ScanOptions) -> Result<Vec<ScanFigure>, AppError> {
    find_files(dir, options.experiment.file_prefix())?
        .iter()
        .map(|path| run_scan_file(path, options))
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "figure".to_string())
}
