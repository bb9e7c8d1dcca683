//! Application error type.
//!
//! Every variant maps to a process exit code so `main` can stay a thin wrapper:
//!
//! - `2`: bad input (missing file, missing column, bad option, unreadable CSV)
//! - `3`: no usable data (empty file, shape mismatch)
//! - `4`: internal/runtime failures (filesystem, solver, rendering, export)

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("File not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("No data in '{}': {reason}", path.display())]
    EmptyData { path: PathBuf, reason: String },

    #[error("Shape mismatch: {samples} samples do not split evenly into rows of {stride} values")]
    ShapeMismatch { samples: usize, stride: usize },

    #[error("Missing required column: `{name}`")]
    MissingColumn { name: String },

    #[error("{0}")]
    InvalidConfig(String),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fit failed: {0}")]
    Fit(String),

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Wrap an I/O error with a short description of what we were doing.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::FileNotFound { .. }
            | AppError::MissingColumn { .. }
            | AppError::InvalidConfig(_)
            | AppError::Csv(_) => 2,
            AppError::EmptyData { .. } | AppError::ShapeMismatch { .. } => 3,
            AppError::Io { .. } | AppError::Fit(_) | AppError::Render(_) | AppError::Json(_) => 4,
        }
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AppError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AppError::Render(format!("{value:?}"))
    }
}
