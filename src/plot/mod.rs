//! Chart building and file output.
//!
//! - `figure`: backend-independent chart description (panels, series, bounds)
//! - `svg`: vector output via Plotters' SVG backend

pub mod figure;
pub mod svg;

pub use figure::*;
pub use svg::*;
