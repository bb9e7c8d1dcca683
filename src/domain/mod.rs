//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsing policies (`BlankRowPolicy`, `ShapePolicy`)
//! - tabular data (`RawTable`, `FlatSamples`, `ColumnPair`, `MeasurementSeries`)
//! - fit outputs (`FitResult`) and per-command option structs

pub mod types;

pub use types::*;
