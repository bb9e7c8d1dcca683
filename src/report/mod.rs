//! Reporting utilities: fit diagnostics and load summaries.

pub mod format;

pub use format::*;
