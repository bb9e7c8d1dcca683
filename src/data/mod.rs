//! Data shaping that sits between ingest and fitting.
//!
//! - `transform`: per-series transforms (inverse, charge density, custom)
//! - `sample`: deterministic synthetic experiment files

pub mod sample;
pub mod transform;

pub use sample::*;
pub use transform::*;
