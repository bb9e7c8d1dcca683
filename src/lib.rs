//! `lab-curves` library crate.
//!
//! The binary (`lab`) is a thin wrapper around this library so that:
//!
//! - the ingest/fit/plot pipeline is testable without spawning processes
//! - the pieces (ingest, transforms, fitting, SVG output) can be reused from
//!   other tools

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
