//! Curve fitting.
//!
//! Responsibilities:
//!
//! - fit a polynomial per measurement (through-origin line or full polynomial)
//! - sample the fitted model on a dense grid for plotting

pub mod polyfit;

pub use polyfit::*;
