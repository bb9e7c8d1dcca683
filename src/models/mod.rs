//! Curve models.
//!
//! Models are implemented as small, pure functions so that fitting and plotting
//! code can stay generic.

pub mod polynomial;

pub use polynomial::*;
