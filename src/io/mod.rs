//! Input/output helpers.
//!
//! - CSV ingest, flattening and de-interleaving (`ingest`)
//! - experiment file discovery and named column pairs (`discover`)
//! - fit exports (JSON) (`export`)

pub mod discover;
pub mod export;
pub mod ingest;

pub use discover::*;
pub use export::*;
pub use ingest::*;
