//! Daily sales aggregation.
//!
//! Validates a directory of numbered sales record files against master lists
//! (branches, commodities, ...) and writes one summary file per list with the
//! total sale amount of every code.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod master;
pub mod pipeline;
pub mod records;
pub mod report;

pub use error::{SalesError, SalesResult};
pub use pipeline::{run_pipeline, RunSummary};
