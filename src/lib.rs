//! Capture Sorter - a CLI tool for classifying photos by capture metadata
//!
//! This library provides functionality for organizing image files into a
//! destination tree based on their embedded EXIF metadata:
//! - Capture date and camera model extraction
//! - Year/month/model destination path derivation
//! - Sequential copy orchestration with run statistics
//! - Injected reporting so the core stays console-free

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod process;
pub mod report;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{Classification, UNKNOWN_BUCKET, classify, strip_null_bytes};
pub use cli::Cli;
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use metadata::{CaptureDate, GpsCoordinate, PhotoMetadata};
pub use process::{ClassifyOutcome, Processor, RunStatistics};
pub use report::{ConsoleReporter, Reporter};
