//! Error types for the capture sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for capture sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the capture sorter
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read image metadata from {path}: {message}")]
    MetadataRead { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
