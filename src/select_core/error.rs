use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectError {
    // Fatal, raised before anything is queried or written
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DataAccess(#[from] rusqlite::Error),

    #[error("Not a digiKam database: {path} has no table '{table}'")]
    InvalidSchema { path: PathBuf, table: String },

    // Per-file errors, reported and skipped by the materializer
    #[error("File {path} is not readable or doesn't exist: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Target {0} already exists")]
    TargetConflict(PathBuf),

    #[error("Refusing to replace {0} with itself")]
    SameFile(PathBuf),

    #[error("Cannot hard link {from} to {to}: different filesystems")]
    CrossDeviceLink { from: PathBuf, to: PathBuf },

    #[error("Failed to convert {path}: {reason}")]
    Conversion { path: PathBuf, reason: String },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),
}

/// Result type for digikam-select operations.
pub type Result<T> = std::result::Result<T, SelectError>;
