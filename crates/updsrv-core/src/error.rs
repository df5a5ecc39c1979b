//! # Core Error Types
//!
//! Structured errors for the version registry and the archive store.
//! Every variant carries the path or filename it concerns so the API layer
//! can log a useful diagnostic without exposing it to clients.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or initialising the persisted version record.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The version file is missing or could not be read.
    #[error("failed to read version file {path}: {source}")]
    Read {
        /// Location of the version file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The version file was read but does not hold a valid record.
    #[error("malformed version file {path}: {source}")]
    Parse {
        /// Location of the version file.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// Startup could not create a directory or write the default record.
    #[error("failed to initialise {path}: {source}")]
    Init {
        /// Directory or file that could not be created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Errors from resolving, opening, or streaming an archive file.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// No regular file with this name exists in the archive directory,
    /// or the name can never denote one (empty, `..`, contains a separator).
    #[error("update file not found: {0}")]
    NotFound(String),

    /// The file exists but could not be opened or inspected.
    #[error("failed to open update file {filename}: {source}")]
    Io {
        /// Requested archive name.
        filename: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading failed after the transfer had already started.
    #[error("stream of update file {filename} failed: {source}")]
    Stream {
        /// Requested archive name.
        filename: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}
