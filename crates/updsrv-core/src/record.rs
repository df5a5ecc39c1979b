//! # Version Record
//!
//! The persisted descriptor of the latest available update.

use serde::{Deserialize, Serialize};

/// Version string written when no record exists yet.
pub const INITIAL_VERSION: &str = "0.0.0";

/// Latest available update: a version label and the archive that carries it.
///
/// The record is returned verbatim. `version` is conventionally a semantic
/// version such as `"1.2.3"` but is never validated as one, and `filename`
/// is not checked against the archive directory. Unknown JSON keys are
/// ignored on read; both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Release label, e.g. `"1.2.0"`.
    pub version: String,
    /// Name of the archive in the update directory, e.g. `"app-1.2.0.zip"`.
    pub filename: String,
}

impl VersionRecord {
    /// Create a record for the given version and archive name.
    pub fn new(version: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            filename: filename.into(),
        }
    }

    /// The record written on first start: version `0.0.0`, no archive.
    pub fn initial() -> Self {
        Self::new(INITIAL_VERSION, "")
    }

    /// Parse a record from the JSON text of the version file.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parse a record from the raw bytes of the version file.
    ///
    /// Bytes that are not valid UTF-8 are a JSON error, not an I/O error.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Render the record the way it is stored on disk (2-space indented JSON).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for VersionRecord {
    fn default() -> Self {
        Self::initial()
    }
}
