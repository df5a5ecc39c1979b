//! # Version Registry
//!
//! Reads the persisted [`VersionRecord`] and creates it on first start.
//!
//! The registry never caches: every [`get_latest`](VersionRegistry::get_latest)
//! re-reads the file, so an operator's edit is visible on the next request
//! without a restart.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::RegistryError;
use crate::record::VersionRecord;

/// Handle to the version file on disk.
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    path: PathBuf,
}

impl VersionRegistry {
    /// Create a registry for the version file at `path`.
    ///
    /// Nothing is touched on disk until
    /// [`ensure_initialized`](VersionRegistry::ensure_initialized) runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the version file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and the default record if they are absent.
    ///
    /// Returns `true` when the default record was written by this call. An
    /// existing file is never overwritten, whatever it contains; anything
    /// other than a regular file at the path is an `Init` error.
    pub fn ensure_initialized(&self) -> Result<bool, RegistryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RegistryError::Init {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let init_err = |source| RegistryError::Init {
            path: self.path.clone(),
            source,
        };

        // create_new so a record placed concurrently by an operator wins.
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let meta = fs::metadata(&self.path).map_err(init_err)?;
                if !meta.is_file() {
                    return Err(init_err(std::io::Error::new(
                        ErrorKind::InvalidInput,
                        "version path exists but is not a regular file",
                    )));
                }
                return Ok(false);
            }
            Err(e) => return Err(init_err(e)),
        };

        let text = VersionRecord::initial()
            .to_json_pretty()
            .map_err(|e| init_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        file.write_all(text.as_bytes()).map_err(init_err)?;

        tracing::info!(path = %self.path.display(), "wrote default version record");
        Ok(true)
    }

    /// Read and parse the current record.
    pub async fn get_latest(&self) -> Result<VersionRecord, RegistryError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| RegistryError::Read {
                path: self.path.clone(),
                source,
            })?;

        VersionRecord::from_json_slice(&bytes).map_err(|source| RegistryError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
