//! # Archive Store
//!
//! A flat directory of update packages, served byte-for-byte.
//!
//! Archives are addressed by bare filename. There are no subdirectories, so
//! any name that is not a single normal path component (empty, `.`, `..`,
//! anything containing a separator) can never exist and resolves to
//! [`ArchiveError::NotFound`]. This keeps a decoded `..%2F` in a URL from
//! escaping the directory.
//!
//! Opening is a single step: there is no separate existence check, so a file
//! removed between "does it exist" and "open it" cannot cause a half-started
//! response.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tokio::fs::File;

use crate::error::{ArchiveError, RegistryError};

/// Handle to the archive directory.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    dir: PathBuf,
}

/// An archive opened for download.
#[derive(Debug)]
pub struct ArchiveFile {
    /// Name the client asked for.
    pub filename: String,
    /// Size in bytes at the time of opening.
    pub len: u64,
    /// Open handle positioned at the start of the file.
    pub file: File,
}

impl ArchiveStore {
    /// Create a store over the directory at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the archive directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the archive directory (and any missing ancestors).
    pub fn ensure_dir(&self) -> Result<(), RegistryError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| RegistryError::Init {
            path: self.dir.clone(),
            source,
        })
    }

    /// Map a requested filename to its path inside the directory.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, ArchiveError> {
        if !is_flat_name(filename) {
            return Err(ArchiveError::NotFound(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }

    /// Open an archive for streaming.
    ///
    /// Anything that is not a regular file (missing, a directory, a bad name)
    /// is [`ArchiveError::NotFound`]; other I/O failures are
    /// [`ArchiveError::Io`].
    pub async fn open(&self, filename: &str) -> Result<ArchiveFile, ArchiveError> {
        let path = self.resolve(filename)?;

        let io_err = |source: std::io::Error| {
            if source.kind() == ErrorKind::NotFound {
                ArchiveError::NotFound(filename.to_string())
            } else {
                ArchiveError::Io {
                    filename: filename.to_string(),
                    source,
                }
            }
        };

        let file = File::open(&path).await.map_err(io_err)?;
        let meta = file.metadata().await.map_err(io_err)?;
        if !meta.is_file() {
            return Err(ArchiveError::NotFound(filename.to_string()));
        }

        Ok(ArchiveFile {
            filename: filename.to_string(),
            len: meta.len(),
            file,
        })
    }
}

/// True when `name` is exactly one normal path component on every platform.
fn is_flat_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
