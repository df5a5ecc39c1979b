//! # Application State
//!
//! Shared state for the Axum application, passed to route handlers via the
//! `State` extractor. Everything here is immutable after startup; the only
//! shared resource is the filesystem behind the registry and archive store.

use std::sync::Arc;

use updsrv_core::{ArchiveStore, VersionRegistry};

use crate::config::AppConfig;

/// Cloneable per-request handle to configuration and storage.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration the process was started with.
    pub config: Arc<AppConfig>,
    /// The persisted latest-version record.
    pub registry: VersionRegistry,
    /// The flat directory of update archives.
    pub archives: ArchiveStore,
}

impl AppState {
    /// Build state over the paths named in `config`.
    ///
    /// Does not touch the filesystem; see [`crate::bootstrap::bootstrap`].
    pub fn new(config: AppConfig) -> Self {
        let registry = VersionRegistry::new(&config.version_file);
        let archives = ArchiveStore::new(&config.update_files_dir);
        Self {
            config: Arc::new(config),
            registry,
            archives,
        }
    }
}
