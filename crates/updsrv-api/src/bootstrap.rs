//! # Startup Initialisation
//!
//! Prepares the filesystem before the listener opens: the archive directory
//! and the version file's parent are created if missing, and a default
//! version record is written if none exists. Any failure here aborts
//! startup; the server never runs against a half-initialised layout.

use thiserror::Error;
use updsrv_core::RegistryError;

use crate::config::AppConfig;
use crate::state::AppState;

/// Error preparing the filesystem layout.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// A directory or the default record could not be created.
    #[error("filesystem initialisation failed: {0}")]
    Filesystem(#[from] RegistryError),
}

/// Initialise the on-disk layout and build [`AppState`].
///
/// Idempotent across restarts: existing directories and an existing version
/// record are left untouched.
pub fn bootstrap(config: AppConfig) -> Result<AppState, BootstrapError> {
    let state = AppState::new(config);

    state.archives.ensure_dir()?;
    let created = state.registry.ensure_initialized()?;

    tracing::info!(
        update_files_dir = %state.archives.dir().display(),
        version_file = %state.registry.path().display(),
        default_record_written = created,
        "filesystem layout ready"
    );
    if state.config.api_secret.is_none() {
        tracing::warn!("API_SECRET_KEY is not set; every download request will be rejected");
    }

    Ok(state)
}
