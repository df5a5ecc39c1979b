//! # Server Configuration
//!
//! Built once at startup from the environment and then owned by
//! [`AppState`](crate::state::AppState). Nothing reads the environment after
//! this point.
//!
//! | Variable           | Default                       |
//! |--------------------|-------------------------------|
//! | `PORT`             | `3000`                        |
//! | `API_SECRET_KEY`   | unset (downloads always 403)  |
//! | `UPDATE_FILES_DIR` | `updates`                     |
//! | `VERSION_FILE`     | `public/current_version.json` |
//!
//! Relative paths are resolved against the install root passed to
//! [`AppConfig::from_env`]; absolute paths are used as given.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default archive directory, relative to the install root.
pub const DEFAULT_UPDATE_FILES_DIR: &str = "updates";
/// Default version-record path, relative to the install root.
pub const DEFAULT_VERSION_FILE: &str = "public/current_version.json";

/// Errors building [`AppConfig`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `PORT` is set but is not a valid port number.
    #[error("invalid PORT value {0:?}: expected an integer in 0..=65535")]
    InvalidPort(String),
}

/// Process-wide configuration.
///
/// Custom `Debug` redacts the shared secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared secret expected in `X-Api-Secret`. `None` means no request
    /// can ever pass the download gate.
    pub api_secret: Option<String>,
    /// Directory holding the update archives.
    pub update_files_dir: PathBuf,
    /// Path of the persisted version record.
    pub version_file: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("update_files_dir", &self.update_files_dir)
            .field("version_file", &self.version_file)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env(root: &Path) -> Result<Self, ConfigError> {
        Self::from_lookup(root, |key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// An empty value is treated as unset for every variable.
    pub fn from_lookup(
        root: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let api_secret = var("API_SECRET_KEY");

        let update_files_dir = root.join(
            var("UPDATE_FILES_DIR").unwrap_or_else(|| DEFAULT_UPDATE_FILES_DIR.to_string()),
        );
        let version_file = root
            .join(var("VERSION_FILE").unwrap_or_else(|| DEFAULT_VERSION_FILE.to_string()));

        Ok(Self {
            port,
            api_secret,
            update_files_dir,
            version_file,
        })
    }

    /// Configuration rooted at `root` with every default and the given secret.
    pub fn rooted(root: &Path, api_secret: Option<&str>) -> Self {
        Self {
            port: DEFAULT_PORT,
            api_secret: api_secret.map(str::to_string),
            update_files_dir: root.join(DEFAULT_UPDATE_FILES_DIR),
            version_file: root.join(DEFAULT_VERSION_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_empty() {
        let root = Path::new("/opt/updsrv");
        let cfg = AppConfig::from_lookup(root, lookup_from(&[])).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.api_secret, None);
        assert_eq!(cfg.update_files_dir, PathBuf::from("/opt/updsrv/updates"));
        assert_eq!(
            cfg.version_file,
            PathBuf::from("/opt/updsrv/public/current_version.json")
        );
        assert_eq!(cfg, AppConfig::rooted(root, None));
    }

    #[test]
    fn explicit_values() {
        let cfg = AppConfig::from_lookup(
            Path::new("/opt/updsrv"),
            lookup_from(&[
                ("PORT", "8081"),
                ("API_SECRET_KEY", "s3cret"),
                ("UPDATE_FILES_DIR", "releases"),
                ("VERSION_FILE", "meta/latest.json"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.api_secret.as_deref(), Some("s3cret"));
        assert_eq!(cfg.update_files_dir, PathBuf::from("/opt/updsrv/releases"));
        assert_eq!(cfg.version_file, PathBuf::from("/opt/updsrv/meta/latest.json"));
    }

    #[test]
    fn absolute_paths_ignore_root() {
        let cfg = AppConfig::from_lookup(
            Path::new("/opt/updsrv"),
            lookup_from(&[("UPDATE_FILES_DIR", "/srv/updates")]),
        )
        .unwrap();
        assert_eq!(cfg.update_files_dir, PathBuf::from("/srv/updates"));
    }

    #[test]
    fn empty_secret_is_unset() {
        let cfg = AppConfig::from_lookup(
            Path::new("."),
            lookup_from(&[("API_SECRET_KEY", "")]),
        )
        .unwrap();
        assert_eq!(cfg.api_secret, None);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let root = Path::new("/opt/updsrv");
        let cfg = AppConfig::from_lookup(
            root,
            lookup_from(&[
                ("PORT", ""),
                ("API_SECRET_KEY", ""),
                ("UPDATE_FILES_DIR", ""),
                ("VERSION_FILE", ""),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.update_files_dir, PathBuf::from("/opt/updsrv/updates"));
        assert_eq!(
            cfg.version_file,
            PathBuf::from("/opt/updsrv/public/current_version.json")
        );
        assert_eq!(cfg, AppConfig::rooted(root, None));
    }

    #[test]
    fn invalid_port_rejected() {
        let err = AppConfig::from_lookup(Path::new("."), lookup_from(&[("PORT", "http")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("http".into()));

        assert!(AppConfig::from_lookup(Path::new("."), lookup_from(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = AppConfig::rooted(Path::new("/r"), Some("hunter2"));
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
