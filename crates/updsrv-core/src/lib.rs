#![deny(missing_docs)]

//! # updsrv-core — Filesystem Core of the Update Server
//!
//! The update server has no database. Its entire persistent state is two
//! things on disk, both owned by an operator who edits them by hand:
//!
//! 1. **The version record**: a small JSON file naming the latest release
//!    and the archive that carries it. See [`VersionRegistry`].
//! 2. **The archive directory**: a flat directory of opaque update
//!    packages served verbatim. See [`ArchiveStore`].
//!
//! The service only ever reads both, with one exception: on first start it
//! creates the directories and writes a default record
//! (`{"version": "0.0.0", "filename": ""}`) so that the record always exists
//! once the server is up.
//!
//! This crate has no HTTP dependency; `updsrv-api` wraps it in Axum routes.

pub mod archive;
pub mod error;
pub mod record;
pub mod registry;

pub use archive::{ArchiveFile, ArchiveStore};
pub use error::{ArchiveError, RegistryError};
pub use record::VersionRecord;
pub use registry::VersionRegistry;
