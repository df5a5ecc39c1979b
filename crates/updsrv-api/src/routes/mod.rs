//! # API Route Modules
//!
//! - `version` — public `GET /api/latest-version`.
//! - `download` — `GET /api/download-update/:filename`, behind the
//!   shared-secret gate in [`crate::auth`].

pub mod download;
pub mod version;
