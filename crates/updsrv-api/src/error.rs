//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry and archive errors to HTTP status codes and renders the
//! `{"success": false, "message": ...}` envelope. Filesystem paths and OS
//! error text are logged, never returned to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use updsrv_core::{ArchiveError, RegistryError};

use crate::envelope::ErrorBody;

/// Client message for a rejected shared secret.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: invalid API secret";
/// Client message for a missing archive.
pub const NOT_FOUND_MESSAGE: &str = "update file not found";
/// Client message when the version record cannot be served.
pub const LATEST_VERSION_FAILED_MESSAGE: &str = "failed to get latest version";
/// Client message when an archive exists but cannot be sent.
pub const DOWNLOAD_FAILED_MESSAGE: &str = "failed to download update file";

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or mismatched `X-Api-Secret` (403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Requested archive does not exist (404).
    #[error(transparent)]
    NotFound(ArchiveError),

    /// Version record unreadable or malformed (500).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Archive exists but could not be opened (500).
    #[error(transparent)]
    Download(ArchiveError),
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NotFound(_) => Self::NotFound(err),
            _ => Self::Download(err),
        }
    }
}

impl AppError {
    /// Return the HTTP status code and client-facing message for this error.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized(_) => (StatusCode::FORBIDDEN, UNAUTHORIZED_MESSAGE),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            Self::Registry(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                LATEST_VERSION_FAILED_MESSAGE,
            ),
            Self::Download(_) => (StatusCode::INTERNAL_SERVER_ERROR, DOWNLOAD_FAILED_MESSAGE),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
