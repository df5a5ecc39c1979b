//! # JSON Envelopes
//!
//! Every JSON response is wrapped in a `success` flag: successful bodies
//! carry `data`, failures carry a human-readable `message`.

use serde::{Deserialize, Serialize};
use updsrv_core::VersionRecord;
use utoipa::ToSchema;

/// Failure body: `{"success": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// What went wrong, safe to show to the client.
    pub message: String,
}

impl ErrorBody {
    /// Build a failure body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Success body for `GET /api/latest-version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LatestVersionBody {
    /// Always `true`.
    pub success: bool,
    /// The current version record, exactly as stored.
    #[schema(value_type = Object)]
    pub data: VersionRecord,
}

impl From<VersionRecord> for LatestVersionBody {
    fn from(data: VersionRecord) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
