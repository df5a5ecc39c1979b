//! Latest-version query. Open to anyone; the record names a release and a
//! filename, nothing sensitive.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::envelope::{ErrorBody, LatestVersionBody};
use crate::error::AppError;
use crate::state::AppState;

/// Build the version router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/latest-version", get(latest_version))
}

/// GET /api/latest-version — Return the current version record.
#[utoipa::path(
    get,
    path = "/api/latest-version",
    tag = "updates",
    responses(
        (status = 200, description = "Current version record", body = LatestVersionBody),
        (status = 500, description = "Version record missing or malformed", body = ErrorBody),
    )
)]
pub async fn latest_version(
    State(state): State<AppState>,
) -> Result<Json<LatestVersionBody>, AppError> {
    let record = state.registry.get_latest().await?;
    tracing::info!(
        version = %record.version,
        filename = %record.filename,
        "serving latest version"
    );
    Ok(Json(record.into()))
}
