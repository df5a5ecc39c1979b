//! # OpenAPI Specification Assembly
//!
//! Serves the generated OpenAPI document for the update endpoints at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the update API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "updsrv — Update Distribution API",
        description = "Latest-version query and secret-gated download of update archives.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::version::latest_version,
        crate::routes::download::download_update,
    ),
    components(schemas(
        crate::envelope::LatestVersionBody,
        crate::envelope::ErrorBody,
    )),
    tags(
        (name = "updates", description = "Update discovery and download"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
