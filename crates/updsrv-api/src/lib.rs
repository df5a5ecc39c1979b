//! # updsrv-api — Axum API for Update Distribution
//!
//! Publishes the latest available release and serves its archive to
//! clients that hold the shared secret.
//!
//! ## API Surface
//!
//! | Route                                | Auth            | Module                 |
//! |--------------------------------------|-----------------|------------------------|
//! | `GET /api/latest-version`            | none            | [`routes::version`]    |
//! | `GET /api/download-update/:filename` | `X-Api-Secret`  | [`routes::download`]   |
//! | `GET /openapi.json`                  | none            | [`openapi`]            |
//! | `GET /health/liveness`               | none            | this module            |
//! | `GET /health/readiness`              | none            | this module            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → ApiSecretGate (download route only) → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod envelope;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Only the download route sits behind the secret gate; the version query,
/// health probes and OpenAPI document are public.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        secret: state.config.api_secret.clone(),
    };

    let api = Router::new()
        .merge(routes::version::router())
        .merge(routes::download::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(auth_config))
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 while the version record is readable and valid,
/// 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.get_latest().await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "version record unavailable")
        }
    }
}
