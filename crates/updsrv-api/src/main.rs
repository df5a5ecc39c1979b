//! # updsrv — Binary Entry Point
//!
//! Prepares the filesystem layout and starts the Axum HTTP server.
//! Relative paths in the environment are resolved against `INSTALL_ROOT`,
//! or the working directory when that is unset. A `.env` file in the working
//! directory (or any parent) is loaded first; variables already exported win.

use std::path::PathBuf;

use updsrv_api::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before the subscriber, so RUST_LOG from .env is honoured.
    let dotenv = dotenvy::dotenv();

    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
    }

    let root = match std::env::var_os("INSTALL_ROOT") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let config = AppConfig::from_env(&root).map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;
    let port = config.port;

    let state = updsrv_api::bootstrap::bootstrap(config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = updsrv_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Update API listening on http://{}", addr);
    tracing::info!(
        "Upload archives and edit the version file manually; the server only reads them"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
