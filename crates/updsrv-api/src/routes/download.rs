//! Archive download, gated by [`crate::auth::api_secret_middleware`].
//!
//! The file is streamed from disk rather than buffered. Once the status line
//! and headers are out, a read failure can no longer become a JSON error:
//! it is logged as [`ArchiveError::Stream`] and the client sees a truncated
//! body.

use std::io;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::{Stream, TryStreamExt};
use tokio_util::io::ReaderStream;
use updsrv_core::{ArchiveError, ArchiveFile};

use crate::auth;
use crate::envelope::ErrorBody;
use crate::error::AppError;
use crate::state::AppState;

/// Build the download router with the secret gate applied.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/download-update/:filename", get(download_update))
        .route_layer(from_fn(auth::api_secret_middleware))
}

/// GET /api/download-update/:filename — Stream an archive as an attachment.
#[utoipa::path(
    get,
    path = "/api/download-update/{filename}",
    tag = "updates",
    params(
        ("filename" = String, Path, description = "Archive name as advertised by /api/latest-version"),
        ("X-Api-Secret" = String, Header, description = "Shared secret"),
    ),
    responses(
        (status = 200, description = "Raw archive bytes (application/octet-stream attachment)"),
        (status = 403, description = "Missing or invalid X-Api-Secret", body = ErrorBody),
        (status = 404, description = "No such archive", body = ErrorBody),
        (status = 500, description = "Archive exists but could not be opened", body = ErrorBody),
    )
)]
pub async fn download_update(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let ArchiveFile {
        filename,
        len,
        file,
    } = state.archives.open(&filename).await?;

    tracing::info!(%filename, bytes = len, "serving update file");

    let disposition = content_disposition(&filename);
    let stream = log_stream_errors(ReaderStream::new(file), filename);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(len)),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Turn mid-transfer read failures into logged [`ArchiveError::Stream`]s.
///
/// Chunks before the failure pass through untouched; the body ends at the
/// first error.
fn log_stream_errors<S>(
    chunks: S,
    filename: String,
) -> impl Stream<Item = Result<Bytes, ArchiveError>> + Send + 'static
where
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    chunks.map_err(move |source| {
        let err = ArchiveError::Stream {
            filename: filename.clone(),
            source,
        };
        tracing::error!(error = %err, "update transfer aborted after headers were sent");
        err
    })
}

/// `attachment; filename="..."`, adding an RFC 5987 `filename*` when the
/// name is not plain printable ASCII.
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let mut value = format!("attachment; filename=\"{fallback}\"");
    if fallback != filename {
        value.push_str("; filename*=UTF-8''");
        for byte in filename.bytes() {
            if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
                value.push(byte as char);
            } else {
                value.push_str(&format!("%{byte:02X}"));
            }
        }
    }

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
