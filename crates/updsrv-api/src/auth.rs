//! # Shared-Secret Gate
//!
//! Middleware guarding the download route. The client sends the secret in
//! the `X-Api-Secret` header; it must equal the configured
//! `API_SECRET_KEY` byte for byte. Anything else is answered with 403 before
//! the wrapped handler runs.
//!
//! Unlike a development-mode bypass, an unset secret does not open the gate:
//! with no secret configured every request is rejected.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Header carrying the client-supplied secret.
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the secret to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Byte-for-byte equality that takes the same time wherever the inputs differ.
fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Decide whether a header value unlocks the gate.
///
/// An empty header never matches, nor does anything when no secret is set.
pub fn secret_matches(provided: Option<&[u8]>, expected: Option<&str>) -> bool {
    match (provided, expected) {
        (Some(p), Some(e)) if !p.is_empty() => constant_time_eq(p, e.as_bytes()),
        _ => false,
    }
}

/// Reject the request with 403 unless `X-Api-Secret` matches [`AuthConfig`].
pub async fn api_secret_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.secret.clone());

    let provided = request
        .headers()
        .get(API_SECRET_HEADER)
        .map(|v| v.as_bytes());

    if secret_matches(provided, expected.as_deref()) {
        return next.run(request).await;
    }

    let reason = match (provided, &expected) {
        (_, None) => "no API secret configured",
        (None, _) => "missing X-Api-Secret header",
        (Some(_), _) => "X-Api-Secret mismatch",
    };
    AppError::Unauthorized(format!("{reason} for {}", request.uri().path())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Router with the gate in front of a handler that counts its invocations.
    fn test_app(secret: Option<&str>) -> (Router, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new()
            .route(
                "/guarded",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .layer(from_fn(api_secret_middleware))
            .layer(axum::Extension(AuthConfig {
                secret: secret.map(str::to_string),
            }));
        (app, hits)
    }

    fn request(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/guarded");
        if let Some(v) = header {
            builder = builder.header("X-Api-Secret", v);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn assert_forbidden(response: Response) {
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Unauthorized: invalid API secret"})
        );
    }

    #[tokio::test]
    async fn correct_secret_reaches_handler() {
        let (app, hits) = test_app(Some("s3cret"));
        let response = app.oneshot(request(Some("s3cret"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_header_rejected_without_calling_handler() {
        let (app, hits) = test_app(Some("s3cret"));
        assert_forbidden(app.oneshot(request(None)).await.unwrap()).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_secrets_rejected_without_calling_handler() {
        for candidate in ["", "s3cre", "s3cret ", "S3CRET", "s3cret\t", "xs3cret"] {
            let (app, hits) = test_app(Some("s3cret"));
            assert_forbidden(app.oneshot(request(Some(candidate))).await.unwrap()).await;
            assert_eq!(hits.load(Ordering::SeqCst), 0, "candidate {candidate:?}");
        }
    }

    #[tokio::test]
    async fn unset_secret_rejects_everything() {
        let (app, hits) = test_app(None);
        assert_forbidden(app.clone().oneshot(request(None)).await.unwrap()).await;
        assert_forbidden(app.oneshot(request(Some("anything"))).await.unwrap()).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn header_name_is_case_insensitive() {
        let (app, _) = test_app(Some("s3cret"));
        let req = Request::builder()
            .uri("/guarded")
            .header("x-api-secret", "s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);
    }

    #[test]
    fn secret_matches_table() {
        assert!(secret_matches(Some(b"abc".as_slice()), Some("abc")));
        assert!(!secret_matches(Some(b"abd".as_slice()), Some("abc")));
        assert!(!secret_matches(Some(b"ab".as_slice()), Some("abc")));
        assert!(!secret_matches(None, Some("abc")));
        assert!(!secret_matches(Some(b"".as_slice()), Some("")));
        assert!(!secret_matches(Some(b"abc".as_slice()), None));
    }

    proptest! {
        #[test]
        fn only_the_exact_secret_matches(
            secret in "[ -~]{1,32}",
            provided in proptest::collection::vec(any::<u8>(), 0..40),
        ) {
            let expected = provided == secret.as_bytes();
            prop_assert_eq!(
                secret_matches(Some(provided.as_slice()), Some(secret.as_str())),
                expected
            );
            prop_assert!(!secret_matches(Some(provided.as_slice()), None));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn gate_never_reaches_handler_for_other_values(candidate in "[!-~]{0,24}") {
            prop_assume!(candidate != "s3cret");
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let (status, hits) = rt.block_on(async {
                let (app, hits) = test_app(Some("s3cret"));
                let response = app.oneshot(request(Some(&candidate))).await.unwrap();
                (response.status(), hits.load(Ordering::SeqCst))
            });
            prop_assert_eq!(status, StatusCode::FORBIDDEN);
            prop_assert_eq!(hits, 0);
        }
    }

    #[test]
    fn auth_config_debug_redacts() {
        let cfg = AuthConfig {
            secret: Some("hunter2".into()),
        };
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
