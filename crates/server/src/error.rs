//! Error responses with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. `AppError` wraps the core
//! `ProxyError` and renders the uniform `{success:false, message}` body with
//! the mapped status, capturing server-side failures to Sentry first.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use order_proxy_core::{ErrorKind, ProxyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on raw upstream body text written to logs.
pub const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Application-level error type for the proxy.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct AppError(#[from] pub ProxyError);

/// Body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let kind = err.kind();
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let raw_body = match &err {
            ProxyError::Network(failure) => failure.raw_body().map(truncate_body),
            _ => None,
        };

        if err.is_server_error() {
            let event_id = sentry::capture_error(&err);
            tracing::error!(
                kind = %kind,
                status = status.as_u16(),
                error = %err,
                raw_body,
                sentry_event_id = %event_id,
                "Request failed"
            );
        } else if matches!(kind, ErrorKind::UpstreamHttp | ErrorKind::UpstreamSemantic) {
            tracing::warn!(
                kind = %kind,
                status = status.as_u16(),
                error = %err,
                "Upstream rejected request"
            );
        } else {
            tracing::info!(
                kind = %kind,
                status = status.as_u16(),
                error = %err,
                "Request rejected"
            );
        }

        let body = ErrorBody {
            success: false,
            message: err.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Cut `raw` to at most [`MAX_LOGGED_BODY_BYTES`] on a char boundary.
fn truncate_body(raw: &str) -> &str {
    if raw.len() <= MAX_LOGGED_BODY_BYTES {
        return raw;
    }

    let mut end = MAX_LOGGED_BODY_BYTES;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    raw.get(..end).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use order_proxy_core::{NetworkFailure, ResourceKind};

    use super::*;

    async fn render(err: ProxyError) -> (StatusCode, ErrorBody) {
        let response = AppError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = render(ProxyError::Validation("Product ID is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            ErrorBody {
                success: false,
                message: "Product ID is required".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_upstream_status_is_mirrored() {
        let (status, body) = render(ProxyError::UpstreamHttp {
            status: 401,
            desc: None,
        })
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message, "API Error: 401 - check API credentials");
    }

    #[tokio::test]
    async fn test_semantic_and_network_statuses() {
        let (status, _) = render(ProxyError::UpstreamSemantic {
            resource: ResourceKind::ProductDetail,
            desc: None,
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = render(ProxyError::Network(NetworkFailure::InvalidJson {
            raw: "<html>oops</html>".into(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("oops"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        assert_eq!(truncate_body("short"), "short");

        let long = "ก".repeat(1000);
        let cut = truncate_body(&long);
        assert!(cut.len() <= MAX_LOGGED_BODY_BYTES);
        assert!(cut.chars().all(|c| c == 'ก'));
    }
}
