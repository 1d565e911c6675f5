//! Per-request correlation id.
//!
//! The id ties together the `http_request` span, any Sentry event raised while
//! handling the request and the `x-request-id` response header the dashboard
//! can quote back when reporting a failure.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id that is reused as-is.
const MAX_INBOUND_LEN: usize = 128;

/// Pick the id for this request.
///
/// An inbound `x-request-id` set by the hosting edge is reused when it is
/// short printable ASCII. Anything else is replaced by a fresh UUID v4 so
/// callers cannot push arbitrary text into logs.
#[must_use]
pub fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| is_acceptable(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_INBOUND_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Attach a request id to the span, the Sentry scope and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_inbound_id_is_reused() {
        assert_eq!(resolve_request_id(&headers("edge-42")), "edge-42");
        assert_eq!(resolve_request_id(&headers("  edge-42 ")), "edge-42");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let id = resolve_request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_unacceptable_ids_are_replaced() {
        let long = "a".repeat(MAX_INBOUND_LEN + 1);
        for value in ["", "has space", long.as_str()] {
            let id = resolve_request_id(&headers(value));
            assert!(Uuid::parse_str(&id).is_ok(), "{value:?}");
        }
    }
}
