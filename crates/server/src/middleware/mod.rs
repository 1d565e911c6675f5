//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. CORS response headers (`Allow-Methods`, `Allow-Headers` on every response)
//! 3. CORS layer (`Allow-Origin: *`, answers preflight without routing)
//! 4. `TraceLayer` (`http_request` span with status and latency)
//! 5. Request ID (recorded on the span, echoed in the response)

pub mod request_id;

use axum::http::{HeaderValue, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// Methods advertised to browsers.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
/// Request headers advertised to browsers.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Any origin may read responses. Every OPTIONS request is answered here with
/// an empty 200.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new().allow_origin(Any)
}

/// `Access-Control-Allow-Methods` on every response, preflight or not.
#[must_use]
pub fn allow_methods_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    )
}

/// `Access-Control-Allow-Headers` on every response, preflight or not.
#[must_use]
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    )
}
