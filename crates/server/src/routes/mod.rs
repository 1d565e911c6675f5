//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/orders             - Sanitized paid orders, newest first
//! GET  /api/products           - Product list (?limit=&keyword=)
//! GET  /api/product            - Product detail (?id=)
//! GET  /api/health             - Liveness and credential presence
//! GET  /api/debug              - Request echo (only with ENABLE_DEBUG_ENDPOINT)
//! ```
//!
//! Every route answers OPTIONS through the CORS layer and any other method
//! with 405. Unknown paths answer 404. All bodies are JSON.

pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    handler::Handler,
    routing::{MethodRouter, get},
};
use chrono::{SecondsFormat, Utc};
use order_proxy_core::ProxyError;

use crate::error::AppError;
use crate::state::AppState;

/// Create the API router.
pub fn routes(debug_endpoint: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/api/orders", get_only(orders::list))
        .route("/api/products", get_only(products::list))
        .route("/api/product", get_only(products::detail))
        .route("/api/health", get_only(health::health));

    let router = if debug_endpoint {
        router.route("/api/debug", get_only(health::debug))
    } else {
        router
    };

    router.fallback(not_found)
}

/// GET served by `handler`; every other method, HEAD included, is 405.
///
/// axum answers HEAD with the GET handler unless HEAD is routed explicitly.
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler)
        .head(method_not_allowed)
        .fallback(method_not_allowed)
}

/// Current time as RFC 3339 UTC with millisecond precision.
#[must_use]
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn method_not_allowed() -> AppError {
    AppError(ProxyError::MethodNotAllowed)
}

async fn not_found() -> AppError {
    AppError(ProxyError::RouteNotFound)
}
