//! Health and debug handlers. Neither calls the upstream.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{Method, Uri},
};
use order_proxy_core::credentials::label;
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::state::AppState;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    /// `SET`/`MISSING` per credential, keyed `storename`, `apikey`, `apisecret`.
    pub environment: BTreeMap<String, String>,
}

/// Body of `GET /api/debug`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugResponse {
    pub success: bool,
    pub message: String,
    /// `SET`/`MISSING` keyed by variable name.
    pub environment: BTreeMap<String, String>,
    pub method: String,
    pub url: String,
    pub query: BTreeMap<String, String>,
    pub timestamp: String,
}

/// Liveness check with credential presence. Never echoes secret values.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let presence = state.config().credential_presence;

    let environment = [
        ("storename", presence.store_name),
        ("apikey", presence.api_key),
        ("apisecret", presence.api_secret),
    ]
    .into_iter()
    .map(|(key, present)| (key.to_string(), label(present).to_string()))
    .collect();

    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: timestamp(),
        environment,
    })
}

/// Echo the request line for troubleshooting deployments.
pub async fn debug(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Json<DebugResponse> {
    let environment = state
        .config()
        .credential_presence
        .labels()
        .into_iter()
        .map(|(var, label)| (var.to_string(), label.to_string()))
        .collect();

    Json(DebugResponse {
        success: true,
        message: "Debug endpoint working".to_string(),
        environment,
        method: method.to_string(),
        url: path_and_query(&uri),
        query: query_pairs(&uri),
        timestamp: timestamp(),
    })
}

fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}

fn query_pairs(uri: &Uri) -> BTreeMap<String, String> {
    uri.query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get, json, send, state};

    #[tokio::test]
    async fn test_health_reports_presence_only() {
        let response = send(state(false), get("/api/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let body = json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Server is running");
        assert_eq!(body["environment"]["storename"], "SET");
        assert_eq!(body["environment"]["apikey"], "SET");
        assert_eq!(body["environment"]["apisecret"], "SET");

        let text = body.to_string();
        assert!(!text.contains("k-123"));
        assert!(!text.contains("s-456"));
    }

    #[tokio::test]
    async fn test_debug_echoes_request() {
        let response = send(state(true), get("/api/debug?foo=bar&n=1")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["message"], "Debug endpoint working");
        assert_eq!(body["method"], "GET");
        assert_eq!(body["url"], "/api/debug?foo=bar&n=1");
        assert_eq!(body["query"]["foo"], "bar");
        assert_eq!(body["environment"]["APISECRET"], "SET");
        assert!(!body.to_string().contains("demo-store"));
    }
}
