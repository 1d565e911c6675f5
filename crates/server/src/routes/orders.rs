//! Order route handlers.

use axum::{Json, extract::State};
use order_proxy_core::{Order, OrderList, OrdersRequest};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::timestamp;
use crate::error::Result;
use crate::state::AppState;

/// Body of `GET /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
    pub count: u64,
    pub timestamp: String,
}

/// Fetch paid, non-cancelled orders with customer names masked.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<OrdersResponse>> {
    let OrderList { orders, count } = state.zortout().fetch(&OrdersRequest).await?;
    tracing::info!(count, returned = orders.len(), "Fetched orders");

    Ok(Json(OrdersResponse {
        success: true,
        orders,
        count,
        timestamp: timestamp(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get, json, send, state};

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_failure() {
        let response = send(state(false), get("/api/orders")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Upstream request failed: connection-error");
    }
}
