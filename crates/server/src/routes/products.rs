//! Product route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use order_proxy_core::{
    Product, ProductDetail, ProductDetailRequest, ProductList, ProductsRequest, ProxyError,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::timestamp;
use crate::error::Result;
use crate::state::AppState;

/// Query parameters of `GET /api/products`.
///
/// Kept as raw strings so a bad `limit` gets the uniform error body.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub limit: Option<String>,
    pub keyword: Option<String>,
}

/// Query parameters of `GET /api/product`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub id: Option<String>,
}

/// Body of `GET /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub count: u64,
    pub timestamp: String,
}

/// Body of `GET /api/product`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: ProductDetail,
    pub timestamp: String,
}

/// Fetch the product list.
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductsQuery>, QueryRejection>,
) -> Result<Json<ProductsResponse>> {
    let Query(query) = query.map_err(invalid_query)?;
    let request = ProductsRequest::from_params(query.limit.as_deref(), query.keyword.as_deref())?;

    let ProductList { products, count } = state.zortout().fetch(&request).await?;
    tracing::info!(
        count,
        returned = products.len(),
        limit = request.limit(),
        "Fetched products"
    );

    Ok(Json(ProductsResponse {
        success: true,
        products,
        count,
        timestamp: timestamp(),
    }))
}

/// Fetch one product by id.
///
/// The id is validated before any upstream call is made.
#[instrument(skip(state, query))]
pub async fn detail(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ProductResponse>> {
    let Query(query) = query.map_err(invalid_query)?;
    let request = ProductDetailRequest::from_param(query.id.as_deref())?;

    let product = state.zortout().fetch(&request).await?;
    tracing::info!(id = request.id(), "Fetched product detail");

    Ok(Json(ProductResponse {
        success: true,
        product,
        timestamp: timestamp(),
    }))
}

fn invalid_query(rejection: QueryRejection) -> ProxyError {
    ProxyError::Validation(rejection.body_text())
}
