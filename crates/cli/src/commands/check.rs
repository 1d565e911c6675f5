//! Upstream connection checks.
//!
//! # Usage
//!
//! ```bash
//! op-cli check orders --limit 3
//! op-cli check products --limit 5 --keyword mango
//! op-cli check product --id 4470988
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORENAME`, `APIKEY`, `APISECRET`, plus the optional
//! `UPSTREAM_BASE_URL` and `UPSTREAM_TIMEOUT_SECS`.
//!
//! Output goes through the same interpreters and sanitizers as the server,
//! so customer names are masked here too.

use order_proxy_core::{
    ConfigError, DetailEnvelope, OrdersRequest, ProductDetailRequest, ProductsRequest, ProxyError,
    UpstreamResource,
};
use order_proxy_server::config::ProxyConfig;
use order_proxy_server::zortout::{ZortoutClient, ZortoutError};
use thiserror::Error;

/// Products printed by `check products`.
const PRODUCTS_SHOWN: usize = 5;

/// Errors that can occur during a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The upstream client could not be built.
    #[error("Client error: {0}")]
    Client(#[from] ZortoutError),

    /// The upstream call failed; the kind tag is logged separately.
    #[error("{} ({})", .0.message(), .0.kind())]
    Proxy(#[from] ProxyError),
}

/// Fetch orders and print the first `shown` of them.
///
/// # Errors
///
/// Returns `CheckError` if configuration is invalid or the upstream call
/// fails.
pub async fn orders(shown: usize) -> Result<(), CheckError> {
    let client = connect()?;

    tracing::info!("Fetching orders...");
    let list = client.fetch(&OrdersRequest).await.inspect_err(log_kind)?;

    tracing::info!("Orders: {} returned, {} total", list.orders.len(), list.count);
    for order in list.orders.iter().take(shown) {
        tracing::info!(
            "  #{} {} | {} | {} | {} line(s)",
            order.number,
            order.customer_name,
            order.amount,
            order.order_date,
            order.items.len()
        );
    }

    Ok(())
}

/// Fetch the product list.
///
/// # Errors
///
/// Returns `CheckError` if configuration is invalid or the upstream call
/// fails.
pub async fn products(limit: u32, keyword: Option<&str>) -> Result<(), CheckError> {
    let request = ProductsRequest::from_params(Some(&limit.to_string()), keyword)?;
    let client = connect()?;

    tracing::info!("Fetching products (limit {})...", request.limit());
    let list = client.fetch(&request).await.inspect_err(log_kind)?;

    tracing::info!("Products: {} returned, {} total", list.products.len(), list.count);
    for product in list.products.iter().take(PRODUCTS_SHOWN) {
        let field = |key: &str| {
            product
                .0
                .get(key)
                .map_or_else(|| "-".to_string(), ToString::to_string)
        };
        tracing::info!("  {} | {}", field("id"), field("name"));
    }

    Ok(())
}

/// Fetch one product and report which envelope shape the upstream used.
///
/// # Errors
///
/// Returns `CheckError` if the id is blank, configuration is invalid or the
/// upstream call fails.
pub async fn product(id: &str) -> Result<(), CheckError> {
    let request = ProductDetailRequest::from_param(Some(id))?;
    let client = connect()?;

    tracing::info!("Fetching product {}...", request.id());
    let response = client
        .request(request.path(), &request.query())
        .await
        .map_err(ProxyError::from)
        .inspect_err(log_kind)?;

    if let Some(body) = response.body.as_json() {
        tracing::info!("Envelope shape: {}", DetailEnvelope::detect(body).shape());
    }

    let detail = request.interpret(&response).inspect_err(log_kind)?;
    tracing::info!(
        "Product: id={} name={} ({} fields)",
        detail.id().map_or_else(|| "-".to_string(), ToString::to_string),
        detail.name().unwrap_or("-"),
        detail.0.len()
    );

    Ok(())
}

fn connect() -> Result<ZortoutClient, CheckError> {
    let config = ProxyConfig::from_env()?;
    config.warn_on_placeholder_credentials();
    tracing::info!("Upstream: {}", config.upstream.base_url);
    Ok(ZortoutClient::new(&config.credentials, &config.upstream)?)
}

fn log_kind(err: &ProxyError) {
    tracing::error!(kind = %err.kind(), status = err.status_code(), "Upstream check failed");
}
