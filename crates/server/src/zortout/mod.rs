//! Zortout order-management API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` 0.13, GET only
//! - Credentials travel as three default headers marked sensitive
//! - One attempt per call, no retries, whole-request timeout
//! - Bodies are read fully, then parsed once; interpretation lives in
//!   `order_proxy_core::interpret`
//!
//! # Example
//!
//! ```rust,ignore
//! use order_proxy_core::ProductDetailRequest;
//! use order_proxy_server::zortout::ZortoutClient;
//!
//! let client = ZortoutClient::new(&config.credentials, &config.upstream)?;
//! let request = ProductDetailRequest::from_param(Some("4470988"))?;
//! let product = client.fetch(&request).await?;
//! ```

mod client;

pub use client::{API_KEY_HEADER, API_SECRET_HEADER, STORE_NAME_HEADER, ZortoutClient};

use thiserror::Error;

/// Errors that can occur while building the client.
#[derive(Debug, Error)]
pub enum ZortoutError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A credential contains bytes that cannot be sent in a header.
    #[error("Credential {0} is not a valid header value")]
    InvalidHeader(&'static str),
}
