//! Order Proxy Core - upstream data handling without I/O.
//!
//! This crate holds everything the proxy decides, as opposed to everything it
//! transports:
//! - `server` - HTTP surface in front of the upstream order-management API
//! - `cli` - operator tooling that talks to the upstream directly
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no network
//! access, no environment reads. A request flows through it as:
//!
//! ```text
//! UpstreamResource (validated input, path, query)
//!        │
//!        ▼  (network call happens in the server crate)
//! UpstreamResponse { status, body }
//!        │
//!        ▼
//! interpret::*  ──►  sanitize::*  ──►  outward types
//!        │
//!        └──► ProxyError (classified failure)
//! ```
//!
//! # Modules
//!
//! - [`credentials`] - Immutable store credentials and presence reporting
//! - [`error`] - `ProxyError` taxonomy and `ConfigError`
//! - [`interpret`] - Per-resource response interpreters
//! - [`resource`] - `UpstreamResource` trait and the three resource requests
//! - [`sanitize`] - PII masking and field allow-listing
//! - [`types`] - Envelope and outward data types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod credentials;
pub mod error;
pub mod interpret;
pub mod resource;
pub mod sanitize;
pub mod types;

pub use credentials::{CredentialContext, CredentialPresence};
pub use error::{ConfigError, ErrorKind, NetworkFailure, ProxyError};
pub use resource::{
    OrdersRequest, ProductDetailRequest, ProductsRequest, ResourceKind, UpstreamResource,
};
pub use types::*;
