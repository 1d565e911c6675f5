//! Upstream envelope types and the outward data contract.

pub mod envelope;
pub mod order;
pub mod product;

pub use envelope::{
    DetailEnvelope, EnvelopeShape, ListEnvelope, ResponseStatus, UpstreamBody, UpstreamResponse,
};
pub use order::{Order, OrderItem, OrderList, UpstreamOrder};
pub use product::{Product, ProductDetail, ProductList};
