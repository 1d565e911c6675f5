//! Response interpreters.
//!
//! One pure function per resource turns an [`UpstreamResponse`] into either
//! sanitized outward data or a classified [`ProxyError`]:
//!
//! 1. A non-2xx status is an `UpstreamHttp` error regardless of the body;
//!    `res.resDesc` is lifted out for the message when present.
//! 2. A 2xx body that is not JSON is a `Network(InvalidJson)` failure.
//! 3. A 2xx JSON body that fails the resource's shape check is an
//!    `UpstreamSemantic` error.
//! 4. Otherwise the payload goes to the matching sanitizer.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{NetworkFailure, ProxyError};
use crate::resource::ResourceKind;
use crate::sanitize;
use crate::types::envelope::res_desc;
use crate::types::{
    DetailEnvelope, ListEnvelope, OrderList, Product, ProductDetail, ProductList, UpstreamBody,
    UpstreamOrder, UpstreamResponse,
};

/// Interpret an order list response.
///
/// Success requires `res.resCode == "200"` and a `list` (possibly empty).
///
/// # Errors
///
/// Returns `UpstreamHttp`, `Network(InvalidJson)` or `UpstreamSemantic` as
/// described in the module docs.
pub fn interpret_orders(response: &UpstreamResponse) -> Result<OrderList, ProxyError> {
    let body = successful_body(response)?;
    let (orders, count) = list_payload::<UpstreamOrder>(ResourceKind::Orders, body)?;
    Ok(sanitize::sanitize_orders(orders, count))
}

/// Interpret a product list response.
///
/// # Errors
///
/// Same classification as [`interpret_orders`].
pub fn interpret_products(response: &UpstreamResponse) -> Result<ProductList, ProxyError> {
    let body = successful_body(response)?;
    let (products, count) = list_payload::<Product>(ResourceKind::Products, body)?;
    Ok(sanitize::sanitize_products(products, count))
}

/// Interpret a product detail response in either envelope shape.
///
/// # Errors
///
/// Returns `UpstreamSemantic` when the body is neither a successful wrapped
/// envelope carrying a `product` object nor a bare product object.
pub fn interpret_product_detail(response: &UpstreamResponse) -> Result<ProductDetail, ProxyError> {
    let body = successful_body(response)?;

    match DetailEnvelope::detect(body) {
        DetailEnvelope::Wrapped {
            res,
            product: Some(product),
        } if res.is_success() => Ok(ProductDetail(product)),
        DetailEnvelope::Bare(product) => Ok(ProductDetail(product)),
        DetailEnvelope::Wrapped { .. } | DetailEnvelope::Unrecognized => {
            Err(semantic(ResourceKind::ProductDetail, body))
        }
    }
}

/// Steps 1 and 2: status check, then require a decoded JSON body.
fn successful_body(response: &UpstreamResponse) -> Result<&Value, ProxyError> {
    if !response.is_success() {
        return Err(ProxyError::UpstreamHttp {
            status: response.status,
            desc: response.res_desc(),
        });
    }

    match &response.body {
        UpstreamBody::Json(value) => Ok(value),
        UpstreamBody::Raw(raw) => Err(NetworkFailure::InvalidJson { raw: raw.clone() }.into()),
    }
}

/// Step 3 for list endpoints: items and count, or a semantic failure.
fn list_payload<T: DeserializeOwned>(
    resource: ResourceKind,
    body: &Value,
) -> Result<(Vec<T>, u64), ProxyError> {
    let envelope =
        ListEnvelope::<T>::deserialize(body).map_err(|_| semantic(resource, body))?;

    if !envelope.is_success() {
        return Err(semantic(resource, body));
    }

    let list = envelope.list.unwrap_or_default();
    let count = envelope.count.unwrap_or(list.len() as u64);
    Ok((list, count))
}

fn semantic(resource: ResourceKind, body: &Value) -> ProxyError {
    ProxyError::UpstreamSemantic {
        resource,
        desc: res_desc(body),
    }
}
