//! The proxied upstream resources.
//!
//! Each resource is a validated request value implementing
//! [`UpstreamResource`]: it knows its upstream path, its query parameters and
//! which interpreter turns the response into outward data. Handlers are
//! generic over this trait, so the request cycle is written once.

use serde::Serialize;

use crate::error::ProxyError;
use crate::interpret;
use crate::types::{OrderList, ProductDetail, ProductList, UpstreamResponse};

/// Upstream path of the order list.
pub const ORDERS_PATH: &str = "/Order/GetOrders";
/// Upstream path of the product list.
pub const PRODUCTS_PATH: &str = "/Product/GetProducts";
/// Upstream path of a single product.
pub const PRODUCT_DETAIL_PATH: &str = "/Product/GetProductDetail";

/// Product list page size when the caller gives none.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 20;

/// Orders page size; the dashboard always shows the newest 50.
const ORDERS_PAGE_SIZE: u32 = 50;
/// Order statuses requested: 0 (pending) and 3 (success); cancelled excluded.
const ORDERS_STATUS_FILTER: &str = "0,3";
/// Payment status requested: 1 (paid).
const ORDERS_PAYMENT_FILTER: &str = "1";

/// Which resource a request or failure concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Orders,
    Products,
    ProductDetail,
}

impl ResourceKind {
    /// Outward status when the upstream answers 2xx with an unusable payload.
    #[must_use]
    pub const fn semantic_failure_status(self) -> u16 {
        match self {
            Self::Orders => 400,
            Self::Products | Self::ProductDetail => 404,
        }
    }

    /// Message used when the upstream gives no `resDesc`.
    #[must_use]
    pub const fn default_failure_message(self) -> &'static str {
        match self {
            Self::Orders => "Unable to fetch orders",
            Self::Products => "Products not found",
            Self::ProductDetail => "Product not found",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::ProductDetail => "product detail",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request for one upstream resource.
pub trait UpstreamResource: Send + Sync {
    /// Sanitized result handed back to the caller.
    type Output;

    /// Resource tag, used for error classification and logs.
    const KIND: ResourceKind;

    /// Path appended to the upstream base URL.
    fn path(&self) -> &'static str;

    /// Query parameters, unencoded.
    fn query(&self) -> Vec<(&'static str, String)>;

    /// Classify the upstream response and sanitize the payload.
    ///
    /// # Errors
    ///
    /// Returns the classified `ProxyError` when the response is not a usable
    /// success.
    fn interpret(&self, response: &UpstreamResponse) -> Result<Self::Output, ProxyError>;
}

/// Paid, non-cancelled orders, newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdersRequest;

impl UpstreamResource for OrdersRequest {
    type Output = OrderList;
    const KIND: ResourceKind = ResourceKind::Orders;

    fn path(&self) -> &'static str {
        ORDERS_PATH
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", "1".to_string()),
            ("limit", ORDERS_PAGE_SIZE.to_string()),
            ("sortdirection", "DESC".to_string()),
            ("status", ORDERS_STATUS_FILTER.to_string()),
            ("paymentstatus", ORDERS_PAYMENT_FILTER.to_string()),
        ]
    }

    fn interpret(&self, response: &UpstreamResponse) -> Result<OrderList, ProxyError> {
        interpret::interpret_orders(response)
    }
}

/// Product list, optionally filtered by keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsRequest {
    limit: u32,
    keyword: Option<String>,
}

impl ProductsRequest {
    /// Validate raw query values.
    ///
    /// A missing or blank `limit` defaults to 20; a blank `keyword` is
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Validation` if `limit` is not a positive integer.
    pub fn from_params(limit: Option<&str>, keyword: Option<&str>) -> Result<Self, ProxyError> {
        let limit = match limit.map(str::trim).filter(|l| !l.is_empty()) {
            None => DEFAULT_PRODUCT_LIMIT,
            Some(raw) => raw.parse::<u32>().ok().filter(|l| *l > 0).ok_or_else(|| {
                ProxyError::Validation("limit must be a positive integer".to_string())
            })?,
        };

        let keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Ok(Self { limit, keyword })
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }
}

impl Default for ProductsRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PRODUCT_LIMIT,
            keyword: None,
        }
    }
}

impl UpstreamResource for ProductsRequest {
    type Output = ProductList;
    const KIND: ResourceKind = ResourceKind::Products;

    fn path(&self) -> &'static str {
        PRODUCTS_PATH
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("limit", self.limit.to_string())];
        if let Some(keyword) = &self.keyword {
            query.push(("keyword", keyword.clone()));
        }
        query
    }

    fn interpret(&self, response: &UpstreamResponse) -> Result<ProductList, ProxyError> {
        interpret::interpret_products(response)
    }
}

/// One product by upstream id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetailRequest {
    id: String,
}

impl ProductDetailRequest {
    /// Validate the raw `id` query value.
    ///
    /// # Errors
    ///
    /// Returns `ProxyError::Validation("Product ID is required")` if the id is
    /// absent or blank.
    pub fn from_param(id: Option<&str>) -> Result<Self, ProxyError> {
        id.map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Self { id: id.to_string() })
            .ok_or_else(|| ProxyError::Validation("Product ID is required".to_string()))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl UpstreamResource for ProductDetailRequest {
    type Output = ProductDetail;
    const KIND: ResourceKind = ResourceKind::ProductDetail;

    fn path(&self) -> &'static str {
        PRODUCT_DETAIL_PATH
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("id", self.id.clone())]
    }

    fn interpret(&self, response: &UpstreamResponse) -> Result<ProductDetail, ProxyError> {
        interpret::interpret_product_detail(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_query_is_fixed_filter() {
        let query = OrdersRequest.query();
        assert_eq!(
            query,
            vec![
                ("page", "1".to_string()),
                ("limit", "50".to_string()),
                ("sortdirection", "DESC".to_string()),
                ("status", "0,3".to_string()),
                ("paymentstatus", "1".to_string()),
            ]
        );
        assert_eq!(OrdersRequest.path(), "/Order/GetOrders");
    }

    #[test]
    fn test_products_defaults() {
        let request = ProductsRequest::from_params(None, None).unwrap();
        assert_eq!(request.limit(), 20);
        assert_eq!(request.keyword(), None);
        assert_eq!(request.query(), vec![("limit", "20".to_string())]);
        assert_eq!(request, ProductsRequest::default());
    }

    #[test]
    fn test_products_forwards_keyword_and_limit() {
        let request = ProductsRequest::from_params(Some("5"), Some(" mango ")).unwrap();
        assert_eq!(
            request.query(),
            vec![("limit", "5".to_string()), ("keyword", "mango".to_string())]
        );
    }

    #[test]
    fn test_products_rejects_bad_limit() {
        for bad in ["0", "-3", "ten", "1.5"] {
            let err = ProductsRequest::from_params(Some(bad), None).unwrap_err();
            assert_eq!(err.status_code(), 400, "limit={bad}");
        }
    }

    #[test]
    fn test_product_detail_requires_id() {
        for missing in [None, Some(""), Some("   ")] {
            let err = ProductDetailRequest::from_param(missing).unwrap_err();
            assert_eq!(
                err,
                ProxyError::Validation("Product ID is required".to_string())
            );
        }

        let request = ProductDetailRequest::from_param(Some("4470988")).unwrap();
        assert_eq!(request.id(), "4470988");
        assert_eq!(request.query(), vec![("id", "4470988".to_string())]);
    }

    #[test]
    fn test_resource_kind_statuses() {
        assert_eq!(ResourceKind::Orders.semantic_failure_status(), 400);
        assert_eq!(ResourceKind::Products.semantic_failure_status(), 404);
        assert_eq!(ResourceKind::ProductDetail.semantic_failure_status(), 404);
    }
}
