//! Order types.
//!
//! Outward field names are the upstream's own lowercase keys, so a sanitized
//! [`Order`] deserializes back into an [`UpstreamOrder`] unchanged. Scalar
//! values are passed through as the upstream typed them; only the key set is
//! narrowed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An order as the upstream returns it, narrowed to the forwarded fields.
///
/// Any key not declared here is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamOrder {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub number: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(rename = "paymentstatus", default)]
    pub payment_status: Value,
    #[serde(rename = "saleschannel", default)]
    pub sales_channel: Value,
    #[serde(rename = "shippingchannel", default)]
    pub shipping_channel: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(rename = "orderdate", default)]
    pub order_date: Value,
    /// Unmasked customer name. Must never leave the process. Non-string
    /// values are read as absent.
    #[serde(
        rename = "customername",
        default,
        deserialize_with = "super::envelope::string_or_none"
    )]
    pub customer_name: Option<String>,
    /// Product lines.
    #[serde(default)]
    pub list: Option<Vec<OrderItem>>,
}

/// A sanitized order, safe to return to browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Value,
    pub number: Value,
    pub status: Value,
    #[serde(rename = "paymentstatus")]
    pub payment_status: Value,
    #[serde(rename = "saleschannel")]
    pub sales_channel: Value,
    #[serde(rename = "shippingchannel")]
    pub shipping_channel: Value,
    pub amount: Value,
    #[serde(rename = "orderdate")]
    pub order_date: Value,
    /// Masked customer name; empty string when the upstream had none.
    #[serde(rename = "customername")]
    pub customer_name: String,
    #[serde(rename = "list")]
    pub items: Vec<OrderItem>,
}

/// One product line of an order.
///
/// Used both for reading upstream lines and for the outward shape: the
/// declared fields are the allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "productid", default)]
    pub product_id: Value,
    #[serde(default)]
    pub name: Value,
    /// Quantity.
    #[serde(default)]
    pub number: Value,
    #[serde(rename = "unittext", default)]
    pub unit_text: Value,
    #[serde(rename = "pricepernumber", default)]
    pub price_per_number: Value,
    #[serde(rename = "totalprice", default)]
    pub total_price: Value,
}

/// Sanitized orders plus the upstream's total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub count: u64,
}
