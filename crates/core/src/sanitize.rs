//! Field redaction applied before data leaves the proxy.
//!
//! Orders are the only resource carrying personal data. The customer name is
//! masked and every order and line is narrowed to a fixed allow-list (the
//! fields declared on [`UpstreamOrder`] and [`OrderItem`]), so fields the
//! upstream adds later are dropped rather than forwarded.
//!
//! [`OrderItem`]: crate::types::OrderItem
//!
//! Products pass through untouched.

use crate::types::{Order, OrderList, Product, ProductList, UpstreamOrder};

/// Placeholder replacing the middle of a masked name.
pub const MASK_PLACEHOLDER: &str = "***";

/// Mask a customer name to its first and last character.
///
/// `"Somchai"` becomes `"S***i"`. Names shorter than two characters are
/// returned unchanged; an absent name becomes an empty string.
///
/// Masking an already masked name returns it unchanged, since its first and
/// last characters are the original ones.
#[must_use]
pub fn mask_customer_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return String::new();
    };

    let mut chars = name.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => format!("{first}{MASK_PLACEHOLDER}{last}"),
        _ => name.to_string(),
    }
}

/// Map one upstream order onto the outward shape.
#[must_use]
pub fn sanitize_order(raw: UpstreamOrder) -> Order {
    Order {
        customer_name: mask_customer_name(raw.customer_name.as_deref()),
        items: raw.list.unwrap_or_default(),
        id: raw.id,
        number: raw.number,
        status: raw.status,
        payment_status: raw.payment_status,
        sales_channel: raw.sales_channel,
        shipping_channel: raw.shipping_channel,
        amount: raw.amount,
        order_date: raw.order_date,
    }
}

/// Sanitize a page of orders, keeping the upstream count.
#[must_use]
pub fn sanitize_orders(raw: Vec<UpstreamOrder>, count: u64) -> OrderList {
    OrderList {
        orders: raw.into_iter().map(sanitize_order).collect(),
        count,
    }
}

/// Products carry no personal data; only the count is attached.
#[must_use]
pub const fn sanitize_products(products: Vec<Product>, count: u64) -> ProductList {
    ProductList { products, count }
}

impl From<UpstreamOrder> for Order {
    fn from(raw: UpstreamOrder) -> Self {
        sanitize_order(raw)
    }
}

impl From<Order> for UpstreamOrder {
    fn from(order: Order) -> Self {
        Self {
            customer_name: Some(order.customer_name),
            list: Some(order.items),
            id: order.id,
            number: order.number,
            status: order.status,
            payment_status: order.payment_status,
            sales_channel: order.sales_channel,
            shipping_channel: order.shipping_channel,
            amount: order.amount,
            order_date: order.order_date,
        }
    }
}
