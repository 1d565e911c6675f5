//! Product types.
//!
//! Products carry no customer data, so both the list and detail views pass
//! the upstream objects through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product from the list endpoint, passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(pub Map<String, Value>);

/// A single product from the detail endpoint, passed through as-is once its
/// existence is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductDetail(pub Map<String, Value>);

impl ProductDetail {
    /// The product's `id` field.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// The product's `name` field, when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

/// Products plus the upstream's total count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub count: u64,
}
