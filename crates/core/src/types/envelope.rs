//! Upstream response envelopes.
//!
//! The upstream wraps payloads in a `res` block carrying a string response
//! code. List endpoints look like:
//!
//! ```json
//! { "res": { "resCode": "200", "resDesc": "" }, "list": [ ... ], "count": 12 }
//! ```
//!
//! The product detail endpoint has been observed returning either the same
//! wrapped shape with a `product` field, or the product object bare at the
//! top level. [`DetailEnvelope`] models both.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of an upstream response, parsed once after it is fully received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamBody {
    /// Body decoded as JSON.
    Json(Value),
    /// Body that failed to decode, kept verbatim for diagnostics.
    Raw(String),
}

impl UpstreamBody {
    /// Attempt to decode `text` as JSON, falling back to the raw text.
    #[must_use]
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(text),
        }
    }

    /// The decoded JSON, if decoding succeeded.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

/// Status and body of one upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: UpstreamBody,
}

impl UpstreamResponse {
    /// Build from a status and the fully read body text.
    #[must_use]
    pub fn from_text(status: u16, text: String) -> Self {
        Self {
            status,
            body: UpstreamBody::parse(text),
        }
    }

    /// Build from an already decoded JSON body.
    #[must_use]
    pub const fn from_json(status: u16, value: Value) -> Self {
        Self {
            status,
            body: UpstreamBody::Json(value),
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// `res.resDesc`, if the body is JSON and carries a non-empty one.
    #[must_use]
    pub fn res_desc(&self) -> Option<String> {
        self.body.as_json().and_then(res_desc)
    }
}

/// Extract a non-empty `res.resDesc` string from a decoded body.
#[must_use]
pub fn res_desc(body: &Value) -> Option<String> {
    body.get("res")?
        .get("resDesc")?
        .as_str()
        .filter(|desc| !desc.trim().is_empty())
        .map(str::to_string)
}

/// The `res` block of an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Response code. Success is the string `"200"`; other JSON types are
    /// accepted here so the envelope still parses, but never count as success.
    #[serde(rename = "resCode", default)]
    pub res_code: Option<Value>,
    #[serde(rename = "resDesc", default, deserialize_with = "string_or_none")]
    pub res_desc: Option<String>,
}

impl ResponseStatus {
    /// The only `resCode` that means success.
    pub const SUCCESS_CODE: &'static str = "200";

    /// True when `resCode` is exactly the string `"200"`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(&self.res_code, Some(Value::String(code)) if code == Self::SUCCESS_CODE)
    }
}

/// Envelope returned by the list endpoints (orders, products).
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub res: Option<ResponseStatus>,
    pub list: Option<Vec<T>>,
    /// Total matching records. Read from a number or a numeric string;
    /// anything else is treated as absent.
    #[serde(default, deserialize_with = "count_or_none")]
    pub count: Option<u64>,
}

impl<T> ListEnvelope<T> {
    /// True when `res.resCode` is `"200"` and `list` is present.
    ///
    /// An empty `list` is still a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.res.as_ref().is_some_and(ResponseStatus::is_success) && self.list.is_some()
    }
}

/// Read a field as a string, mapping any other JSON type to `None`.
///
/// A single oddly typed field must not fail the envelope it sits in.
pub(crate) fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn count_or_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// The two shapes the product detail endpoint answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEnvelope {
    /// `{ "res": {...}, "product": {...} }`
    Wrapped {
        res: ResponseStatus,
        product: Option<Map<String, Value>>,
    },
    /// A product object at the top level, recognised by `id` and `name`.
    Bare(Map<String, Value>),
    /// Neither shape.
    Unrecognized,
}

/// Which detail envelope shape a response used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeShape {
    Wrapped,
    Bare,
    Unrecognized,
}

impl std::fmt::Display for EnvelopeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Wrapped => "wrapped",
            Self::Bare => "bare",
            Self::Unrecognized => "unrecognized",
        })
    }
}

impl DetailEnvelope {
    /// Classify a decoded detail body by its shape.
    ///
    /// A top-level `res` key selects the wrapped form. Without it, an object
    /// with non-null `id` and `name` is the bare form.
    #[must_use]
    pub fn detect(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::Unrecognized;
        };

        if let Some(res) = object.get("res") {
            let res = ResponseStatus::deserialize(res).unwrap_or_default();
            let product = object.get("product").and_then(Value::as_object).cloned();
            return Self::Wrapped { res, product };
        }

        if has_value(object, "id") && has_value(object, "name") {
            return Self::Bare(object.clone());
        }

        Self::Unrecognized
    }

    /// Shape tag, for logging and the CLI.
    #[must_use]
    pub const fn shape(&self) -> EnvelopeShape {
        match self {
            Self::Wrapped { .. } => EnvelopeShape::Wrapped,
            Self::Bare(_) => EnvelopeShape::Bare,
            Self::Unrecognized => EnvelopeShape::Unrecognized,
        }
    }
}

fn has_value(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(|v| !v.is_null())
}
