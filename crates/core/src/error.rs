//! Failure taxonomy shared by the server and the CLI.
//!
//! Every way a proxied request can fail is one [`ProxyError`] variant. The
//! variant decides the outward HTTP status and message; the [`ErrorKind`] tag
//! is what gets logged.

use serde::Serialize;
use thiserror::Error;

use crate::resource::ResourceKind;

/// Errors raised while loading process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Found environment variable {found} but expected {expected}; rename it")]
    MisspelledEnvVar { found: String, expected: String },
}

/// Coarse classification used for logging and metrics tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Validation,
    MethodNotAllowed,
    NotFound,
    UpstreamHttp,
    UpstreamSemantic,
    Network,
}

impl ErrorKind {
    /// Stable snake_case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Validation => "validation",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::NotFound => "not_found",
            Self::UpstreamHttp => "upstream_http",
            Self::UpstreamSemantic => "upstream_semantic",
            Self::Network => "network",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The upstream call did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkFailure {
    /// No response within the configured timeout.
    #[error("timeout")]
    Timeout,

    /// Could not connect to the upstream host.
    #[error("connection error: {0}")]
    Connect(String),

    /// Any other transport failure (TLS, body read, redirect loop).
    #[error("transport error: {0}")]
    Transport(String),

    /// The upstream answered 2xx with a body that is not JSON.
    #[error("invalid-json")]
    InvalidJson {
        /// Raw body text, kept for diagnostics only.
        raw: String,
    },
}

impl NetworkFailure {
    /// Short reason safe to show to callers.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect(_) => "connection-error",
            Self::Transport(_) => "transport-error",
            Self::InvalidJson { .. } => "invalid-json",
        }
    }

    /// Raw upstream body, when the failure carries one.
    #[must_use]
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::InvalidJson { raw } => Some(raw),
            _ => None,
        }
    }
}

/// A classified failure of one proxied request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Credentials or other required configuration are absent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The endpoint only accepts GET (and preflight).
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// No endpoint matches the requested path.
    #[error("Endpoint not found")]
    RouteNotFound,

    /// The upstream answered with a non-2xx status.
    ///
    /// Error statuses (400 and up) are mirrored to the caller. A 1xx or 3xx
    /// reaching this point is not a meaningful answer to mirror and is
    /// reported as 502.
    #[error("Upstream returned HTTP {status}")]
    UpstreamHttp {
        status: u16,
        /// `res.resDesc` from the error body, if any.
        desc: Option<String>,
    },

    /// The upstream answered 2xx but the payload failed its shape check.
    #[error("Upstream rejected {resource} request")]
    UpstreamSemantic {
        resource: ResourceKind,
        /// `res.resDesc` from the body, if any.
        desc: Option<String>,
    },

    /// The upstream call itself failed.
    #[error("Upstream request failed: {0}")]
    Network(#[from] NetworkFailure),
}

impl ProxyError {
    /// Classification tag for logs.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Validation(_) => ErrorKind::Validation,
            Self::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            Self::RouteNotFound => ErrorKind::NotFound,
            Self::UpstreamHttp { .. } => ErrorKind::UpstreamHttp,
            Self::UpstreamSemantic { .. } => ErrorKind::UpstreamSemantic,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// Outward HTTP status.
    ///
    /// Upstream HTTP errors mirror the upstream status when it is an error
    /// status; a non-2xx status below 400 is reported as 502.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::MethodNotAllowed => 405,
            Self::RouteNotFound => 404,
            Self::UpstreamHttp { status, .. } => {
                if *status >= 400 && *status <= 599 {
                    *status
                } else {
                    502
                }
            }
            Self::UpstreamSemantic { resource, .. } => resource.semantic_failure_status(),
            Self::Config(_) | Self::Network(_) => 500,
        }
    }

    /// Human-readable message for the `{success:false, message}` body.
    ///
    /// Never includes secrets or raw upstream bodies.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Config(_) => "API credentials are not configured".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::MethodNotAllowed | Self::RouteNotFound => self.to_string(),
            Self::UpstreamHttp { status, desc } => desc
                .clone()
                .unwrap_or_else(|| format!("API Error: {status} - check API credentials")),
            Self::UpstreamSemantic { resource, desc } => desc
                .clone()
                .unwrap_or_else(|| resource.default_failure_message().to_string()),
            Self::Network(failure) => format!("Upstream request failed: {}", failure.reason()),
        }
    }

    /// True for failures that indicate a problem on our side or upstream's,
    /// rather than with the caller's request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::Validation("x".into()).status_code(), 400);
        assert_eq!(ProxyError::MethodNotAllowed.status_code(), 405);
        assert_eq!(ProxyError::RouteNotFound.status_code(), 404);
        assert_eq!(ProxyError::Config("x".into()).status_code(), 500);
        assert_eq!(
            ProxyError::Network(NetworkFailure::Timeout).status_code(),
            500
        );
    }

    #[test]
    fn test_upstream_http_mirrors_error_status() {
        for status in [400, 401, 403, 404, 429, 500, 503] {
            let err = ProxyError::UpstreamHttp { status, desc: None };
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn test_upstream_http_non_error_status_is_bad_gateway() {
        let err = ProxyError::UpstreamHttp {
            status: 304,
            desc: None,
        };
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_semantic_status_depends_on_resource() {
        let orders = ProxyError::UpstreamSemantic {
            resource: ResourceKind::Orders,
            desc: None,
        };
        let detail = ProxyError::UpstreamSemantic {
            resource: ResourceKind::ProductDetail,
            desc: None,
        };
        assert_eq!(orders.status_code(), 400);
        assert_eq!(detail.status_code(), 404);
    }

    #[test]
    fn test_messages_prefer_upstream_description() {
        let err = ProxyError::UpstreamHttp {
            status: 401,
            desc: Some("Invalid apikey".into()),
        };
        assert_eq!(err.message(), "Invalid apikey");

        let err = ProxyError::UpstreamHttp {
            status: 401,
            desc: None,
        };
        assert_eq!(err.message(), "API Error: 401 - check API credentials");

        let err = ProxyError::UpstreamSemantic {
            resource: ResourceKind::Products,
            desc: None,
        };
        assert_eq!(err.message(), "Products not found");
    }

    #[test]
    fn test_network_message_hides_raw_body() {
        let err = ProxyError::Network(NetworkFailure::InvalidJson {
            raw: "<html>secret stack trace</html>".into(),
        });
        assert_eq!(err.message(), "Upstream request failed: invalid-json");
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(ErrorKind::UpstreamSemantic.to_string(), "upstream_semantic");
        assert_eq!(ProxyError::RouteNotFound.kind().as_str(), "not_found");
    }
}
