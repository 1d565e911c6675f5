//! Proxy configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORENAME` - Upstream store identifier
//! - `APIKEY` - Upstream API key
//! - `APISECRET` - Upstream API secret
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `UPSTREAM_BASE_URL` - Upstream API root (default: <https://open-api.zortout.com/v4>)
//! - `UPSTREAM_TIMEOUT_SECS` - Per-request upstream timeout (default: 10)
//! - `ENABLE_DEBUG_ENDPOINT` - Serve `/api/debug` when `true` or `1`
//! - `LOG_FORMAT` - `json` for JSON log lines, text otherwise
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use order_proxy_core::{ConfigError, CredentialContext, CredentialPresence};
use url::Url;

/// Default upstream API root.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://open-api.zortout.com/v4";

/// Default upstream timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Proxy application configuration.
///
/// `Debug` is safe to log: the credential context redacts itself.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream store credentials
    pub credentials: CredentialContext,
    /// Which credential variables were present at load time
    pub credential_presence: CredentialPresence,
    /// Upstream endpoint settings
    pub upstream: UpstreamConfig,
    /// Serve the `/api/debug` endpoint
    pub debug_endpoint: bool,
    /// Log line format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Where and how patiently to call the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// API root; resource paths are appended to it
    pub base_url: Url,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Build from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse, is not
    /// http(s), or cannot carry a path.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let invalid =
            |reason: String| ConfigError::InvalidEnvVar("UPSTREAM_BASE_URL".to_string(), reason);

        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base_url.scheme())));
        }
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }
        if timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "UPSTREAM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self { base_url, timeout })
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_UPSTREAM_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default upstream URL is valid")),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

impl ProxyConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a credential is missing or misspelled, or an
    /// optional variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ProxyConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let credentials = CredentialContext::from_lookup(&lookup)?;
        let credential_presence = CredentialPresence::from_lookup(&lookup);

        let host = env
            .get_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = env
            .get_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let timeout_secs = env
            .get_or_default("UPSTREAM_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("UPSTREAM_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let upstream = UpstreamConfig::new(
            &env.get_or_default("UPSTREAM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL),
            Duration::from_secs(timeout_secs),
        )?;

        let debug_endpoint = env
            .get_optional("ENABLE_DEBUG_ENDPOINT")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"));
        let log_format = LogFormat::parse(env.get_optional("LOG_FORMAT").as_deref());

        let sentry_dsn = env.get_optional("SENTRY_DSN");
        let sentry_environment = env.get_optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .get_optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .get_optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            credentials,
            credential_presence,
            upstream,
            debug_endpoint,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Log a warning for each credential that looks like a placeholder.
    ///
    /// Called once tracing is initialised. Only variable names are logged.
    pub fn warn_on_placeholder_credentials(&self) {
        for var in self.credentials.placeholder_vars() {
            tracing::warn!(var, "Credential looks like a placeholder value");
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Key lookup with blank values treated as unset.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ProxyConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ProxyConfig::from_lookup(|key| map.get(key).cloned())
    }

    const CREDENTIALS: [(&str, &str); 3] = [
        ("STORENAME", "demo-store"),
        ("APIKEY", "k-123"),
        ("APISECRET", "s-456"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&CREDENTIALS).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.upstream.base_url.as_str(),
            "https://open-api.zortout.com/v4"
        );
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
        assert!(!config.debug_endpoint);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(config.credential_presence.is_complete());
    }

    #[test]
    fn test_missing_credential_fails() {
        let err = load(&[("STORENAME", "demo-store"), ("APIKEY", "k-123")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("APISECRET".to_string()));
    }

    #[test]
    fn test_misspelled_secret_fails() {
        let err = load(&[
            ("STORENAME", "demo-store"),
            ("APIKEY", "k-123"),
            ("PISECRET", "s-456"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MisspelledEnvVar { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.extend([
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("UPSTREAM_BASE_URL", "http://127.0.0.1:9999/v4"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("ENABLE_DEBUG_ENDPOINT", "TRUE"),
            ("LOG_FORMAT", "json"),
            ("SENTRY_SAMPLE_RATE", "0.25"),
        ]);
        let config = load(&pairs).unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.upstream.base_url.as_str(), "http://127.0.0.1:9999/v4");
        assert_eq!(config.upstream.timeout, Duration::from_secs(3));
        assert!(config.debug_endpoint);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!((config.sentry_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("PORT", "not-a-port"),
            ("HOST", "localhost:80"),
            ("UPSTREAM_BASE_URL", "ftp://example.org"),
            ("UPSTREAM_BASE_URL", "not a url"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
        ] {
            let mut pairs = CREDENTIALS.to_vec();
            pairs.push((key, value));
            let err = load(&pairs).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(..)),
                "{key}={value} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_debug_output_redacts_credentials() {
        let config = load(&CREDENTIALS).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("k-123"));
        assert!(!debug.contains("s-456"));
    }
}
