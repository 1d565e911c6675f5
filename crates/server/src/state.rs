//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::zortout::{ZortoutClient, ZortoutError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Nothing in it is mutated after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: ProxyConfig,
    zortout: ZortoutClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream client cannot be built.
    pub fn new(config: ProxyConfig) -> Result<Self, ZortoutError> {
        let zortout = ZortoutClient::new(&config.credentials, &config.upstream)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, zortout }),
        })
    }

    /// Get a reference to the proxy configuration.
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.inner.config
    }

    /// Get a reference to the upstream client.
    #[must_use]
    pub fn zortout(&self) -> &ZortoutClient {
        &self.inner.zortout
    }
}
