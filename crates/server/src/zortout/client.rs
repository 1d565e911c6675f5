//! Authenticated GET requests against the upstream.

use std::sync::Arc;

use order_proxy_core::credentials::{API_KEY_VAR, API_SECRET_VAR, STORE_NAME_VAR};
use order_proxy_core::{
    CredentialContext, NetworkFailure, ProxyError, UpstreamResource, UpstreamResponse,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::ZortoutError;
use crate::config::UpstreamConfig;

/// Header carrying the store identifier.
pub const STORE_NAME_HEADER: &str = "storename";
/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";
/// Header carrying the API secret.
pub const API_SECRET_HEADER: &str = "apisecret";

/// Client for the Zortout REST API.
///
/// Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct ZortoutClient {
    inner: Arc<ZortoutClientInner>,
}

struct ZortoutClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ZortoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZortoutClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ZortoutClient {
    /// Create a new client with the credentials baked into default headers.
    ///
    /// # Errors
    ///
    /// Returns `ZortoutError` if a credential is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(
        credentials: &CredentialContext,
        upstream: &UpstreamConfig,
    ) -> Result<Self, ZortoutError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            STORE_NAME_HEADER,
            sensitive_header(STORE_NAME_VAR, credentials.store_name())?,
        );
        headers.insert(
            API_KEY_HEADER,
            sensitive_header(API_KEY_VAR, credentials.api_key())?,
        );
        headers.insert(
            API_SECRET_HEADER,
            sensitive_header(API_SECRET_VAR, credentials.api_secret())?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(upstream.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ZortoutClientInner {
                client,
                base_url: upstream.base_url.clone(),
            }),
        })
    }

    /// Join the base URL, a resource path and URL-encoded query parameters.
    #[must_use]
    pub fn build_url(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.inner.base_url.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        url
    }

    /// Issue one GET and read the whole body.
    ///
    /// Any HTTP status is a successful call here; only transport problems
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure::Timeout` when the configured timeout fires,
    /// `Connect` when the host is unreachable and `Transport` otherwise.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn request(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<UpstreamResponse, NetworkFailure> {
        let url = self.build_url(path, query);

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(classify)?;
        let status = response.status().as_u16();

        // Get response body as text first so non-JSON bodies survive for logging
        let text = response.text().await.map_err(classify)?;
        debug!(status, bytes = text.len(), "Upstream responded");

        Ok(UpstreamResponse::from_text(status, text))
    }

    /// Run the full upstream cycle for one resource.
    ///
    /// # Errors
    ///
    /// Returns the classified `ProxyError` for network failures and for
    /// responses the resource's interpreter rejects.
    #[instrument(skip_all, fields(resource = %R::KIND))]
    pub async fn fetch<R: UpstreamResource>(&self, resource: &R) -> Result<R::Output, ProxyError> {
        let response = self.request(resource.path(), &resource.query()).await?;
        resource.interpret(&response)
    }
}

fn sensitive_header(
    var: &'static str,
    secret: &SecretString,
) -> Result<HeaderValue, ZortoutError> {
    let mut value = HeaderValue::from_str(secret.expose_secret())
        .map_err(|_| ZortoutError::InvalidHeader(var))?;
    value.set_sensitive(true);
    Ok(value)
}

fn classify(err: reqwest::Error) -> NetworkFailure {
    if err.is_timeout() {
        NetworkFailure::Timeout
    } else if err.is_connect() {
        NetworkFailure::Connect(err.without_url().to_string())
    } else {
        NetworkFailure::Transport(err.without_url().to_string())
    }
}
