//! HTTP client for listing endpoints
//!
//! Provides the transport the pagination engine talks through:
//! - One GET per call, no retries
//! - Optional rate limiting to prevent API throttling
//! - Custom and continuation-token headers
//! - Decoding of listing bodies into pages
//!
//! Retry and backoff belong in front of this client, not inside it.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::pagination::{PageContract, PageResponse, DEFAULT_ITEMS_KEY};
use crate::query::{CustomHeader, CONTINUATION_TOKEN_HEADER};
use crate::types::{JsonObject, JsonValue, OptionStringExt, StringMap};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            user_agent: format!("delivery-listing/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with optional rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Make a single GET request
    ///
    /// Default headers are applied first, then `headers` in order.
    /// Non-success statuses are turned into errors.
    pub async fn get(&self, url: &str, headers: &[CustomHeader]) -> Result<Response> {
        let full_url = url::Url::parse(&self.build_url(url))?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.get(full_url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for header in headers {
            req = req.header(header.name.as_str(), header.value.as_str());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = extract_retry_after(&response);
            warn!("Rate limited (429) on {}, retry after {}s", full_url, retry_after);
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: GET {} ({})", full_url, status.as_u16());
        Ok(response)
    }

    /// GET one page of a content item listing
    ///
    /// The continuation token, if any, is read from the `X-Continuation`
    /// response header.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[CustomHeader],
    ) -> Result<PageResponse<T>> {
        self.get_listing(url, headers, DEFAULT_ITEMS_KEY).await
    }

    /// GET one page of a listing whose items sit under `items_key`
    ///
    /// Type, taxonomy and language listings use `types`, `taxonomies` and
    /// `languages`. A body without that key is a decode error.
    pub async fn get_listing<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[CustomHeader],
        items_key: &str,
    ) -> Result<PageResponse<T>> {
        let response = self.get(url, headers).await?;

        let status = response.status().as_u16();
        let response_headers = response.headers().clone();
        let continuation_token = response_headers
            .get(CONTINUATION_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .none_if_empty();

        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;
        let contract = decode_contract::<T>(&body, items_key)?;

        let page = PageResponse::from_contract(contract).with_transport(status, response_headers);
        Ok(PageResponse {
            continuation_token,
            ..page
        })
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Decode a listing body, reading the items from `items_key`
fn decode_contract<T: DeserializeOwned>(body: &str, items_key: &str) -> Result<PageContract<T>> {
    let mut object: JsonObject = serde_json::from_str(body)
        .map_err(|e| Error::decode(format!("Invalid listing response: {e}")))?;

    if items_key != DEFAULT_ITEMS_KEY {
        let items = object.remove(items_key).ok_or_else(|| {
            Error::decode(format!("Listing response has no '{items_key}' field"))
        })?;
        object.insert(DEFAULT_ITEMS_KEY.to_string(), items);
    }

    serde_json::from_value(JsonValue::Object(object))
        .map_err(|e| Error::decode(format!("Invalid listing response: {e}")))
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
