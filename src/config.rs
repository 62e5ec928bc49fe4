//! Client configuration
//!
//! Settings for talking to a listing API, loadable from YAML (or JSON, which
//! YAML accepts):
//!
//! ```yaml
//! base_url: https://deliver.example.com
//! project_id: 975bf280-fd91-488c-994c-2f04416e5ee3
//! http:
//!   timeout_ms: 10000
//!   headers:
//!     Authorization: Bearer secret
//!   rate_limit:
//!     requests_per_second: 5
//! list_all:
//!   delay_between_requests_ms: 200
//!   max_pages: 50
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::ListAllConfig;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the delivery API
    pub base_url: String,

    /// Project identifier, inserted as the first path segment of endpoints
    #[serde(default)]
    pub project_id: Option<String>,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Defaults for fetching all pages
    #[serde(default)]
    pub list_all: ListAllSettings,
}

impl ClientConfig {
    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading client config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }

        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;

        if self.http.timeout_ms == 0 {
            return Err(Error::config("http.timeout_ms must be greater than zero"));
        }

        if self.list_all.max_pages == Some(0) {
            return Err(Error::config("list_all.max_pages must be greater than zero"));
        }

        Ok(())
    }

    /// Settings for [`HttpClient`](crate::http::HttpClient)
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_millis(self.http.timeout_ms));

        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };

        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }

        for (name, value) in &self.http.headers {
            builder = builder.header(name, value);
        }

        builder.build()
    }

    /// Fetch-all options with the configured delay and page cap
    pub fn list_all_config<T>(&self) -> ListAllConfig<T> {
        let mut config = ListAllConfig::new();

        if let Some(delay_ms) = self.list_all.delay_between_requests_ms {
            config = config.with_delay(Duration::from_millis(delay_ms));
        }

        if let Some(max_pages) = self.list_all.max_pages.and_then(NonZeroUsize::new) {
            config = config.with_max_pages(max_pages);
        }

        config
    }

    /// Absolute URL of an endpoint below the base URL and project
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');

        match self.project_id.as_deref().filter(|id| !id.is_empty()) {
            Some(project) => format!("{base}/{project}/{path}"),
            None => format!("{base}/{path}"),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Transport section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Token bucket limits; unlimited when absent
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: None,
            headers: StringMap::new(),
            rate_limit: None,
        }
    }
}

/// Fetch-all section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAllSettings {
    /// Pause after each page in milliseconds
    #[serde(default)]
    pub delay_between_requests_ms: Option<u64>,

    /// Upper bound on pages per run
    #[serde(default)]
    pub max_pages: Option<usize>,
}
