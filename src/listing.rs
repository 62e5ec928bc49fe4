//! Listing queries
//!
//! A [`ListingQuery`] binds a [`QueryBuilder`] to an endpoint and a client.
//! It produces the URL of the first page and serves as the page source of
//! the pagination engine: a next-page URL replaces the whole request URL,
//! a continuation token is sent as the `X-Continuation` header.

use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::{
    AggregateResult, ListAllConfig, PageFetcher, PageResponse, PaginationEngine, DEFAULT_ITEMS_KEY,
};
use crate::query::{CustomHeader, QueryBuilder};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Query against one listing endpoint
pub struct ListingQuery<T = JsonValue> {
    client: Arc<HttpClient>,
    endpoint: String,
    builder: QueryBuilder,
    custom_url: Option<String>,
    items_key: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> ListingQuery<T> {
    /// Create a query for `endpoint`
    ///
    /// `endpoint` is either a full URL or a path resolved against the
    /// client's base URL.
    pub fn new(client: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            builder: QueryBuilder::new(),
            custom_url: None,
            items_key: DEFAULT_ITEMS_KEY.to_string(),
            _item: PhantomData,
        }
    }

    /// Use the filters, parameters and headers of `builder`
    pub fn with_query(mut self, builder: QueryBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Request `url` verbatim instead of the endpoint and query string
    pub fn with_custom_url(mut self, url: impl Into<String>) -> Self {
        self.custom_url = Some(url.into());
        self
    }

    /// Read page items from `key` instead of `items`
    pub fn with_items_key(mut self, key: impl Into<String>) -> Self {
        self.items_key = key.into();
        self
    }

    /// The query in use
    pub fn query(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Endpoint this query targets
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of the first page
    pub fn url(&self) -> String {
        if let Some(url) = &self.custom_url {
            return url.clone();
        }

        let query = self.builder.query_string();
        if query.is_empty() {
            self.endpoint.clone()
        } else {
            format!("{}?{}", self.endpoint, query)
        }
    }

    /// Headers sent with the first page
    pub fn headers(&self) -> &[CustomHeader] {
        self.builder.headers()
    }
}

impl<T> ListingQuery<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    /// Fetch the first page only
    pub async fn fetch(&self) -> Result<PageResponse<T>> {
        self.fetch_page(None, None).await
    }

    /// Fetch every page and merge the items
    pub async fn fetch_all(&self, config: ListAllConfig<T>) -> Result<AggregateResult<T>> {
        PaginationEngine::new(config).fetch_all(self).await
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ListingQuery<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(
        &self,
        next_page_url: Option<&str>,
        continuation_token: Option<&str>,
    ) -> Result<PageResponse<T>> {
        let url = next_page_url.map_or_else(|| self.url(), str::to_owned);

        let builder = match continuation_token {
            Some(token) => self.builder.clone().with_continuation_token(token),
            None => self.builder.clone(),
        };

        debug!(
            "Fetching listing page {} (continuation: {})",
            url,
            continuation_token.is_some()
        );
        self.client
            .get_listing(&url, builder.headers(), &self.items_key)
            .await
    }
}

impl<T> Clone for ListingQuery<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            endpoint: self.endpoint.clone(),
            builder: self.builder.clone(),
            custom_url: self.custom_url.clone(),
            items_key: self.items_key.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ListingQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingQuery")
            .field("endpoint", &self.endpoint)
            .field("builder", &self.builder)
            .field("custom_url", &self.custom_url)
            .field("items_key", &self.items_key)
            .finish_non_exhaustive()
    }
}
