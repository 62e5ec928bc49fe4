//! Pagination types and traits
//!
//! Defines the page, aggregate and configuration types shared by the engine
//! and by every [`PageFetcher`] implementation.

use crate::error::Result;
use crate::types::OptionStringExt;
use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Page Response
// ============================================================================

/// Pagination metadata reported by a listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Items skipped before this page
    #[serde(default)]
    pub skip: u64,
    /// Requested page size
    #[serde(default)]
    pub limit: u64,
    /// Items on this page
    #[serde(default)]
    pub count: u64,
    /// Total matching items, when requested
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Absolute URL of the next page; empty or missing on the last page
    #[serde(default)]
    pub next_page: Option<String>,
}

impl PaginationInfo {
    /// Metadata pointing at a next page
    pub fn with_next_page(url: impl Into<String>) -> Self {
        Self {
            next_page: Some(url.into()),
            ..Default::default()
        }
    }
}

/// Body key holding the page items of content item listings
pub const DEFAULT_ITEMS_KEY: &str = "items";

/// Body of a listing response: raw items plus optional pagination data
///
/// `items` is required. Feed-style endpoints omit `pagination` and page
/// through the continuation header instead.
#[derive(Debug, Clone, Deserialize)]
pub struct PageContract<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

/// One fetched page
#[derive(Debug, Clone)]
pub struct PageResponse<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Pagination metadata from the body
    pub pagination: PaginationInfo,
    /// Continuation token from the response header
    pub continuation_token: Option<String>,
    /// HTTP status code
    pub status: u16,
    /// Raw response headers
    pub headers: HeaderMap,
}

impl<T> PageResponse<T> {
    /// Create a page with status 200 and no headers
    pub fn new(items: Vec<T>, pagination: PaginationInfo) -> Self {
        Self {
            items,
            pagination,
            continuation_token: None,
            status: 200,
            headers: HeaderMap::new(),
        }
    }

    /// Create a page from a decoded body
    pub fn from_contract(contract: PageContract<T>) -> Self {
        Self::new(contract.items, contract.pagination)
    }

    /// Set the continuation token
    #[must_use]
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Set the transport metadata
    #[must_use]
    pub fn with_transport(mut self, status: u16, headers: HeaderMap) -> Self {
        self.status = status;
        self.headers = headers;
        self
    }

    /// Next-page URL, if the server reported a non-empty one
    pub fn next_page_url(&self) -> Option<String> {
        self.pagination.next_page.clone().none_if_empty()
    }

    /// Continuation token, if the server sent a non-empty one
    pub fn next_continuation_token(&self) -> Option<String> {
        self.continuation_token.clone().none_if_empty()
    }

    /// Whether either pagination signal is present
    pub fn has_more(&self) -> bool {
        self.next_page_url().is_some() || self.next_continuation_token().is_some()
    }
}

// ============================================================================
// Aggregate Result
// ============================================================================

/// Merged outcome of fetching every page
#[derive(Debug, Clone)]
pub struct AggregateResult<T> {
    /// Items of every page, in fetch order
    pub items: Vec<T>,
    /// Every page response, in fetch order
    pub responses: Vec<PageResponse<T>>,
}

impl<T: Clone> AggregateResult<T> {
    /// Build the aggregate from pages in fetch order
    pub fn from_responses(responses: Vec<PageResponse<T>>) -> Self {
        let items = responses
            .iter()
            .flat_map(|response| response.items.iter().cloned())
            .collect();
        Self { items, responses }
    }
}

impl<T> AggregateResult<T> {
    /// Number of pages fetched
    pub fn page_count(&self) -> usize {
        self.responses.len()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Observer called after each page with the signals used to fetch it
pub type ResponseObserver<T> =
    Arc<dyn Fn(&PageResponse<T>, Option<&str>, Option<&str>) + Send + Sync>;

/// Options for a "fetch all pages" run
pub struct ListAllConfig<T> {
    /// Pause after every fetch, including the last one
    pub delay_between_requests: Option<Duration>,
    /// Progress observer
    pub response_fetched: Option<ResponseObserver<T>>,
    /// Refuse to fetch more than this many pages
    pub max_pages: Option<NonZeroUsize>,
    /// Abort the run when cancelled
    pub cancellation: Option<CancellationToken>,
}

impl<T> ListAllConfig<T> {
    /// Config with every option off
    pub fn new() -> Self {
        Self {
            delay_between_requests: None,
            response_fetched: None,
            max_pages: None,
            cancellation: None,
        }
    }

    /// Set the delay between requests
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_requests = Some(delay);
        self
    }

    /// Set the per-page observer
    #[must_use]
    pub fn on_response_fetched<F>(mut self, observer: F) -> Self
    where
        F: Fn(&PageResponse<T>, Option<&str>, Option<&str>) + Send + Sync + 'static,
    {
        self.response_fetched = Some(Arc::new(observer));
        self
    }

    /// Set the page ceiling
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: NonZeroUsize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Set the cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

impl<T> Default for ListAllConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ListAllConfig<T> {
    fn clone(&self) -> Self {
        Self {
            delay_between_requests: self.delay_between_requests,
            response_fetched: self.response_fetched.clone(),
            max_pages: self.max_pages,
            cancellation: self.cancellation.clone(),
        }
    }
}

impl<T> fmt::Debug for ListAllConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAllConfig")
            .field("delay_between_requests", &self.delay_between_requests)
            .field("has_response_fetched", &self.response_fetched.is_some())
            .field("max_pages", &self.max_pages)
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Source of pages for the engine
///
/// The first call always receives `(None, None)`. Later calls receive the
/// signals discovered in the previous page; a continuation token must reach
/// the server in the `X-Continuation` request header.
#[async_trait]
pub trait PageFetcher<T: Send>: Send + Sync {
    /// Fetch one page
    async fn fetch_page(
        &self,
        next_page_url: Option<&str>,
        continuation_token: Option<&str>,
    ) -> Result<PageResponse<T>>;
}

/// Adapter turning an async closure into a [`PageFetcher`]
pub struct FnFetcher<F> {
    fetch: F,
}

impl<F> FnFetcher<F> {
    /// Wrap a closure returning a boxed future
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<T, F> PageFetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(Option<String>, Option<String>) -> BoxFuture<'static, Result<PageResponse<T>>>
        + Send
        + Sync,
{
    async fn fetch_page(
        &self,
        next_page_url: Option<&str>,
        continuation_token: Option<&str>,
    ) -> Result<PageResponse<T>> {
        (self.fetch)(
            next_page_url.map(str::to_owned),
            continuation_token.map(str::to_owned),
        )
        .await
    }
}

impl<F> fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}
