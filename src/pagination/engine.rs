//! Fetch-all loop
//!
//! Pages are fetched strictly one after another: the signals for page N+1
//! are only known once page N has arrived.

use super::types::{AggregateResult, ListAllConfig, PageFetcher, PageResponse};
use crate::error::{Error, Result};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives a [`PageFetcher`] until the server stops signaling more pages
#[derive(Debug, Clone)]
pub struct PaginationEngine<T> {
    config: ListAllConfig<T>,
}

impl<T> PaginationEngine<T>
where
    T: Clone + Send,
{
    /// Create an engine with the given options
    pub fn new(config: ListAllConfig<T>) -> Self {
        Self { config }
    }

    /// Options in use
    pub fn config(&self) -> &ListAllConfig<T> {
        &self.config
    }

    /// Fetch every page and merge them
    ///
    /// Per page the order of effects is fetch, delay, observe, accumulate,
    /// then the continuation check. The delay therefore also runs after the
    /// last page. Any fetch error aborts the run and is returned unchanged;
    /// pages gathered so far are dropped.
    pub async fn fetch_all<F>(&self, fetcher: &F) -> Result<AggregateResult<T>>
    where
        F: PageFetcher<T> + ?Sized,
    {
        let start = Instant::now();
        let mut resolved: Vec<PageResponse<T>> = Vec::new();
        let mut next_page_url: Option<String> = None;
        let mut continuation_token: Option<String> = None;

        loop {
            if let Some(token) = &self.config.cancellation {
                if token.is_cancelled() {
                    return Err(Error::Cancelled {
                        pages_fetched: resolved.len(),
                    });
                }
            }

            if let Some(max_pages) = self.config.max_pages.map(NonZeroUsize::get) {
                if resolved.len() >= max_pages {
                    warn!(
                        "Stopping after {} pages, server still reports more",
                        max_pages
                    );
                    return Err(Error::PageLimitExceeded { max_pages });
                }
            }

            let page_number = resolved.len() + 1;
            let fetch =
                fetcher.fetch_page(next_page_url.as_deref(), continuation_token.as_deref());
            let response = match &self.config.cancellation {
                Some(token) => tokio::select! {
                    () = token.cancelled() => {
                        return Err(Error::Cancelled { pages_fetched: resolved.len() });
                    }
                    response = fetch => response?,
                },
                None => fetch.await?,
            };

            debug!(
                "Page {}: fetched {} items (status {})",
                page_number,
                response.items.len(),
                response.status
            );

            if let Some(delay) = self.config.delay_between_requests {
                self.pause(delay, page_number).await?;
            }

            if let Some(observer) = &self.config.response_fetched {
                observer(
                    &response,
                    next_page_url.as_deref(),
                    continuation_token.as_deref(),
                );
            }

            let has_more = response.has_more();
            next_page_url = response.next_page_url();
            continuation_token = response.next_continuation_token();
            resolved.push(response);

            if !has_more {
                break;
            }
        }

        let result = AggregateResult::from_responses(resolved);
        info!(
            "Fetched {} items in {} pages ({:?})",
            result.items.len(),
            result.page_count(),
            start.elapsed()
        );
        Ok(result)
    }

    async fn pause(&self, delay: Duration, pages_fetched: usize) -> Result<()> {
        match &self.config.cancellation {
            Some(token) => wait_or_cancel(token, delay, pages_fetched).await,
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

impl<T> Default for PaginationEngine<T> {
    fn default() -> Self {
        Self {
            config: ListAllConfig::default(),
        }
    }
}

async fn wait_or_cancel(
    token: &CancellationToken,
    delay: Duration,
    pages_fetched: usize,
) -> Result<()> {
    tokio::select! {
        () = token.cancelled() => Err(Error::Cancelled { pages_fetched }),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Fetch every page from `fetcher` with the given options
pub async fn fetch_all<T, F>(fetcher: &F, config: ListAllConfig<T>) -> Result<AggregateResult<T>>
where
    T: Clone + Send,
    F: PageFetcher<T> + ?Sized,
{
    PaginationEngine::new(config).fetch_all(fetcher).await
}
