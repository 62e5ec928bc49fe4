//! Pagination module
//!
//! Supports: next-page URL links, continuation-token headers
//!
//! # Overview
//!
//! Listing endpoints signal "more data" in one of two ways: a `next_page`
//! URL in the pagination block of the body, or a continuation token in the
//! `X-Continuation` response header. A given endpoint uses one of them, but
//! the engine checks both on every page and passes on whichever is present.

mod engine;
mod types;

pub use engine::{fetch_all, PaginationEngine};
pub use types::{
    AggregateResult, FnFetcher, ListAllConfig, PageContract, PageFetcher, PageResponse,
    PaginationInfo, ResponseObserver, DEFAULT_ITEMS_KEY,
};
