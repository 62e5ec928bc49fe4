// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # delivery-listing
//!
//! Query building and "fetch every page" support for paginated listing
//! endpoints of a content delivery API.
//!
//! ## Features
//!
//! - **Typed query builder**: filters, sorting, paging and projection
//!   parameters serialized to query-string segments in call order
//! - **Two paging signals**: `next_page` URLs in the body and
//!   `X-Continuation` response headers
//! - **Fetch all**: optional delay between requests, per-page observer,
//!   page ceiling and cancellation
//! - **Reference transport**: reqwest client with token bucket rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use delivery_listing::{ClientConfig, HttpClient, ListingQuery, QueryBuilder, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_file("delivery.yaml")?;
//!     let client = Arc::new(HttpClient::with_config(config.http_client_config())?);
//!
//!     let query = QueryBuilder::new()
//!         .equals_filter("system.type", "movie")
//!         .order_by_descending("elements.release_date")
//!         .limit_parameter(25);
//!
//!     let result = ListingQuery::<serde_json::Value>::new(client, config.endpoint_url("items"))
//!         .with_query(query)
//!         .fetch_all(config.list_all_config())
//!         .await?;
//!
//!     println!("{} items in {} pages", result.items.len(), result.page_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         ListingQuery                          │
//! │   url() → page 1 URL    fetch() → page    fetch_all() → all   │
//! └───────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────────────┬────────────┴─────────────┬─────────────────┐
//! │      Query       │        Pagination        │      HTTP       │
//! ├──────────────────┼──────────────────────────┼─────────────────┤
//! │ Filters          │ PaginationEngine         │ GET             │
//! │ Parameters       │ next_page URL            │ Rate Limit      │
//! │ Custom headers   │ X-Continuation token     │ Page decoding   │
//! │ Continuation     │ Delay / Observer / Cap   │                 │
//! └──────────────────┴──────────────────────────┴─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Query builder and query-string serialization
pub mod query;

/// Fetch-all engine
pub mod pagination;

/// HTTP client with rate limiting
pub mod http;

/// Listing queries bound to a client
pub mod listing;

/// Client configuration
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use http::{HttpClient, HttpClientConfig};
pub use listing::ListingQuery;
pub use pagination::{
    fetch_all, AggregateResult, FnFetcher, ListAllConfig, PageFetcher, PageResponse,
    PaginationEngine, PaginationInfo,
};
pub use query::{CustomHeader, FilterEntry, FilterKind, ParameterEntry, QueryBuilder, SortOrder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
