//! HTTP client module
//!
//! Provides the reference transport used by listing queries.
//!
//! # Features
//!
//! - **Single attempt**: each call performs exactly one GET
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Page decoding**: listing bodies and the continuation header become a
//!   [`PageResponse`](crate::pagination::PageResponse)

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
