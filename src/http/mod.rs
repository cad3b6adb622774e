//! HTTP client module
//!
//! Outbound client used by every vendor adapter.
//!
//! # Features
//!
//! - **Retries**: idempotent requests only, with backoff
//! - **Rate Limiting**: optional token bucket using governor
//! - **Authentication**: integration with the auth module

mod client;
mod rate_limit;

pub use client::{BackoffType, HttpClient, HttpClientConfig, RequestConfig, RetryPolicy};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
