//! Retryable HTTP client construction.

mod client;

pub use client::create_retryable_http_client;
