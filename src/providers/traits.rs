//! This module defines the interface for fetching the latest price of a
//! symbol from an external quote source.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Custom error type for quote source operations.
#[derive(Error, Debug)]
pub enum QuoteSourceError {
    /// Error when building the quote request URL.
    #[error("Failed to build quote URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Transport-level error from the HTTP middleware stack.
    #[error("Quote request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The quote endpoint answered with an error status or an unreadable
    /// body.
    #[error("Quote response error: {0}")]
    Response(#[from] reqwest::Error),

    /// The response carried no usable quote for the symbol.
    #[error("No usable quote in response for symbol {0}")]
    MissingQuote(String),

    /// The quoted price could not be parsed as a number.
    #[error("Unparseable price {raw:?} for symbol {symbol}")]
    InvalidPrice {
        /// The symbol the quote was requested for.
        symbol: String,
        /// The raw price string as returned by the endpoint.
        raw: String,
    },
}

/// A source of latest-price quotes for a single symbol.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetches the latest price for the given symbol.
    async fn latest_price(&self, symbol: &str) -> Result<f64, QuoteSourceError>;
}
