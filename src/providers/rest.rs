//! REST implementation of [`QuoteSource`] against a Binance-style ticker
//! endpoint.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use url::Url;

use super::traits::{QuoteSource, QuoteSourceError};

/// Latest-price payload returned by the ticker endpoint. The price arrives as
/// a decimal string.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// Fetches spot prices over HTTP from a `/api/v3/ticker/price`-style
/// endpoint.
pub struct RestQuoteSource {
    /// Configured HTTP client with retry capabilities.
    client: ClientWithMiddleware,
    /// Base URL of the quote API.
    base_url: Url,
}

impl RestQuoteSource {
    /// Creates a new quote source from the shared HTTP client and the API
    /// base URL.
    pub fn new(client: ClientWithMiddleware, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl QuoteSource for RestQuoteSource {
    async fn latest_price(&self, symbol: &str) -> Result<f64, QuoteSourceError> {
        let mut url = self.base_url.join("/api/v3/ticker/price")?;
        url.query_pairs_mut().append_pair("symbol", symbol);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let ticker: TickerPrice = response.json().await?;

        let raw = ticker.price.trim();
        if raw.is_empty() {
            return Err(QuoteSourceError::MissingQuote(symbol.to_string()));
        }

        raw.parse::<f64>().map_err(|_| QuoteSourceError::InvalidPrice {
            symbol: symbol.to_string(),
            raw: ticker.price.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::HttpRetryConfig, http_client::create_retryable_http_client};

    fn create_source(base_url: &str) -> RestQuoteSource {
        let retry = HttpRetryConfig { max_retries: 0, ..Default::default() };
        let client = create_retryable_http_client(&retry, reqwest::Client::new());
        RestQuoteSource::new(client, Url::parse(base_url).unwrap())
    }

    #[tokio::test]
    async fn parses_decimal_price_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/ticker/price?symbol=BTCUSDT")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"BTCUSDT","price":"42123.50000000"}"#)
            .create_async()
            .await;

        let source = create_source(&server.url());
        let price = source.latest_price("BTCUSDT").await.unwrap();

        assert_eq!(price, 42123.5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/ticker/price?symbol=NOPE")
            .with_status(400)
            .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
            .create_async()
            .await;

        let source = create_source(&server.url());
        let result = source.latest_price("NOPE").await;

        assert!(matches!(result, Err(QuoteSourceError::Response(_))));
    }

    #[tokio::test]
    async fn rejects_unparseable_price() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/ticker/price?symbol=BTCUSDT")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"BTCUSDT","price":"not-a-number"}"#)
            .create_async()
            .await;

        let source = create_source(&server.url());
        let result = source.latest_price("BTCUSDT").await;

        assert!(matches!(result, Err(QuoteSourceError::InvalidPrice { .. })));
    }

    #[tokio::test]
    async fn rejects_empty_price() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/ticker/price?symbol=BTCUSDT")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"BTCUSDT","price":"  "}"#)
            .create_async()
            .await;

        let source = create_source(&server.url());
        let result = source.latest_price("BTCUSDT").await;

        assert!(matches!(result, Err(QuoteSourceError::MissingQuote(_))));
    }
}
