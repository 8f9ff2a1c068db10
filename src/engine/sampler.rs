//! The PriceSampler periodically fetches the latest price for the tracked
//! symbol and feeds it into the detection pipeline.

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{models::PriceSample, providers::QuoteSource};

/// Produces one timestamped price sample per tick.
///
/// A failed, unusable or slow fetch skips the tick and the loop continues.
/// Emission awaits channel capacity, so the sampler never races ahead of the
/// detector and never buffers samples unboundedly.
pub struct PriceSampler {
    /// The external quote source.
    source: Arc<dyn QuoteSource>,
    /// The symbol to sample.
    symbol: String,
    /// Time between two ticks.
    interval: Duration,
    /// Bound on a single fetch; a hung call must not stall later ticks.
    fetch_timeout: Duration,
    /// The sender for the sample channel.
    samples_tx: mpsc::Sender<PriceSample>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl PriceSampler {
    /// Creates a new PriceSampler instance.
    pub fn new(
        source: Arc<dyn QuoteSource>,
        symbol: impl Into<String>,
        interval: Duration,
        fetch_timeout: Duration,
        samples_tx: mpsc::Sender<PriceSample>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            source,
            symbol: symbol.into(),
            interval,
            fetch_timeout,
            samples_tx,
            cancellation_token,
        }
    }

    /// Starts the long-running sampling loop.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        // A slow downstream must not cause a burst of catch-up ticks.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Price sampler cancellation signal received, shutting down...");
                    break;
                }

                _ = ticker.tick() => {
                    if !self.sample_once().await {
                        break;
                    }
                }
            }
        }
        tracing::info!("Price sampler has shut down.");
    }

    /// Performs one fetch-and-emit cycle.
    ///
    /// Returns `false` once the sample channel is closed and the loop should
    /// stop.
    async fn sample_once(&self) -> bool {
        let fetch = self.source.latest_price(&self.symbol);
        let price = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Err(_) => {
                tracing::warn!(
                    symbol = %self.symbol,
                    timeout = ?self.fetch_timeout,
                    "Quote fetch timed out, skipping tick."
                );
                return true;
            }
            Ok(Err(e)) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "Quote fetch failed, skipping tick.");
                return true;
            }
            Ok(Ok(price)) => price,
        };

        let sample = PriceSample::now(price);
        tracing::debug!(symbol = %self.symbol, price, "Sampled price.");

        if self.samples_tx.send(sample).await.is_err() {
            tracing::warn!("Sample channel closed, stopping sampler.");
            return false;
        }
        true
    }
}
