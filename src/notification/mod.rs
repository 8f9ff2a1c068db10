//! Alert delivery: formats alert events and pushes them to the external
//! sink.

mod error;
pub mod push;

pub use error::NotificationError;
pub use push::{PushSink, PushedClient};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::AlertEvent;

/// Consumes alert events and delivers them to the push sink.
///
/// Each delivery runs in its own task, so overlapping deliveries interleave
/// freely and a slow sink never delays the consumption of the next event.
/// Delivery failures are logged and swallowed.
pub struct Notifier {
    sink: Arc<dyn PushSink>,
    symbol: String,
}

impl Notifier {
    /// Creates a notifier delivering alerts about `symbol` through `sink`.
    pub fn new(sink: Arc<dyn PushSink>, symbol: impl Into<String>) -> Self {
        Self { sink, symbol: symbol.into() }
    }

    /// Formats the human-readable alert text.
    fn format_message(&self, event: &AlertEvent) -> String {
        format!(
            "🔥 {} dropped by {:.2} to {:.0} in the past {} minute(s)! 🔥",
            self.symbol, event.drop_amount, event.current_price, event.window_minutes
        )
    }

    /// Starts the long-running delivery loop.
    pub async fn run(
        self,
        mut alerts_rx: mpsc::Receiver<AlertEvent>,
        cancellation_token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => {
                    tracing::info!("Notifier cancellation signal received, shutting down...");
                    break;
                }

                maybe_event = alerts_rx.recv() => {
                    let Some(event) = maybe_event else {
                        tracing::warn!("Alert channel closed, stopping notifier.");
                        break;
                    };
                    let message = self.format_message(&event);
                    let sink = Arc::clone(&self.sink);
                    tokio::spawn(async move {
                        tracing::info!(message = %message, "Delivering alert notification.");
                        if let Err(e) = sink.push(&message).await {
                            tracing::error!(error = %e, "Failed to deliver alert notification.");
                        }
                    });
                }
            }
        }
        tracing::info!("Notifier has shut down.");
    }
}
