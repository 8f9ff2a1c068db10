//! The DropDetector consumes price samples in strict arrival order, tracks
//! the maximum price inside a bounded sliding window, and raises debounced
//! alerts when the drop from that maximum crosses the live threshold.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    models::{AlertEvent, PriceSample},
    persistence::ThresholdStore,
};

/// The drop-detection stage of the pipeline.
///
/// The sliding window and the cooldown state are exclusively owned by this
/// detector; the only shared state it touches is the threshold, read as a
/// snapshot per sample.
pub struct DropDetector {
    /// The trailing samples, newest at the back.
    window: VecDeque<PriceSample>,
    /// Maximum number of samples retained in the window.
    capacity: usize,
    /// The trailing window length, used for the alert text.
    window_duration: Duration,
    /// Minimum time between two alerts.
    cooldown: Duration,
    /// The live threshold, updated concurrently by the control surface.
    threshold: Arc<ThresholdStore>,
    /// When the last alert fired. `None` means no alert has ever fired and
    /// the detector is always eligible to alert.
    last_alert_at: Option<DateTime<Utc>>,
}

impl DropDetector {
    /// Creates a detector whose window spans `window_duration` at one sample
    /// per `sample_interval`.
    ///
    /// The capacity is the truncating division of the two, clamped to at
    /// least one element so the window still contains the current sample
    /// after eviction.
    pub fn new(
        window_duration: Duration,
        sample_interval: Duration,
        cooldown: Duration,
        threshold: Arc<ThresholdStore>,
    ) -> Self {
        let interval = sample_interval.as_secs().max(1);
        let capacity = ((window_duration.as_secs() / interval) as usize).max(1);
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
            window_duration,
            cooldown,
            threshold,
            last_alert_at: None,
        }
    }

    /// Processes one sample, returning an alert when the in-window drop
    /// crosses the threshold outside the cooldown.
    pub fn process_sample(&mut self, sample: PriceSample) -> Option<AlertEvent> {
        self.window.push_back(sample);
        if self.window.len() > self.capacity {
            self.window.pop_front();
        }

        // `sample` itself is in the window, so the maximum is always defined
        // and the drop is never negative.
        let top_price = self.window.iter().map(|s| s.value).fold(f64::NEG_INFINITY, f64::max);
        let drop_amount = top_price - sample.value;
        debug_assert!(drop_amount >= 0.0);

        let threshold = self.threshold.get();
        tracing::debug!(
            price = sample.value,
            top_price,
            drop_amount,
            threshold,
            window_len = self.window.len(),
            "Processed sample."
        );

        if drop_amount < threshold {
            return None;
        }

        if let Some(last) = self.last_alert_at {
            if sample.timestamp < last + self.cooldown {
                tracing::info!(
                    drop_amount,
                    threshold,
                    last_alert_at = %last,
                    "Drop exceeds threshold but a recent alert is still cooling down, suppressing."
                );
                return None;
            }
        }

        self.last_alert_at = Some(sample.timestamp);
        Some(AlertEvent {
            drop_amount,
            current_price: sample.value,
            window_minutes: self.window_duration.as_secs() / 60,
            at: sample.timestamp,
        })
    }

    /// Starts the long-running detection loop.
    pub async fn run(
        mut self,
        mut samples_rx: mpsc::Receiver<PriceSample>,
        alerts_tx: mpsc::Sender<AlertEvent>,
        cancellation_token: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => {
                    tracing::info!("Drop detector cancellation signal received, shutting down...");
                    break;
                }

                maybe_sample = samples_rx.recv() => {
                    let Some(sample) = maybe_sample else {
                        tracing::warn!("Sample channel closed, stopping detector.");
                        break;
                    };
                    if let Some(alert) = self.process_sample(sample) {
                        tracing::info!(
                            drop_amount = alert.drop_amount,
                            price = alert.current_price,
                            "Price drop detected, raising alert."
                        );
                        // The handoff must not delay the next sample; if the
                        // notifier cannot keep up the alert is dropped.
                        if let Err(e) = alerts_tx.try_send(alert) {
                            tracing::error!(error = %e, "Failed to hand alert to notifier.");
                        }
                    }
                }
            }
        }
        tracing::info!("Drop detector has shut down.");
    }
}
