//! The Supervisor module manages the lifecycle of the Pricewatch pipeline.
//!
//! It acts as the top-level owner of all long-running services — the price
//! sampler, the drop detector, the notifier, the threshold persistence
//! writer and the control API server — and is responsible for:
//!
//! - **Initialization**: the `SupervisorBuilder` wires all services together
//!   and connects them with bounded channels.
//! - **Graceful shutdown**: it listens for shutdown signals (Ctrl+C or
//!   SIGTERM) and orchestrates a clean shutdown of all managed services.
//! - **Task supervision**: if a critical task fails, the supervisor shuts
//!   down all other services rather than continuing in a
//!   partially-functional state.

mod builder;

pub use builder::SupervisorBuilder;

use std::sync::Arc;

use thiserror::Error;
use tokio::{signal, sync::mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    engine::{DropDetector, PriceSampler},
    http_server,
    models::{AlertEvent, PriceSample},
    notification::{Notifier, PushSink},
    persistence::{ThresholdFile, ThresholdStore, run_persistence_writer},
    providers::QuoteSource,
};

/// Represents the set of errors that can occur during the supervisor's
/// operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// A threshold store was not provided to the `SupervisorBuilder`.
    #[error("Missing threshold store for Supervisor")]
    MissingThresholdStore,

    /// A threshold file was not provided to the `SupervisorBuilder`.
    #[error("Missing threshold file for Supervisor")]
    MissingThresholdFile,

    /// A quote source was not provided to the `SupervisorBuilder`.
    #[error("Missing quote source for Supervisor")]
    MissingQuoteSource,

    /// A push sink was not provided to the `SupervisorBuilder`.
    #[error("Missing push sink for Supervisor")]
    MissingPushSink,
}

/// The primary runtime manager for the application.
///
/// The Supervisor owns all the major components and is responsible for their
/// startup, shutdown, and health monitoring. Once `run` is called, it becomes
/// the main process loop for the entire application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The live threshold, read by the detector and written by the control
    /// surface.
    threshold: Arc<ThresholdStore>,

    /// Durable storage for the threshold value.
    threshold_file: ThresholdFile,

    /// The external quote source sampled by the price sampler.
    quote_source: Arc<dyn QuoteSource>,

    /// The external sink alert notifications are delivered to.
    push_sink: Arc<dyn PushSink>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: tokio::task::JoinSet<()>,
}

impl Supervisor {
    /// Creates a new `SupervisorBuilder`.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    pub(crate) fn new(
        config: AppConfig,
        threshold: Arc<ThresholdStore>,
        threshold_file: ThresholdFile,
        quote_source: Arc<dyn QuoteSource>,
        push_sink: Arc<dyn PushSink>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            threshold,
            threshold_file,
            quote_source,
            push_sink,
            cancellation_token: CancellationToken::new(),
            join_set: tokio::task::JoinSet::new(),
        }
    }

    /// Starts the supervisor and all its managed services.
    ///
    /// This method is the main entry point for the application's runtime. It
    /// spawns a signal handler, the control API server (if enabled), the
    /// persistence writer, and the sampler → detector → notifier pipeline,
    /// then watches task health until shutdown.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        // Clone the token for the signal handler task.
        let cancellation_token = self.cancellation_token.clone();

        // Spawn a task to listen for shutdown signals.
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler")
                    .recv()
                    .await;
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
                // Shutdown already initiated elsewhere; stop listening so the
                // final drain does not wait on this task.
                _ = cancellation_token.cancelled() => {}
            }

            // Notify all other tasks to begin shutting down.
            cancellation_token.cancel();
        });

        // Spawn the control API server as a background task if enabled.
        if self.config.server.enabled {
            let server_config = Arc::clone(&self.config);
            let server_threshold = Arc::clone(&self.threshold);
            let http_cancellation_token = self.cancellation_token.clone();
            self.join_set.spawn(async move {
                tokio::select! {
                    _ = http_server::run_server_from_config(server_config, server_threshold) => {},
                    _ = http_cancellation_token.cancelled() => {
                        tracing::info!("HTTP server received shutdown signal.");
                    }
                }
            });
        }

        // --- Service wiring ---

        // Capacity 1 makes the handoff a rendezvous with one slot of slack:
        // the sampler blocks until the detector has taken the previous
        // sample, so it can never race ahead or buffer unboundedly.
        let (samples_tx, samples_rx) = mpsc::channel::<PriceSample>(1);

        // Alerts are handed off without blocking the detector.
        let (alerts_tx, alerts_rx) =
            mpsc::channel::<AlertEvent>(self.config.alert_channel_capacity as usize);

        // Spawn the threshold persistence writer.
        self.join_set.spawn(run_persistence_writer(
            self.threshold_file.clone(),
            self.threshold.subscribe(),
            self.cancellation_token.clone(),
        ));

        // Spawn the price sampler.
        let sampler = PriceSampler::new(
            Arc::clone(&self.quote_source),
            self.config.symbol.clone(),
            self.config.sample_interval_secs,
            self.config.fetch_timeout_secs,
            samples_tx,
            self.cancellation_token.clone(),
        );
        self.join_set.spawn(sampler.run());

        // Spawn the drop detector.
        let detector = DropDetector::new(
            self.config.window_duration_secs,
            self.config.sample_interval_secs,
            self.config.cooldown(),
            Arc::clone(&self.threshold),
        );
        self.join_set.spawn(detector.run(
            samples_rx,
            alerts_tx,
            self.cancellation_token.clone(),
        ));

        // Spawn the notifier.
        let notifier = Notifier::new(Arc::clone(&self.push_sink), self.config.symbol.clone());
        self.join_set.spawn(notifier.run(alerts_rx, self.cancellation_token.clone()));

        tracing::info!(
            symbol = %self.config.symbol,
            window = ?self.config.window_duration_secs,
            "All services started, watching for price drops."
        );

        // --- Main Supervisor Loop ---
        // Only responsible for monitoring task health and shutdown signals.

        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {
                            // Task completed on its own, continue monitoring.
                        }
                        Some(Err(e)) => {
                            tracing::error!("A critical task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => {
                            // All tasks have completed.
                            break;
                        }
                    }
                }
                _ = self.cancellation_token.cancelled() => {
                    break;
                }
            }
        }

        // --- Graceful Shutdown ---

        // Give the remaining tasks a bounded window to run their shutdown
        // paths (the persistence writer flushes a pending value here).
        let shutdown_timeout = self.config.shutdown_timeout_secs;
        let drain = async {
            while self.join_set.join_next().await.is_some() {}
        };
        if tokio::time::timeout(shutdown_timeout, drain).await.is_err() {
            tracing::warn!(
                "Tasks did not complete within the timeout of {:?}. Aborting the rest.",
                shutdown_timeout
            );
            self.join_set.shutdown().await;
        }
        tracing::info!("All supervised tasks have completed.");

        tracing::info!("Supervisor shutdown complete.");
        Ok(())
    }
}
