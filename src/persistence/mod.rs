//! Threshold state: a lock-free in-memory cell with asynchronous,
//! last-write-wins persistence to a plain-text file.

mod error;
mod file;

pub use error::PersistenceError;
pub use file::ThresholdFile;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// The live drop threshold, shared between the detector (reader) and the
/// control surface (writer).
///
/// Reads are a single atomic load. Writes update the cell synchronously and
/// hand the new value to the persistence writer through a single-slot watch
/// channel, so `set` never waits on disk I/O. If several updates arrive while
/// a write is in flight, only the newest one is persisted.
pub struct ThresholdStore {
    /// The current threshold, stored as its IEEE-754 bit pattern.
    bits: AtomicU64,
    /// Handoff slot for the persistence writer.
    persist_tx: watch::Sender<f64>,
}

impl ThresholdStore {
    /// Creates a store holding `initial`.
    ///
    /// The initial value is not scheduled for persistence; it either came
    /// from storage already or is the built-in default.
    pub fn new(initial: f64) -> Self {
        let (persist_tx, _) = watch::channel(initial);
        Self { bits: AtomicU64::new(initial.to_bits()), persist_tx }
    }

    /// Returns the current threshold. Never blocks, never fails.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Updates the in-memory threshold and schedules it for persistence.
    ///
    /// The new value is visible to `get` before this returns.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
        self.persist_tx.send_replace(value);
    }

    /// Subscribes a persistence writer to threshold updates.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.persist_tx.subscribe()
    }
}

/// Long-running task that persists threshold updates as they arrive.
///
/// Write failures are logged and the loop continues; the in-memory value is
/// never rolled back, so the running process stays consistent even when
/// durability is temporarily lost.
pub async fn run_persistence_writer(
    file: ThresholdFile,
    mut updates: watch::Receiver<f64>,
    cancellation_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            _ = cancellation_token.cancelled() => {
                tracing::info!("Persistence writer cancellation signal received, shutting down...");
                break;
            }

            changed = updates.changed() => {
                if changed.is_err() {
                    // The store was dropped; nothing more will arrive.
                    break;
                }
                let value = *updates.borrow_and_update();
                persist(&file, value).await;
            }
        }
    }

    // Flush an update that arrived while shutting down.
    if updates.has_changed().unwrap_or(false) {
        let value = *updates.borrow_and_update();
        persist(&file, value).await;
    }
    tracing::info!("Persistence writer has shut down.");
}

async fn persist(file: &ThresholdFile, value: f64) {
    match file.save(value).await {
        Ok(()) => {
            tracing::debug!(value, path = %file.path().display(), "Threshold persisted.")
        }
        Err(e) => tracing::error!(
            error = %e,
            "Failed to persist threshold; the in-memory value remains active."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_initial_value() {
        let store = ThresholdStore::new(130.0);
        assert_eq!(store.get(), 130.0);
    }

    #[test]
    fn set_is_immediately_visible_to_get() {
        let store = ThresholdStore::new(130.0);
        store.set(50.0);
        assert_eq!(store.get(), 50.0);
    }

    #[test]
    fn set_does_not_require_a_subscribed_writer() {
        let store = ThresholdStore::new(130.0);
        // No writer task is subscribed; updates must still land in memory.
        store.set(75.5);
        store.set(80.25);
        assert_eq!(store.get(), 80.25);
    }

    #[tokio::test]
    async fn writer_persists_the_newest_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = ThresholdFile::new(dir.path().join("threshold.txt"));
        let store = ThresholdStore::new(130.0);
        let token = CancellationToken::new();

        let writer =
            tokio::spawn(run_persistence_writer(file.clone(), store.subscribe(), token.clone()));

        store.set(10.5);
        store.set(99.25);
        token.cancel();
        writer.await.unwrap();

        assert_eq!(file.load().await.unwrap(), 99.25);
    }

    #[tokio::test]
    async fn writer_exits_when_store_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let file = ThresholdFile::new(dir.path().join("threshold.txt"));
        let store = ThresholdStore::new(130.0);
        let token = CancellationToken::new();

        let writer =
            tokio::spawn(run_persistence_writer(file, store.subscribe(), token.clone()));

        drop(store);
        writer.await.unwrap();
    }
}
