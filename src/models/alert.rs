//! Data model for alert events.

use chrono::{DateTime, Utc};

/// A drop alert emitted by the detector, consumed once by the notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    /// The computed drop from the in-window maximum to the current price.
    pub drop_amount: f64,
    /// The price that triggered the alert.
    pub current_price: f64,
    /// The trailing window length, in whole minutes, for the alert text.
    pub window_minutes: u64,
    /// The timestamp of the sample that triggered the alert.
    pub at: DateTime<Utc>,
}
