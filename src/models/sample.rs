//! Data model for price samples.

use chrono::{DateTime, Utc};

/// One timestamped price observation, produced by the sampler and consumed
/// (then discarded) by the drop detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    /// The instant the price was observed.
    pub timestamp: DateTime<Utc>,
    /// The observed price.
    pub value: f64,
}

impl PriceSample {
    /// Creates a sample stamped with the current time.
    pub fn now(value: f64) -> Self {
        Self { timestamp: Utc::now(), value }
    }
}
