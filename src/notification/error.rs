//! Error types for the notification layer.

use thiserror::Error;

/// Errors that can occur while delivering a push notification.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// The push sink is misconfigured (e.g. missing credentials).
    #[error("Push configuration error: {0}")]
    ConfigError(String),

    /// Transport-level error from the HTTP middleware stack.
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The push endpoint answered with a non-success status.
    #[error("Push request failed with status: {0}")]
    PushFailed(reqwest::StatusCode),
}
