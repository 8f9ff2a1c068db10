//! Push sink interface and the form-encoded HTTP client implementation.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use super::error::NotificationError;
use crate::config::PushConfig;

/// A best-effort sink for short text notifications.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PushSink: Send + Sync {
    /// Submits one message for delivery.
    async fn push(&self, message: &str) -> Result<(), NotificationError>;
}

/// Delivers messages to a push service that accepts form-encoded
/// submissions authenticated by an application key/secret pair.
pub struct PushedClient {
    /// Configured HTTP client with retry capabilities.
    client: ClientWithMiddleware,
    /// Push endpoint accepting the submissions.
    url: Url,
    app_key: String,
    app_secret: String,
}

impl PushedClient {
    /// Creates a new push client, validating that credentials are present.
    pub fn new(
        config: PushConfig,
        client: ClientWithMiddleware,
    ) -> Result<Self, NotificationError> {
        let app_key = config.app_key.ok_or_else(|| {
            NotificationError::ConfigError("push app_key is not configured".to_string())
        })?;
        let app_secret = config.app_secret.ok_or_else(|| {
            NotificationError::ConfigError("push app_secret is not configured".to_string())
        })?;
        Ok(Self { client, url: config.url, app_key, app_secret })
    }
}

#[async_trait]
impl PushSink for PushedClient {
    async fn push(&self, message: &str) -> Result<(), NotificationError> {
        let form = [
            ("app_key", self.app_key.as_str()),
            ("app_secret", self.app_secret.as_str()),
            ("target_type", "app"),
            ("content", message),
        ];

        let response = self.client.post(self.url.clone()).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::PushFailed(status));
        }

        Ok(())
    }
}
