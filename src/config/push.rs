use serde::Deserialize;
use url::Url;

/// Configuration for the external push-notification sink.
#[derive(Debug, Deserialize, Clone)]
pub struct PushConfig {
    /// Endpoint accepting form-encoded push submissions.
    pub url: Url,

    /// Application key for the push service.
    /// If not set in config, falls back to the `PRICEWATCH_PUSH_APP_KEY` env
    /// var.
    #[serde(default = "default_app_key_from_env")]
    pub app_key: Option<String>,

    /// Application secret for the push service.
    /// If not set in config, falls back to the `PRICEWATCH_PUSH_APP_SECRET`
    /// env var.
    #[serde(default = "default_app_secret_from_env")]
    pub app_secret: Option<String>,
}

fn default_app_key_from_env() -> Option<String> {
    std::env::var("PRICEWATCH_PUSH_APP_KEY").ok()
}

fn default_app_secret_from_env() -> Option<String> {
    std::env::var("PRICEWATCH_PUSH_APP_SECRET").ok()
}
