use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

use super::{
    HttpRetryConfig, PushConfig, ServerConfig, deserialize_duration_from_seconds,
    deserialize_opt_duration_from_seconds,
};

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_sample_interval() -> Duration {
    Duration::from_secs(20)
}

fn default_window_duration() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_threshold() -> f64 {
    130.0
}

fn default_threshold_path() -> PathBuf {
    PathBuf::from("data/threshold.txt")
}

fn default_alert_channel_capacity() -> u32 {
    32
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Application configuration for Pricewatch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Trading symbol whose price is tracked.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Base URL of the quote REST API.
    pub quote_url: Url,

    /// The interval between two price samples.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_sample_interval"
    )]
    pub sample_interval_secs: Duration,

    /// The trailing window over which the drop is computed.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_window_duration"
    )]
    pub window_duration_secs: Duration,

    /// Minimum time between two alerts. Defaults to the window duration when
    /// absent.
    #[serde(deserialize_with = "deserialize_opt_duration_from_seconds", default)]
    pub cooldown_secs: Option<Duration>,

    /// Upper bound on a single quote fetch before the tick is skipped.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_fetch_timeout"
    )]
    pub fetch_timeout_secs: Duration,

    /// Drop threshold used when no persisted value can be loaded.
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Location of the persisted threshold file.
    #[serde(default = "default_threshold_path")]
    pub threshold_path: PathBuf,

    /// Capacity of the alert channel between detector and notifier.
    #[serde(default = "default_alert_channel_capacity")]
    pub alert_channel_capacity: u32,

    /// The maximum time to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout_secs: Duration,

    /// Push sink endpoint and credentials.
    pub push: PushConfig,

    /// Retry policy for outbound HTTP requests.
    #[serde(default)]
    pub http_retry: HttpRetryConfig,

    /// Control API server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory,
    /// with `PRICEWATCH__`-prefixed environment variables taking precedence.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("PRICEWATCH").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// The cooldown between two alerts, defaulting to the window duration.
    pub fn cooldown(&self) -> Duration {
        self.cooldown_secs.unwrap_or(self.window_duration_secs)
    }
}
