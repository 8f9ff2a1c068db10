//! Configuration module for Pricewatch.

mod app_config;
mod helpers;
mod http_retry;
mod push;
mod server;

pub use app_config::AppConfig;
pub use helpers::{
    deserialize_duration_from_ms, deserialize_duration_from_seconds,
    deserialize_opt_duration_from_seconds,
};
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use push::PushConfig;
pub use server::ServerConfig;
