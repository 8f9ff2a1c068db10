//! Represents the `/status` endpoint handler and response structure.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

use super::{ApiError, ApiState};

/// Represents the response from the `/status` endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct StatusResponse {
    /// The version of the application.
    pub version: String,
    /// The symbol being watched.
    pub symbol: String,
    /// The current drop threshold.
    pub threshold: f64,
    /// The trailing window length in whole minutes.
    pub window_minutes: u64,
}

/// Retrieves the watch configuration and the live threshold.
pub async fn status(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let response = StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        symbol: state.config.symbol.clone(),
        threshold: state.threshold.get(),
        window_minutes: state.config.window_duration_secs.as_secs() / 60,
    };
    Ok((StatusCode::OK, Json(response)))
}
