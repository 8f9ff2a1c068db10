//! Handlers for reading and updating the drop threshold.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};

/// Payload carrying a threshold value, used for both reads and updates.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ThresholdBody {
    /// The drop threshold.
    pub threshold: f64,
}

/// Returns the current in-memory threshold.
///
/// This always reflects the best-known value, regardless of whether the most
/// recent persistence write succeeded.
pub async fn get_threshold(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    Ok((StatusCode::OK, Json(ThresholdBody { threshold: state.threshold.get() })))
}

/// Replaces the threshold.
///
/// The update is visible to the detector immediately and persisted
/// asynchronously.
pub async fn update_threshold(
    State(state): State<ApiState>,
    Json(request): Json<ThresholdBody>,
) -> Result<impl IntoResponse, ApiError> {
    if !request.threshold.is_finite() {
        return Err(ApiError::UnprocessableEntity(
            "threshold must be a finite number".to_string(),
        ));
    }

    state.threshold.set(request.threshold);
    tracing::info!(threshold = request.threshold, "Threshold updated via control API.");

    Ok((StatusCode::OK, Json(ThresholdBody { threshold: state.threshold.get() })))
}
