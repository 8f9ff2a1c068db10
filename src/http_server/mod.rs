//! HTTP control surface for reading and updating the drop threshold.

mod error;
mod status;
mod threshold;

pub use error::ApiError;
pub use threshold::ThresholdBody;

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::json;

use crate::{config::AppConfig, persistence::ThresholdStore};

/// Shared state available to all API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Shared application configuration.
    pub config: Arc<AppConfig>,
    /// The live threshold store.
    pub threshold: Arc<ThresholdStore>,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Builds the control API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status::status))
        .route(
            "/threshold",
            get(threshold::get_threshold).put(threshold::update_threshold),
        )
        .with_state(state)
}

/// Runs the HTTP server based on the provided application configuration.
pub async fn run_server_from_config(config: Arc<AppConfig>, threshold: Arc<ThresholdStore>) {
    let listen_address = config.server.listen_address.clone();
    let app = create_router(ApiState { config, threshold });

    let listener =
        tokio::net::TcpListener::bind(&listen_address).await.expect("Failed to bind address");
    tracing::info!(address = %listen_address, "Control API server listening.");

    axum::serve(listener, app.into_make_service()).await.expect("Server failed");
}
