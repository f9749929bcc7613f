use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub status: String,
    pub version: String,
    pub producer: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Always answers 200; a storage backend that cannot be reached turns the
/// status into "degraded".
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let storage_ok = match state.engine.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            false
        }
    };
    services.insert(
        "storage".to_string(),
        if storage_ok { "connected" } else { "disconnected" }.to_string(),
    );
    services.insert(
        "cases".to_string(),
        if state.engine.cases().is_some() { "enabled" } else { "disabled" }.to_string(),
    );

    Json(HealthResponse {
        ok: true,
        status: if storage_ok { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        producer: state.engine.producer_name().to_string(),
        services,
    })
}
