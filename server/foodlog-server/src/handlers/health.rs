use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::FoodLogServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    pub checks: HashMap<String, String>,
}

/// Report store reachability; answers 503 when the store is down
pub async fn health_check(
    State(server): State<FoodLogServer>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let backend = format!("{:?}", server.backend).to_lowercase();

    if !server.store.is_healthy().await {
        return Err(ApiError::service_unavailable(format!(
            "{backend} store is unreachable"
        )));
    }

    let mut checks = HashMap::new();
    checks.insert("store".to_string(), "healthy".to_string());
    checks.insert("backend".to_string(), backend);

    Ok(Json(api_success(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime().as_secs(),
        checks,
    })))
}
