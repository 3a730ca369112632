use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `available` while the process is serving requests.
    pub status: &'static str,
    /// Deployment environment from configuration.
    pub environment: String,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// GET /v1/healthcheck
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = misarfeh_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Database health check failed");
    }

    Json(HealthResponse {
        status: "available",
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
