//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use choose_service::dto::{HealthResponse, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
/// GET /health/live
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    // No pool means in-memory repositories; nothing to ping
    let db_healthy = match ctx.pool() {
        Some(pool) => Some(
            pool.acquire()
                .await
                .inspect_err(|e| warn!(error = %e, "Database not ready"))
                .is_ok(),
        ),
        None => None,
    };

    let storage_healthy = tokio::fs::metadata(state.media_root())
        .await
        .is_ok_and(|meta| meta.is_dir());

    let response = ReadinessResponse::ready(db_healthy, storage_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
