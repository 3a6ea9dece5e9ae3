//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::rest::types::{HealthChecks, HealthResponse};
use crate::rest::AppContext;

/// `GET /health`; 200 when model and data are available, 503 otherwise.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthResponse>) {
    let checks = HealthChecks {
        model_file: ctx.model.is_some() && ctx.config.model_path.is_file(),
        data_file: ctx.config.data_path.is_file(),
    };
    let healthy = checks.model_file && checks.data_file;
    if !healthy {
        log::warn!("Health check failed: {:?}", checks);
    }

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks,
        }),
    )
}
