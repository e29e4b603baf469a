//! Health endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health - verifies database connectivity.
pub async fn health_check(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<HealthResponse>, ApiError> {
    ctx.health_check().await?;
    Ok(Json(HealthResponse { status: "ok" }))
}
