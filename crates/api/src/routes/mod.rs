//! HTTP route handlers
//!
//! One module per resource, mirroring the boundary operations the
//! presentation layer consumes.

pub mod audit_logs;
pub mod controls;
pub mod health;
pub mod organizations;
pub mod summary;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;

use crate::context::AppContext;

/// Build the application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/organizations",
            get(organizations::list_organizations).post(organizations::create_organization),
        )
        .route(
            "/api/controls",
            get(controls::list_controls).put(controls::update_control),
        )
        .route(
            "/api/audit-logs",
            get(audit_logs::list_audit_logs).post(audit_logs::create_audit_log),
        )
        .route("/api/summary", get(summary::compliance_summary))
        .route("/api/catalog", get(summary::catalog))
        .with_state(ctx)
}

/// Best-effort client address: first hop of `x-forwarded-for`, if present.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
