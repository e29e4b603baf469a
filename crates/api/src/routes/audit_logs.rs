//! Audit trail endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use mokai_core::NewAuditEntry;
use mokai_domain::AuditLog;
use serde::Deserialize;

use super::client_ip;
use crate::context::AppContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AuditLogsQuery {
    #[serde(rename = "orgId", default)]
    org_id: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

/// GET /api/audit-logs?orgId=&limit= - audit entries newest first, capped at
/// `limit` (default 50).
pub async fn list_audit_logs(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<AuditLogsQuery>,
) -> Result<Json<Vec<AuditLog>>, ApiError> {
    let org_id =
        query.org_id.ok_or_else(|| ApiError::invalid_input("Organization ID required"))?;
    let logs = ctx.compliance.list_audit_logs(&org_id, query.limit).await?;
    Ok(Json(logs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditLogRequest {
    #[serde(default)]
    organization_id: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// POST /api/audit-logs - append a free-form audit entry.
pub async fn create_audit_log(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<CreateAuditLogRequest>,
) -> Result<Json<AuditLog>, ApiError> {
    let (Some(organization_id), Some(action)) = (body.organization_id, body.action) else {
        return Err(ApiError::invalid_input("Missing required fields"));
    };

    let entry = NewAuditEntry { organization_id, action, details: body.details };
    let created = ctx.compliance.record_audit_event(entry, client_ip(&headers)).await?;
    Ok(Json(created))
}
