//! Control endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use mokai_core::MaturityUpdate;
use mokai_domain::Control;
use serde::Deserialize;

use super::client_ip;
use crate::context::AppContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ControlsQuery {
    #[serde(rename = "orgId", default)]
    org_id: Option<String>,
}

/// GET /api/controls?orgId= - controls for one organization, ordered by
/// control id ascending. An unknown organization yields an empty list.
pub async fn list_controls(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ControlsQuery>,
) -> Result<Json<Vec<Control>>, ApiError> {
    let org_id =
        query.org_id.ok_or_else(|| ApiError::invalid_input("Organization ID required"))?;
    let controls = ctx.compliance.list_controls(&org_id).await?;
    Ok(Json(controls))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateControlRequest {
    #[serde(default)]
    organization_id: Option<String>,
    #[serde(default)]
    control_id: Option<String>,
    #[serde(default)]
    maturity_level: Option<i64>,
    #[serde(default)]
    evidence: Option<String>,
}

/// PUT /api/controls - set a control's maturity level.
pub async fn update_control(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<UpdateControlRequest>,
) -> Result<Json<Control>, ApiError> {
    let (Some(organization_id), Some(control_id), Some(maturity_level)) =
        (body.organization_id, body.control_id, body.maturity_level)
    else {
        return Err(ApiError::invalid_input("Missing required fields"));
    };

    let update = MaturityUpdate {
        organization_id,
        control_id,
        maturity_level,
        evidence: body.evidence,
    };
    let control = ctx.compliance.update_control_maturity(update, client_ip(&headers)).await?;
    Ok(Json(control))
}
