//! Organization endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use mokai_core::{NewOrganization, OrganizationWithControls};
use mokai_domain::Organization;
use serde::Deserialize;

use super::client_ip;
use crate::context::AppContext;
use crate::error::ApiError;

/// GET /api/organizations - all organizations, newest first.
pub async fn list_organizations(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    let organizations = ctx.compliance.list_organizations().await?;
    Ok(Json(organizations))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    abn: Option<String>,
}

/// POST /api/organizations - create an organization with its full control
/// set provisioned at level 0.
pub async fn create_organization(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<CreateOrganizationRequest>,
) -> Result<Json<OrganizationWithControls>, ApiError> {
    let request = NewOrganization {
        name: body.name.unwrap_or_default(),
        abn: body.abn.unwrap_or_default(),
    };
    let created = ctx.compliance.create_organization(request, client_ip(&headers)).await?;
    Ok(Json(created))
}
