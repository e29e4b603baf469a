//! Aggregate read endpoints for the dashboard and executive report

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use mokai_core::ComplianceSummary;
use mokai_domain::catalog::{essential_eight, maturity_levels, CatalogEntry, MaturityLevelDef};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(rename = "orgId", default)]
    org_id: Option<String>,
}

/// GET /api/summary?orgId= - full catalog join plus the overall maturity
/// percentage for one organization.
pub async fn compliance_summary(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ComplianceSummary>, ApiError> {
    let org_id =
        query.org_id.ok_or_else(|| ApiError::invalid_input("Organization ID required"))?;
    let summary = ctx.compliance.compliance_summary(&org_id).await?;
    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    controls: &'static [CatalogEntry],
    maturity_levels: &'static [MaturityLevelDef],
}

/// GET /api/catalog - the fixed Essential Eight catalog and maturity level
/// definitions.
pub async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse { controls: essential_eight(), maturity_levels: maturity_levels() })
}
