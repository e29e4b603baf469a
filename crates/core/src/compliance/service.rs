//! Compliance service - core business logic
//!
//! Owns the control lifecycle: provisioning the full catalog at organization
//! creation, validating and applying maturity transitions, restarting the
//! review clock, and emitting an audit entry for every mutation.

use std::sync::Arc;

use chrono::Utc;
use mokai_domain::constants::{DEFAULT_AUDIT_LOG_LIMIT, UNKNOWN_IP_ADDRESS};
use mokai_domain::{
    next_review_from, AuditEvent, AuditLog, Control, ControlId, MaturityLevel, MokaiError,
    Organization, Result,
};
use serde::Serialize;
use tracing::info;

use super::ports::{
    AuditLogRepository, ControlMutation, ControlRepository, OrganizationRepository,
};
use super::summary::{summarize, ComplianceSummary};

/// Request to create an organization.
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub abn: String,
}

/// Request to set a control's maturity level.
///
/// `control_id` and `maturity_level` arrive untrusted from the boundary and
/// are validated here before any store access.
#[derive(Debug, Clone)]
pub struct MaturityUpdate {
    pub organization_id: String,
    pub control_id: String,
    pub maturity_level: i64,
    pub evidence: Option<String>,
}

/// Request to append a free-form audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub organization_id: String,
    pub action: String,
    pub details: Option<serde_json::Value>,
}

/// An organization together with its freshly provisioned controls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationWithControls {
    #[serde(flatten)]
    pub organization: Organization,
    pub controls: Vec<Control>,
}

/// The behavioral core of the tracker.
///
/// All durable state lives behind the injected repository ports; the service
/// itself holds no mutable state and may be shared across requests.
pub struct ComplianceService {
    organizations: Arc<dyn OrganizationRepository>,
    controls: Arc<dyn ControlRepository>,
    audit: Arc<dyn AuditLogRepository>,
}

impl ComplianceService {
    /// Create a new service over the given persistence ports.
    pub fn new(
        organizations: Arc<dyn OrganizationRepository>,
        controls: Arc<dyn ControlRepository>,
        audit: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self { organizations, controls, audit }
    }

    /// Create an organization and atomically provision one control row per
    /// catalog entry, all at level 0 with the review clock started.
    pub async fn create_organization(
        &self,
        request: NewOrganization,
        ip_address: Option<&str>,
    ) -> Result<OrganizationWithControls> {
        let name = required(&request.name, "name")?;
        let abn = required(&request.abn, "abn")?;

        let now = Utc::now();
        let organization = Organization::new(name, abn, now);
        let controls: Vec<Control> = mokai_domain::catalog::essential_eight()
            .iter()
            .map(|entry| Control::initial(&organization.id, entry.id, now))
            .collect();

        let event = AuditEvent::OrganizationCreated {
            name: organization.name.clone(),
            abn: organization.abn.clone(),
        };
        let audit = AuditLog::from_event(
            &organization.id,
            &event,
            ip_address.unwrap_or(UNKNOWN_IP_ADDRESS),
            now,
        );

        self.organizations.create_with_controls(&organization, &controls, &audit).await?;

        info!(
            organization_id = %organization.id,
            name = %organization.name,
            "organization created with full control set"
        );

        Ok(OrganizationWithControls { organization, controls })
    }

    /// All organizations, newest first.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.organizations.list().await
    }

    /// Controls for one organization, ordered by control id ascending.
    ///
    /// An unknown organization id yields an empty sequence rather than an
    /// error; the caller cannot distinguish it from an organization with no
    /// rows, which cannot occur after creation.
    pub async fn list_controls(&self, organization_id: &str) -> Result<Vec<Control>> {
        let organization_id = required(organization_id, "organizationId")?;
        self.controls.list_for_organization(organization_id).await
    }

    /// Set a control's maturity level.
    ///
    /// Overwrites evidence only when supplied, stamps `lastUpdated`, and
    /// unconditionally restarts the 90-day review clock whether the level
    /// rose, fell, or stayed the same. Exactly one `control.updated` audit
    /// entry is appended in the same transaction, carrying the maturity
    /// level observed immediately before this update.
    pub async fn update_control_maturity(
        &self,
        request: MaturityUpdate,
        ip_address: Option<&str>,
    ) -> Result<Control> {
        let organization_id = required(&request.organization_id, "organizationId")?;
        let control_id: ControlId = request.control_id.parse()?;
        let maturity_level = MaturityLevel::new(request.maturity_level)?;

        let now = Utc::now();
        let mutation = ControlMutation {
            organization_id: organization_id.to_string(),
            control_id,
            maturity_level,
            evidence: request.evidence,
            ip_address: ip_address.unwrap_or(UNKNOWN_IP_ADDRESS).to_string(),
            now,
            next_review: next_review_from(now),
        };

        let updated = self.controls.apply_update(&mutation).await?.ok_or_else(|| {
            MokaiError::NotFound(format!(
                "control {control_id} for organization {organization_id}"
            ))
        })?;

        info!(
            organization_id = %organization_id,
            control_id = %control_id,
            maturity_level = %updated.control.maturity_level,
            previous_level = %updated.previous_level,
            "control maturity updated"
        );

        Ok(updated.control)
    }

    /// Audit entries for one organization, newest first.
    pub async fn list_audit_logs(
        &self,
        organization_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<AuditLog>> {
        let organization_id = required(organization_id, "organizationId")?;
        self.audit.list_recent(organization_id, limit.unwrap_or(DEFAULT_AUDIT_LOG_LIMIT)).await
    }

    /// Append a free-form audit entry (e.g. `assessment.completed`).
    pub async fn record_audit_event(
        &self,
        request: NewAuditEntry,
        ip_address: Option<&str>,
    ) -> Result<AuditLog> {
        let organization_id = required(&request.organization_id, "organizationId")?;
        let action = required(&request.action, "action")?;

        let entry = AuditLog {
            id: uuid::Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            action: action.to_string(),
            details: request.details.unwrap_or_else(|| serde_json::json!({})),
            ip_address: ip_address.unwrap_or(UNKNOWN_IP_ADDRESS).to_string(),
            created_at: Utc::now(),
        };

        self.audit.append(&entry).await?;
        Ok(entry)
    }

    /// Aggregate view for the dashboard and executive report: every catalog
    /// entry joined with its persisted state, plus the overall maturity
    /// percentage.
    pub async fn compliance_summary(&self, organization_id: &str) -> Result<ComplianceSummary> {
        let organization_id = required(organization_id, "organizationId")?;

        let organization = self
            .organizations
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| MokaiError::NotFound(format!("organization {organization_id}")))?;

        let controls = self.controls.list_for_organization(organization_id).await?;
        Ok(summarize(organization, &controls))
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MokaiError::InvalidInput(format!("{field} is required")));
    }
    Ok(trimmed)
}
