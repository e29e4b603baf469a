//! Port interfaces for compliance persistence
//!
//! These traits define the boundary between core business logic and the
//! persistence implementation. Operations that must be atomic are expressed
//! as single port methods so implementations can run them in one
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mokai_domain::{AuditLog, Control, ControlId, MaturityLevel, Organization, Result};

/// A validated maturity update, fully timestamped by the service.
///
/// `evidence` of `None` means "leave the existing value untouched".
#[derive(Debug, Clone)]
pub struct ControlMutation {
    pub organization_id: String,
    pub control_id: ControlId,
    pub maturity_level: MaturityLevel,
    pub evidence: Option<String>,
    pub ip_address: String,
    pub now: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

/// Outcome of an applied mutation: the row as persisted, plus the maturity
/// level the same transaction observed immediately before writing.
#[derive(Debug, Clone)]
pub struct UpdatedControl {
    pub control: Control,
    pub previous_level: MaturityLevel,
}

/// Trait for persisting organizations
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Persist the organization, its eight control rows, and the creation
    /// audit entry as a single atomic unit. No reader may observe the
    /// organization with an incomplete control set.
    async fn create_with_controls(
        &self,
        organization: &Organization,
        controls: &[Control],
        audit: &AuditLog,
    ) -> Result<()>;

    /// All organizations, newest first.
    async fn list(&self) -> Result<Vec<Organization>>;

    /// Look up a single organization.
    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>>;
}

/// Trait for reading and mutating control rows
#[async_trait]
pub trait ControlRepository: Send + Sync {
    /// Controls for one organization, ordered by control id ascending.
    /// An unknown organization yields an empty sequence.
    async fn list_for_organization(&self, organization_id: &str) -> Result<Vec<Control>>;

    /// Composite-key lookup.
    async fn find(
        &self,
        organization_id: &str,
        control_id: ControlId,
    ) -> Result<Option<Control>>;

    /// Apply the mutation and append its `control.updated` audit entry in
    /// the same transaction. Returns `None` when the (organization, control)
    /// pair does not exist; nothing is written in that case.
    async fn apply_update(&self, mutation: &ControlMutation) -> Result<Option<UpdatedControl>>;
}

/// Trait for the append-only audit trail
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one entry. Entries are never updated or deleted.
    async fn append(&self, entry: &AuditLog) -> Result<()>;

    /// Entries for one organization, newest first, capped at `limit`.
    async fn list_recent(&self, organization_id: &str, limit: u32) -> Result<Vec<AuditLog>>;
}
