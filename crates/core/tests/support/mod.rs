//! In-memory mock persistence for service tests
//!
//! Implements all three core ports over plain vectors, enabling
//! deterministic unit tests without database dependencies.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mokai_core::compliance::ports::{
    AuditLogRepository, ControlMutation, ControlRepository, OrganizationRepository,
    UpdatedControl,
};
use mokai_core::ComplianceService;
use mokai_domain::{AuditEvent, AuditLog, Control, ControlId, Organization, Result};

/// Vec-backed store implementing every persistence port.
#[derive(Default)]
pub struct InMemoryStore {
    pub organizations: Mutex<Vec<Organization>>,
    pub controls: Mutex<Vec<Control>>,
    pub audit: Mutex<Vec<AuditLog>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build a service wired to this store for all three ports.
    pub fn service(self: &Arc<Self>) -> ComplianceService {
        ComplianceService::new(self.clone(), self.clone(), self.clone())
    }

    pub fn audit_entries(&self) -> Vec<AuditLog> {
        self.audit.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn create_with_controls(
        &self,
        organization: &Organization,
        controls: &[Control],
        audit: &AuditLog,
    ) -> Result<()> {
        self.organizations.lock().unwrap().push(organization.clone());
        self.controls.lock().unwrap().extend_from_slice(controls);
        self.audit.lock().unwrap().push(audit.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Organization>> {
        let mut orgs = self.organizations.lock().unwrap().clone();
        orgs.reverse();
        orgs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orgs)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>> {
        Ok(self.organizations.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }
}

#[async_trait]
impl ControlRepository for InMemoryStore {
    async fn list_for_organization(&self, organization_id: &str) -> Result<Vec<Control>> {
        let mut controls: Vec<Control> = self
            .controls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.organization_id == organization_id)
            .cloned()
            .collect();
        controls.sort_by_key(|c| c.control_id.as_str());
        Ok(controls)
    }

    async fn find(
        &self,
        organization_id: &str,
        control_id: ControlId,
    ) -> Result<Option<Control>> {
        Ok(self
            .controls
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.organization_id == organization_id && c.control_id == control_id)
            .cloned())
    }

    async fn apply_update(&self, mutation: &ControlMutation) -> Result<Option<UpdatedControl>> {
        let mut controls = self.controls.lock().unwrap();
        let Some(control) = controls.iter_mut().find(|c| {
            c.organization_id == mutation.organization_id && c.control_id == mutation.control_id
        }) else {
            return Ok(None);
        };

        let previous_level = control.maturity_level;
        control.maturity_level = mutation.maturity_level;
        if let Some(evidence) = &mutation.evidence {
            control.evidence = Some(evidence.clone());
        }
        control.last_updated = mutation.now;
        control.next_review = mutation.next_review;
        let updated = control.clone();
        drop(controls);

        let event = AuditEvent::ControlUpdated {
            control_id: mutation.control_id,
            maturity_level: mutation.maturity_level,
            previous_level,
        };
        self.audit.lock().unwrap().push(AuditLog::from_event(
            &mutation.organization_id,
            &event,
            mutation.ip_address.clone(),
            mutation.now,
        ));

        Ok(Some(UpdatedControl { control: updated, previous_level }))
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryStore {
    async fn append(&self, entry: &AuditLog) -> Result<()> {
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self, organization_id: &str, limit: u32) -> Result<Vec<AuditLog>> {
        let mut entries: Vec<AuditLog> = self
            .audit
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect();
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}
