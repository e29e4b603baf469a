//! Demo data seeding
//!
//! Provisions the demo organization used for local development and product
//! walkthroughs: randomized maturity levels per control plus a completed
//! assessment in the audit trail. Everything goes through the compliance
//! service so the seeded state is indistinguishable from real usage.

use mokai_core::{ComplianceService, MaturityUpdate, NewAuditEntry, NewOrganization};
use mokai_domain::catalog::essential_eight;
use mokai_domain::{ControlId, Organization, Result};
use rand::Rng;
use tracing::info;

/// Name of the seeded demo organization.
pub const DEMO_ORGANIZATION_NAME: &str = "Department of Digital Services";

/// ABN of the seeded demo organization.
pub const DEMO_ABN: &str = "12345678901";

/// Create the demo organization with randomized control maturity.
pub async fn seed_demo_data(service: &ComplianceService) -> Result<Organization> {
    let created = service
        .create_organization(
            NewOrganization {
                name: DEMO_ORGANIZATION_NAME.to_string(),
                abn: DEMO_ABN.to_string(),
            },
            None,
        )
        .await?;
    let organization = created.organization;

    // Draw all randomness up front; the rng is not Send
    let assessments: Vec<(ControlId, i64, &str)> = {
        let mut rng = rand::thread_rng();
        essential_eight()
            .iter()
            .map(|entry| {
                let level = rng.gen_range(0..=3);
                let evidence = if rng.gen_bool(0.5) {
                    "Initial assessment completed. Documentation available."
                } else {
                    "Initial assessment completed. Review pending."
                };
                (entry.id, level, evidence)
            })
            .collect()
    };

    for (control_id, level, evidence) in assessments {
        service
            .update_control_maturity(
                MaturityUpdate {
                    organization_id: organization.id.clone(),
                    control_id: control_id.as_str().to_string(),
                    maturity_level: level,
                    evidence: Some(evidence.to_string()),
                },
                None,
            )
            .await?;
    }

    service
        .record_audit_event(
            NewAuditEntry {
                organization_id: organization.id.clone(),
                action: "assessment.completed".to_string(),
                details: Some(serde_json::json!({
                    "assessor": "Jack Bell",
                    "date": chrono::Utc::now(),
                })),
            },
            None,
        )
        .await?;

    info!(
        organization_id = %organization.id,
        name = DEMO_ORGANIZATION_NAME,
        "demo data seeded"
    );

    Ok(organization)
}
