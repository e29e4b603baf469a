//! Aggregated compliance state and the overall maturity metric.

use chrono::{DateTime, Utc};
use mokai_domain::catalog::{essential_eight, maturity_levels};
use mokai_domain::{Control, ControlId, MaturityLevel, Organization};
use serde::Serialize;

/// One catalog entry joined with its persisted assessment state.
///
/// A catalog entry with no persisted row renders at level 0. That cannot
/// occur after organization creation, which provisions the full set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlStatus {
    pub control_id: ControlId,
    pub name: &'static str,
    pub maturity_level: MaturityLevel,
    pub maturity_name: &'static str,
    pub evidence: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
}

/// The dashboard/report aggregate for one organization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub organization: Organization,
    pub controls: Vec<ControlStatus>,
    pub overall_maturity_percent: u8,
}

/// `round(sum(levels) / 8 * 100 / 3)`, computed over exactly the eight
/// canonical controls with 0 substituted for any missing row.
pub fn overall_maturity_percent(controls: &[Control]) -> u8 {
    let sum: u32 = essential_eight()
        .iter()
        .map(|entry| u32::from(level_for(controls, entry.id)))
        .sum();
    let percent = f64::from(sum) / 8.0 * 100.0 / 3.0;
    percent.round() as u8
}

/// Join persisted controls against the catalog, in catalog order.
pub fn summarize(organization: Organization, controls: &[Control]) -> ComplianceSummary {
    let statuses = essential_eight()
        .iter()
        .map(|entry| {
            let persisted = controls.iter().find(|c| c.control_id == entry.id);
            let level = persisted
                .map_or(MaturityLevel::NOT_IMPLEMENTED, |c| c.maturity_level);
            ControlStatus {
                control_id: entry.id,
                name: entry.name,
                maturity_level: level,
                maturity_name: maturity_name(level),
                evidence: persisted.and_then(|c| c.evidence.clone()),
                last_updated: persisted.map(|c| c.last_updated),
                next_review: persisted.map(|c| c.next_review),
            }
        })
        .collect();

    ComplianceSummary {
        overall_maturity_percent: overall_maturity_percent(controls),
        organization,
        controls: statuses,
    }
}

fn level_for(controls: &[Control], id: ControlId) -> u8 {
    controls
        .iter()
        .find(|c| c.control_id == id)
        .map_or(0, |c| c.maturity_level.value())
}

fn maturity_name(level: MaturityLevel) -> &'static str {
    maturity_levels()
        .iter()
        .find(|def| def.level == level.value())
        .map_or("Unknown", |def| def.name)
}
