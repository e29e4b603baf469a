//! Common data types used throughout the application
//!
//! Field names serialize in camelCase to keep the wire shapes the dashboard
//! and report views already consume.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::constants::{
    ACTION_ASSESSMENT_COMPLETED, ACTION_CONTROL_UPDATED, ACTION_ORGANIZATION_CREATED,
    DEFAULT_EVIDENCE, REVIEW_INTERVAL_DAYS,
};
use crate::errors::{MokaiError, Result};

/// Identifier of one of the eight fixed Essential Eight controls.
///
/// The catalog is closed: a control outside this set can never be created or
/// addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlId {
    AppControl,
    PatchApps,
    ConfigureOffice,
    UserHardening,
    RestrictAdmin,
    PatchOs,
    Mfa,
    Backups,
}

impl ControlId {
    /// Stable string form used in persistence and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppControl => "app-control",
            Self::PatchApps => "patch-apps",
            Self::ConfigureOffice => "configure-office",
            Self::UserHardening => "user-hardening",
            Self::RestrictAdmin => "restrict-admin",
            Self::PatchOs => "patch-os",
            Self::Mfa => "mfa",
            Self::Backups => "backups",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlId {
    type Err = MokaiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "app-control" => Ok(Self::AppControl),
            "patch-apps" => Ok(Self::PatchApps),
            "configure-office" => Ok(Self::ConfigureOffice),
            "user-hardening" => Ok(Self::UserHardening),
            "restrict-admin" => Ok(Self::RestrictAdmin),
            "patch-os" => Ok(Self::PatchOs),
            "mfa" => Ok(Self::Mfa),
            "backups" => Ok(Self::Backups),
            other => Err(MokaiError::NotFound(format!("unknown control id: {other}"))),
        }
    }
}

/// Maturity level of a single control, always in `{0, 1, 2, 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MaturityLevel(u8);

impl MaturityLevel {
    /// Lowest level, assigned to every control at creation.
    pub const NOT_IMPLEMENTED: Self = Self(0);
    /// Highest level in the framework.
    pub const MAX: Self = Self(3);

    /// Validate an arbitrary integer supplied by a caller.
    ///
    /// Out-of-range values are a caller error, never clamped.
    pub fn new(level: i64) -> Result<Self> {
        u8::try_from(level)
            .ok()
            .filter(|l| *l <= Self::MAX.0)
            .map(Self)
            .ok_or_else(|| {
                MokaiError::InvalidInput(format!("maturity level must be 0-3, got {level}"))
            })
    }

    /// The raw level value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MaturityLevel {
    type Error = MokaiError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(i64::from(value))
    }
}

impl From<MaturityLevel> for u8 {
    fn from(value: MaturityLevel) -> Self {
        value.0
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An organization being assessed against the Essential Eight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub abn: String,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Build a new organization record with a generated id.
    pub fn new(name: impl Into<String>, abn: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            abn: abn.into(),
            created_at: now,
        }
    }
}

/// One organization's assessment state for a single catalog control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: String,
    pub organization_id: String,
    pub control_id: ControlId,
    pub maturity_level: MaturityLevel,
    pub evidence: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

impl Control {
    /// Build the level-0 control row provisioned at organization creation.
    pub fn initial(organization_id: &str, control_id: ControlId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            control_id,
            maturity_level: MaturityLevel::NOT_IMPLEMENTED,
            evidence: Some(DEFAULT_EVIDENCE.to_string()),
            last_updated: now,
            next_review: next_review_from(now),
        }
    }
}

/// Review deadline implied by a mutation at `now`.
pub fn next_review_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(REVIEW_INTERVAL_DAYS)
}

/// A state-changing action worth recording, with its typed payload.
///
/// The audit trail stores `action` and `details` separately; this union keeps
/// the per-action payload shapes from drifting.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEvent {
    OrganizationCreated {
        name: String,
        abn: String,
    },
    ControlUpdated {
        control_id: ControlId,
        maturity_level: MaturityLevel,
        previous_level: MaturityLevel,
    },
    AssessmentCompleted {
        assessor: String,
        date: DateTime<Utc>,
    },
}

impl AuditEvent {
    /// Action tag stored alongside the details payload.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::OrganizationCreated { .. } => ACTION_ORGANIZATION_CREATED,
            Self::ControlUpdated { .. } => ACTION_CONTROL_UPDATED,
            Self::AssessmentCompleted { .. } => ACTION_ASSESSMENT_COMPLETED,
        }
    }

    /// Action-specific JSON payload.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::OrganizationCreated { name, abn } => json!({ "name": name, "abn": abn }),
            Self::ControlUpdated { control_id, maturity_level, previous_level } => json!({
                "controlId": control_id,
                "maturityLevel": maturity_level,
                "previousLevel": previous_level,
            }),
            Self::AssessmentCompleted { assessor, date } => {
                json!({ "assessor": assessor, "date": date })
            }
        }
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub organization_id: String,
    pub action: String,
    pub details: serde_json::Value,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Build an entry for a typed event.
    pub fn from_event(
        organization_id: &str,
        event: &AuditEvent,
        ip_address: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            action: event.action().to_string(),
            details: event.details(),
            ip_address: ip_address.into(),
            created_at: now,
        }
    }
}
