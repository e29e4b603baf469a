//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

/// Days until a control's next scheduled review, restarted on every mutation.
pub const REVIEW_INTERVAL_DAYS: i64 = 90;

/// Evidence text assigned to every control at organization creation.
pub const DEFAULT_EVIDENCE: &str = "Initial assessment pending";

/// Default page size for audit log listings.
pub const DEFAULT_AUDIT_LOG_LIMIT: u32 = 50;

/// Recorded originating address when none can be derived from the request.
pub const UNKNOWN_IP_ADDRESS: &str = "unknown";

// Audit action vocabulary observed in use
pub const ACTION_ORGANIZATION_CREATED: &str = "organization.created";
pub const ACTION_CONTROL_UPDATED: &str = "control.updated";
pub const ACTION_ASSESSMENT_COMPLETED: &str = "assessment.completed";
