//! Database implementations

pub mod audit_log_repository;
pub mod control_repository;
pub mod manager;
pub mod organization_repository;

pub use audit_log_repository::*;
pub use control_repository::*;
pub use manager::*;
pub use organization_repository::*;

use chrono::{DateTime, Utc};

/// Convert a unix-second column value back into a UTC timestamp.
pub(crate) fn datetime_from_secs(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("timestamp {secs} out of range").into(),
        )
    })
}
