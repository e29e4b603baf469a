//! Conversions from infrastructure errors into domain errors.
//!
//! Keeps rusqlite/r2d2 error shapes on the infrastructure side so the core
//! never sees them.

use mokai_domain::MokaiError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Map a rusqlite error to the domain error taxonomy.
pub fn map_sql_error(err: SqlError) -> MokaiError {
    use rusqlite::ffi::ErrorCode;

    match err {
        SqlError::SqliteFailure(code, maybe_message) => {
            let message = maybe_message.unwrap_or_default();
            match code.code {
                ErrorCode::DatabaseBusy => MokaiError::Database("database is busy".into()),
                ErrorCode::DatabaseLocked => MokaiError::Database("database is locked".into()),
                ErrorCode::ConstraintViolation => {
                    MokaiError::Database(format!("constraint violation: {message}"))
                }
                _ => MokaiError::Database(format!(
                    "sqlite failure {:?} (code {}): {}",
                    code.code, code.extended_code, message
                )),
            }
        }
        SqlError::QueryReturnedNoRows => {
            MokaiError::NotFound("no rows returned by query".into())
        }
        other => MokaiError::Database(format!("sqlite error: {other}")),
    }
}

/// Map a connection pool error to the domain error taxonomy.
pub fn map_pool_error(err: r2d2::Error) -> MokaiError {
    MokaiError::Database(format!("connection pool error: {err}"))
}

/// Map a blocking-task join failure to the domain error taxonomy.
pub fn map_join_error(err: JoinError) -> MokaiError {
    MokaiError::Internal(format!("task join error: {err}"))
}
