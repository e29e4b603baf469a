//! Audit trail persistence over SQLite
//!
//! The table is append-only: no update or delete statement exists anywhere
//! in this crate.

use std::sync::Arc;

use async_trait::async_trait;
use mokai_core::compliance::ports::AuditLogRepository as AuditLogRepositoryPort;
use mokai_domain::{AuditLog, Result};
use rusqlite::{params, Connection, Row};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

/// SQLite-backed implementation of `AuditLogRepository`.
pub struct SqliteAuditLogRepository {
    db: Arc<DbManager>,
}

impl SqliteAuditLogRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepositoryPort for SqliteAuditLogRepository {
    async fn append(&self, entry: &AuditLog) -> Result<()> {
        let db = Arc::clone(&self.db);
        let entry = entry.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            insert_audit_entry(&conn, &entry).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_recent(&self, organization_id: &str, limit: u32) -> Result<Vec<AuditLog>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<AuditLog>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, organization_id, action, details, ip_address, created_at
                     FROM audit_logs
                     WHERE organization_id = ?1
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?2",
                )
                .map_err(map_sql_error)?;

            let entries = stmt
                .query_map(params![&organization_id, limit], map_audit_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(entries)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to an AuditLog
fn map_audit_row(row: &Row<'_>) -> rusqlite::Result<AuditLog> {
    let details: String = row.get(3)?;
    let details = serde_json::from_str(&details).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(err))
    })?;

    Ok(AuditLog {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        action: row.get(2)?,
        details,
        ip_address: row.get(4)?,
        created_at: super::datetime_from_secs(5, row.get(5)?)?,
    })
}

/// Insert one audit entry; shared with the transactional writers in the
/// organization and control repositories.
pub(crate) fn insert_audit_entry(conn: &Connection, entry: &AuditLog) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO audit_logs (id, organization_id, action, details, ip_address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &entry.id,
            &entry.organization_id,
            &entry.action,
            entry.details.to_string(),
            &entry.ip_address,
            entry.created_at.timestamp(),
        ],
    )?;
    Ok(())
}
