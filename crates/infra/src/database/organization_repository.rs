//! Organization persistence over SQLite
//!
//! Creation writes the organization row, its eight control rows, and the
//! `organization.created` audit entry in one transaction, so no reader can
//! observe an organization with an incomplete control set.

use std::sync::Arc;

use async_trait::async_trait;
use mokai_core::compliance::ports::OrganizationRepository as OrganizationRepositoryPort;
use mokai_domain::{AuditLog, Control, Organization, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::audit_log_repository::insert_audit_entry;
use super::control_repository::insert_control;
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

/// SQLite-backed implementation of `OrganizationRepository`.
pub struct SqliteOrganizationRepository {
    db: Arc<DbManager>,
}

impl SqliteOrganizationRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganizationRepositoryPort for SqliteOrganizationRepository {
    async fn create_with_controls(
        &self,
        organization: &Organization,
        controls: &[Control],
        audit: &AuditLog,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let organization = organization.clone();
        let controls = controls.to_vec();
        let audit = audit.clone();

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;

            insert_organization(&tx, &organization).map_err(map_sql_error)?;
            for control in &controls {
                insert_control(&tx, control).map_err(map_sql_error)?;
            }
            insert_audit_entry(&tx, &audit).map_err(map_sql_error)?;

            tx.commit().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self) -> Result<Vec<Organization>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<Organization>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, name, abn, created_at FROM organizations
                     ORDER BY created_at DESC, rowid DESC",
                )
                .map_err(map_sql_error)?;

            let organizations = stmt
                .query_map([], map_organization_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(organizations)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Organization>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> Result<Option<Organization>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, name, abn, created_at FROM organizations WHERE id = ?1",
                params![&id],
                map_organization_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to an Organization
fn map_organization_row(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
        abn: row.get(2)?,
        created_at: super::datetime_from_secs(3, row.get(3)?)?,
    })
}

/// Insert one organization row.
pub(crate) fn insert_organization(
    conn: &Connection,
    organization: &Organization,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO organizations (id, name, abn, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            &organization.id,
            &organization.name,
            &organization.abn,
            organization.created_at.timestamp(),
        ],
    )?;
    Ok(())
}
