//! Control persistence over SQLite
//!
//! Maturity updates run as a single transaction: the pre-update level is
//! read, the row is overwritten, and the `control.updated` audit entry is
//! appended before commit, so the recorded previous level is always the
//! value this transaction actually replaced.

use std::sync::Arc;

use async_trait::async_trait;
use mokai_core::compliance::ports::{
    ControlMutation, ControlRepository as ControlRepositoryPort, UpdatedControl,
};
use mokai_domain::{AuditEvent, AuditLog, Control, ControlId, MaturityLevel, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use super::audit_log_repository::insert_audit_entry;
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

const CONTROL_COLUMNS: &str =
    "id, organization_id, control_id, maturity_level, evidence, last_updated, next_review";

/// SQLite-backed implementation of `ControlRepository`.
pub struct SqliteControlRepository {
    db: Arc<DbManager>,
}

impl SqliteControlRepository {
    /// Create a new repository instance.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ControlRepositoryPort for SqliteControlRepository {
    async fn list_for_organization(&self, organization_id: &str) -> Result<Vec<Control>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<Control>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CONTROL_COLUMNS} FROM controls
                     WHERE organization_id = ?1
                     ORDER BY control_id ASC"
                ))
                .map_err(map_sql_error)?;

            let controls = stmt
                .query_map(params![&organization_id], map_control_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(controls)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find(
        &self,
        organization_id: &str,
        control_id: ControlId,
    ) -> Result<Option<Control>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();

        task::spawn_blocking(move || -> Result<Option<Control>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!(
                    "SELECT {CONTROL_COLUMNS} FROM controls
                     WHERE organization_id = ?1 AND control_id = ?2"
                ),
                params![&organization_id, control_id.as_str()],
                map_control_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn apply_update(&self, mutation: &ControlMutation) -> Result<Option<UpdatedControl>> {
        let db = Arc::clone(&self.db);
        let mutation = mutation.clone();

        task::spawn_blocking(move || -> Result<Option<UpdatedControl>> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;

            let Some((row_id, previous_raw, existing_evidence)) = tx
                .query_row(
                    "SELECT id, maturity_level, evidence FROM controls
                     WHERE organization_id = ?1 AND control_id = ?2",
                    params![&mutation.organization_id, mutation.control_id.as_str()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, Option<String>>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(map_sql_error)?
            else {
                return Ok(None);
            };

            let previous_level = MaturityLevel::new(previous_raw)?;

            match &mutation.evidence {
                Some(evidence) => tx
                    .execute(
                        "UPDATE controls
                         SET maturity_level = ?1, evidence = ?2, last_updated = ?3, next_review = ?4
                         WHERE id = ?5",
                        params![
                            mutation.maturity_level.value(),
                            evidence,
                            mutation.now.timestamp(),
                            mutation.next_review.timestamp(),
                            &row_id,
                        ],
                    )
                    .map_err(map_sql_error)?,
                None => tx
                    .execute(
                        "UPDATE controls
                         SET maturity_level = ?1, last_updated = ?2, next_review = ?3
                         WHERE id = ?4",
                        params![
                            mutation.maturity_level.value(),
                            mutation.now.timestamp(),
                            mutation.next_review.timestamp(),
                            &row_id,
                        ],
                    )
                    .map_err(map_sql_error)?,
            };

            let event = AuditEvent::ControlUpdated {
                control_id: mutation.control_id,
                maturity_level: mutation.maturity_level,
                previous_level,
            };
            let audit = AuditLog::from_event(
                &mutation.organization_id,
                &event,
                mutation.ip_address.clone(),
                mutation.now,
            );
            insert_audit_entry(&tx, &audit).map_err(map_sql_error)?;

            tx.commit().map_err(map_sql_error)?;

            let control = Control {
                id: row_id,
                organization_id: mutation.organization_id.clone(),
                control_id: mutation.control_id,
                maturity_level: mutation.maturity_level,
                evidence: mutation.evidence.clone().or(existing_evidence),
                last_updated: mutation.now,
                next_review: mutation.next_review,
            };

            Ok(Some(UpdatedControl { control, previous_level }))
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to a Control
fn map_control_row(row: &Row<'_>) -> rusqlite::Result<Control> {
    let control_id: String = row.get(2)?;
    let control_id: ControlId = control_id.parse().map_err(|err| invalid_column(2, err))?;
    let maturity_level =
        MaturityLevel::new(row.get::<_, i64>(3)?).map_err(|err| invalid_column(3, err))?;

    Ok(Control {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        control_id,
        maturity_level,
        evidence: row.get(4)?,
        last_updated: super::datetime_from_secs(5, row.get(5)?)?,
        next_review: super::datetime_from_secs(6, row.get(6)?)?,
    })
}

/// Insert one control row; shared with the organization creation transaction.
pub(crate) fn insert_control(conn: &Connection, control: &Control) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO controls
            (id, organization_id, control_id, maturity_level, evidence, last_updated, next_review)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &control.id,
            &control.organization_id,
            control.control_id.as_str(),
            control.maturity_level.value(),
            &control.evidence,
            control.last_updated.timestamp(),
            control.next_review.timestamp(),
        ],
    )?;
    Ok(())
}

fn invalid_column(idx: usize, err: mokai_domain::MokaiError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mokai_domain::{next_review_from, Organization};
    use tempfile::TempDir;

    use super::super::organization_repository::insert_organization;
    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(&db_path, 4).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    fn seed_organization(db: &Arc<DbManager>) -> Organization {
        let now = Utc::now();
        let organization = Organization::new("Dept X", "111", now);
        let conn = db.get_connection().expect("connection");
        insert_organization(&conn, &organization).expect("insert organization");
        for entry in mokai_domain::catalog::essential_eight() {
            insert_control(&conn, &Control::initial(&organization.id, entry.id, now))
                .expect("insert control");
        }
        organization
    }

    fn mutation(org_id: &str, control_id: ControlId, level: i64) -> ControlMutation {
        let now = Utc::now();
        ControlMutation {
            organization_id: org_id.to_string(),
            control_id,
            maturity_level: MaturityLevel::new(level).expect("valid level"),
            evidence: None,
            ip_address: "unknown".to_string(),
            now,
            next_review: next_review_from(now),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_orders_by_control_id() {
        let (db, _temp_dir) = setup_test_db();
        let org = seed_organization(&db);
        let repo = SqliteControlRepository::new(db);

        let controls = repo.list_for_organization(&org.id).await.expect("list controls");
        assert_eq!(controls.len(), 8);
        let ids: Vec<&str> = controls.iter().map(|c| c.control_id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn apply_update_overwrites_and_audits_in_one_transaction() {
        let (db, _temp_dir) = setup_test_db();
        let org = seed_organization(&db);
        let repo = SqliteControlRepository::new(Arc::clone(&db));

        let updated = repo
            .apply_update(&mutation(&org.id, ControlId::Mfa, 2))
            .await
            .expect("apply update")
            .expect("control exists");

        assert_eq!(updated.control.maturity_level, MaturityLevel::new(2).unwrap());
        assert_eq!(updated.previous_level, MaturityLevel::new(0).unwrap());

        // The audit entry landed in the same commit, with the true previous level
        let conn = db.get_connection().expect("connection");
        let (action, details): (String, String) = conn
            .query_row(
                "SELECT action, details FROM audit_logs WHERE organization_id = ?1",
                params![&org.id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("audit row written");
        assert_eq!(action, "control.updated");
        let details: serde_json::Value = serde_json::from_str(&details).expect("json details");
        assert_eq!(details["previousLevel"], 0);
        assert_eq!(details["maturityLevel"], 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn apply_update_keeps_evidence_when_absent() {
        let (db, _temp_dir) = setup_test_db();
        let org = seed_organization(&db);
        let repo = SqliteControlRepository::new(db);

        let updated = repo
            .apply_update(&mutation(&org.id, ControlId::Backups, 1))
            .await
            .expect("apply update")
            .expect("control exists");
        assert_eq!(updated.control.evidence.as_deref(), Some("Initial assessment pending"));

        let mut with_evidence = mutation(&org.id, ControlId::Backups, 2);
        with_evidence.evidence = Some("Restore drills documented".to_string());
        let updated =
            repo.apply_update(&with_evidence).await.expect("apply update").expect("exists");
        assert_eq!(updated.control.evidence.as_deref(), Some("Restore drills documented"));

        let reread = repo
            .find(&org.id, ControlId::Backups)
            .await
            .expect("find control")
            .expect("control exists");
        assert_eq!(reread.evidence.as_deref(), Some("Restore drills documented"));
        assert_eq!(reread.maturity_level, MaturityLevel::new(2).unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn apply_update_unknown_pair_writes_nothing() {
        let (db, _temp_dir) = setup_test_db();
        let _org = seed_organization(&db);
        let repo = SqliteControlRepository::new(Arc::clone(&db));

        let outcome = repo
            .apply_update(&mutation("nonexistent-org", ControlId::Mfa, 1))
            .await
            .expect("apply update");
        assert!(outcome.is_none());

        let conn = db.get_connection().expect("connection");
        let audit_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audit_logs", [], |row| row.get(0))
            .expect("count");
        assert_eq!(audit_count, 0);
    }
}
