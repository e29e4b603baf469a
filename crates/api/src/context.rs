//! Application context - dependency injection container

use std::sync::Arc;

use mokai_core::ComplianceService;
use mokai_domain::{Config, MokaiError, Result};
use mokai_infra::database::{
    DbManager, SqliteAuditLogRepository, SqliteControlRepository, SqliteOrganizationRepository,
};

/// Application context - holds the configuration, the database manager, and
/// the compliance service wired to its SQLite repositories.
///
/// Constructed once at process start; the store handle lives here instead of
/// in ambient module state.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub compliance: Arc<ComplianceService>,
}

impl AppContext {
    /// Create a new application context with default configuration.
    pub fn new() -> Result<Self> {
        Self::new_with_config(Config::default())
    }

    /// Create a new application context with custom configuration.
    ///
    /// Tests use this to point the context at a throwaway database path.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let compliance = Arc::new(ComplianceService::new(
            Arc::new(SqliteOrganizationRepository::new(Arc::clone(&db))),
            Arc::new(SqliteControlRepository::new(Arc::clone(&db))),
            Arc::new(SqliteAuditLogRepository::new(Arc::clone(&db))),
        ));

        Ok(Self { config, db, compliance })
    }

    /// Verify database connectivity without blocking the async runtime.
    pub async fn health_check(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.health_check())
            .await
            .map_err(|e| MokaiError::Internal(format!("health check task failed: {e}")))?
    }
}
