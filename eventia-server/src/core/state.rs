use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::bootstrap;

/// Shared server state, cloned into every handler
///
/// | field | type | notes |
/// |-------|------|-------|
/// | config | Config | immutable after startup |
/// | pool | SqlitePool | one transaction per mutating request |
/// | jwt_service | Arc<JwtService> | signing key loaded once |
///
/// Holds no mutable request data; everything per-request travels through
/// extractors.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Open the database, apply migrations and bootstrap the admin user
    ///
    /// Order:
    /// 1. work directory
    /// 2. database (`DATABASE_URL`, migrated)
    /// 3. admin account from `ADMIN_EMAIL` / `ADMIN_PASSWORD`, if set
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;

        let db = DbService::new(&config.database_url).await?;
        let state = Self::new(config.clone(), db.pool);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// State over a fresh in-memory database (tests and tooling)
    pub async fn in_memory(config: Config) -> Result<Self> {
        let db = DbService::in_memory().await?;
        let state = Self::new(config, db.pool);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    async fn bootstrap_admin(&self) -> Result<()> {
        if let (Some(email), Some(password)) =
            (&self.config.admin_email, &self.config.admin_password)
        {
            bootstrap::ensure_admin(&self.pool, email, password).await?;
        }
        Ok(())
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
