use std::sync::Arc;

use db_infra::db::{DbKind, RuntimeEnv};
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::store::SeaStore;

/// Builder for `AppState`, shared by `main` and the integration tests.
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: DbKind,
    connection: Option<DatabaseConnection>,
    security_config: Option<SecurityConfig>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: DbKind::SqliteFile,
            connection: None,
            security_config: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, db_kind: DbKind) -> Self {
        self.db_kind = db_kind;
        self
    }

    /// Use an already migrated connection instead of bootstrapping one.
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.connection = Some(conn);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = Some(security_config);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let security = self
            .security_config
            .ok_or_else(|| AppError::config("security config is required to build state"))?;

        let conn = match self.connection {
            Some(conn) => conn,
            None => bootstrap_db(self.env, self.db_kind).await?,
        };
        let store = SeaStore::open(conn).await?;
        Ok(AppState::new(Arc::new(store), security))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
