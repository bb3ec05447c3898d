use db_infra::db::{DbKind, RuntimeEnv};
use migration::MigrationCommand;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;

/// Connect and bring the schema up to date. The only path the server and
/// tests use to obtain a connection.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = db_infra::orchestrate_migration(env, db_kind, MigrationCommand::Up).await?;
    info!(env = ?env, db_kind = ?db_kind, "database ready");
    Ok(conn)
}
