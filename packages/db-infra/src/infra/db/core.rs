use std::future::Future;
use std::time::{Duration, Instant};

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use rand::Rng;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, trace, warn};

use crate::config::db::{
    make_conn_spec, sqlite_lock_path, validate_db_config, DbKind, PoolSettings, RuntimeEnv,
};
use crate::error::DbInfraError;
use crate::infra::db::locking::{BootstrapLock, InMemoryLock, PgAdvisoryLock, SqliteFileLock};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

fn engine_name(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the last error once all attempts are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DbInfraError::Connect {
        message: "no error recorded after max attempts".to_string(),
    }))
}

/// Open a pooled connection. Postgres connections are retried because the
/// server may still be starting next to us.
pub async fn connect(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, DbInfraError> {
    validate_db_config(env, db_kind)?;
    let url = make_conn_spec(env, db_kind)?;
    let settings = PoolSettings::for_kind(db_kind);

    let mut opt = ConnectOptions::new(url.clone());
    opt.min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .sqlx_logging(false);

    info!(
        env = ?env,
        engine = engine_name(db_kind),
        url = %sanitize_db_url(&url),
        max_connections = settings.max_connections,
        "connecting to database"
    );

    let open = || {
        let opt = opt.clone();
        async move {
            Database::connect(opt)
                .await
                .map_err(|e| DbInfraError::Connect {
                    message: format!("failed to connect to {}: {e}", engine_name(db_kind)),
                })
        }
    };

    if db_kind == DbKind::Postgres {
        retry_connection(open, CONNECT_ATTEMPTS, CONNECT_INTERVAL_MS).await
    } else {
        open().await
    }
}

/// Mask the password in a connection string for logging and lock keys.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth, host)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth.rfind(':') {
        Some(colon) if auth[..colon].contains("://") => {
            format!("{}:***@{}", &auth[..colon], host)
        }
        _ => url.to_string(),
    }
}

async fn schema_is_current(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected = Migrator::migrations().len();
    match Migrator::get_applied_migrations(conn).await {
        Ok(applied) => {
            trace!(applied = applied.len(), expected, "schema fast-path check");
            Ok(applied.len() == expected)
        }
        Err(DbErr::Exec(_)) => Ok(false),
        Err(e) => Err(DbInfraError::Migration {
            message: format!("failed to get applied migrations: {e}"),
        }),
    }
}

/// Connect and run a migration command under the appropriate lock.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<DatabaseConnection, DbInfraError> {
    let pool = connect(env, db_kind).await?;
    orchestrate_migration_internal(&pool, env, db_kind, command).await?;
    Ok(pool)
}

pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(env = ?env, db_kind = ?db_kind, cmd = ?command, "migrate=start");

    if command == MigrationCommand::Status {
        migrate(pool, command)
            .await
            .map_err(|e| DbInfraError::Migration {
                message: e.to_string(),
            })?;
        info!("migrate=done");
        return Ok(());
    }

    let result = match db_kind {
        DbKind::Postgres => {
            // A dedicated single-connection pool so the advisory lock session is stable.
            let url = make_conn_spec(env, db_kind)?;
            let mut opt = ConnectOptions::new(url.clone());
            opt.min_connections(1)
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(2))
                .sqlx_logging(false);
            let admin = Database::connect(opt)
                .await
                .map_err(|e| DbInfraError::Connect {
                    message: format!("failed to open lock session: {e}"),
                })?;
            let key = format!("scoreboard:migrate:{}", sanitize_db_url(&url));
            migrate_with_lock(pool, PgAdvisoryLock::new(admin, &key), env, command).await
        }
        DbKind::SqliteFile => {
            let lock = SqliteFileLock::new(&sqlite_lock_path(env)?);
            migrate_with_lock(pool, lock, env, command).await
        }
        DbKind::SqliteMemory => migrate_with_lock(pool, InMemoryLock, env, command).await,
    };

    if let Err(e) = &result {
        if e.is_sqlite_busy() {
            warn!(error = %e, "sqlite_busy op=migrate");
        }
    }
    info!("migrate=done");
    result
}

async fn migrate_with_lock<L>(
    pool: &DatabaseConnection,
    mut lock: L,
    env: RuntimeEnv,
    command: MigrationCommand,
) -> Result<(), DbInfraError>
where
    L: BootstrapLock,
{
    let acquire_ms = std::env::var("SCOREBOARD_MIGRATE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(match env {
            RuntimeEnv::Test => 3000,
            RuntimeEnv::Prod => 900,
        });
    let deadline = Instant::now() + Duration::from_millis(acquire_ms);
    let mut backoff_ms = 10u64;

    loop {
        if let Some(guard) = lock.try_acquire().await? {
            // Another process may have migrated while we waited.
            let skip = command == MigrationCommand::Up && schema_is_current(pool).await?;
            let outcome = if skip {
                trace!("schema already current; skipping migrate up");
                Ok(())
            } else {
                migrate(pool, command)
                    .await
                    .map_err(|e| DbInfraError::Migration {
                        message: e.to_string(),
                    })
            };
            guard.release().await?;
            return outcome;
        }

        if Instant::now() >= deadline {
            return Err(DbInfraError::Lock {
                message: format!("timed out after {acquire_ms}ms waiting for migration lock"),
            });
        }

        let jitter = rand::rng().random_range(0..=backoff_ms / 2);
        tokio::time::sleep(Duration::from_millis(backoff_ms + jitter)).await;
        backoff_ms = (backoff_ms * 2).min(200);
    }
}
