use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::DbInfraError;

pub fn pg_lock_id(key: &str) -> i64 {
    xxh3_64(key.as_bytes()) as i64
}

enum Held {
    Postgres { pool: DatabaseConnection, key: i64 },
    SqliteFile { file: File, path: PathBuf },
    InMemory,
}

/// A held migration lock. Call `release` when done; dropping a SQLite guard
/// also releases the OS lock.
pub struct Guard {
    held: Option<Held>,
}

impl Guard {
    pub async fn release(mut self) -> Result<(), DbInfraError> {
        match self.held.take() {
            Some(Held::Postgres { pool, key }) => {
                let stmt = Statement::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    "SELECT pg_advisory_unlock($1) AS unlocked",
                    vec![key.into()],
                );
                match pool.query_one(stmt).await {
                    Ok(Some(row)) => {
                        let unlocked: bool =
                            row.try_get("", "unlocked").map_err(|e| DbInfraError::Lock {
                                message: format!("failed to read unlock result: {e}"),
                            })?;
                        if !unlocked {
                            warn!(lock_key = key, "advisory unlock returned false");
                        }
                    }
                    Ok(None) => warn!(lock_key = key, "advisory unlock returned no row"),
                    Err(e) => warn!(lock_key = key, error = %e, "advisory unlock failed"),
                }
            }
            Some(Held::SqliteFile { file, path }) => {
                use fs4::fs_std::FileExt;
                if let Err(e) = file.unlock() {
                    debug!(lock_path = %path.display(), error = %e, "sqlite file unlock returned error");
                }
            }
            Some(Held::InMemory) | None => {}
        }
        Ok(())
    }
}

/// Non-blocking acquisition of the lock that serializes migrations.
#[async_trait]
pub trait BootstrapLock: Send {
    /// `Ok(None)` when another process currently holds the lock.
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError>;
}

/// PostgreSQL session advisory lock.
///
/// INVARIANT: the pool must have exactly one connection so the unlock runs
/// on the session that took the lock.
pub struct PgAdvisoryLock {
    pool: DatabaseConnection,
    key: i64,
}

impl PgAdvisoryLock {
    pub fn new(pool: DatabaseConnection, key: &str) -> Self {
        Self {
            pool,
            key: pg_lock_id(key),
        }
    }
}

#[async_trait]
impl BootstrapLock for PgAdvisoryLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_try_advisory_lock($1) AS locked",
            vec![self.key.into()],
        );
        let row = self
            .pool
            .query_one(stmt)
            .await
            .map_err(|e| DbInfraError::Lock {
                message: format!("failed to acquire advisory lock: {e}"),
            })?
            .ok_or_else(|| DbInfraError::Lock {
                message: "pg_try_advisory_lock returned no row".to_string(),
            })?;
        let locked: bool = row.try_get("", "locked").map_err(|e| DbInfraError::Lock {
            message: format!("failed to read lock result: {e}"),
        })?;

        Ok(locked.then(|| Guard {
            held: Some(Held::Postgres {
                pool: self.pool.clone(),
                key: self.key,
            }),
        }))
    }
}

/// Exclusive OS file lock on `<db>.migrate.lock`.
pub struct SqliteFileLock {
    path: PathBuf,
}

impl SqliteFileLock {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl BootstrapLock for SqliteFileLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        use fs4::fs_std::FileExt;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DbInfraError::Lock {
                message: format!("failed to create lock directory: {e}"),
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| DbInfraError::Lock {
                message: format!("failed to open lock file: {e}"),
            })?;

        match file.try_lock_exclusive() {
            Ok(true) => {
                debug!(lock_path = %self.path.display(), "sqlite file lock acquired");
                Ok(Some(Guard {
                    held: Some(Held::SqliteFile {
                        file,
                        path: self.path.clone(),
                    }),
                }))
            }
            Ok(false) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(DbInfraError::Lock {
                message: format!("failed to acquire sqlite file lock: {e}"),
            }),
        }
    }
}

/// In-memory databases live in one process; nothing to serialize.
pub struct InMemoryLock;

#[async_trait]
impl BootstrapLock for InMemoryLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        Ok(Some(Guard {
            held: Some(Held::InMemory),
        }))
    }
}
