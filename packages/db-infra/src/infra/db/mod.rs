pub mod core;
pub mod locking;

pub use core::{connect, orchestrate_migration, orchestrate_migration_internal};
pub use locking::{BootstrapLock, Guard, InMemoryLock, PgAdvisoryLock, SqliteFileLock};
