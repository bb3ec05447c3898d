use std::env;

use db_infra::db::{DbKind, RuntimeEnv};

use crate::error::AppError;

/// Listener and database selection for the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
    pub env: RuntimeEnv,
}

impl ServerConfig {
    /// `BACKEND_HOST` (0.0.0.0), `BACKEND_PORT` (3001), `SCOREBOARD_DB` (sqlite-file),
    /// `SCOREBOARD_ENV` (prod; `test` is required for sqlite-memory).
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("BACKEND_PORT must be a port number, got '{raw}'")))?,
            Err(_) => 3001,
        };
        let db_kind = match env::var("SCOREBOARD_DB") {
            Ok(raw) => raw.parse::<DbKind>()?,
            Err(_) => DbKind::SqliteFile,
        };

        let env = match env::var("SCOREBOARD_ENV").as_deref() {
            Ok("test") => RuntimeEnv::Test,
            Ok("prod") | Err(_) => RuntimeEnv::Prod,
            Ok(other) => {
                return Err(AppError::config(format!(
                    "SCOREBOARD_ENV must be 'prod' or 'test', got '{other}'"
                )))
            }
        };

        Ok(Self {
            host,
            port,
            db_kind,
            env,
        })
    }
}
