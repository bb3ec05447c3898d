use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Connection error: {message}")]
    Connect { message: String },
    #[error("Migration error: {message}")]
    Migration { message: String },
    #[error("Lock error: {message}")]
    Lock { message: String },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn is_sqlite_busy(&self) -> bool {
        let msg = self.to_string();
        msg.contains("database is locked") || msg.contains("SQLITE_BUSY")
    }
}
