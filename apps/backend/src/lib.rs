#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod state;
pub mod store;
pub mod sync;
pub mod trace_ctx;
pub mod ws;

pub use config::ServerConfig;
pub use error::AppError;
pub use errors::domain::DomainError;
pub use errors::ErrorCode;
pub use extractors::{ApiKey, ApiKeyOutcome, RecordId};
pub use infra::state::build_state;
pub use middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
pub use repos::player_stats::{NewPlayerStat, PlayerStat};
pub use repos::scores::{NewScore, Score};
pub use state::{AppState, SecurityConfig};
pub use store::{ModelStore, SeaStore};
pub use sync::{Confirm, LiveSync, SyncEvent};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
