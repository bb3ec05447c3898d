#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use db_infra::db::{DbKind, RuntimeEnv};
use migration::MigrationCommand;
use scoreboard_backend::infra::state::build_state;
use scoreboard_backend::{routes, AppState, RequestTrace, SeaStore, SecurityConfig, StructuredLogger, TraceSpan};

pub mod proptest_prelude;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Fresh in-memory database with the schema applied. Each call is isolated.
pub async fn memory_db() -> sea_orm::DatabaseConnection {
    db_infra::orchestrate_migration(RuntimeEnv::Test, DbKind::SqliteMemory, MigrationCommand::Up)
        .await
        .expect("migrate in-memory sqlite")
}

pub async fn memory_store() -> Arc<SeaStore> {
    let db = memory_db().await;
    Arc::new(SeaStore::open(db).await.expect("open store"))
}

/// App state over a fresh in-memory database plus the valid API key.
pub async fn memory_state() -> (AppState, String) {
    let (security, key) = SecurityConfig::for_tests();
    let state = build_state()
        .with_connection(memory_db().await)
        .with_security(security)
        .build()
        .await
        .expect("build state");
    (state, key)
}

/// The production route table wrapped in the request middleware.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
