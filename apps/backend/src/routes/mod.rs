use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod health;
pub mod player_stats;
pub mod realtime;
pub mod scores;

/// Register every route. `main` and the integration tests share this so both
/// exercise the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid JSON body: {err}")).into()
    }));

    cfg.route("/", web::get().to(health::root));

    // /health
    cfg.configure(health::configure_routes);

    // /api/scores/**
    cfg.service(web::scope("/api/scores").configure(scores::configure_routes));

    // /api/player-stats/**
    cfg.service(web::scope("/api/player-stats").configure(player_stats::configure_routes));

    // /api/ws
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
