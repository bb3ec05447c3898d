use actix_web::{web, App, HttpServer};
use scoreboard_backend::infra::state::build_state;
use scoreboard_backend::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use scoreboard_backend::{routes, SecurityConfig, ServerConfig};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration comes from the process environment (docker env_file or a sourced .env).
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    let security_config = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Scoreboard Backend on http://{}:{}",
        config.host, config.port
    );
    tracing::info!(
        api_key_expires_at = %security_config.expires_at(),
        "public api key loaded"
    );

    let app_state = match build_state()
        .with_env(config.env)
        .with_db(config.db_kind)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Database connected");

    let registry = app_state.websocket_registry();
    let data = web::Data::new(app_state);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    registry.close_all_connections();
    result
}
