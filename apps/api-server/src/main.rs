//! # Inkpost API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::handlers;
use api_server::middleware::ErrorNormalizer;
use api_server::observability::RequestTimer;
use api_server::state::AppState;
use api_server::telemetry::init_telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env();

    // Initialize tracing
    init_telemetry(&config.telemetry);
    config.warn_on_insecure_defaults();

    tracing::info!(
        environment = ?config.environment,
        "Starting Inkpost API Server on {}:{}",
        config.host,
        config.port
    );

    // Build application state
    let state = AppState::new(&config).await;
    let environment = config.environment;
    let slow_request_threshold = config.slow_request_threshold;

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(ErrorNormalizer::new(environment))
            .wrap(RequestTimer::new(slow_request_threshold))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .default_service(web::to(handlers::route_not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
