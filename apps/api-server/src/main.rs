//! # Feed API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::handlers;
use api_server::middleware::cors::cors;
use api_server::state::AppState;
use api_server::telemetry::{self, TelemetryConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Feed API Server on {}:{}", config.host, config.port);

    // Build application state
    let state = AppState::new(&config).await;

    let server_state = state.clone();
    let images_dir = config.images.dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(server_state.clone()))
            .configure(|cfg| handlers::configure_routes(cfg, &images_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped, releasing resources");
    state.shutdown().await;

    Ok(())
}
