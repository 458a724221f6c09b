use actix_web::{web, App, HttpServer};
use anyhow::Result;
use dondeestas_core::{config::Config, new_db_client};
use dondeestas_server::api;
use tracing_actix_web::TracingLogger;

mod telemetry;

#[actix_web::main]
async fn main() -> Result<()> {
    let loaded = Config::load("config.json");
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let _guard = telemetry::init_telemetry(&config.logging)?;
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "Failed to load config.json, using defaults");
    }

    tracing::info!("dondeestas starting");
    tracing::info!("  Port: {}", config.port);
    tracing::info!(
        "  Database: kind={:?}, name={}, host={}:{}",
        config.database.kind,
        config.database.name,
        config.database.hostname,
        config.database.port
    );
    tracing::info!(
        "  CORS: enabled={}, origins={:?}",
        config.cors.enabled,
        config.cors.allowed_origins
    );

    let db = new_db_client(&config.database).await?;
    tracing::info!("✓ Database client initialized");

    let app_state = web::Data::new(api::AppState { db });

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting HTTP server on {}", bind_addr);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(api::cors(&cors_config))
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind(&bind_addr)?
    .run();

    tracing::info!("Server running, press Ctrl+C to stop");
    server.await?;

    tracing::info!("Shutting down");
    Ok(())
}
