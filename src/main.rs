use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_api::api::create_api_router;
use catalog_api::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let db = match catalog_api::connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            error!(error = %err, "Failed to connect to the database");
            std::process::exit(1);
        }
    };

    let app = create_api_router(Arc::new(db));

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %config.bind_addr, error = %err, "Failed to bind");
            std::process::exit(1);
        }
    };
    info!(addr = %config.bind_addr, "Running");

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "Server stopped");
    }
}
