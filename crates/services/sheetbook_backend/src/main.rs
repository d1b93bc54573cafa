// File: services/sheetbook_backend/src/main.rs
use sheetbook_common::logging;
use sheetbook_config::load_config;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            logging::init();
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    logging::init_with_level(if config.server.debug {
        Level::DEBUG
    } else {
        Level::INFO
    });

    // Refuse to start half-configured
    let problems = config.validation_errors();
    if !problems.is_empty() {
        error!("Configuration error:");
        for problem in &problems {
            error!("  - {}", problem);
        }
        process::exit(1);
    }

    let app = sheetbook_backend::app(config.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
