use std::sync::Arc;

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use app::AppState;
use domain::errors::DomainError;
use infrastructure::config::SiteConfig;
use infrastructure::logging::logger;
use presentation::routes::router;

/// Serve the site API until Ctrl-C
pub async fn run(config: SiteConfig) -> Result<(), DomainError> {
    if let Err(error) = logger::init_logger(&config.logging) {
        eprintln!("Failed to initialize logger: {}", error);
    }

    tracing::info!("Starting ArtVenture site API");

    let bind = config.server.bind.clone();
    let app_state = Arc::new(AppState::new(config)?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| DomainError::InternalError(format!("Failed to bind {}: {}", bind, e)))?;
    tracing::info!("Listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DomainError::InternalError(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", error);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
