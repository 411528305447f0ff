// API Server Binary Entry Point
//
// Purpose: Load the fertilizer model and serve /predict
// Usage: cargo run --bin api_server

use fertilizer_recommender::{AppState, ServerConfig, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "fertilizer_recommender=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    let config = ServerConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  MODEL_PATH: {}", config.model_path.display());
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  PREDICT_TIMEOUT: {:?}", config.predict_timeout);

    // Model is loaded once here and shared read-only afterwards
    let state = AppState::new(&config);

    // Create router with all endpoints and middleware
    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
