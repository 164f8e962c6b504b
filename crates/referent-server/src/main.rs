use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use referent_core::AppConfig;
use referent_server::routes;
use referent_server::state::AppState;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("referent=info".parse()?))
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;
    let api_key = std::env::var("REFERENT_SERVER_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    let port = std::env::var("REFERENT_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    for provider in referent_core::Provider::ALL {
        if !config.is_configured(provider) {
            tracing::warn!("{} API key not configured", provider.display_name());
        }
    }
    if api_key.is_none() {
        tracing::warn!("REFERENT_SERVER_API_KEY not set, API is open");
    }

    let state = Arc::new(AppState::new(config, api_key)?);

    let app = routes::router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
