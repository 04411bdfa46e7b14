use anyhow::Context;
use locator_server::{create_app, AppState, ServerConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Campus Locator Server");

    let config = ServerConfig::from_env();
    let campus = config
        .load_campus()
        .context("failed to load campus data")?;
    info!(
        "Serving {} buildings, {} rooms, {} floor plans",
        campus.directory().len(),
        campus.rooms().room_count(),
        campus.floor_plans().len()
    );

    let state = Arc::new(AppState::new(campus, config.floor_plan_root.clone()));
    let app = create_app(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
