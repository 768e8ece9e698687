//! NewsLens Web Server
//!
//! Run with: cargo run -p newslens-web

use newslens_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("newslens=debug,info")),
        )
        .init();

    info!("Starting NewsLens Web Server...");

    let config = Config::load()?;
    info!(backend = %config.backend.base_url, "configuration loaded");
    let bind = config.server.bind.clone();

    let state = newslens_web::state::AppState::new(config)?;
    let app = newslens_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
