//! Storefront Admin - dashboard backend service

use anyhow::Result;
use storefront_admin::{http, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = AppConfig::from_env()?;
    let state = http::AppState::from_config(&config)?;
    tracing::info!(dir = %config.images_dir.display(), "Generated images stored locally");
    let app = http::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Storefront admin listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
