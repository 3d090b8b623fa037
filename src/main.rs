use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stoplight::config::Config;
use stoplight::sources::YahooClient;
use stoplight::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stoplight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting Stoplight server on {}:{}", config.host, config.port);

    let source = Arc::new(YahooClient::new(config.fetch_timeout)?);
    let state = AppState::new(config.clone(), source);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Stoplight server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
