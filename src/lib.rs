//! Stoplight - traffic-light stock scoring and scanning server.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;
pub mod universe;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::{ScanCache, Scanner};
use sources::BarSource;
use types::{AthPicksResponse, TopPicksResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn BarSource>,
    pub scanner: Arc<Scanner>,
    pub top_picks_cache: Arc<ScanCache<TopPicksResponse>>,
    pub ath_picks_cache: Arc<ScanCache<AthPicksResponse>>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn BarSource>) -> Self {
        let ttl = config.scan_cache_ttl;
        Self {
            config: Arc::new(config),
            scanner: Arc::new(Scanner::new(Arc::clone(&source))),
            source,
            top_picks_cache: Arc::new(ScanCache::new(ttl)),
            ath_picks_cache: Arc::new(ScanCache::new(ttl)),
        }
    }
}

/// Build the application router with CORS and request tracing layers.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
