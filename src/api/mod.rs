pub mod analyze;
pub mod ath_picks;
pub mod health;
pub mod prices;
pub mod score;
pub mod top_picks;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(score::router())
        .merge(analyze::router())
        .merge(prices::router())
        .merge(top_picks::router())
        .merge(ath_picks::router())
}
