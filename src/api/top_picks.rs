//! Top-Picks scan endpoint with response caching.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::types::{ExigencyLevel, Market, RangePreset, Timeframe, TopPicksResponse};
use crate::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub struct TopPicksParams {
    market: Option<String>,
    tf: Option<String>,
    range: Option<String>,
    level: Option<String>,
    limit: Option<String>,
}

struct ResolvedParams {
    market: Market,
    tf: Timeframe,
    range: RangePreset,
    level: ExigencyLevel,
    limit: usize,
}

fn resolve_params(params: &TopPicksParams) -> ResolvedParams {
    ResolvedParams {
        market: params
            .market
            .as_deref()
            .and_then(Market::parse)
            .unwrap_or(Market::Us50),
        tf: params
            .tf
            .as_deref()
            .and_then(Timeframe::parse)
            .unwrap_or(Timeframe::Monthly),
        range: params
            .range
            .as_deref()
            .and_then(RangePreset::parse)
            .unwrap_or(RangePreset::Max),
        level: params
            .level
            .as_deref()
            .and_then(ExigencyLevel::parse)
            .unwrap_or(ExigencyLevel::Alta),
        limit: params
            .limit
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT),
    }
}

fn cache_key(p: &ResolvedParams) -> String {
    format!(
        "market={}&tf={}&range={}&level={}&limit={}",
        p.market.as_str(),
        p.tf.as_str(),
        p.range.as_str(),
        p.level.as_str(),
        p.limit
    )
}

/// GET /api/top-picks — any scan failure is `ok:false` with HTTP 200.
async fn get_top_picks(
    State(state): State<AppState>,
    Query(params): Query<TopPicksParams>,
) -> Json<TopPicksResponse> {
    let resolved = resolve_params(&params);
    let key = cache_key(&resolved);
    if let Some(cached) = state.top_picks_cache.get(&key) {
        debug!(key = %key, "top-picks cache hit");
        return Json(cached);
    }

    let response = match state
        .scanner
        .top_picks(
            resolved.market,
            resolved.tf,
            resolved.range,
            resolved.level,
            resolved.limit,
        )
        .await
    {
        Ok((picks, meta)) => TopPicksResponse::ok(picks, meta),
        Err(err) => return Json(TopPicksResponse::fail(err.to_string())),
    };

    state.top_picks_cache.put(key, response.clone());
    Json(response)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/top-picks", get(get_top_picks))
}
