//! ATH scan endpoint with response caching.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::services::ath::AthParams;
use crate::types::{AthPicksResponse, Market, RangePreset, Timeframe};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthPicksParams {
    market: Option<String>,
    tf: Option<String>,
    range: Option<String>,
    strict: Option<String>,
    tol_pct: Option<String>,
    recent_days: Option<String>,
    lookback: Option<String>,
}

struct ResolvedParams {
    market: Market,
    tf: Timeframe,
    range: RangePreset,
    ath: AthParams,
}

fn resolve_params(params: &AthPicksParams) -> ResolvedParams {
    let defaults = AthParams::default();
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
            .unwrap_or(Timeframe::Daily),
        range: params
            .range
            .as_deref()
            .and_then(RangePreset::parse)
            .unwrap_or(RangePreset::Max),
        ath: AthParams {
            // Anything other than an explicit "false" keeps strict mode on.
            strict: params.strict.as_deref() != Some("false"),
            tol_pct: params
                .tol_pct
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tol_pct),
            recent_days: params
                .recent_days
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.recent_days),
            support_lookback: params
                .lookback
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.support_lookback),
        },
    }
}

fn cache_key(p: &ResolvedParams) -> String {
    format!(
        "market={}&tf={}&range={}&strict={}&tolPct={}&recentDays={}&lookback={}",
        p.market.as_str(),
        p.tf.as_str(),
        p.range.as_str(),
        p.ath.strict,
        p.ath.tol_pct,
        p.ath.recent_days,
        p.ath.support_lookback
    )
}

/// GET /api/ath-picks — any scan failure is `ok:false` with HTTP 200.
async fn get_ath_picks(
    State(state): State<AppState>,
    Query(params): Query<AthPicksParams>,
) -> Json<AthPicksResponse> {
    let resolved = resolve_params(&params);
    let key = cache_key(&resolved);
    if let Some(cached) = state.ath_picks_cache.get(&key) {
        debug!(key = %key, "ath-picks cache hit");
        return Json(cached);
    }

    let response = match state
        .scanner
        .ath_picks(resolved.market, resolved.tf, resolved.range, resolved.ath)
        .await
    {
        Ok((picks, meta)) => AthPicksResponse::ok(picks, meta),
        Err(err) => return Json(AthPicksResponse::fail(err.to_string())),
    };

    state.ath_picks_cache.put(key, response.clone());
    Json(response)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ath-picks", get(get_ath_picks))
}
