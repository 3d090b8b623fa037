//! Blended short + long traffic-light score for one symbol.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::scoring::{color_by_total, tech_score_by_tf, total_score};
use crate::types::{RangePreset, Timeframe, TrafficColor};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ScoreParams {
    symbol: Option<String>,
    tf: Option<String>,
    range: Option<String>,
}

/// Unrecognized values fall back to the defaults instead of failing.
fn resolve_params(params: &ScoreParams) -> (String, Timeframe, RangePreset) {
    let symbol = params
        .symbol
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_uppercase();
    let tf = params
        .tf
        .as_deref()
        .and_then(Timeframe::parse)
        .unwrap_or(Timeframe::Daily);
    let range = params
        .range
        .as_deref()
        .and_then(RangePreset::parse)
        .unwrap_or(RangePreset::OneYear);
    (symbol, tf, range)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tf: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    long_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<TrafficColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ScoreResponse {
    fn fail(error: String) -> Self {
        Self {
            ok: false,
            symbol: None,
            last: None,
            tf: None,
            range: None,
            score: None,
            long_score: None,
            total: None,
            color: None,
            error: Some(error),
        }
    }
}

fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}

async fn compute(state: &AppState, params: &ScoreParams) -> Result<ScoreResponse> {
    let (symbol, tf, range) = resolve_params(params);
    if symbol.is_empty() {
        return Ok(ScoreResponse::fail("symbol required".to_string()));
    }

    let short_bars = state.source.fetch(&symbol, tf, range).await?;
    let short = tech_score_by_tf(&short_bars, tf);
    let long_bars = state
        .source
        .fetch(&symbol, Timeframe::Monthly, RangePreset::Max)
        .await?;
    let long = tech_score_by_tf(&long_bars, Timeframe::Monthly);

    let Some(total) = total_score(short, long) else {
        return Ok(ScoreResponse::fail("insufficient data".to_string()));
    };

    Ok(ScoreResponse {
        ok: true,
        symbol: Some(symbol),
        last: short_bars.last().map(|b| b.close),
        tf: Some(tf.as_str()),
        range: Some(range.as_str()),
        score: short.map(round3),
        long_score: long.map(round3),
        total: Some(round3(total)),
        color: Some(color_by_total(total)),
        error: None,
    })
}

/// GET /api/score — failures come back as `ok:false` with HTTP 200.
async fn get_score(
    State(state): State<AppState>,
    Query(params): Query<ScoreParams>,
) -> Json<ScoreResponse> {
    match compute(&state, &params).await {
        Ok(response) => Json(response),
        Err(err) => Json(ScoreResponse::fail(err.to_string())),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/score", get(get_score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_and_malformed_params() {
        let (symbol, tf, range) = resolve_params(&ScoreParams::default());
        assert_eq!(symbol, "");
        assert_eq!(tf, Timeframe::Daily);
        assert_eq!(range, RangePreset::OneYear);

        let params = ScoreParams {
            symbol: Some(" aapl ".to_string()),
            tf: Some("4h".to_string()),
            range: Some("2Y".to_string()),
        };
        let (symbol, tf, range) = resolve_params(&params);
        assert_eq!(symbol, "AAPL");
        assert_eq!(tf, Timeframe::Daily);
        assert_eq!(range, RangePreset::OneYear);
    }

    #[test]
    fn failure_payload_omits_score_fields() {
        let json = serde_json::to_string(&ScoreResponse::fail("boom".to_string())).unwrap();
        assert!(json.contains("\"ok\":false"));
        assert!(!json.contains("longScore"));
        assert!(!json.contains("color"));
    }
}
