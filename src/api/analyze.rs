//! Single-symbol analysis endpoint: composite score, patterns, signals and
//! the position-sizing plan.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::analyze::{analyze_bars, Analysis, AnalyzeOptions, StopMethod};
use crate::types::ChartInterval;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeParams {
    symbol: Option<String>,
    tf: Option<String>,
    range_days: Option<String>,
    from_top: Option<String>,
    capital: Option<String>,
    risk_pct: Option<String>,
    stop_method: Option<String>,
    stop_pct: Option<String>,
}

fn resolve_options(params: &AnalyzeParams) -> AnalyzeOptions {
    let defaults = AnalyzeOptions::default();
    AnalyzeOptions {
        from_top_picks: params.from_top.as_deref() == Some("1"),
        capital: params
            .capital
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.capital),
        risk_pct: params
            .risk_pct
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.risk_pct),
        stop_method: match params.stop_method.as_deref() {
            Some("atr") => StopMethod::Atr,
            _ => StopMethod::Percent,
        },
        stop_pct: params
            .stop_pct
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.stop_pct),
    }
}

fn resolve_window(params: &AnalyzeParams) -> (ChartInterval, u32) {
    let interval = params
        .tf
        .as_deref()
        .and_then(ChartInterval::parse)
        .unwrap_or(ChartInterval::Daily);
    let days = params
        .range_days
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or(365);
    (interval, days)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn compute(state: &AppState, params: &AnalyzeParams) -> Result<Analysis> {
    let symbol = params
        .symbol
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_uppercase();
    if symbol.is_empty() {
        return Err(crate::error::AppError::BadRequest(
            "symbol required".to_string(),
        ));
    }
    let (interval, days) = resolve_window(params);
    let opts = resolve_options(params);
    let bars = state.source.fetch_window(&symbol, interval, days).await?;
    analyze_bars(&symbol, &bars, &opts)
}

/// GET /api/analyze — failures come back as `ok:false` with HTTP 200.
async fn get_analyze(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
) -> Json<AnalyzeResponse> {
    match compute(&state, &params).await {
        Ok(analysis) => Json(AnalyzeResponse {
            ok: true,
            analysis: Some(analysis),
            error: None,
        }),
        Err(err) => Json(AnalyzeResponse {
            ok: false,
            analysis: None,
            error: Some(err.to_string()),
        }),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analyze", get(get_analyze))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_and_parse() {
        let opts = resolve_options(&AnalyzeParams::default());
        assert!(!opts.from_top_picks);
        assert_eq!(opts.capital, 10_000.0);
        assert_eq!(opts.risk_pct, 1.0);
        assert_eq!(opts.stop_method, StopMethod::Percent);
        assert_eq!(opts.stop_pct, 5.0);

        let params = AnalyzeParams {
            from_top: Some("1".to_string()),
            capital: Some("50000".to_string()),
            risk_pct: Some("2".to_string()),
            stop_method: Some("atr".to_string()),
            stop_pct: Some("junk".to_string()),
            ..Default::default()
        };
        let opts = resolve_options(&params);
        assert!(opts.from_top_picks);
        assert_eq!(opts.capital, 50_000.0);
        assert_eq!(opts.stop_method, StopMethod::Atr);
        assert_eq!(opts.stop_pct, 5.0);
    }

    #[test]
    fn window_defaults_to_one_year_daily() {
        let (interval, days) = resolve_window(&AnalyzeParams::default());
        assert_eq!(interval, ChartInterval::Daily);
        assert_eq!(days, 365);
    }
}
