//! Raw bar passthrough with interval fallbacks for thin upstream coverage.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::{Bar, ChartInterval, RangePreset};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricesParams {
    symbol: Option<String>,
    tf: Option<String>,
    range_days: Option<String>,
    range: Option<String>,
}

/// One attempt in the fallback ladder.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct FetchStep {
    tf: &'static str,
    days: u32,
    why: &'static str,
}

/// Yahoo trims intraday history hard; cap those windows at 30 days.
fn cap_intraday_days(interval: ChartInterval, days: u32) -> u32 {
    if interval.is_intraday() {
        days.min(30)
    } else {
        days
    }
}

/// Retry ladder: intraday drops to 60m/10d then daily; weekly/monthly drop
/// to daily; daily retries as weekly.
fn fallback_plan(interval: ChartInterval, days: u32) -> Vec<(ChartInterval, FetchStep)> {
    if interval.is_intraday() {
        return vec![
            (
                interval,
                FetchStep {
                    tf: interval.as_str(),
                    days: cap_intraday_days(interval, days),
                    why: "intraday requested",
                },
            ),
            (
                ChartInterval::SixtyMin,
                FetchStep {
                    tf: "60m",
                    days: days.min(10),
                    why: "fallback to 60m/10d",
                },
            ),
            (
                ChartInterval::Daily,
                FetchStep {
                    tf: "1d",
                    days: days.max(93),
                    why: "fallback to 1d",
                },
            ),
        ];
    }
    match interval {
        ChartInterval::Weekly | ChartInterval::Monthly => vec![
            (
                interval,
                FetchStep {
                    tf: interval.as_str(),
                    days,
                    why: "weekly/monthly requested",
                },
            ),
            (
                ChartInterval::Daily,
                FetchStep {
                    tf: "1d",
                    days: days.max(365),
                    why: "fallback to 1d",
                },
            ),
        ],
        _ => vec![
            (
                ChartInterval::Daily,
                FetchStep {
                    tf: "1d",
                    days,
                    why: "daily requested",
                },
            ),
            (
                ChartInterval::Weekly,
                FetchStep {
                    tf: "1w",
                    days: days.max(365),
                    why: "fallback to 1w",
                },
            ),
        ],
    }
}

fn resolve_days(params: &PricesParams) -> u32 {
    if let Some(days) = params.range_days.as_deref().and_then(|d| d.parse().ok()) {
        return days;
    }
    params
        .range
        .as_deref()
        .and_then(RangePreset::parse)
        .map(|r| r.days())
        .unwrap_or(186)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricesResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    used: Option<FetchStep>,
    data: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn compute(state: &AppState, params: &PricesParams) -> Result<PricesResponse> {
    let symbol = params.symbol.as_deref().unwrap_or("").trim().to_string();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("symbol required".to_string()));
    }
    let interval = params
        .tf
        .as_deref()
        .and_then(ChartInterval::parse)
        .unwrap_or(ChartInterval::Daily);
    let days = resolve_days(params);

    let mut last_err: Option<AppError> = None;
    for (step_interval, step) in fallback_plan(interval, days) {
        match state.source.fetch_window(&symbol, step_interval, step.days).await {
            Ok(bars) if !bars.is_empty() => {
                return Ok(PricesResponse {
                    ok: true,
                    used: Some(step),
                    data: bars,
                    error: None,
                });
            }
            Ok(_) => {
                debug!(symbol = %symbol, tf = step.tf, "empty bar set, trying next step");
            }
            Err(err) => {
                debug!(symbol = %symbol, tf = step.tf, error = %err, "fetch step failed");
                last_err = Some(err);
            }
        }
    }

    let message = last_err
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no data available for that symbol/interval".to_string());
    Ok(PricesResponse {
        ok: false,
        used: None,
        data: Vec::new(),
        error: Some(message),
    })
}

/// GET /api/prices — a missing symbol is a 400; an exhausted fallback ladder
/// is `ok:false` with HTTP 200.
async fn get_prices(
    State(state): State<AppState>,
    Query(params): Query<PricesParams>,
) -> Result<Json<PricesResponse>> {
    compute(&state, &params).await.map(Json)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/prices", get(get_prices))
}
