//! Single-symbol analysis: composite score, candle patterns, discrete
//! signals and a position-sizing risk plan.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::indicators::{atr, sma};
use crate::services::patterns::detect_candle_patterns;
use crate::services::scoring::{color_by_composite, composite_score};
use crate::services::signals::{detect_signals, SignalReport};
use crate::types::{Bar, TrafficColor};

/// Context bias applied when the analysis was reached from a Top-Picks
/// referral, kept separate from the technical components.
const TOP_PICKS_CONTEXT_BIAS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopMethod {
    Percent,
    Atr,
}

/// Analysis request knobs beyond the symbol and bar window.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    pub from_top_picks: bool,
    pub capital: f64,
    pub risk_pct: f64,
    pub stop_method: StopMethod,
    pub stop_pct: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            from_top_picks: false,
            capital: 10_000.0,
            risk_pct: 1.0,
            stop_method: StopMethod::Percent,
            stop_pct: 5.0,
        }
    }
}

/// Entry/stop plan with position sizing off the account risk budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPlan {
    pub entry: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_per_share: Option<f64>,
    pub risk_cash: f64,
    pub quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_1r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_2r: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub symbol: String,
    pub last: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub patterns: Vec<String>,
    pub pattern_bias: f64,
    pub context_bias: f64,
    /// Composite score after biases, 2-decimal rounded, in [-1, 1].
    pub tech_score: f64,
    pub color: TrafficColor,
    pub signals: SignalReport,
    pub risk_plan: RiskPlan,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn build_risk_plan(bars: &[Bar], entry: f64, opts: &AnalyzeOptions) -> RiskPlan {
    let stop = match opts.stop_method {
        StopMethod::Percent => Some(round2(entry * (1.0 - opts.stop_pct / 100.0))),
        StopMethod::Atr => atr(bars, 14)
            .last()
            .copied()
            .flatten()
            .map(|a| round2(entry - 2.0 * a)),
    };
    let risk_per_share = stop.map(|s| round2(entry - s));
    let risk_cash = round2(opts.capital * (opts.risk_pct / 100.0));
    let quantity = match risk_per_share {
        Some(rps) if rps > 0.0 => (risk_cash / rps).floor() as u64,
        _ => 0,
    };
    let target = |r: f64| stop.map(|s| round2(entry + r * (entry - s)));

    RiskPlan {
        entry,
        stop,
        risk_per_share,
        risk_cash,
        quantity,
        target_1r: target(1.0),
        target_2r: target(2.0),
    }
}

/// Run the full single-symbol analysis over an already fetched bar window.
pub fn analyze_bars(symbol: &str, bars: &[Bar], opts: &AnalyzeOptions) -> Result<Analysis> {
    if bars.is_empty() {
        return Err(AppError::NotFound(format!("no data for {symbol}")));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let i = closes.len() - 1;
    let last = closes[i];

    let pattern = detect_candle_patterns(bars, 5);
    let context_bias = if opts.from_top_picks {
        TOP_PICKS_CONTEXT_BIAS
    } else {
        0.0
    };
    let score = composite_score(bars, pattern.bias, context_bias);
    let color = color_by_composite(score);
    let signals = detect_signals(bars);
    let risk_plan = build_risk_plan(bars, last, opts);

    Ok(Analysis {
        symbol: symbol.to_string(),
        last,
        sma20: sma(&closes, 20)[i],
        sma50: sma(&closes, 50)[i],
        sma200: sma(&closes, 200)[i],
        patterns: pattern.patterns,
        pattern_bias: pattern.bias,
        context_bias,
        tech_score: round2(score),
        color,
        signals,
        risk_plan,
    })
}
