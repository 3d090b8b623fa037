//! Per-timeframe technical scores, the blended total, and the composite
//! analysis score used by single-symbol endpoints.

use crate::services::indicators::{crossed_above, macd, sma};
use crate::types::{Bar, Timeframe, TrafficColor};

/// Indicator parameters for one timeframe.
#[derive(Debug, Clone, Copy)]
pub struct TfParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sma_fast: usize,
    pub sma_slow: usize,
    /// Minimum bar count below which the score is unavailable.
    pub min_bars: usize,
}

pub fn periods_for_tf(tf: Timeframe) -> TfParams {
    match tf {
        Timeframe::Daily => TfParams {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_fast: 50,
            sma_slow: 200,
            min_bars: 200,
        },
        Timeframe::Weekly => TfParams {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_fast: 30,
            sma_slow: 120,
            min_bars: 150,
        },
        Timeframe::Monthly => TfParams {
            macd_fast: 6,
            macd_slow: 12,
            macd_signal: 5,
            sma_fast: 12,
            sma_slow: 48,
            min_bars: 60,
        },
    }
}

/// Technical score for one timeframe, `None` when history is too short.
///
/// Trend: +-1 for the fast/slow SMA relation, +0.5 when the close sits above
/// the slow SMA, +0.25 when the fast SMA is rising. Momentum: 1 only on a
/// MACD bull cross at the very last bar, otherwise 0 (never negative).
/// The result is 0.6*trend + 0.4*momentum, intentionally unclamped so a
/// strong trend can exceed 1.
pub fn tech_score_by_tf(bars: &[Bar], tf: Timeframe) -> Option<f64> {
    let p = periods_for_tf(tf);
    if bars.len() < p.min_bars {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast = sma(&closes, p.sma_fast);
    let slow = sma(&closes, p.sma_slow);
    let m = macd(&closes, p.macd_fast, p.macd_slow, p.macd_signal);

    let i = closes.len() - 1;
    let mut trend = 0.0;
    if let (Some(f), Some(s)) = (fast[i], slow[i]) {
        trend += if f > s { 1.0 } else { -1.0 };
        if closes[i] > s {
            trend += 0.5;
        }
    }
    if i > 0 {
        if let (Some(f), Some(pf)) = (fast[i], fast[i - 1]) {
            if f > pf {
                trend += 0.25;
            }
        }
    }

    let momentum = if crossed_above(&m.macd_line, &m.signal_line, i) {
        1.0
    } else {
        0.0
    };

    Some(0.6 * trend + 0.4 * momentum)
}

/// Blend of the short-horizon and long-horizon scores. Either side missing
/// makes the whole blend unavailable.
pub fn total_score(short: Option<f64>, long: Option<f64>) -> Option<f64> {
    match (short, long) {
        (Some(s), Some(l)) => Some(0.6 * s + 0.4 * l),
        _ => None,
    }
}

/// Traffic color for a blended total.
pub fn color_by_total(total: f64) -> TrafficColor {
    if total >= 0.60 {
        TrafficColor::Green
    } else if total >= 0.30 {
        TrafficColor::Amber
    } else {
        TrafficColor::Red
    }
}

/// Composite trend+bias score for the analyze endpoint, clamped to [-1, 1].
///
/// Trend terms: sma50 vs sma200 (+-1), sma20 vs sma50 (+-0.5), close vs
/// sma200 (+-0.5); a term contributes 0 when its inputs are unavailable.
/// The trend sum is clamped to [-2, 2] and halved before the pattern bias
/// and the separately supplied context bias are added.
pub fn composite_score(bars: &[Bar], pattern_bias: f64, context_bias: f64) -> f64 {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma20 = sma(&closes, 20);
    let sma50 = sma(&closes, 50);
    let sma200 = sma(&closes, 200);

    let mut trend: f64 = 0.0;
    if let Some(i) = closes.len().checked_sub(1) {
        if let (Some(f), Some(s)) = (sma50[i], sma200[i]) {
            trend += if f > s { 1.0 } else { -1.0 };
        }
        if let (Some(f), Some(s)) = (sma20[i], sma50[i]) {
            trend += if f > s { 0.5 } else { -0.5 };
        }
        if let Some(s) = sma200[i] {
            trend += if closes[i] > s { 0.5 } else { -0.5 };
        }
    }

    let score = trend.clamp(-2.0, 2.0) / 2.0 + pattern_bias + context_bias;
    score.clamp(-1.0, 1.0)
}

/// Banding for the composite score. The bands are asymmetric on purpose:
/// green needs more conviction than red.
pub fn color_by_composite(score: f64) -> TrafficColor {
    if score >= 0.35 {
        TrafficColor::Green
    } else if score <= -0.25 {
        TrafficColor::Red
    } else {
        TrafficColor::Amber
    }
}
