//! Minimal discrete signal detector: trend, momentum, volume and structure
//! families, each contributing to a weighted headline score.

use serde::{Deserialize, Serialize};

use crate::services::indicators::{
    crossed_above, crossed_below, last_swing_low, macd, rolling_max, rolling_min, sma, supports,
};
use crate::services::patterns::{is_bearish_engulfing, is_bullish_engulfing};
use crate::types::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    BullishBreakout,
    BearishBreakdown,
    GoldenCross,
    DeathCross,
    HealthyPullback,
    VolumeSpike,
    MacdBullCross,
    MacdBearCross,
    SupportTouch,
    ResistanceTouch,
    ResistanceBreak,
    SupportBreak,
    BullishEngulfing,
    BearishEngulfing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bull,
    Bear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechSignal {
    pub kind: SignalKind,
    pub strength: Strength,
    pub note: String,
    pub bias: Bias,
}

/// Detector output: the individual signals plus the weighted family score
/// and the support/resistance pair the structure checks ran against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub signals: Vec<TechSignal>,
    pub score: f64,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

/// Support for the structure checks: nearest merged pivot-low level, falling
/// back to the trailing swing low when no pivot qualifies.
fn structure_support(bars: &[Bar]) -> Option<f64> {
    supports(bars, 120, 2, 5, 0.5)
        .first()
        .copied()
        .or_else(|| last_swing_low(bars, 20))
}

/// Resistance: maximum high over the 20 bars preceding the last one, so a
/// close can actually break it.
fn structure_resistance(bars: &[Bar]) -> Option<f64> {
    if bars.len() < 2 {
        return None;
    }
    let end = bars.len() - 1;
    let from = end.saturating_sub(20);
    let max = bars[from..end]
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    max.is_finite().then_some(max)
}

pub fn detect_signals(bars: &[Bar]) -> SignalReport {
    if bars.is_empty() {
        return SignalReport::default();
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let sma20 = sma(&closes, 20);
    let sma50 = sma(&closes, 50);
    let sma200 = sma(&closes, 200);
    let m = macd(&closes, 12, 26, 9);
    let hi20 = rolling_max(&highs, 20);
    let lo20 = rolling_min(&lows, 20);
    let vol_avg20 = sma(&volumes, 20);

    let support = structure_support(bars);
    let resistance = structure_resistance(bars);

    let idx = closes.len() - 1;
    let c = closes[idx];

    let mut signals = Vec::new();
    let mut f_trend = 0.0;
    let mut f_momentum = 0.0;
    let mut f_volume = 0.0;
    let mut f_struct = 0.0;

    // Donchian-20 breakout / breakdown against the window ending one bar
    // back, so the current close can clear it.
    if idx > 0 {
        if matches!(hi20[idx - 1], Some(h) if c > h) {
            signals.push(TechSignal {
                kind: SignalKind::BullishBreakout,
                strength: Strength::Strong,
                note: "New 20-bar high".to_string(),
                bias: Bias::Bull,
            });
            f_trend += 2.0;
        } else if matches!(lo20[idx - 1], Some(l) if c < l) {
            signals.push(TechSignal {
                kind: SignalKind::BearishBreakdown,
                strength: Strength::Strong,
                note: "New 20-bar low".to_string(),
                bias: Bias::Bear,
            });
            f_trend -= 2.0;
        }
    }

    // SMA 50/200 crosses.
    if crossed_above(&sma50, &sma200, idx) {
        signals.push(TechSignal {
            kind: SignalKind::GoldenCross,
            strength: Strength::Moderate,
            note: "SMA50 crossing above SMA200".to_string(),
            bias: Bias::Bull,
        });
        f_trend += 2.0;
    } else if crossed_below(&sma50, &sma200, idx) {
        signals.push(TechSignal {
            kind: SignalKind::DeathCross,
            strength: Strength::Moderate,
            note: "SMA50 crossing below SMA200".to_string(),
            bias: Bias::Bear,
        });
        f_trend -= 2.0;
    }

    // Shallow pullback to SMA20/50 while the uptrend stays intact.
    if let (Some(s50), Some(s200)) = (sma50[idx], sma200[idx]) {
        if c > s200 && s50 > s200 {
            let near20 = matches!(sma20[idx], Some(s) if (c - s).abs() / s <= 0.01);
            let near50 = (c - s50).abs() / s50 <= 0.01;
            if near20 || near50 {
                signals.push(TechSignal {
                    kind: SignalKind::HealthyPullback,
                    strength: Strength::Light,
                    note: "Pullback to SMA20/50 in an uptrend".to_string(),
                    bias: Bias::Bull,
                });
                f_struct += 1.0;
            }
        }
    }

    // MACD signal crosses.
    if crossed_above(&m.macd_line, &m.signal_line, idx) {
        signals.push(TechSignal {
            kind: SignalKind::MacdBullCross,
            strength: Strength::Moderate,
            note: "MACD crossing above its signal".to_string(),
            bias: Bias::Bull,
        });
        f_momentum += 1.0;
    } else if crossed_below(&m.macd_line, &m.signal_line, idx) {
        signals.push(TechSignal {
            kind: SignalKind::MacdBearCross,
            strength: Strength::Moderate,
            note: "MACD crossing below its signal".to_string(),
            bias: Bias::Bear,
        });
        f_momentum -= 1.0;
    }

    // Volume spike, signed by the close-over-close direction.
    if idx > 0 {
        if let Some(avg) = vol_avg20[idx] {
            if volumes[idx] > 1.5 * avg {
                let up = closes[idx] >= closes[idx - 1];
                signals.push(TechSignal {
                    kind: SignalKind::VolumeSpike,
                    strength: Strength::Moderate,
                    note: "Volume above 1.5x its 20-bar average".to_string(),
                    bias: if up { Bias::Bull } else { Bias::Bear },
                });
                f_volume += if up { 1.0 } else { -1.0 };
            }
        }
    }

    // Support / resistance touches and breaks, 0.5% tolerance.
    let tol = 0.005;
    if let Some(s) = support {
        if (c - s).abs() / s <= tol {
            signals.push(TechSignal {
                kind: SignalKind::SupportTouch,
                strength: Strength::Light,
                note: format!("Near support ~{s:.2}"),
                bias: Bias::Bull,
            });
            f_struct += 1.0;
        }
        if c < s * (1.0 - tol) {
            signals.push(TechSignal {
                kind: SignalKind::SupportBreak,
                strength: Strength::Strong,
                note: format!("Break below support ~{s:.2}"),
                bias: Bias::Bear,
            });
            f_trend -= 2.0;
            f_struct -= 1.0;
        }
    }
    if let Some(r) = resistance {
        if (c - r).abs() / r <= tol {
            signals.push(TechSignal {
                kind: SignalKind::ResistanceTouch,
                strength: Strength::Light,
                note: format!("Near resistance ~{r:.2}"),
                bias: Bias::Bear,
            });
            f_struct -= 1.0;
        }
        if c > r * (1.0 + tol) {
            signals.push(TechSignal {
                kind: SignalKind::ResistanceBreak,
                strength: Strength::Strong,
                note: format!("Break above resistance ~{r:.2}"),
                bias: Bias::Bull,
            });
            f_trend += 2.0;
            f_struct += 1.0;
        }
    }

    // Engulfing trigger on the last candle pair.
    if bars.len() >= 2 {
        let prev = &bars[idx - 1];
        let curr = &bars[idx];
        if is_bullish_engulfing(prev, curr) {
            signals.push(TechSignal {
                kind: SignalKind::BullishEngulfing,
                strength: Strength::Moderate,
                note: "Bullish engulfing".to_string(),
                bias: Bias::Bull,
            });
            f_struct += 1.0;
        } else if is_bearish_engulfing(prev, curr) {
            signals.push(TechSignal {
                kind: SignalKind::BearishEngulfing,
                strength: Strength::Moderate,
                note: "Bearish engulfing".to_string(),
                bias: Bias::Bear,
            });
            f_struct -= 1.0;
        }
    }

    let score = 0.45 * f_trend + 0.30 * f_momentum + 0.15 * f_volume + 0.10 * f_struct;

    SignalReport {
        signals,
        score,
        support,
        resistance,
    }
}
