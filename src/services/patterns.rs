//! Candle pattern detection over the tail of a bar sequence.

use crate::types::Bar;

/// Result of scanning the last few candles: deduplicated pattern names plus
/// the accumulated signed bias. Bias is added once per detected event, so a
/// pattern firing on two different candle pairs contributes twice even though
/// its name appears once.
#[derive(Debug, Clone, Default)]
pub struct PatternScan {
    pub patterns: Vec<String>,
    pub bias: f64,
}

fn is_bullish(c: &Bar) -> bool {
    c.close > c.open
}

fn is_bearish(c: &Bar) -> bool {
    c.close < c.open
}

fn body(c: &Bar) -> f64 {
    (c.close - c.open).abs()
}

fn upper_wick(c: &Bar) -> f64 {
    c.high - c.open.max(c.close)
}

fn lower_wick(c: &Bar) -> f64 {
    c.open.min(c.close) - c.low
}

fn full_range(c: &Bar) -> f64 {
    c.high - c.low
}

fn is_doji(c: &Bar) -> bool {
    let r = full_range(c);
    r > 0.0 && body(c) / r <= 0.10
}

fn is_hammer(c: &Bar) -> bool {
    full_range(c) > 0.0
        && is_bullish(c)
        && lower_wick(c) >= 2.0 * body(c)
        && upper_wick(c) <= body(c)
}

fn is_shooting_star(c: &Bar) -> bool {
    full_range(c) > 0.0
        && is_bearish(c)
        && upper_wick(c) >= 2.0 * body(c)
        && lower_wick(c) <= body(c)
}

fn body_bounds(c: &Bar) -> (f64, f64) {
    (c.open.min(c.close), c.open.max(c.close))
}

/// Bullish engulfing: bearish candle followed by a bullish candle whose body
/// fully contains the previous body.
pub(crate) fn is_bullish_engulfing(prev: &Bar, curr: &Bar) -> bool {
    if !is_bearish(prev) || !is_bullish(curr) {
        return false;
    }
    let (pmin, pmax) = body_bounds(prev);
    let (cmin, cmax) = body_bounds(curr);
    cmin <= pmin && cmax >= pmax
}

/// Mirror of [`is_bullish_engulfing`].
pub(crate) fn is_bearish_engulfing(prev: &Bar, curr: &Bar) -> bool {
    if !is_bullish(prev) || !is_bearish(curr) {
        return false;
    }
    let (pmin, pmax) = body_bounds(prev);
    let (cmin, cmax) = body_bounds(curr);
    cmin <= pmin && cmax >= pmax
}

/// Scan the last `min(last_n, len)` candles for reversal patterns.
///
/// Needs at least two candles in the window; single-candle patterns are
/// evaluated on the current candle of each consecutive pair.
pub fn detect_candle_patterns(bars: &[Bar], last_n: usize) -> PatternScan {
    let n = last_n.min(bars.len());
    if n < 2 {
        return PatternScan::default();
    }
    let window = &bars[bars.len() - n..];

    let mut names: Vec<&'static str> = Vec::new();
    let mut bias = 0.0;
    let mut record = |names: &mut Vec<&'static str>, name: &'static str| {
        if !names.contains(&name) {
            names.push(name);
        }
    };

    for i in 1..window.len() {
        let prev = &window[i - 1];
        let curr = &window[i];
        if is_bullish_engulfing(prev, curr) {
            record(&mut names, "Bullish engulfing");
            bias += 0.1;
        }
        if is_bearish_engulfing(prev, curr) {
            record(&mut names, "Bearish engulfing");
            bias -= 0.1;
        }
        if is_hammer(curr) {
            record(&mut names, "Hammer (possible bullish reversal)");
            bias += 0.1;
        }
        if is_shooting_star(curr) {
            record(&mut names, "Shooting star (possible bearish reversal)");
            bias -= 0.1;
        }
        if is_doji(curr) {
            record(&mut names, "Doji (indecision)");
        }
    }

    PatternScan {
        patterns: names.into_iter().map(String::from).collect(),
        bias,
    }
}
