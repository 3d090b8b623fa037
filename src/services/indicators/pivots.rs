//! Pivot-based support estimation and swing lows.

use crate::types::Bar;

/// Support levels from pivot lows.
///
/// A bar is a pivot low when its low is strictly below every low within
/// `strength` bars to the left and less-or-equal to every low within
/// `strength` bars to the right; the asymmetric tie-break attributes a flat
/// bottom to its earliest bar. Pivot levels within `tolerance_pct` of each
/// other are merged by averaging, and the merged levels closest to the last
/// close are returned, at most `max_levels` of them.
pub fn supports(
    bars: &[Bar],
    lookback: usize,
    strength: usize,
    max_levels: usize,
    tolerance_pct: f64,
) -> Vec<f64> {
    if bars.is_empty() || strength == 0 {
        return Vec::new();
    }
    let n = bars.len();
    let from = n.saturating_sub(lookback);

    let mut pivots = Vec::new();
    for i in (from + strength)..n.saturating_sub(strength) {
        let low = bars[i].low;
        let is_pivot = (1..=strength)
            .all(|k| low < bars[i - k].low && low <= bars[i + k].low);
        if is_pivot {
            pivots.push(low);
        }
    }
    if pivots.is_empty() {
        return Vec::new();
    }

    pivots.sort_by(|a, b| a.total_cmp(b));
    let mut merged = Vec::new();
    let mut bucket = vec![pivots[0]];
    for &level in &pivots[1..] {
        let prev = bucket[bucket.len() - 1];
        let tol = prev * tolerance_pct / 100.0;
        if (level - prev).abs() <= tol {
            bucket.push(level);
        } else {
            merged.push(bucket.iter().sum::<f64>() / bucket.len() as f64);
            bucket = vec![level];
        }
    }
    merged.push(bucket.iter().sum::<f64>() / bucket.len() as f64);

    let last_close = bars[n - 1].close;
    merged.sort_by(|a, b| {
        (a - last_close)
            .abs()
            .total_cmp(&(b - last_close).abs())
    });
    merged.truncate(max_levels);
    merged
}

/// Approximate last swing low: the minimum low over the trailing `lookback`
/// bars (all bars when fewer).
pub fn last_swing_low(bars: &[Bar], lookback: usize) -> Option<f64> {
    if bars.is_empty() {
        return None;
    }
    let from = bars.len().saturating_sub(lookback.max(1));
    let min = bars[from..]
        .iter()
        .map(|b| b.low)
        .fold(f64::INFINITY, f64::min);
    min.is_finite().then_some(min)
}
