//! Average True Range (ATR).

use crate::services::indicators::sma;
use crate::types::Bar;

/// True range of bar `i`: the largest of high-low, |high-prevClose| and
/// |low-prevClose|. The first bar has no previous close and uses high-low.
fn true_range(bars: &[Bar], i: usize) -> f64 {
    if i == 0 {
        return bars[0].high - bars[0].low;
    }
    let h = bars[i].high;
    let l = bars[i].low;
    let pc = bars[i - 1].close;
    (h - l).max((h - pc).abs()).max((l - pc).abs())
}

/// ATR as the simple moving average of the true-range series.
pub fn atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    if bars.is_empty() {
        return Vec::new();
    }
    let trs: Vec<f64> = (0..bars.len()).map(|i| true_range(bars, i)).collect();
    sma(&trs, period)
}
