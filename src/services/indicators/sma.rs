//! Simple Moving Average (SMA).

/// Rolling arithmetic mean over `period` values.
///
/// The first `period - 1` positions are `None`. Computed with a sliding
/// window sum, so a full pass is O(n) regardless of period; the scanners run
/// this over hundreds of symbols with thousands of bars each.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out[i] = Some(sum / period as f64);
        }
    }
    out
}
