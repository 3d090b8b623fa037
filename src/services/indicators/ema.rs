//! Exponential Moving Average (EMA).

/// Exponentially weighted mean with smoothing `k = 2 / (period + 1)`.
///
/// The seed at position `period - 1` is the plain mean of the first `period`
/// values; every later position is `value * k + prev * (1 - k)`. Positions
/// before the seed are `None`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut prev: Option<f64> = None;
    for i in 0..values.len() {
        if i + 1 < period {
            continue;
        }
        let next = match prev {
            None => values[i + 1 - period..=i].iter().sum::<f64>() / period as f64,
            Some(p) => values[i] * k + p * (1.0 - k),
        };
        out[i] = Some(next);
        prev = Some(next);
    }
    out
}
