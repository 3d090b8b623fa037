//! Rolling window extrema and crossover detection.

/// Maximum over a trailing `lookback` window; `None` before the window fills.
pub fn rolling_max(values: &[f64], lookback: usize) -> Vec<Option<f64>> {
    rolling_extreme(values, lookback, f64::max, f64::NEG_INFINITY)
}

/// Minimum over a trailing `lookback` window; `None` before the window fills.
pub fn rolling_min(values: &[f64], lookback: usize) -> Vec<Option<f64>> {
    rolling_extreme(values, lookback, f64::min, f64::INFINITY)
}

fn rolling_extreme(
    values: &[f64],
    lookback: usize,
    pick: fn(f64, f64) -> f64,
    identity: f64,
) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if lookback == 0 {
        return out;
    }
    for i in 0..values.len() {
        if i + 1 >= lookback {
            let window = &values[i + 1 - lookback..=i];
            out[i] = Some(window.iter().copied().fold(identity, pick));
        }
    }
    out
}

/// True iff `a` crossed above `b` exactly at index `i`: the difference was
/// `<= 0` at `i-1` and `> 0` at `i`. Never fires when any of the four values
/// is unavailable.
pub fn crossed_above(a: &[Option<f64>], b: &[Option<f64>], i: usize) -> bool {
    if i == 0 || i >= a.len() || i >= b.len() {
        return false;
    }
    match (a[i - 1], b[i - 1], a[i], b[i]) {
        (Some(pa), Some(pb), Some(ca), Some(cb)) => pa - pb <= 0.0 && ca - cb > 0.0,
        _ => false,
    }
}

/// Mirror of [`crossed_above`] for downside crosses.
pub fn crossed_below(a: &[Option<f64>], b: &[Option<f64>], i: usize) -> bool {
    if i == 0 || i >= a.len() || i >= b.len() {
        return false;
    }
    match (a[i - 1], b[i - 1], a[i], b[i]) {
        (Some(pa), Some(pb), Some(ca), Some(cb)) => pa - pb >= 0.0 && ca - cb < 0.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_max_respects_warm_up() {
        let out = rolling_max(&[1.0, 3.0, 2.0, 5.0], 3);
        assert_eq!(out, vec![None, None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn rolling_min_tracks_window() {
        let out = rolling_min(&[4.0, 3.0, 5.0, 1.0], 2);
        assert_eq!(out, vec![None, Some(3.0), Some(3.0), Some(1.0)]);
    }

    #[test]
    fn cross_fires_on_sign_flip_only() {
        let a = vec![Some(1.0), Some(3.0)];
        let b = vec![Some(2.0), Some(2.0)];
        assert!(crossed_above(&a, &b, 1));
        assert!(!crossed_below(&a, &b, 1));
        // Already above at i-1: no new cross.
        let a2 = vec![Some(3.0), Some(4.0)];
        assert!(!crossed_above(&a2, &b, 1));
    }

    #[test]
    fn touch_then_rise_counts_as_cross() {
        // Equality at i-1 satisfies the <= 0 side.
        let a = vec![Some(2.0), Some(3.0)];
        let b = vec![Some(2.0), Some(2.0)];
        assert!(crossed_above(&a, &b, 1));
    }

    #[test]
    fn no_false_positive_on_unavailable_values() {
        let a = vec![None, Some(3.0)];
        let b = vec![Some(2.0), Some(2.0)];
        assert!(!crossed_above(&a, &b, 1));
        assert!(!crossed_below(&a, &b, 1));
        assert!(!crossed_above(&a, &b, 0));
        assert!(!crossed_above(&a, &b, 5));
    }
}
