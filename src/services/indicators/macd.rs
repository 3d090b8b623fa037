//! MACD (Moving Average Convergence Divergence).

use crate::services::indicators::ema;

/// MACD line and signal line, both aligned with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd_line: Vec<Option<f64>>,
    pub signal_line: Vec<Option<f64>>,
}

/// MACD line = EMA(fast) - EMA(slow) wherever both are defined.
///
/// The signal line is the EMA of the *compacted* macd values, re-expanded
/// onto the original index positions. Running the signal EMA over a series
/// that zero-fills the slow EMA's warm-up gap would skew its seed, so the
/// gap positions are removed before smoothing and restored after.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let macd_line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let compact: Vec<f64> = macd_line.iter().flatten().copied().collect();
    let sig = ema(&compact, signal);

    let mut signal_line = vec![None; macd_line.len()];
    let mut j = 0;
    for (i, value) in macd_line.iter().enumerate() {
        if value.is_some() {
            signal_line[i] = sig.get(j).copied().flatten();
            j += 1;
        }
    }

    MacdSeries {
        macd_line,
        signal_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_defined_only_where_both_emas_are() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = macd(&closes, 12, 26, 9);
        for i in 0..25 {
            assert_eq!(out.macd_line[i], None, "index {i}");
        }
        assert!(out.macd_line[25].is_some());
        assert_eq!(out.macd_line.len(), closes.len());
    }

    #[test]
    fn signal_warm_up_counts_defined_positions_only() {
        let closes: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let out = macd(&closes, 12, 26, 9);
        // macd becomes defined at index 25; the 9-value signal warm-up ends
        // 8 defined positions later, at index 33.
        for i in 25..33 {
            assert_eq!(out.signal_line[i], None, "index {i}");
        }
        assert!(out.signal_line[33].is_some());
    }

    #[test]
    fn compaction_differs_from_zero_filling() {
        // A flat-then-rising series: the true compacted signal seed averages
        // only real macd values, while zero-filling the 25-bar gap would pull
        // the seed toward zero.
        let mut closes = vec![100.0; 30];
        closes.extend((1..=20).map(|i| 100.0 + i as f64));
        let out = macd(&closes, 12, 26, 9);

        let compact: Vec<f64> = out.macd_line.iter().flatten().copied().collect();
        let true_seed = compact[..9].iter().sum::<f64>() / 9.0;

        let mut zero_filled = vec![0.0; closes.len()];
        for (i, v) in out.macd_line.iter().enumerate() {
            if let Some(v) = v {
                zero_filled[i] = *v;
            }
        }
        let naive = ema(&zero_filled, 9);

        // First defined signal position under compaction.
        let first_defined = out
            .signal_line
            .iter()
            .position(Option::is_some)
            .unwrap();
        let got = out.signal_line[first_defined].unwrap();
        assert!((got - true_seed).abs() < 1e-9);
        assert!((got - naive[first_defined].unwrap()).abs() > 1e-9);
    }

    #[test]
    fn short_input_yields_empty_lines() {
        let out = macd(&[1.0, 2.0, 3.0], 12, 26, 9);
        assert!(out.macd_line.iter().all(Option::is_none));
        assert!(out.signal_line.iter().all(Option::is_none));
    }
}
