//! All-time-high classification with a recent-support hold check.

use crate::types::{AthPick, Bar};

/// Filters for the ATH classifier.
#[derive(Debug, Clone, Copy)]
pub struct AthParams {
    /// `true`: the last close must be the historical maximum itself.
    /// `false`: the last close may trail the maximum by up to `tol_pct`.
    pub strict: bool,
    pub tol_pct: f64,
    /// Maximum age of the maximum-close bar, in bars; `<= 0` disables the gate.
    pub recent_days: i64,
    /// Window for the support estimate, floored at 10 bars.
    pub support_lookback: usize,
}

impl Default for AthParams {
    fn default() -> Self {
        Self {
            strict: true,
            tol_pct: 0.5,
            recent_days: 30,
            support_lookback: 60,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Earliest index holding the maximum close. Strict `>` keeps the first
/// occurrence on ties.
fn max_close_index(bars: &[Bar]) -> (usize, f64) {
    let mut idx = 0;
    let mut max = f64::NEG_INFINITY;
    for (i, bar) in bars.iter().enumerate() {
        if bar.close > max {
            max = bar.close;
            idx = i;
        }
    }
    (idx, max)
}

fn min_low_in_window(bars: &[Bar], lookback: usize) -> f64 {
    let n = lookback.clamp(1, bars.len());
    bars[bars.len() - n..]
        .iter()
        .map(|b| b.low)
        .fold(f64::INFINITY, f64::min)
}

/// Classify one symbol's history against the ATH filters. `None` means the
/// symbol does not qualify (or has under 30 bars of history).
pub fn classify_ath(symbol: &str, bars: &[Bar], params: &AthParams) -> Option<AthPick> {
    if bars.len() < 30 {
        return None;
    }
    let last = bars.last()?;
    let (ath_idx, ath) = max_close_index(bars);
    if !ath.is_finite() {
        return None;
    }

    let dd_pct = (ath - last.close) / ath * 100.0;
    let is_recent = params.recent_days <= 0
        || (bars.len() - 1 - ath_idx) as i64 <= params.recent_days;
    if !is_recent {
        return None;
    }

    let support_raw = min_low_in_window(bars, params.support_lookback.max(10));
    let support = support_raw.is_finite().then(|| round2(support_raw));

    let cond_ath = if params.strict {
        last.close >= ath && ath_idx == bars.len() - 1
    } else {
        dd_pct <= params.tol_pct
    };
    // Unknown support is informational only, never disqualifying.
    let holds_support = support.map_or(true, |s| last.close > s);

    if !(cond_ath && holds_support) {
        return None;
    }

    let support_clause = if support.is_some() {
        " and above recent support"
    } else {
        ""
    };
    let rationale = if params.strict {
        format!("Confirmed ATH{support_clause}.")
    } else {
        format!("Within {}% of ATH{}.", params.tol_pct, support_clause)
    };

    Some(AthPick {
        symbol: symbol.to_string(),
        last_close: round2(last.close),
        max_close: round2(ath),
        dd_pct: round2(dd_pct),
        last_swing_low: support,
        rationale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64, low: f64) -> Bar {
        Bar {
            time: 0,
            open: close,
            high: close + 1.0,
            low,
            close,
            volume: 0.0,
        }
    }

    fn rising_history(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| bar(100.0 + i as f64, 95.0 + i as f64))
            .collect()
    }

    #[test]
    fn fresh_ath_above_support_is_accepted() {
        // Last bar carries the highest close of the whole series and recent
        // lows sit above the window minimum.
        let bars = rising_history(40);
        let pick = classify_ath("AAPL", &bars, &AthParams::default()).unwrap();
        assert_eq!(pick.symbol, "AAPL");
        assert_eq!(pick.dd_pct, 0.0);
        assert!(pick.rationale.contains("Confirmed ATH"));
        assert!(pick.rationale.contains("above recent support"));
        assert!(pick.last_swing_low.is_some());
    }

    #[test]
    fn strict_mode_rejects_earlier_equal_maximum() {
        // The maximum close first appears at index 10; the equal last close
        // is not a new high under the earliest-index tie-break.
        let mut bars = rising_history(40);
        bars[10].close = 500.0;
        let last = bars.len() - 1;
        bars[last].close = 500.0;
        assert!(classify_ath("X", &bars, &AthParams::default()).is_none());
    }

    #[test]
    fn tolerant_mode_accepts_within_tolerance() {
        let mut bars = rising_history(40);
        bars[38].close = 1_000.0;
        let last = bars.len() - 1;
        bars[last].close = 999.0; // 0.1% below the maximum
        let params = AthParams {
            strict: false,
            tol_pct: 0.5,
            ..AthParams::default()
        };
        let pick = classify_ath("X", &bars, &params).unwrap();
        assert!(pick.rationale.contains("Within 0.5% of ATH"));
        assert!(pick.dd_pct > 0.0 && pick.dd_pct <= 0.5);
    }

    #[test]
    fn zero_tolerance_accepts_exact_maximum() {
        // With the last close exactly at the maximum, dd_pct is 0 and a zero
        // tolerance still admits the symbol.
        let bars = rising_history(40);
        let params = AthParams {
            strict: false,
            tol_pct: 0.0,
            ..AthParams::default()
        };
        let pick = classify_ath("X", &bars, &params).unwrap();
        assert_eq!(pick.dd_pct, 0.0);
        assert!(pick.rationale.contains("Within 0% of ATH"));
    }

    #[test]
    fn tolerant_mode_rejects_outside_tolerance() {
        let mut bars = rising_history(40);
        bars[38].close = 1_000.0;
        let last = bars.len() - 1;
        bars[last].close = 900.0;
        let params = AthParams {
            strict: false,
            tol_pct: 0.5,
            ..AthParams::default()
        };
        assert!(classify_ath("X", &bars, &params).is_none());
    }

    #[test]
    fn stale_maximum_fails_the_recent_gate() {
        let mut bars: Vec<Bar> = (0..40).map(|i| bar(100.0 - i as f64 * 0.1, 90.0)).collect();
        bars[0].close = 200.0;
        let params = AthParams {
            strict: false,
            tol_pct: 100.0,
            recent_days: 5,
            ..AthParams::default()
        };
        assert!(classify_ath("X", &bars, &params).is_none());
        // Gate disabled: the same series passes the tolerant condition.
        let open_gate = AthParams {
            recent_days: 0,
            ..params
        };
        assert!(classify_ath("X", &bars, &open_gate).is_some());
    }

    #[test]
    fn close_sitting_on_support_is_rejected() {
        // Last close equals the window-minimum low, so it does not hold
        // strictly above support.
        let mut bars = rising_history(40);
        let last = bars.len() - 1;
        bars[last].close = 1_000.0;
        bars[last].low = 50.0;
        let mut params = AthParams::default();
        params.support_lookback = 10;
        // support = 50.0 < close: accepted
        assert!(classify_ath("X", &bars, &params).is_some());
        bars[last].close = 50.0;
        // Not the ATH anymore either, so relax to tolerant with huge tol but
        // fresh max at the last bar.
        for b in bars.iter_mut() {
            b.close = b.close.min(49.0);
        }
        bars[last].close = 50.0;
        bars[last].low = 50.0;
        let support_break = classify_ath("X", &bars, &params);
        assert!(support_break.is_none());
    }

    #[test]
    fn short_history_is_skipped() {
        let bars = rising_history(29);
        assert!(classify_ath("X", &bars, &AthParams::default()).is_none());
    }
}
