//! End-to-end scanner scenarios against a scripted bar source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use stoplight::error::{AppError, Result};
use stoplight::services::ath::AthParams;
use stoplight::services::Scanner;
use stoplight::sources::BarSource;
use stoplight::types::{
    AthPicksResponse, Bar, ChartInterval, ExigencyLevel, Market, RangePreset, Timeframe,
    TopPicksResponse,
};

/// Scripted source: fixed bars per symbol, optional hard failures, empty
/// vectors for everything unscripted.
#[derive(Default)]
struct MockSource {
    bars: HashMap<String, Vec<Bar>>,
    failing: Vec<String>,
}

impl MockSource {
    fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }
}

#[async_trait]
impl BarSource for MockSource {
    async fn fetch(&self, symbol: &str, _tf: Timeframe, _range: RangePreset) -> Result<Vec<Bar>> {
        if self.failing.iter().any(|s| s == symbol) {
            return Err(AppError::Upstream(format!("scripted failure for {symbol}")));
        }
        Ok(self.bars.get(symbol).cloned().unwrap_or_default())
    }

    async fn fetch_window(
        &self,
        symbol: &str,
        _interval: ChartInterval,
        _days: u32,
    ) -> Result<Vec<Bar>> {
        self.fetch(symbol, Timeframe::Daily, RangePreset::Max).await
    }
}

fn uptrend_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let c = 100.0 + i as f64;
            Bar {
                time: i as i64 * 86_400,
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 1_000.0,
            }
        })
        .collect()
}

#[tokio::test]
async fn uptrend_symbol_scores_while_thin_history_is_excluded() {
    let source = MockSource::default()
        .with_bars("AAPL", uptrend_bars(250))
        .with_bars("MSFT", uptrend_bars(50));
    let scanner = Scanner::new(Arc::new(source));

    let (picks, meta) = scanner
        .top_picks(
            Market::Us50,
            Timeframe::Daily,
            RangePreset::Max,
            ExigencyLevel::Alta,
            5,
        )
        .await
        .unwrap();

    // MSFT has 50 bars, under the 200-bar daily minimum.
    assert_eq!(meta.scanned, 1);
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].symbol, "AAPL");
    assert!(picks[0].score > 0.0);
    assert!(picks[0].total > 0.0);
    assert_eq!(picks[0].news_adj, 0.0);
}

#[tokio::test]
async fn picks_are_sorted_descending_by_total() {
    // Three symbols with enough history; weaker trends score lower.
    let strong = uptrend_bars(250);
    let mut weak = uptrend_bars(250);
    // Push the last close under the slow SMA to drag the trend term down.
    let last = weak.len() - 1;
    weak[last].close = 1.0;
    weak[last].open = 1.0;
    weak[last].low = 0.5;

    let source = MockSource::default()
        .with_bars("AAPL", strong.clone())
        .with_bars("MSFT", weak)
        .with_bars("NVDA", strong);
    let scanner = Scanner::new(Arc::new(source));

    let (picks, _) = scanner
        .top_picks(
            Market::Us50,
            Timeframe::Daily,
            RangePreset::Max,
            ExigencyLevel::Baja,
            5,
        )
        .await
        .unwrap();

    assert_eq!(picks.len(), 3);
    for pair in picks.windows(2) {
        assert!(pair[0].total >= pair[1].total);
    }
    assert_eq!(picks[2].symbol, "MSFT");
}

#[tokio::test]
async fn failing_symbols_are_isolated_from_the_batch() {
    // Twelve scripted symbols, two of them failing hard.
    let symbols = [
        "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "BRK-B", "LLY", "AVGO", "TSLA",
        "JPM", "V",
    ];
    let mut source = MockSource::default();
    for (i, sym) in symbols.iter().enumerate() {
        if i == 3 || i == 7 {
            source = source.with_failure(sym);
        } else {
            source = source.with_bars(sym, uptrend_bars(250));
        }
    }
    let scanner = Scanner::new(Arc::new(source));

    let result = scanner
        .top_picks(
            Market::Us50,
            Timeframe::Daily,
            RangePreset::Max,
            ExigencyLevel::Baja,
            20,
        )
        .await;

    let (picks, meta) = result.unwrap();
    assert_eq!(meta.scanned, 10);
    assert_eq!(picks.len(), 10);
    assert!(picks.iter().all(|p| p.symbol != "GOOGL"));
    assert!(picks.iter().all(|p| p.symbol != "LLY"));

    // Handler-level contract: a scan that returns is always ok:true.
    let response = TopPicksResponse::ok(picks, meta);
    assert!(response.ok);
    assert!(response.error.is_none());
}

#[tokio::test]
async fn empty_universe_data_is_ok_with_no_picks() {
    let scanner = Scanner::new(Arc::new(MockSource::default()));
    let (picks, meta) = scanner
        .top_picks(
            Market::Us50,
            Timeframe::Daily,
            RangePreset::Max,
            ExigencyLevel::Alta,
            5,
        )
        .await
        .unwrap();
    assert!(picks.is_empty());
    assert_eq!(meta.scanned, 0);
}

#[tokio::test]
async fn limit_truncates_the_final_page() {
    let mut source = MockSource::default();
    for sym in ["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA"] {
        source = source.with_bars(sym, uptrend_bars(250));
    }
    let scanner = Scanner::new(Arc::new(source));
    let (picks, _) = scanner
        .top_picks(
            Market::Us50,
            Timeframe::Daily,
            RangePreset::Max,
            ExigencyLevel::Baja,
            3,
        )
        .await
        .unwrap();
    assert_eq!(picks.len(), 3);
}

#[tokio::test]
async fn strict_ath_scan_accepts_fresh_high_with_rationale() {
    // AAPL: last bar is the all-time-high close, lows well above the window
    // minimum. MSFT: faded 20% off its high, rejected under strict mode.
    let fresh = uptrend_bars(40);
    let mut faded = uptrend_bars(40);
    let last = faded.len() - 1;
    faded[last].close = faded[last].close * 0.8;

    let source = MockSource::default()
        .with_bars("AAPL", fresh)
        .with_bars("MSFT", faded);
    let scanner = Scanner::new(Arc::new(source));

    let (picks, meta) = scanner
        .ath_picks(
            Market::Us50,
            Timeframe::Daily,
            RangePreset::Max,
            AthParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].symbol, "AAPL");
    assert!(picks[0].rationale.contains("Confirmed ATH"));
    assert!(picks[0].rationale.contains("above recent support"));
    assert_eq!(picks[0].dd_pct, 0.0);
    // ATH meta counts submitted symbols, not usable ones.
    assert_eq!(meta.scanned, 50);

    let response = AthPicksResponse::ok(picks, meta);
    assert!(response.ok);
    assert!(response.updated_at.is_some());
}

#[tokio::test]
async fn ath_ranking_prefers_smaller_drawdown_then_bigger_cushion() {
    let params = AthParams {
        strict: false,
        tol_pct: 25.0,
        recent_days: 0,
        ..AthParams::default()
    };

    // AAPL sits right at its high; MSFT trails it by a few percent.
    let at_high = uptrend_bars(40);
    let mut trailing = uptrend_bars(40);
    let last = trailing.len() - 1;
    trailing[last].close = trailing[last].close * 0.9;

    let source = MockSource::default()
        .with_bars("MSFT", trailing)
        .with_bars("AAPL", at_high);
    let scanner = Scanner::new(Arc::new(source));

    let (picks, _) = scanner
        .ath_picks(Market::Us50, Timeframe::Daily, RangePreset::Max, params)
        .await
        .unwrap();

    assert_eq!(picks.len(), 2);
    assert_eq!(picks[0].symbol, "AAPL");
    assert_eq!(picks[1].symbol, "MSFT");
    assert!(picks[0].dd_pct <= picks[1].dd_pct);
}
