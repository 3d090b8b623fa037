//! Yahoo Finance chart API client.
//!
//! Public v8 chart endpoint, no API key required. Quote arrays can contain
//! nulls for halted or partial intervals; those rows are dropped during
//! normalization rather than propagated into the scoring layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::sources::BarSource;
use crate::types::{Bar, ChartInterval, RangePreset, Timeframe};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Raw chart API response envelope.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteArrays>,
}

/// Parallel OHLCV arrays aligned with the timestamp array.
#[derive(Debug, Default, Deserialize)]
struct QuoteArrays {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance chart client.
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    /// Create a client with a per-request timeout so one hung fetch cannot
    /// stall a scan batch indefinitely.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn fetch_chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<Vec<Bar>> {
        let url = format!("{}/{}", CHART_URL, urlencode(symbol));
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "yahoo {} {}",
                symbol,
                response.status()
            )));
        }

        let payload: ChartResponse = response.json().await?;
        let bars = normalize_bars(payload);
        debug!(symbol, bars = bars.len(), "fetched yahoo chart");
        Ok(bars)
    }
}

#[async_trait]
impl BarSource for YahooClient {
    async fn fetch(&self, symbol: &str, tf: Timeframe, range: RangePreset) -> Result<Vec<Bar>> {
        let query = [
            ("interval", tf.yahoo_interval().to_string()),
            ("range", range.yahoo_range().to_string()),
        ];
        self.fetch_chart(symbol, &query).await
    }

    async fn fetch_window(
        &self,
        symbol: &str,
        interval: ChartInterval,
        days: u32,
    ) -> Result<Vec<Bar>> {
        let now = chrono::Utc::now().timestamp();
        let start = now - i64::from(days) * 86_400;
        let query = [
            ("interval", interval.yahoo_interval().to_string()),
            ("period1", start.to_string()),
            ("period2", now.to_string()),
        ];
        self.fetch_chart(symbol, &query).await
    }
}

/// Flatten the parallel quote arrays into validated bars.
///
/// Rows with a missing or non-finite OHLC component are dropped; a missing
/// volume is coerced to zero. Output is sorted ascending and deduplicated by
/// timestamp to honor the strictly-increasing invariant.
fn normalize_bars(payload: ChartResponse) -> Vec<Bar> {
    let Some(result) = payload.chart.result.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.swap_remove(0))
        }
    }) else {
        return Vec::new();
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &time) in timestamps.iter().enumerate() {
        let row = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            continue;
        };
        let volume = value_at(&quote.volume, i).unwrap_or(0.0).max(0.0);
        bars.push(Bar {
            time,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.time);
    bars.dedup_by_key(|b| b.time);
    bars
}

fn value_at(arr: &[Option<f64>], i: usize) -> Option<f64> {
    arr.get(i).copied().flatten().filter(|v| v.is_finite())
}

/// Percent-encode anything outside the usual ticker charset, escaping the
/// UTF-8 bytes of multi-byte characters individually.
fn urlencode(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for &byte in symbol.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_from(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalizes_and_drops_null_rows() {
        let payload = payload_from(
            r#"{
                "chart": {
                    "result": [{
                        "timestamp": [100, 200, 300],
                        "indicators": {
                            "quote": [{
                                "open":   [1.0, null, 3.0],
                                "high":   [1.5, 2.5, 3.5],
                                "low":    [0.5, 1.5, 2.5],
                                "close":  [1.2, 2.2, 3.2],
                                "volume": [10.0, 20.0, null]
                            }]
                        }
                    }]
                }
            }"#,
        );
        let bars = normalize_bars(payload);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].time, 100);
        assert_eq!(bars[1].time, 300);
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn empty_result_yields_no_bars() {
        let payload = payload_from(r#"{"chart": {"result": null}}"#);
        assert!(normalize_bars(payload).is_empty());
    }

    #[test]
    fn sorts_and_dedups_timestamps() {
        let payload = payload_from(
            r#"{
                "chart": {
                    "result": [{
                        "timestamp": [300, 100, 300],
                        "indicators": {
                            "quote": [{
                                "open":   [3.0, 1.0, 3.1],
                                "high":   [3.5, 1.5, 3.6],
                                "low":    [2.5, 0.5, 2.6],
                                "close":  [3.2, 1.2, 3.3],
                                "volume": [30.0, 10.0, 31.0]
                            }]
                        }
                    }]
                }
            }"#,
        );
        let bars = normalize_bars(payload);
        assert_eq!(bars.len(), 2);
        assert!(bars[0].time < bars[1].time);
    }

    #[test]
    fn urlencode_passes_ticker_charset() {
        assert_eq!(urlencode("BRK-B"), "BRK-B");
        assert_eq!(urlencode("SAN.MC"), "SAN.MC");
        assert_eq!(urlencode("^GSPC"), "%5EGSPC");
    }

    #[test]
    fn urlencode_escapes_each_utf8_byte() {
        assert_eq!(urlencode("é"), "%C3%A9");
        assert_eq!(urlencode("A é"), "A%20%C3%A9");
    }
}
