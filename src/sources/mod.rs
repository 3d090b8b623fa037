//! Upstream OHLC price sources.

pub mod yahoo;

pub use yahoo::YahooClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Bar, ChartInterval, RangePreset, Timeframe};

/// Object-safe seam over the upstream bar provider.
///
/// Implementations must drop malformed rows silently and may return an empty
/// vector for unknown symbols; callers treat absence of data as exclusion,
/// never as a fatal condition.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Fetch bars for a scoring timeframe over a preset range.
    async fn fetch(&self, symbol: &str, tf: Timeframe, range: RangePreset) -> Result<Vec<Bar>>;

    /// Fetch bars for an arbitrary chart interval over a trailing day window.
    async fn fetch_window(
        &self,
        symbol: &str,
        interval: ChartInterval,
        days: u32,
    ) -> Result<Vec<Bar>>;
}
