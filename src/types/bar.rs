use serde::{Deserialize, Serialize};

/// One OHLC (Open, High, Low, Close) interval for a symbol.
///
/// Sequences are strictly increasing in `time`; rows with non-finite price
/// fields never make it past the source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Scoring timeframe used by the scanner and score endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Timeframe {
    /// Parse from the wire form; `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(Timeframe::Daily),
            "1w" => Some(Timeframe::Weekly),
            "1mo" => Some(Timeframe::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
            Timeframe::Monthly => "1mo",
        }
    }

    /// Interval string understood by the Yahoo chart API.
    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1wk",
            Timeframe::Monthly => "1mo",
        }
    }
}

/// Chart interval for raw price requests, including intraday resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    #[serde(rename = "5m")]
    FiveMin,
    #[serde(rename = "15m")]
    FifteenMin,
    #[serde(rename = "30m")]
    ThirtyMin,
    #[serde(rename = "60m")]
    SixtyMin,
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl ChartInterval {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "5m" => Some(ChartInterval::FiveMin),
            "15m" => Some(ChartInterval::FifteenMin),
            "30m" => Some(ChartInterval::ThirtyMin),
            "60m" => Some(ChartInterval::SixtyMin),
            "1d" => Some(ChartInterval::Daily),
            "1w" => Some(ChartInterval::Weekly),
            "1mo" => Some(ChartInterval::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::FiveMin => "5m",
            ChartInterval::FifteenMin => "15m",
            ChartInterval::ThirtyMin => "30m",
            ChartInterval::SixtyMin => "60m",
            ChartInterval::Daily => "1d",
            ChartInterval::Weekly => "1w",
            ChartInterval::Monthly => "1mo",
        }
    }

    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            ChartInterval::FiveMin => "5m",
            ChartInterval::FifteenMin => "15m",
            ChartInterval::ThirtyMin => "30m",
            ChartInterval::SixtyMin => "60m",
            ChartInterval::Daily => "1d",
            ChartInterval::Weekly => "1wk",
            ChartInterval::Monthly => "1mo",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            ChartInterval::FiveMin
                | ChartInterval::FifteenMin
                | ChartInterval::ThirtyMin
                | ChartInterval::SixtyMin
        )
    }
}

/// Preset time range for bar requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1A")]
    OneYear,
    #[serde(rename = "MAX")]
    Max,
}

impl RangePreset {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1M" => Some(RangePreset::OneMonth),
            "3M" => Some(RangePreset::ThreeMonths),
            "6M" => Some(RangePreset::SixMonths),
            "1A" => Some(RangePreset::OneYear),
            "MAX" => Some(RangePreset::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangePreset::OneMonth => "1M",
            RangePreset::ThreeMonths => "3M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1A",
            RangePreset::Max => "MAX",
        }
    }

    /// Range string understood by the Yahoo chart API.
    pub fn yahoo_range(&self) -> &'static str {
        match self {
            RangePreset::OneMonth => "1mo",
            RangePreset::ThreeMonths => "3mo",
            RangePreset::SixMonths => "6mo",
            RangePreset::OneYear => "1y",
            RangePreset::Max => "max",
        }
    }

    /// Approximate trailing window in days.
    pub fn days(&self) -> u32 {
        match self {
            RangePreset::OneMonth => 31,
            RangePreset::ThreeMonths => 93,
            RangePreset::SixMonths => 186,
            RangePreset::OneYear => 365,
            RangePreset::Max => 3650,
        }
    }
}

/// Scannable market universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Us50,
    Sp500,
    Eu,
}

impl Market {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "us50" => Some(Market::Us50),
            "sp500" => Some(Market::Sp500),
            "eu" => Some(Market::Eu),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Us50 => "us50",
            Market::Sp500 => "sp500",
            Market::Eu => "eu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_round_trips() {
        for tf in [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly] {
            assert_eq!(Timeframe::parse(tf.as_str()), Some(tf));
        }
        assert_eq!(Timeframe::parse("4h"), None);
    }

    #[test]
    fn range_maps_to_yahoo() {
        assert_eq!(RangePreset::OneYear.yahoo_range(), "1y");
        assert_eq!(RangePreset::Max.yahoo_range(), "max");
        assert_eq!(RangePreset::OneMonth.days(), 31);
    }

    #[test]
    fn market_parse_rejects_unknown() {
        assert_eq!(Market::parse("sp500"), Some(Market::Sp500));
        assert_eq!(Market::parse("asia"), None);
    }
}
