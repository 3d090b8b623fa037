use serde::{Deserialize, Serialize};

use crate::types::{Market, RangePreset, Timeframe};

/// Traffic-light verdict for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficColor {
    Green,
    Amber,
    Red,
}

/// Strictness level for the Top-Picks threshold ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExigencyLevel {
    Alta,
    Media,
    Baja,
}

/// The three threshold tiers for one exigency level.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Tier-1 strict cut.
    pub strict: f64,
    /// Tier-2 relaxed cut.
    pub relaxed: f64,
    /// Tier-3 fallback floor.
    pub floor: f64,
}

impl ExigencyLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "alta" => Some(ExigencyLevel::Alta),
            "media" => Some(ExigencyLevel::Media),
            "baja" => Some(ExigencyLevel::Baja),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExigencyLevel::Alta => "alta",
            ExigencyLevel::Media => "media",
            ExigencyLevel::Baja => "baja",
        }
    }

    /// Threshold table per level. Deliberately asymmetric tuning, kept as-is.
    pub fn thresholds(&self) -> Thresholds {
        match self {
            ExigencyLevel::Alta => Thresholds {
                strict: 0.60,
                relaxed: 0.40,
                floor: 0.20,
            },
            ExigencyLevel::Media => Thresholds {
                strict: 0.40,
                relaxed: 0.30,
                floor: 0.10,
            },
            ExigencyLevel::Baja => Thresholds {
                strict: 0.20,
                relaxed: 0.10,
                floor: 0.00,
            },
        }
    }
}

/// One Top-Picks scanner candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPick {
    pub symbol: String,
    /// Blended short + long score, 3-decimal rounded.
    pub total: f64,
    /// Short-horizon score for the requested timeframe.
    pub score: f64,
    /// Long-horizon (monthly, max range) score.
    pub long_score: f64,
    /// News adjustment placeholder, always 0 for now.
    pub news_adj: f64,
    pub rationale: String,
}

/// One ATH scanner candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthPick {
    pub symbol: String,
    pub last_close: f64,
    pub max_close: f64,
    /// Drawdown from the historical maximum close, percent.
    pub dd_pct: f64,
    /// Recent support estimate; absent when not computable.
    pub last_swing_low: Option<f64>,
    pub rationale: String,
}

/// Echoed parameters for a Top-Picks scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPicksMeta {
    pub market: Market,
    pub tf: Timeframe,
    pub range: RangePreset,
    pub level: ExigencyLevel,
    /// Number of symbols that produced a usable score.
    pub scanned: usize,
}

/// Echoed parameters for an ATH scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthMeta {
    pub market: Market,
    pub tf: Timeframe,
    pub range: RangePreset,
    pub strict: bool,
    pub tol_pct: f64,
    pub recent_days: i64,
    pub lookback: usize,
    /// Number of symbols submitted to the scan.
    pub scanned: usize,
}

/// Top-Picks scan response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPicksResponse {
    pub ok: bool,
    pub picks: Vec<TopPick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TopPicksMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TopPicksResponse {
    pub fn ok(picks: Vec<TopPick>, meta: TopPicksMeta) -> Self {
        Self {
            ok: true,
            picks,
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
            meta: Some(meta),
            error: None,
        }
    }

    pub fn fail(error: String) -> Self {
        Self {
            ok: false,
            picks: Vec::new(),
            updated_at: None,
            meta: None,
            error: Some(error),
        }
    }
}

/// ATH scan response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthPicksResponse {
    pub ok: bool,
    pub picks: Vec<AthPick>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<AthMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AthPicksResponse {
    pub fn ok(picks: Vec<AthPick>, meta: AthMeta) -> Self {
        Self {
            ok: true,
            picks,
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
            meta: Some(meta),
            error: None,
        }
    }

    pub fn fail(error: String) -> Self {
        Self {
            ok: false,
            picks: Vec::new(),
            updated_at: None,
            meta: None,
            error: Some(error),
        }
    }
}
