//! Scoring, scanning and analysis services.

pub mod analyze;
pub mod ath;
pub mod batch;
pub mod cache;
pub mod indicators;
pub mod patterns;
pub mod scanner;
pub mod scoring;
pub mod signals;

pub use analyze::{analyze_bars, Analysis, AnalyzeOptions, RiskPlan, StopMethod};
pub use ath::{classify_ath, AthParams};
pub use batch::settle_batches;
pub use cache::ScanCache;
pub use patterns::{detect_candle_patterns, PatternScan};
pub use scanner::Scanner;
pub use scoring::{
    color_by_composite, color_by_total, composite_score, periods_for_tf, tech_score_by_tf,
    total_score,
};
pub use signals::{detect_signals, SignalReport, TechSignal};
