//! Batched universe scanning: Top-Picks with a relaxation ladder, and the
//! ATH screen.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::services::ath::{classify_ath, AthParams};
use crate::services::batch::settle_batches;
use crate::services::scoring::{tech_score_by_tf, total_score};
use crate::types::{
    AthMeta, AthPick, ExigencyLevel, Market, RangePreset, Timeframe, TopPick, TopPicksMeta,
};
use crate::universe;
use crate::sources::BarSource;

/// Tier relaxation keeps engaging until at least this many candidates exist.
const MIN_PICKS: usize = 5;
/// ATH screen page size.
const ATH_MAX_PICKS: usize = 20;

/// One fully scored universe symbol, before the ladder runs.
#[derive(Debug, Clone)]
struct ScoredSymbol {
    symbol: String,
    total: f64,
    score: f64,
    long_score: f64,
    news_adj: f64,
}

fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}

/// Keep one entry per symbol, later entries replacing earlier ones in place.
fn dedup_last_write<T, K>(items: Vec<T>, key: K) -> Vec<T>
where
    K: Fn(&T) -> &str,
{
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match out.iter().position(|existing| key(existing) == key(&item)) {
            Some(i) => out[i] = item,
            None => out.push(item),
        }
    }
    out
}

fn merge_first_wins(base: &mut Vec<ScoredSymbol>, extra: impl Iterator<Item = ScoredSymbol>) {
    for item in extra {
        if !base.iter().any(|c| c.symbol == item.symbol) {
            base.push(item);
        }
    }
}

/// Four-tier relaxation ladder. Each tier only engages while the running
/// candidate set holds fewer than [`MIN_PICKS`] entries, and merging never
/// replaces an entry admitted by an earlier (stricter) tier.
fn assemble_candidates(scored: &[ScoredSymbol], level: ExigencyLevel) -> Vec<ScoredSymbol> {
    let thr = level.thresholds();

    let mut candidates: Vec<ScoredSymbol> = scored
        .iter()
        .filter(|x| x.total >= thr.strict && x.score > 0.0 && x.long_score > 0.0)
        .cloned()
        .collect();

    if candidates.len() < MIN_PICKS {
        let relaxed = scored
            .iter()
            .filter(|x| x.total >= thr.relaxed && (x.score > 0.0 || x.long_score > 0.0))
            .cloned();
        merge_first_wins(&mut candidates, relaxed);
    }

    if candidates.len() < MIN_PICKS {
        let mut fallback: Vec<ScoredSymbol> = scored
            .iter()
            .filter(|x| x.total >= thr.floor)
            .cloned()
            .collect();
        fallback.sort_by(|a, b| b.total.total_cmp(&a.total));
        fallback.truncate(MIN_PICKS);
        merge_first_wins(&mut candidates, fallback.into_iter());
    }

    if candidates.len() < MIN_PICKS {
        let mut top = scored.to_vec();
        top.sort_by(|a, b| b.total.total_cmp(&a.total));
        top.truncate(MIN_PICKS);
        merge_first_wins(&mut candidates, top.into_iter());
    }

    candidates
}

fn rationale_for(total: f64, level: ExigencyLevel) -> String {
    let thr = level.thresholds();
    if total >= thr.strict {
        format!("Level {}: green (total >= {})", level.as_str(), thr.strict)
    } else if total >= thr.relaxed {
        format!(
            "Level {}: candidate (total >= {})",
            level.as_str(),
            thr.relaxed
        )
    } else {
        format!("Level {}: relative top", level.as_str())
    }
}

/// Scans a symbol universe against a [`BarSource`], batch by batch.
pub struct Scanner {
    source: Arc<dyn BarSource>,
    batch_width: usize,
    universe_cap: usize,
}

impl Scanner {
    pub fn new(source: Arc<dyn BarSource>) -> Self {
        Self {
            source,
            batch_width: 6,
            universe_cap: 120,
        }
    }

    /// Top-Picks scan: blended short+long technical score per symbol, then
    /// the relaxation ladder, then ranking. `limit` is the page size.
    pub async fn top_picks(
        &self,
        market: Market,
        tf: Timeframe,
        range: RangePreset,
        level: ExigencyLevel,
        limit: usize,
    ) -> Result<(Vec<TopPick>, TopPicksMeta)> {
        let symbols = universe::symbols(market, self.universe_cap);
        info!(
            market = market.as_str(),
            tf = tf.as_str(),
            range = range.as_str(),
            level = level.as_str(),
            symbols = symbols.len(),
            "starting top-picks scan"
        );

        let source = Arc::clone(&self.source);
        let scored = settle_batches(symbols, self.batch_width, move |sym| {
            let source = Arc::clone(&source);
            async move {
                let short_bars = source.fetch(&sym, tf, range).await?;
                let Some(short) = tech_score_by_tf(&short_bars, tf) else {
                    debug!(symbol = %sym, "short history too thin, skipping");
                    return Ok(None);
                };
                let long_bars = source
                    .fetch(&sym, Timeframe::Monthly, RangePreset::Max)
                    .await?;
                let Some(long) = tech_score_by_tf(&long_bars, Timeframe::Monthly) else {
                    debug!(symbol = %sym, "long history too thin, skipping");
                    return Ok(None);
                };
                let news_adj = 0.0;
                let total = total_score(Some(short), Some(long)).map(|t| t + news_adj);
                Ok(total.map(|total| ScoredSymbol {
                    symbol: sym,
                    total: round3(total),
                    score: round3(short),
                    long_score: round3(long),
                    news_adj,
                }))
            }
        })
        .await;

        let scored = dedup_last_write(scored, |s| s.symbol.as_str());
        let scanned = scored.len();

        let mut candidates = assemble_candidates(&scored, level);
        candidates.sort_by(|a, b| b.total.total_cmp(&a.total));
        candidates.truncate(limit);

        let picks: Vec<TopPick> = candidates
            .into_iter()
            .map(|c| TopPick {
                rationale: rationale_for(c.total, level),
                symbol: c.symbol,
                total: c.total,
                score: c.score,
                long_score: c.long_score,
                news_adj: c.news_adj,
            })
            .collect();

        info!(scanned, picks = picks.len(), "top-picks scan finished");
        let meta = TopPicksMeta {
            market,
            tf,
            range,
            level,
            scanned,
        };
        Ok((picks, meta))
    }

    /// ATH screen: classify every universe symbol, rank by drawdown from the
    /// maximum close, then by the cushion above support.
    pub async fn ath_picks(
        &self,
        market: Market,
        tf: Timeframe,
        range: RangePreset,
        params: AthParams,
    ) -> Result<(Vec<AthPick>, AthMeta)> {
        let symbols = universe::symbols(market, self.universe_cap);
        let scanned = symbols.len();
        info!(
            market = market.as_str(),
            tf = tf.as_str(),
            range = range.as_str(),
            strict = params.strict,
            symbols = scanned,
            "starting ath scan"
        );

        let source = Arc::clone(&self.source);
        let picks = settle_batches(symbols, self.batch_width, move |sym| {
            let source = Arc::clone(&source);
            async move {
                let bars = source.fetch(&sym, tf, range).await?;
                Ok(classify_ath(&sym, &bars, &params))
            }
        })
        .await;

        let mut picks = dedup_last_write(picks, |p| p.symbol.as_str());
        picks.sort_by(|a, b| {
            a.dd_pct.total_cmp(&b.dd_pct).then_with(|| {
                let buffer = |p: &AthPick| {
                    p.last_swing_low
                        .map_or(f64::NEG_INFINITY, |s| p.last_close - s)
                };
                buffer(b).total_cmp(&buffer(a))
            })
        });
        picks.truncate(ATH_MAX_PICKS);

        info!(scanned, picks = picks.len(), "ath scan finished");
        let meta = AthMeta {
            market,
            tf,
            range,
            strict: params.strict,
            tol_pct: params.tol_pct,
            recent_days: params.recent_days,
            lookback: params.support_lookback,
            scanned,
        };
        Ok((picks, meta))
    }
}
