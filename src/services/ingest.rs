//! Ingestion Service
//!
//! One pass: snapshot the active symbol set, then fetch → compute
//! indicators → reconcile per symbol. Failures are isolated at two levels:
//! a bad symbol never aborts the pass, and a bad row never aborts the rest
//! of its batch. Passes are idempotent over already-ingested dates; the
//! driver keeps no state between runs beyond what is in the stores.

use crate::config::Config;
use crate::db::models::Bar;
use crate::db::Database;
use crate::error::Result;
use crate::fetch::MarketDataFetcher;
use crate::indicators::add_indicators;
use serde::Serialize;
use tracing::{error, info, warn};

/// Best-effort outcome of one ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Symbols whose bars were reconciled into the store
    pub processed: usize,
    /// Symbols the provider had no data for
    pub skipped: usize,
    /// Symbols that failed to fetch or reconcile
    pub failed: usize,
}

/// Ingestion business logic
pub struct IngestService;

impl IngestService {
    /// Merge a computed bar series into the price store, insert-or-update
    /// per (symbol, date). Each row is independent: a failed row is logged
    /// and the batch continues. Returns the number of rows written.
    pub fn reconcile(db: &Database, symbol: &str, bars: &[Bar]) -> usize {
        let mut written = 0;
        for bar in bars {
            let result = db.bar_exists(symbol, &bar.date).and_then(|exists| {
                if exists {
                    db.update_bar(symbol, bar)
                } else {
                    db.insert_bar(symbol, bar)
                }
            });

            match result {
                Ok(()) => written += 1,
                Err(e) => error!("Failed to reconcile {} on {}: {}", symbol, bar.date, e),
            }
        }
        written
    }

    /// Run one ingestion pass over the current active symbol snapshot.
    ///
    /// A per-symbol fetch or reconcile problem is logged and counted, never
    /// fatal; the pass always completes with a summary.
    pub async fn run_pass(
        db: &Database,
        fetcher: &dyn MarketDataFetcher,
        config: &Config,
    ) -> Result<PassSummary> {
        let symbols = db.active_symbols()?;
        let mut summary = PassSummary::default();

        if symbols.is_empty() {
            info!("No active symbols in watchlist; nothing to ingest");
            return Ok(summary);
        }

        info!("Starting ingestion pass over {} symbols", symbols.len());
        for symbol in symbols {
            // Fetch failures degrade to an empty series for this symbol only
            let mut bars = match fetcher
                .fetch(&symbol, &config.period, &config.interval)
                .await
            {
                Ok(bars) => bars,
                Err(e) => {
                    warn!("Fetch failed for {}: {}", symbol, e);
                    summary.failed += 1;
                    continue;
                }
            };

            if bars.is_empty() {
                warn!("No data fetched for {}", symbol);
                summary.skipped += 1;
                continue;
            }

            add_indicators(&mut bars, config.sma_window, config.rsi_window);
            let written = Self::reconcile(db, &symbol, &bars);
            info!("Reconciled {}/{} bars for {}", written, bars.len(), symbol);
            summary.processed += 1;
        }

        info!(
            "Ingestion pass finished: {} processed, {} skipped, {} failed",
            summary.processed, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}
