//! Watchlist Service
//!
//! Mutation state machine (add/toggle/remove with cascading bar deletion)
//! plus the read surface consumed by the presentation layer. Symbols are
//! normalized to uppercase here, at the service boundary, so every store
//! below only ever sees canonical identities.
//!
//! States per symbol: Absent, Active, Inactive.
//! - add: Absent → Active; already present → success, untouched
//! - toggle: Active ↔ Inactive; NotFound if Absent
//! - remove: Active|Inactive → Absent, deleting all stored bars
//!
//! Every successful mutation pokes the scheduler notifier. The poke is
//! best-effort: the watchlist change stands regardless of notifier
//! reachability.

use crate::db::models::{PriceBar, WatchlistEntry};
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::notifier::SchedulerNotifier;
use tracing::info;

/// Watchlist business logic
pub struct WatchlistService;

impl WatchlistService {
    /// Add a symbol to the watchlist (idempotent; never resurrects an
    /// inactive entry). Returns the normalized symbol.
    pub fn add(db: &Database, notifier: &dyn SchedulerNotifier, symbol: &str) -> Result<String> {
        let symbol = normalize(symbol)?;
        db.add_symbol(&symbol)?;
        info!("Added {} to watchlist", symbol);
        notifier.notify("add");
        Ok(symbol)
    }

    /// Remove a symbol and every stored bar for it. Irreversible: re-adding
    /// starts with no history.
    pub fn remove(db: &Database, notifier: &dyn SchedulerNotifier, symbol: &str) -> Result<()> {
        let symbol = normalize(symbol)?;
        db.remove_symbol(&symbol)?;
        let deleted = db.delete_symbol_bars(&symbol)?;
        info!("Removed {} from watchlist ({} bars deleted)", symbol, deleted);
        notifier.notify("remove");
        Ok(())
    }

    /// Flip a symbol's active flag; returns the new state.
    pub fn toggle(db: &Database, notifier: &dyn SchedulerNotifier, symbol: &str) -> Result<bool> {
        let symbol = normalize(symbol)?;
        let active = db.toggle_symbol(&symbol)?;
        info!("Toggled {} to active={}", symbol, active);
        notifier.notify("toggle");
        Ok(active)
    }

    /// Symbols currently marked active (the set one ingestion pass covers)
    pub fn active_symbols(db: &Database) -> Result<Vec<String>> {
        db.active_symbols()
    }

    /// All watchlist entries with their active flags
    pub fn entries(db: &Database) -> Result<Vec<WatchlistEntry>> {
        db.watchlist()
    }

    /// Stored bars for a symbol, optionally date-bounded, ascending
    pub fn bars(
        db: &Database,
        symbol: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<PriceBar>> {
        let symbol = normalize(symbol)?;
        db.fetch_bars(&symbol, start_date, end_date)
    }
}

fn normalize(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol must be non-empty".into()));
    }
    Ok(symbol)
}
