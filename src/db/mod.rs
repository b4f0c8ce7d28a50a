//! SQLite database module

pub mod models;
mod migrations;
mod stocks;
mod watchlist;

use crate::error::Result;
use models::{Bar, PriceBar, WatchlistEntry};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
///
/// A single connection behind a mutex; WAL mode keeps readers out of the
/// writer's way if the store is shared across tasks.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database at `path` and run migrations
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// In-memory database, used by tests and throwaway runs
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    // ========== Price Store ==========

    /// Check whether a bar exists for (symbol, date)
    pub fn bar_exists(&self, symbol: &str, date: &str) -> Result<bool> {
        let conn = self.conn.lock();
        stocks::bar_exists(&conn, symbol, date)
    }

    /// Insert a new bar for a symbol
    pub fn insert_bar(&self, symbol: &str, bar: &Bar) -> Result<()> {
        let conn = self.conn.lock();
        stocks::insert_bar(&conn, symbol, bar)
    }

    /// Update the numeric fields of an existing bar
    pub fn update_bar(&self, symbol: &str, bar: &Bar) -> Result<()> {
        let conn = self.conn.lock();
        stocks::update_bar(&conn, symbol, bar)
    }

    /// Stored bars for a symbol, optionally date-bounded, ascending
    pub fn fetch_bars(
        &self,
        symbol: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<PriceBar>> {
        let conn = self.conn.lock();
        stocks::fetch_bars(&conn, symbol, start_date, end_date)
    }

    /// Delete every stored bar for a symbol
    pub fn delete_symbol_bars(&self, symbol: &str) -> Result<usize> {
        let conn = self.conn.lock();
        stocks::delete_all(&conn, symbol)
    }

    // ========== Watchlist Store ==========

    /// Add a symbol to the watchlist (idempotent)
    pub fn add_symbol(&self, symbol: &str) -> Result<()> {
        let conn = self.conn.lock();
        watchlist::add(&conn, symbol)
    }

    /// Remove a symbol's watchlist row (no cascade; see the service layer)
    pub fn remove_symbol(&self, symbol: &str) -> Result<()> {
        let conn = self.conn.lock();
        watchlist::remove(&conn, symbol)
    }

    /// Flip a symbol's active flag; returns the new state
    pub fn toggle_symbol(&self, symbol: &str) -> Result<bool> {
        let conn = self.conn.lock();
        watchlist::toggle(&conn, symbol)
    }

    /// All watchlist entries
    pub fn watchlist(&self) -> Result<Vec<WatchlistEntry>> {
        let conn = self.conn.lock();
        watchlist::list_all(&conn)
    }

    /// Symbols currently marked active
    pub fn active_symbols(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        watchlist::list_active(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_on_disk_runs_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("stockwatch.db")).unwrap();

        db.add_symbol("AAPL").unwrap();
        assert_eq!(db.active_symbols().unwrap(), vec!["AAPL".to_string()]);
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockwatch.db");

        {
            let db = Database::open(&path).unwrap();
            db.add_symbol("AAPL").unwrap();
        }
        // Second open must not re-run the schema migrations
        let db = Database::open(&path).unwrap();
        assert_eq!(db.active_symbols().unwrap(), vec!["AAPL".to_string()]);
    }
}
