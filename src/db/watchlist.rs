//! Watchlist store: the `watchlist` table
//!
//! One row per symbol with an active flag. Callers pass symbols already
//! normalized to uppercase; the service layer owns normalization.

use crate::db::models::WatchlistEntry;
use crate::error::{AppError, Result};
use rusqlite::{params, Connection};

/// Add a symbol to the watchlist. Idempotent: an existing row (active or
/// not) is left untouched and the call still succeeds.
pub fn add(conn: &Connection, symbol: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO watchlist (symbol) VALUES (?1)",
        params![symbol],
    )?;
    Ok(())
}

/// Remove a symbol from the watchlist.
///
/// Returns `NotFound` if the symbol is not present. Does NOT cascade to the
/// stocks table; the service layer performs the cascade so the two deletes
/// are always paired in one place.
pub fn remove(conn: &Connection, symbol: &str) -> Result<()> {
    let rows = conn.execute("DELETE FROM watchlist WHERE symbol = ?1", params![symbol])?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("{symbol} is not in the watchlist")));
    }
    Ok(())
}

/// Flip the active flag for a symbol; returns the new state.
pub fn toggle(conn: &Connection, symbol: &str) -> Result<bool> {
    let active: bool = match conn.query_row(
        "SELECT active FROM watchlist WHERE symbol = ?1",
        params![symbol],
        |row| row.get(0),
    ) {
        Ok(active) => active,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(AppError::NotFound(format!("{symbol} is not in the watchlist")))
        }
        Err(e) => return Err(e.into()),
    };

    let new_status = !active;
    conn.execute(
        "UPDATE watchlist SET active = ?1 WHERE symbol = ?2",
        params![new_status, symbol],
    )?;
    Ok(new_status)
}

/// All watchlist entries, in insertion order
pub fn list_all(conn: &Connection) -> Result<Vec<WatchlistEntry>> {
    let mut stmt = conn.prepare("SELECT symbol, active, added_at FROM watchlist ORDER BY id")?;
    let entries = stmt
        .query_map([], |row| {
            Ok(WatchlistEntry {
                symbol: row.get(0)?,
                active: row.get(1)?,
                added_at: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Symbols currently marked active, in insertion order
pub fn list_active(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT symbol FROM watchlist WHERE active = 1 ORDER BY id")?;
    let symbols = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(symbols)
}
