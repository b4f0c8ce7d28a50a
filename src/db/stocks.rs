//! Price store: the `stocks` table
//!
//! One row per (symbol, date). Identity and `created_at` are written once on
//! insert; updates touch the numeric fields only.

use crate::db::models::{Bar, PriceBar};
use crate::error::Result;
use rusqlite::{params, Connection};

/// Check whether a bar already exists for (symbol, date)
pub fn bar_exists(conn: &Connection, symbol: &str, date: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM stocks WHERE symbol = ?1 AND date = ?2",
        params![symbol, date],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Insert a new bar (sets `created_at` via the column default)
pub fn insert_bar(conn: &Connection, symbol: &str, bar: &Bar) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO stocks (symbol, date, open_price, high_price, low_price, close_price, volume, sma, rsi)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            symbol,
            bar.date,
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
            bar.sma,
            bar.rsi,
        ],
    )?;
    Ok(())
}

/// Update the numeric fields of an existing bar, leaving identity and
/// `created_at` untouched
pub fn update_bar(conn: &Connection, symbol: &str, bar: &Bar) -> Result<()> {
    conn.execute(
        r#"
        UPDATE stocks
        SET open_price = ?1,
            high_price = ?2,
            low_price = ?3,
            close_price = ?4,
            volume = ?5,
            sma = ?6,
            rsi = ?7
        WHERE symbol = ?8 AND date = ?9
        "#,
        params![
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
            bar.sma,
            bar.rsi,
            symbol,
            bar.date,
        ],
    )?;
    Ok(())
}

/// Fetch stored bars for a symbol, optionally bounded by date, ascending
pub fn fetch_bars(
    conn: &Connection,
    symbol: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Vec<PriceBar>> {
    let mut sql = String::from(
        "SELECT symbol, date, open_price, high_price, low_price, close_price, volume, sma, rsi, created_at
         FROM stocks WHERE symbol = ?",
    );
    let mut query_params: Vec<&dyn rusqlite::ToSql> = vec![&symbol];

    if let Some(ref start) = start_date {
        sql.push_str(" AND date >= ?");
        query_params.push(start);
    }
    if let Some(ref end) = end_date {
        sql.push_str(" AND date <= ?");
        query_params.push(end);
    }
    sql.push_str(" ORDER BY date ASC");

    let mut stmt = conn.prepare(&sql)?;
    let bars = stmt
        .query_map(query_params.as_slice(), |row| {
            Ok(PriceBar {
                symbol: row.get(0)?,
                date: row.get(1)?,
                open_price: row.get(2)?,
                high_price: row.get(3)?,
                low_price: row.get(4)?,
                close_price: row.get(5)?,
                volume: row.get(6)?,
                sma: row.get(7)?,
                rsi: row.get(8)?,
                created_at: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(bars)
}

/// Delete every stored bar for a symbol; returns the number of rows removed
pub fn delete_all(conn: &Connection, symbol: &str) -> Result<usize> {
    let rows = conn.execute("DELETE FROM stocks WHERE symbol = ?1", params![symbol])?;
    Ok(rows)
}
