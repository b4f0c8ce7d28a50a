//! Database models

use serde::{Deserialize, Serialize};

/// One OHLCV bar as it moves through the pipeline.
///
/// The fetcher produces bars with empty indicator slots; the indicator
/// engine fills `sma`/`rsi` in place. `None` means "not yet computable",
/// which is distinct from a computed zero and is stored as SQL NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date, `YYYY-MM-DD`
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub sma: Option<f64>,
    pub rsi: Option<f64>,
}

impl Bar {
    /// Bar straight from a provider, indicators not yet computed.
    pub fn raw(date: impl Into<String>, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            date: date.into(),
            open,
            high,
            low,
            close,
            volume,
            sma: None,
            rsi: None,
        }
    }
}

/// Stored price row from the `stocks` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: String,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: i64,
    pub sma: Option<f64>,
    pub rsi: Option<f64>,
    pub created_at: String,
}

/// One watchlist row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub active: bool,
    pub added_at: String,
}
