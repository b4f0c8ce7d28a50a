//! Application configuration
//!
//! All tunables are read once at startup into an explicit struct and passed
//! by reference; nothing reads the environment after construction.

use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Market data provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Yahoo,
}

impl Provider {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "yahoo" | "yfinance" => Ok(Provider::Yahoo),
            other => Err(AppError::Config(format!(
                "Unknown data provider: {other}"
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub db_path: PathBuf,

    /// Trailing window for the simple moving average
    pub sma_window: usize,

    /// Trailing window for the relative strength index
    pub rsi_window: usize,

    /// Provider window descriptor for one fetch (e.g. "1mo")
    pub period: String,

    /// Provider bar granularity (e.g. "1d")
    pub interval: String,

    /// Which market data provider to fetch from
    pub provider: Provider,

    /// Scheduler endpoint to poke after watchlist mutations; None disables
    /// notification entirely
    pub scheduler_url: Option<String>,

    /// Upper bound on a single provider request
    pub fetch_timeout: Duration,
}

impl Config {
    /// Load configuration from the environment (reading `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            db_path: env::var("STOCKWATCH_DB")
                .unwrap_or_else(|_| "stockwatch.db".to_string())
                .into(),
            sma_window: parse_var("SMA_WINDOW", 20)?,
            rsi_window: parse_var("RSI_WINDOW", 14)?,
            period: env::var("FETCH_PERIOD").unwrap_or_else(|_| "1mo".to_string()),
            interval: env::var("FETCH_INTERVAL").unwrap_or_else(|_| "1d".to_string()),
            provider: match env::var("DATA_PROVIDER") {
                Ok(value) => Provider::parse(&value)?,
                Err(_) => Provider::Yahoo,
            },
            scheduler_url: env::var("SCHEDULER_URL").ok().filter(|s| !s.is_empty()),
            fetch_timeout: Duration::from_secs(parse_var("FETCH_TIMEOUT_SECS", 30)?),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sma_window == 0 {
            return Err(AppError::Config("SMA_WINDOW must be at least 1".into()));
        }
        if self.rsi_window == 0 {
            return Err(AppError::Config("RSI_WINDOW must be at least 1".into()));
        }
        if self.period.is_empty() || self.interval.is_empty() {
            return Err(AppError::Config(
                "FETCH_PERIOD and FETCH_INTERVAL must be non-empty".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid value for {name}: {value}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing() {
        assert_eq!(Provider::parse("yahoo").unwrap(), Provider::Yahoo);
        assert_eq!(Provider::parse("YFinance").unwrap(), Provider::Yahoo);
        assert!(Provider::parse("bloomberg").is_err());
    }

    #[test]
    fn zero_window_rejected() {
        let config = Config {
            db_path: "test.db".into(),
            sma_window: 0,
            rsi_window: 14,
            period: "1mo".to_string(),
            interval: "1d".to_string(),
            provider: Provider::Yahoo,
            scheduler_url: None,
            fetch_timeout: Duration::from_secs(30),
        };
        assert!(config.validate().is_err());
    }
}
