//! Yahoo Finance chart API adapter

use crate::db::models::Bar;
use crate::error::{AppError, Result};
use crate::fetch::MarketDataFetcher;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// Yahoo rejects requests without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

// ============================================================================
// Chart API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

/// Per-field arrays aligned with `timestamp`; the API emits nulls for
/// sessions with no trade data.
#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

// ============================================================================
// Fetcher
// ============================================================================

/// Fetcher backed by the public Yahoo Finance v8 chart endpoint
pub struct YahooFetcher {
    client: Client,
}

impl YahooFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MarketDataFetcher for YahooFetcher {
    fn id(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(&self, symbol: &str, period: &str, interval: &str) -> Result<Vec<Bar>> {
        let url = format!("{BASE_URL}/{symbol}");
        let response = self
            .client
            .get(&url)
            .query(&[("range", period), ("interval", interval)])
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Request for {symbol} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!(
                "Provider returned {status} for {symbol}"
            )));
        }

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("Malformed response for {symbol}: {e}")))?;

        let bars = parse_chart(payload, symbol)?;
        tracing::info!("Fetched {} bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

/// Flatten a chart response into ascending bars, skipping null slots the API
/// emits for halted sessions.
fn parse_chart(payload: ChartResponse, symbol: &str) -> Result<Vec<Bar>> {
    if let Some(error) = payload.chart.error {
        return Err(AppError::Fetch(format!(
            "Provider error for {symbol}: {} ({})",
            error.description, error.code
        )));
    }

    let result = match payload.chart.result.and_then(|mut r| r.pop()) {
        Some(result) => result,
        None => return Ok(Vec::new()),
    };

    let timestamps = match result.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(Vec::new()),
    };

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(Vec::new()),
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = match DateTime::from_timestamp(ts, 0) {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => continue,
        };

        let (open, high, low, close) = match (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);

        bars.push(Bar::raw(date, open, high, low, close, volume));
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parse_chart_basic() {
        let payload = response_from(
            r#"{
                "chart": {
                    "result": [{
                        "timestamp": [1704153600, 1704240000],
                        "indicators": {
                            "quote": [{
                                "open": [184.0, 185.5],
                                "high": [186.0, 187.0],
                                "low": [183.0, 184.5],
                                "close": [185.0, 186.5],
                                "volume": [1000000, 1200000]
                            }]
                        }
                    }],
                    "error": null
                }
            }"#,
        );

        let bars = parse_chart(payload, "AAPL").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, "2024-01-02");
        assert_eq!(bars[1].date, "2024-01-03");
        assert_eq!(bars[0].close, 185.0);
        assert_eq!(bars[1].volume, 1_200_000);
        assert_eq!(bars[0].sma, None);
    }

    #[test]
    fn parse_chart_skips_null_slots() {
        let payload = response_from(
            r#"{
                "chart": {
                    "result": [{
                        "timestamp": [1704153600, 1704240000],
                        "indicators": {
                            "quote": [{
                                "open": [184.0, null],
                                "high": [186.0, null],
                                "low": [183.0, null],
                                "close": [185.0, null],
                                "volume": [1000000, null]
                            }]
                        }
                    }],
                    "error": null
                }
            }"#,
        );

        let bars = parse_chart(payload, "AAPL").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, "2024-01-02");
    }

    #[test]
    fn parse_chart_empty_result_is_not_an_error() {
        let payload = response_from(r#"{"chart": {"result": null, "error": null}}"#);
        assert!(parse_chart(payload, "AAPL").unwrap().is_empty());

        let payload = response_from(
            r#"{"chart": {"result": [{"timestamp": [], "indicators": {"quote": [{}]}}], "error": null}}"#,
        );
        assert!(parse_chart(payload, "AAPL").unwrap().is_empty());
    }

    #[test]
    fn parse_chart_provider_error() {
        let payload = response_from(
            r#"{
                "chart": {
                    "result": null,
                    "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
                }
            }"#,
        );

        let err = parse_chart(payload, "NOPE").unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
