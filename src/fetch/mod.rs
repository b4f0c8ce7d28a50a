//! Market data fetch adapters

pub mod yahoo;

use crate::config::{Config, Provider};
use crate::db::models::Bar;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Market data fetcher contract
///
/// One call returns the bar series for a symbol over a provider-recognized
/// window, ascending by date. An empty series means the provider has no data
/// for that symbol/window and is not an error. Implementations hold no
/// state, so a failed call is safe to retry.
#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    /// Provider ID (e.g. "yahoo")
    fn id(&self) -> &'static str;

    /// Fetch bars for `symbol` over `period` at `interval` granularity
    async fn fetch(&self, symbol: &str, period: &str, interval: &str) -> Result<Vec<Bar>>;
}

/// Build the fetcher selected by configuration
pub fn build_fetcher(config: &Config) -> Result<Arc<dyn MarketDataFetcher>> {
    match config.provider {
        Provider::Yahoo => Ok(Arc::new(yahoo::YahooFetcher::new(config.fetch_timeout)?)),
    }
}
