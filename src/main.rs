//! One ingestion pass: fetch bars for every active watchlist symbol,
//! compute indicators, reconcile into the store.

use anyhow::Context;
use stockwatch::config::Config;
use stockwatch::db::Database;
use stockwatch::fetch;
use stockwatch::services::IngestService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting stockwatch ingestion pass");

    let config = Config::from_env().context("Failed to load configuration")?;
    let db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database at {:?}", config.db_path))?;
    let fetcher = fetch::build_fetcher(&config).context("Failed to build market data fetcher")?;

    let summary = IngestService::run_pass(&db, fetcher.as_ref(), &config).await?;
    tracing::info!(
        "Pass complete: {} processed, {} skipped, {} failed",
        summary.processed,
        summary.skipped,
        summary.failed
    );

    Ok(())
}
