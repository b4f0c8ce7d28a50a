//! Scheduler notification
//!
//! Watchlist mutations poke an external job scheduler so it can re-plan the
//! next ingestion run. The poke is a hint, never the system of record: it
//! carries no payload, is never retried, and a failure must not reach the
//! caller of the mutation that triggered it.

use crate::config::Config;
use crate::error::{AppError, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Outbound signal to the external job scheduler
pub trait SchedulerNotifier: Send + Sync {
    /// Fire-and-forget notification; must not block and must swallow errors.
    /// `event` names the mutation that triggered it, for logging only.
    fn notify(&self, event: &str);
}

/// HTTP notifier posting to a fixed, externally configured endpoint
pub struct HttpSchedulerNotifier {
    client: Client,
    endpoint: String,
}

impl HttpSchedulerNotifier {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Notification(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

impl SchedulerNotifier for HttpSchedulerNotifier {
    fn notify(&self, event: &str) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let event = event.to_string();

        // Spawned so the triggering mutation returns immediately.
        tokio::spawn(async move {
            match client.post(&endpoint).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("Scheduler notified after {event}");
                }
                Ok(response) => {
                    tracing::warn!(
                        "Scheduler notification after {event} returned {}",
                        response.status()
                    );
                }
                Err(e) => {
                    tracing::warn!("Scheduler notification after {event} failed: {e}");
                }
            }
        });
    }
}

/// Notifier used when no scheduler endpoint is configured
pub struct NoopNotifier;

impl SchedulerNotifier for NoopNotifier {
    fn notify(&self, _event: &str) {}
}

/// Build the notifier selected by configuration
pub fn build_notifier(config: &Config) -> Result<Arc<dyn SchedulerNotifier>> {
    match &config.scheduler_url {
        Some(url) => Ok(Arc::new(HttpSchedulerNotifier::new(
            url.clone(),
            config.fetch_timeout,
        )?)),
        None => {
            tracing::info!("No scheduler endpoint configured; notifications disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;

    #[test]
    fn no_endpoint_builds_noop() {
        let config = Config {
            db_path: ":memory:".into(),
            sma_window: 20,
            rsi_window: 14,
            period: "1mo".to_string(),
            interval: "1d".to_string(),
            provider: Provider::Yahoo,
            scheduler_url: None,
            fetch_timeout: Duration::from_secs(5),
        };

        let notifier = build_notifier(&config).unwrap();
        // Must not spawn or block when nothing is configured
        notifier.notify("add");
    }
}
