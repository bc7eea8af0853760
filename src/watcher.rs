//! §4.1c Target watcher — polls the endpoint client and emits newly seen
//! page targets (§6: 100ms default interval, 5s lost-endpoint timeout).

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::endpoint::{Endpoint, TargetDescriptor};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub lost_endpoint_timeout: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            lost_endpoint_timeout: Duration::from_secs(5),
        }
    }
}

/// Polls `endpoint` on `config.poll_interval` and pushes every page target
/// not previously seen. Stops (closing the channel) if the endpoint
/// can't be reached for `config.lost_endpoint_timeout`.
pub async fn watch(endpoint: Endpoint, config: WatcherConfig, tx: mpsc::Sender<TargetDescriptor>) {
    let mut seen = HashSet::new();
    let mut last_success = Instant::now();

    loop {
        match endpoint.list().await {
            Ok(targets) => {
                last_success = Instant::now();
                for target in targets {
                    if target.is_page() && seen.insert(target.id.clone()) {
                        if tx.send(target).await.is_err() {
                            return;
                        }
                    }
                }
            }
            Err(_) if Instant::now().duration_since(last_success) >= config.lost_endpoint_timeout => {
                return;
            }
            Err(_) => {}
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}

/// One-shot variant: a single `list` call filtered to page targets.
pub async fn list_pages(endpoint: &Endpoint) -> Result<Vec<TargetDescriptor>> {
    let targets = endpoint.list().await?;
    Ok(targets.into_iter().filter(TargetDescriptor::is_page).collect())
}
