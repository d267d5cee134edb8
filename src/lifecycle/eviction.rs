//! Periodic removal of completed orders.

use crate::clients::OrderClient;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Every `every`, evicts orders that completed more than `retention` ago.
///
/// Incomplete orders are never evicted. Runs until `stop` is cancelled.
pub async fn run_sweeper(
    orders: OrderClient,
    retention: Duration,
    every: Duration,
    stop: CancellationToken,
) {
    info!(
        retention_secs = retention.as_secs(),
        every_secs = every.as_secs(),
        "Eviction sweeper started"
    );
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(cutoff) = Instant::now().checked_sub(retention) else {
            continue;
        };
        match orders.evict_completed(cutoff).await {
            Ok(0) => debug!("No completed orders to evict"),
            Ok(evicted) => info!(evicted, "Evicted completed orders"),
            Err(e) => {
                error!(error = %e, "Order store unavailable, stopping sweeper");
                break;
            }
        }
    }
    info!("Eviction sweeper stopped");
}
