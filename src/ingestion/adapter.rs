//! Poll loop that turns ingestion events into orders and acknowledges them.

use super::{IngestionError, IngestionEvent, IngestionSource};
use crate::clients::OrderClient;
use crate::model::{NewOrder, OrderId, OrderView};
use crate::notifier::NotificationOutbox;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct IngestionSettings {
    /// Events pulled per cycle.
    pub max_batch: usize,
    /// Longest a single pull may wait. Bounds how long a stop request goes unnoticed.
    pub poll_wait: Duration,
    /// Pause after a failed pull before trying again.
    pub error_backoff: Duration,
    /// Send a notification for orders that arrive with no items.
    pub notify_empty_orders: bool,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            max_batch: 5,
            poll_wait: Duration::from_secs(3),
            error_backoff: Duration::from_secs(1),
            notify_empty_orders: true,
        }
    }
}

/// What happened to one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Orders created (or overwritten).
    pub created: usize,
    /// Events that failed to decode. Left unacknowledged.
    pub dropped: usize,
    /// Events whose order could not be stored. Left unacknowledged.
    pub failed: usize,
    /// Orders created whose event could not be acknowledged.
    pub ack_failures: usize,
}

/// Pulls "new order" events from a source and feeds them to the order store.
pub struct IngestionAdapter {
    source: Arc<dyn IngestionSource>,
    orders: OrderClient,
    outbox: NotificationOutbox,
    settings: IngestionSettings,
}

impl IngestionAdapter {
    pub fn new(
        source: Arc<dyn IngestionSource>,
        orders: OrderClient,
        outbox: NotificationOutbox,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            source,
            orders,
            outbox,
            settings,
        }
    }

    /// Polls until `stop` is cancelled.
    ///
    /// The stop signal is checked between cycles, so a batch already pulled is always
    /// processed to the end. Anything pulled but not acknowledged stays with the source.
    pub async fn run(self, stop: CancellationToken) {
        info!(
            max_batch = self.settings.max_batch,
            poll_wait_ms = self.settings.poll_wait.as_millis() as u64,
            "Ingestion started"
        );

        while !stop.is_cancelled() {
            let events = match self
                .source
                .receive(self.settings.max_batch, self.settings.poll_wait)
                .await
            {
                Ok(events) => events,
                Err(e) => {
                    error!(error = %e, "Failed to receive order events");
                    tokio::select! {
                        _ = sleep(self.settings.error_backoff) => {}
                        _ = stop.cancelled() => {}
                    }
                    continue;
                }
            };

            if events.is_empty() {
                continue;
            }
            let report = self.process_batch(events).await;
            debug!(?report, "Processed order batch");
        }

        info!("Ingestion stopped");
    }

    /// Handles every event of a batch. A failing event never affects the others.
    pub async fn process_batch(&self, events: Vec<IngestionEvent>) -> BatchReport {
        let mut report = BatchReport::default();

        for event in events {
            let items = match decode(&event) {
                Ok(order) => order.into_items(),
                Err(e) => {
                    warn!(error = %e, "Dropping order event");
                    report.dropped += 1;
                    continue;
                }
            };

            let order_id = OrderId::from(event.message_id);
            let created = match self
                .orders
                .create_order(order_id.clone(), items, Some(event.ack_token.clone()))
                .await
            {
                Ok(created) => created,
                Err(e) => {
                    error!(order_id = %order_id, error = %e, "Failed to store order, leaving event for redelivery");
                    report.failed += 1;
                    continue;
                }
            };
            report.created += 1;
            info!(
                order_id = %order_id,
                items = created.order.items.len(),
                replaced = created.replaced,
                "Added order to pending orders"
            );

            if created.just_completed && self.settings.notify_empty_orders {
                info!(order_id = %order_id, "Order arrived with no items, it is ready");
                self.outbox.enqueue(OrderView::from(&created.order));
            }

            if let Err(e) = self.source.acknowledge(&event.ack_token).await {
                warn!(order_id = %order_id, error = %e, "Failed to acknowledge order event");
                report.ack_failures += 1;
            }
        }

        report
    }
}

fn decode(event: &IngestionEvent) -> Result<NewOrder, IngestionError> {
    serde_json::from_str(&event.body).map_err(|source| IngestionError::Decode {
        message_id: event.message_id.clone(),
        source,
    })
}
