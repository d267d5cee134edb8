//! Applies "item ready" events to the order store.

use crate::clients::{MarkOutcome, OrderClient};
use crate::model::{OrderView, ReadyEvent};
use crate::notifier::NotificationOutbox;
use crate::order_actor::OrderError;
use tracing::{info, instrument, warn, Instrument};

/// Marks items ready and hands completed orders to the notification outbox.
///
/// Unknown orders and unknown items are logged and otherwise ignored. The only errors are
/// the order store being gone and the readiness task itself failing.
#[derive(Clone)]
pub struct ReadinessHandler {
    orders: OrderClient,
    outbox: NotificationOutbox,
}

impl ReadinessHandler {
    pub fn new(orders: OrderClient, outbox: NotificationOutbox) -> Self {
        Self { orders, outbox }
    }

    /// Applies one readiness event.
    ///
    /// The mark and the notification enqueue run on their own task. Dropping the returned
    /// future stops the wait, not the work: an order completed by this event is always
    /// handed to the outbox.
    pub async fn handle(&self, event: ReadyEvent) -> Result<MarkOutcome, OrderError> {
        let this = self.clone();
        tokio::spawn(async move { this.apply(event).await }.in_current_span())
            .await
            .map_err(|e| OrderError::TaskFailed(e.to_string()))?
    }

    #[instrument(skip(self, event), fields(order_id = %event.order_id, item = %event.item))]
    async fn apply(&self, event: ReadyEvent) -> Result<MarkOutcome, OrderError> {
        let outcome = self
            .orders
            .mark_item_ready(event.order_id.clone(), &event.item)
            .await?;

        let Some(order) = outcome.order.as_ref() else {
            warn!("Readiness event for unknown order");
            return Ok(outcome);
        };
        if outcome.matched == 0 {
            warn!("Order has no item with that name");
            return Ok(outcome);
        }
        info!(
            newly_ready = outcome.newly_ready,
            pending = order.pending_items(),
            "Item is ready"
        );

        if outcome.just_completed {
            info!("Order is ready");
            self.outbox.enqueue(OrderView::from(order));
        }
        Ok(outcome)
    }
}
