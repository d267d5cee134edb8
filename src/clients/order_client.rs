//! # Order Client
//!
//! The Order Store contract. Wraps a `ResourceClient<Order>` and turns the generic actor
//! requests into the four store operations (create, mark ready, get, list incomplete)
//! plus eviction of completed orders.
//!
//! None of these operations fail for well-formed input. The only error is
//! [`OrderError::ActorCommunicationError`], raised when the order actor is gone.
use crate::model::{AckToken, Order, OrderCreate, OrderId};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use tokio::time::Instant;
use tracing::{debug, instrument};
use tracker_actor::{ActorClient, FrameworkError, ResourceClient};

/// Result of [`OrderClient::create_order`].
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    /// Snapshot of the order as stored.
    pub order: Order,
    /// An order with the same id was overwritten.
    pub replaced: bool,
    /// The order is complete on arrival and the order it replaced (if any) was not.
    ///
    /// Only orders without items can be complete on arrival.
    pub just_completed: bool,
}

/// Result of [`OrderClient::mark_item_ready`].
#[derive(Debug, Clone, Default)]
pub struct MarkOutcome {
    /// The order id was present in the store.
    pub found: bool,
    /// Items carrying the requested name.
    pub matched: usize,
    /// Items that flipped from unready to ready in this call.
    pub newly_ready: usize,
    /// This call completed the order. True for at most one call per order.
    pub just_completed: bool,
    /// The order as it stood right after this call.
    pub order: Option<Order>,
}

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Stores a new order with every item unready, overwriting any order with the same id.
    #[instrument(skip(self, items, ack_token), fields(items = items.len()))]
    pub async fn create_order(
        &self,
        id: OrderId,
        items: Vec<String>,
        ack_token: Option<AckToken>,
    ) -> Result<CreatedOrder, OrderError> {
        debug!("Sending request");
        let mut params = OrderCreate::new(items);
        if let Some(token) = ack_token {
            params = params.with_ack_token(token);
        }
        let created = self.inner.create(id, params).await.map_err(Self::map_error)?;

        let previously_complete = created
            .replaced
            .as_ref()
            .is_some_and(|order| order.is_complete());
        Ok(CreatedOrder {
            just_completed: created.entity.is_complete() && !previously_complete,
            replaced: created.replaced.is_some(),
            order: created.entity,
        })
    }

    /// Marks every item named `item` in order `id` as ready.
    ///
    /// An unknown id comes back as `found == false` rather than an error.
    #[instrument(skip(self))]
    pub async fn mark_item_ready(&self, id: OrderId, item: &str) -> Result<MarkOutcome, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::MarkItemReady(item.to_string()))
            .await
        {
            Ok(OrderActionResult::MarkItemReady(readiness)) => Ok(MarkOutcome {
                found: true,
                matched: readiness.matched,
                newly_ready: readiness.newly_ready,
                just_completed: readiness.just_completed,
                order: Some(readiness.order),
            }),
            Err(e) if e.is_not_found() => Ok(MarkOutcome::default()),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Snapshot of one order.
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.get(id).await
    }

    /// Snapshot of every order that still has unready items.
    #[instrument(skip(self))]
    pub async fn list_incomplete(&self) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        self.inner
            .list(|order: &Order| !order.is_complete())
            .await
            .map_err(Self::map_error)
    }

    /// Removes every order that completed before `cutoff`. Returns how many were removed.
    #[instrument(skip(self))]
    pub async fn evict_completed(&self, cutoff: Instant) -> Result<usize, OrderError> {
        debug!("Sending request");
        self.inner
            .retain(move |order: &Order| order.completed_at().map_or(true, |at| at >= cutoff))
            .await
            .map_err(Self::map_error)
    }
}

impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::ActorCommunicationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemReadiness;
    use tracker_actor::mock::MockClient;
    use tracker_actor::Created;

    fn order(id: &str, items: &[(&str, bool)]) -> Order {
        let mut order = Order::new(
            id.into(),
            items.iter().map(|(name, _)| name.to_string()).collect(),
            None,
        );
        for (item, (_, ready)) in order.items.iter_mut().zip(items) {
            item.ready = *ready;
        }
        order
    }

    #[tokio::test]
    async fn test_unknown_order_maps_to_not_found_outcome() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action("Z9".into())
            .return_err(FrameworkError::NotFound("Z9".into()));
        let client = OrderClient::new(mock.client());

        let outcome = client.mark_item_ready("Z9".into(), "Taco").await.unwrap();
        assert!(!outcome.found);
        assert!(!outcome.just_completed);
        assert!(outcome.order.is_none());
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_an_error() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action("A1".into())
            .return_err(FrameworkError::ActorClosed);
        mock.expect_list().return_err(FrameworkError::ActorDropped);
        let client = OrderClient::new(mock.client());

        let err = client.mark_item_ready("A1".into(), "Taco").await.unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunicationError(_)));
        assert!(client.list_incomplete().await.is_err());
        mock.verify();
    }

    #[tokio::test]
    async fn test_readiness_is_passed_through() {
        let mut mock = MockClient::<Order>::new();
        let done = order("A1", &[("Taco", true)]);
        mock.expect_action("A1".into())
            .return_ok(OrderActionResult::MarkItemReady(ItemReadiness {
                newly_ready: 1,
                matched: 1,
                just_completed: true,
                order: done,
            }));
        let client = OrderClient::new(mock.client());

        let outcome = client.mark_item_ready("A1".into(), "Taco").await.unwrap();
        assert!(outcome.found && outcome.just_completed);
        assert_eq!(outcome.newly_ready, 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_empty_order_creation_edge() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_create("A2".into()).return_ok(Created {
            entity: order("A2", &[]),
            replaced: None,
        });
        mock.expect_create("A2".into()).return_ok(Created {
            entity: order("A2", &[]),
            replaced: Some(order("A2", &[])),
        });
        mock.expect_create("A3".into()).return_ok(Created {
            entity: order("A3", &[("Taco", false)]),
            replaced: None,
        });
        let client = OrderClient::new(mock.client());

        let first = client.create_order("A2".into(), vec![], None).await.unwrap();
        assert!(first.just_completed && !first.replaced);

        // Redelivery of an already complete order is not a new edge
        let again = client.create_order("A2".into(), vec![], None).await.unwrap();
        assert!(!again.just_completed && again.replaced);

        let pending = client
            .create_order("A3".into(), vec!["Taco".into()], None)
            .await
            .unwrap();
        assert!(!pending.just_completed);
        mock.verify();
    }
}
