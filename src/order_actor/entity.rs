//! [`ActorEntity`] implementation for [`Order`].

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::model::{Order, OrderCreate, OrderId};
use tracker_actor::ActorEntity;

impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(id, params.items, params.ack_token))
    }

    /// An order created without items is complete from the start.
    fn on_create(&mut self, _replaced: Option<&Self>) -> Result<(), Self::Error> {
        self.stamp_if_complete();
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::MarkItemReady(name) => {
                Ok(OrderActionResult::MarkItemReady(self.mark_item_ready(&name)))
            }
        }
    }
}
