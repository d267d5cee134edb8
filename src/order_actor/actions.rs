//! Custom actions for the Order actor.
//!
//! Handled by [`ActorEntity::handle_action`](tracker_actor::ActorEntity::handle_action) on
//! [`Order`](crate::model::Order).

use crate::model::ItemReadiness;

/// Mutations that can be applied to a stored order.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Marks every item with the given name as ready.
    MarkItemReady(String),
}

/// Results from OrderActions, variants match 1:1 with OrderAction.
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    MarkItemReady(ItemReadiness),
}
