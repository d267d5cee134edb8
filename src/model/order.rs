//! Orders and their items.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tokio::time::Instant;

/// Identifier of an order, assigned by the ingestion source (the event's message id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle used to acknowledge the ingestion event an order came from.
///
/// Neither `Serialize` nor `Display`: it never leaves the process.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AckToken(String);

impl AckToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AckToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AckToken(..)")
    }
}

/// A named unit of an order with a monotone readiness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub ready: bool,
}

/// An order being prepared by the kitchen.
///
/// # Actor Framework
/// This struct implements [`ActorEntity`](tracker_actor::ActorEntity) (see
/// [`order_actor`](crate::order_actor)), so it lives inside a
/// [`ResourceActor`](tracker_actor::ResourceActor) and is only ever mutated there.
///
/// Items are fixed at creation. The only mutation afterwards is flipping an item's
/// `ready` flag from false to true.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<Item>,
    ack_token: Option<AckToken>,
    completed_at: Option<Instant>,
}

/// Payload for creating an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub items: Vec<String>,
    pub ack_token: Option<AckToken>,
}

impl OrderCreate {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            ack_token: None,
        }
    }

    pub fn with_ack_token(mut self, token: AckToken) -> Self {
        self.ack_token = Some(token);
        self
    }
}

/// What one `MarkItemReady` did to an order.
#[derive(Debug, Clone)]
pub struct ItemReadiness {
    /// Items whose flag flipped from false to true in this call.
    pub newly_ready: usize,
    /// Items carrying the requested name, ready before or not.
    pub matched: usize,
    /// True only for the call that completed the order.
    pub just_completed: bool,
    /// The order as it stood right after the call.
    pub order: Order,
}

impl Order {
    /// Creates an order with every item unready.
    pub fn new(id: OrderId, item_names: Vec<String>, ack_token: Option<AckToken>) -> Self {
        let items = item_names
            .into_iter()
            .map(|name| Item { name, ready: false })
            .collect();
        Self {
            id,
            items,
            ack_token,
            completed_at: None,
        }
    }

    /// True when every item is ready. An order without items is complete.
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|item| item.ready)
    }

    pub fn pending_items(&self) -> usize {
        self.items.iter().filter(|item| !item.ready).count()
    }

    pub fn ack_token(&self) -> Option<&AckToken> {
        self.ack_token.as_ref()
    }

    /// When the order became complete, if it has.
    pub fn completed_at(&self) -> Option<Instant> {
        self.completed_at
    }

    /// Stamps the completion time if the order is complete and not yet stamped.
    pub(crate) fn stamp_if_complete(&mut self) {
        if self.completed_at.is_none() && self.is_complete() {
            self.completed_at = Some(Instant::now());
        }
    }

    /// Marks every item named `name` as ready.
    ///
    /// Completion is evaluated before and after the mutation, so `just_completed` is true
    /// for exactly one call over the life of the order.
    pub fn mark_item_ready(&mut self, name: &str) -> ItemReadiness {
        let was_complete = self.is_complete();
        let mut matched = 0;
        let mut newly_ready = 0;
        for item in self.items.iter_mut().filter(|item| item.name == name) {
            matched += 1;
            if !item.ready {
                item.ready = true;
                newly_ready += 1;
            }
        }
        let just_completed = !was_complete && self.is_complete();
        if just_completed {
            self.stamp_if_complete();
        }
        ItemReadiness {
            newly_ready,
            matched,
            just_completed,
            order: self.clone(),
        }
    }
}
