//! # Order Actor
//!
//! The Order Store: a [`ResourceActor`] holding every known [`Order`].
//!
//! ## Structure
//!
//! - [`entity`]: [`ActorEntity`](tracker_actor::ActorEntity) implementation for [`Order`]
//! - [`actions`]: [`OrderAction`] and [`OrderActionResult`]
//! - [`error`]: [`OrderError`]
//! - [`new()`]: factory for the actor and its client
//!
//! ## Usage
//!
//! ```rust
//! use kitchen_tracker::clients::OrderClient;
//! use kitchen_tracker::order_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = order_actor::new();
//!     tokio::spawn(actor.run());
//!
//!     let orders = OrderClient::new(client);
//!     orders.create_order("A1".into(), vec!["Taco".into()], None).await?;
//!     let outcome = orders.mark_item_ready("A1".into(), "Taco").await?;
//!     assert!(outcome.found && outcome.just_completed);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use tracker_actor::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new() -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(256)
}
