//! # ActorEntity Trait
//!
//! The contract a record type implements to be owned by a [`ResourceActor`](crate::ResourceActor).
//!
//! The actor keeps every entity in a single table and applies requests one at a time, so
//! each hook below runs with exclusive access to the entity it is given. Hooks are plain
//! synchronous functions: nothing inside the table boundary may await, which keeps every
//! request short and lets a single task serve any number of concurrent callers.
//!
//! Identity is supplied by the caller on creation. Creating an entity under an id that is
//! already present replaces the stored entity; the replaced value is handed back to the
//! caller alongside the new one (see [`Created`](crate::Created)).

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by a `ResourceActor`.
///
/// Associated types pin each actor to one payload shape: an `Order` actor only accepts
/// `OrderCreate` payloads and `OrderAction`s, and the compiler rejects anything else.
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier, assigned by whoever creates the entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Enum of entity-specific mutations (e.g. marking an item ready).
    type Action: Send + Sync + Debug;

    /// The result returned by an action.
    type ActionResult: Send + Sync + Debug;

    /// The error type for this entity.
    ///
    /// One error enum covers every action of the entity. Callers pattern match on a single
    /// type instead of one type per action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the entity from its id and creation payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the entity is stored.
    ///
    /// `replaced` is the entity currently stored under the same id, if any.
    fn on_create(&mut self, _replaced: Option<&Self>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an entity-specific action.
    ///
    /// The actor applies the action and reads back the result in the same step, so any
    /// state transition observed here is seen by exactly one caller.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}
