//! # Tracker Actor
//!
//! A small runtime for keeping a table of records behind a single-writer actor.
//!
//! ## Why an actor?
//!
//! Many tasks read and mutate the same table concurrently: a background task feeding new
//! records, request handlers mutating them, and listeners reading snapshots. Instead of
//! sharing the table behind a lock, one Tokio task owns it and every other task talks to
//! it over a channel.
//!
//! - **Serialized mutations**: requests are applied one at a time, in arrival order.
//! - **Consistent snapshots**: a `List` request copies the matching records in one step,
//!   so a reader never sees a record mid-mutation.
//! - **Atomic read-after-write**: an action mutates a record and computes its result in the
//!   same step, which makes "did *this* call cause the transition?" answerable without races.
//! - **No I/O inside the boundary**: entity hooks are synchronous. Anything that talks to
//!   the network happens in the caller, before or after the request.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the record type and its mutation rules.
//! 2. **Runtime** ([`ResourceActor`]): owns the table and processes [`ResourceRequest`]s.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): cloneable async handles.
//!
//! ## Shutdown
//!
//! The actor loop ends when the last client is dropped. Requests already queued are still
//! answered before the loop exits.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from scripted expectations so that code around a
//! client can be tested without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Created, Predicate, ResourceRequest, Response};
