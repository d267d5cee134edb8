//! # Kitchen Tracker
//!
//! Tracks orders made of several items, applies "item ready" events to them, and sends
//! each order downstream exactly once, at the moment its last item becomes ready.
//!
//! ## Design
//!
//! ### Single-writer Order Store
//! Every order lives inside one [`ResourceActor`](tracker_actor::ResourceActor) task. All
//! reads and writes are messages to that task, so no lock guards the order table and no
//! caller ever sees an order halfway through a mutation.
//!
//! ### Edge-triggered completion
//! The actor evaluates "is this order complete?" before and after each mutation. Only the
//! call that flips the answer from no to yes reports `just_completed`, which is what makes
//! the notification fire once, however many readiness events race for the last item.
//!
//! ### No I/O inside the store
//! Pulling events, acknowledging them, and calling the check endpoint all happen outside
//! the actor. Notifications go through a [`NotificationOutbox`](notifier::NotificationOutbox)
//! that retries with backoff on its own task.
//!
//! ## Module Tour
//!
//! - [`model`]: [`Order`](model::Order), [`Item`](model::Item) and their JSON forms
//! - [`order_actor`]: the [`ActorEntity`](tracker_actor::ActorEntity) implementation for orders
//! - [`clients`]: [`OrderClient`](clients::OrderClient), the typed Order Store contract
//! - [`ingestion`]: event sources and the [`IngestionAdapter`](ingestion::IngestionAdapter)
//! - [`readiness`]: the [`ReadinessHandler`](readiness::ReadinessHandler)
//! - [`notifier`]: check endpoint delivery and the outbox
//! - [`api`]: the axum router
//! - [`config`]: flags and environment variables
//! - [`lifecycle`]: [`KitchenSystem`](lifecycle::KitchenSystem), eviction, tracing setup
//!
//! ## Running
//!
//! ```bash
//! CHECK=http://localhost:9000/check RUST_LOG=info cargo run
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod ingestion;
pub mod lifecycle;
pub mod model;
pub mod notifier;
pub mod order_actor;
pub mod readiness;
