//! # Single-Writer Actor
//!
//! [`ResourceActor`] owns a table of entities and the receiving end of a bounded channel.
//! It is the only code that ever touches the table: requests are applied one at a time in
//! arrival order, so no caller can observe an entity half-way through a mutation and two
//! mutations of the same entity can never interleave.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Created, ResourceRequest};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns a collection of entities.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor (server) and a client (interface).
/// 2. **Run**: spawn `actor.run()` in a background task.
/// 3. **Share**: clone the client into every task that needs the table.
///
/// The loop ends once every client has been dropped, after the requests already queued
/// have been answered.
///
/// ```rust
/// use tracker_actor::{ActorEntity, ResourceActor};
///
/// #[derive(Clone, Debug)] struct Counter { id: u32, hits: u32 }
/// #[derive(Debug)] struct CounterCreate;
/// #[derive(Debug)] enum CounterAction { Hit }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// impl ActorEntity for Counter {
///     type Id = u32;
///     type Create = CounterCreate;
///     type Action = CounterAction;
///     type ActionResult = u32;
///     type Error = CounterError;
///
///     fn from_create_params(id: u32, _: CounterCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, hits: 0 })
///     }
///     fn handle_action(&mut self, action: CounterAction) -> Result<u32, Self::Error> {
///         match action {
///             CounterAction::Hit => { self.hits += 1; Ok(self.hits) }
///         }
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Counter>::new(10);
///     tokio::spawn(actor.run());
///
///     client.create(7, CounterCreate).await.unwrap();
///     let hits = client.perform_action(7, CounterAction::Hit).await.unwrap();
///     assert_eq!(hits, 1);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the channel capacity; once it is full, callers wait for room.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop, processing requests until every client is dropped.
    pub async fn run(mut self) {
        // Short type name (e.g. "Order") for log fields
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(request) = self.receiver.recv().await {
            self.apply(entity_type, request);
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn apply(&mut self, entity_type: &'static str, request: ResourceRequest<T>) {
        match request {
            ResourceRequest::Create {
                id,
                params,
                respond_to,
            } => {
                debug!(entity_type, %id, ?params, "Create");
                let result = T::from_create_params(id.clone(), params).and_then(|mut entity| {
                    entity.on_create(self.store.get(&id))?;
                    Ok(entity)
                });
                match result {
                    Ok(entity) => {
                        let replaced = self.store.insert(id.clone(), entity.clone());
                        info!(
                            entity_type,
                            %id,
                            replaced = replaced.is_some(),
                            size = self.store.len(),
                            "Created"
                        );
                        let _ = respond_to.send(Ok(Created { entity, replaced }));
                    }
                    Err(e) => {
                        warn!(entity_type, %id, error = %e, "Create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    }
                }
            }
            ResourceRequest::Get { id, respond_to } => {
                let entity = self.store.get(&id).cloned();
                debug!(entity_type, %id, found = entity.is_some(), "Get");
                let _ = respond_to.send(Ok(entity));
            }
            ResourceRequest::List { filter, respond_to } => {
                let entities: Vec<T> = self
                    .store
                    .values()
                    .filter(|entity| filter(*entity))
                    .cloned()
                    .collect();
                debug!(entity_type, matched = entities.len(), size = self.store.len(), "List");
                let _ = respond_to.send(Ok(entities));
            }
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            } => {
                debug!(entity_type, %id, ?action, "Action");
                let Some(entity) = self.store.get_mut(&id) else {
                    debug!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    return;
                };
                let result = entity
                    .handle_action(action)
                    .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                if let Err(e) = &result {
                    warn!(entity_type, %id, error = %e, "Action failed");
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Retain { keep, respond_to } => {
                let before = self.store.len();
                self.store.retain(|_, entity| keep(entity));
                let dropped = before - self.store.len();
                if dropped > 0 {
                    info!(entity_type, dropped, size = self.store.len(), "Retained");
                }
                let _ = respond_to.send(Ok(dropped));
            }
        }
    }
}
