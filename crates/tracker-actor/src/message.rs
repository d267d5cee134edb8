//! # Requests
//!
//! The message types exchanged between a [`ResourceClient`](crate::ResourceClient) and its
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate evaluated inside the actor against every stored entity.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send>;

/// Outcome of a `Create` request.
#[derive(Debug, Clone)]
pub struct Created<T> {
    /// Snapshot of the entity as stored.
    pub entity: T,
    /// The entity previously stored under the same id, if it was overwritten.
    pub replaced: Option<T>,
}

/// A request sent to the actor.
///
/// - **Create**: insert or overwrite under a caller-supplied id.
/// - **Get**: snapshot of one entity.
/// - **List**: snapshots of every entity matching a predicate, taken in one step.
/// - **Action**: entity-specific mutation, see [`ActorEntity::handle_action`].
/// - **Retain**: drop every entity failing a predicate.
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        id: T::Id,
        params: T::Create,
        respond_to: Response<Created<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Predicate<T>,
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Retain {
        keep: Predicate<T>,
        respond_to: Response<usize>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::Create { .. } => "Create",
            ResourceRequest::Get { .. } => "Get",
            ResourceRequest::List { .. } => "List",
            ResourceRequest::Action { .. } => "Action",
            ResourceRequest::Retain { .. } => "Retain",
        }
    }
}
