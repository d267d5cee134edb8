//! # Generic Client
//!
//! The sending half of a [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Created, Response, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

/// A type-safe, cloneable handle for sending requests to a `ResourceActor`.
///
/// Every method sends one request and awaits its answer over a oneshot channel. A request
/// that was delivered is always applied in full, even if the caller stops waiting for the
/// answer.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Derived Clone would require `T: Clone` on the id and payload types too.
impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Insert or overwrite the entity stored under `id`.
    pub async fn create(&self, id: T::Id, params: T::Create) -> Result<Created<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Create {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Snapshot every entity matching `filter`, all taken at the same point in time.
    pub async fn list(
        &self,
        filter: impl Fn(&T) -> bool + Send + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::List {
            filter: Box::new(filter),
            respond_to,
        })
        .await
    }

    /// Apply an action to one entity. Fails with [`FrameworkError::NotFound`] if `id` is absent.
    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Drop every entity for which `keep` returns false. Returns how many were dropped.
    pub async fn retain(
        &self,
        keep: impl Fn(&T) -> bool + Send + 'static,
    ) -> Result<usize, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Retain {
            keep: Box::new(keep),
            respond_to,
        })
        .await
    }
}
