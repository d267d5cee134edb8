//! # Framework Errors
//!
//! Errors raised by the actor runtime itself, as opposed to errors raised by an entity's
//! own hooks (those arrive wrapped in [`FrameworkError::EntityError`]).

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The actor task is gone; the request was never delivered.
    #[error("Actor closed")]
    ActorClosed,
    /// The actor accepted the request but never answered it.
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the request reached the actor and the id was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FrameworkError::NotFound(_))
    }
}
