//! Error types for the Order actor.

use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Order mutations themselves never fail for well-formed input: unknown orders and
/// unknown items are reported through [`MarkOutcome`](crate::clients::MarkOutcome), not
/// as errors. What remains is the store being unreachable or a readiness task dying.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// An error occurred while communicating with the order actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),

    /// The task applying a readiness event panicked or was aborted.
    #[error("Readiness task failed: {0}")]
    TaskFailed(String),
}
