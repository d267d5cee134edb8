//! Completion notifications.
//!
//! A [`CompletionNotifier`] delivers one completed order downstream. The
//! [`NotificationOutbox`] sits between the readiness path and the notifier so a slow or
//! failing endpoint never holds up order processing.

mod http;
mod outbox;

pub use http::HttpNotifier;
pub use outbox::{NotificationOutbox, OutboxStats, RetryPolicy};

use crate::model::OrderView;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Errors from a single delivery attempt.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("check endpoint rejected the order with status {status}")]
    Rejected { status: u16 },

    #[error("failed to encode order: {0}")]
    Encode(String),
}

/// Sends a completed order to the downstream check endpoint.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn notify(&self, order: &OrderView) -> Result<(), NotificationError>;
}

/// Notifier used when no check endpoint is configured. Logs and reports success.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl CompletionNotifier for LogNotifier {
    async fn notify(&self, order: &OrderView) -> Result<(), NotificationError> {
        info!(
            order_id = %order.order_id,
            items = order.items.len(),
            "No check endpoint configured, skipping notification"
        );
        Ok(())
    }
}
