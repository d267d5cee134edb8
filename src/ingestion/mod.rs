//! Ingestion of new orders.
//!
//! An [`IngestionSource`] hands out batches of raw events and takes acknowledgments. The
//! [`IngestionAdapter`] decodes each event, creates the order, and only then acknowledges
//! it, so an event that could not be stored is redelivered by the source.

mod adapter;
mod memory;

pub use adapter::{BatchReport, IngestionAdapter, IngestionSettings};
pub use memory::MemoryQueue;

use crate::model::AckToken;
use crate::order_actor::OrderError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to decode event {message_id}: {source}")]
    Decode {
        message_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to receive events: {0}")]
    Receive(String),

    #[error("failed to acknowledge event: {0}")]
    Acknowledge(String),

    #[error(transparent)]
    Store(#[from] OrderError),
}

/// One raw "new order" event as pulled from a source.
#[derive(Debug, Clone)]
pub struct IngestionEvent {
    /// Source-assigned identifier. Becomes the order id.
    pub message_id: String,
    pub body: String,
    pub ack_token: AckToken,
}

/// A pull-based event source with explicit acknowledgment.
#[async_trait]
pub trait IngestionSource: Send + Sync {
    /// Returns up to `max_events` events, waiting at most `wait` for the first one.
    ///
    /// An empty batch means nothing arrived in time.
    async fn receive(
        &self,
        max_events: usize,
        wait: Duration,
    ) -> Result<Vec<IngestionEvent>, IngestionError>;

    /// Confirms an event was handled so the source does not redeliver it.
    async fn acknowledge(&self, token: &AckToken) -> Result<(), IngestionError>;
}
