use super::{CompletionNotifier, NotificationError};
use crate::model::OrderView;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// POSTs completed orders as JSON to the check endpoint.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpNotifier {
    /// Builds a notifier whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CompletionNotifier for HttpNotifier {
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    async fn notify(&self, order: &OrderView) -> Result<(), NotificationError> {
        let body = serde_json::to_vec(order).map_err(|e| NotificationError::Encode(e.to_string()))?;
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
            });
        }
        debug!(status = status.as_u16(), "Check endpoint accepted order");
        Ok(())
    }
}
