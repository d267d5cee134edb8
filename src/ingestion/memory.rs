//! In-process ingestion queue with per-message visibility timeouts.

use super::{IngestionError, IngestionEvent, IngestionSource};
use crate::model::AckToken;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Message {
    id: String,
    body: String,
}

#[derive(Debug)]
struct InFlight {
    message: Message,
    visible_at: Instant,
}

#[derive(Debug, Default)]
struct QueueState {
    visible: VecDeque<Message>,
    /// Keyed by receipt token.
    in_flight: HashMap<String, InFlight>,
}

/// In-process queue with visibility-timeout semantics.
///
/// A received message stays in flight under a fresh receipt token. Acknowledging the
/// token deletes it. If the visibility timeout passes first, the message becomes visible
/// again and its old token goes stale.
#[derive(Debug)]
pub struct MemoryQueue {
    state: Mutex<QueueState>,
    arrivals: Notify,
    visibility_timeout: Duration,
}

impl MemoryQueue {
    pub fn new(visibility_timeout: Duration) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            arrivals: Notify::new(),
            visibility_timeout,
        }
    }

    /// Appends a message under a fresh id and returns that id.
    pub fn publish(&self, body: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.publish_with_id(id.clone(), body);
        id
    }

    /// Appends a message under a caller-chosen id.
    pub fn publish_with_id(&self, id: impl Into<String>, body: impl Into<String>) {
        let message = Message {
            id: id.into(),
            body: body.into(),
        };
        debug!(message_id = %message.id, "Published message");
        self.lock().visible.push_back(message);
        self.arrivals.notify_one();
    }

    /// Messages waiting to be received, counting expired in-flight ones.
    pub fn visible_len(&self) -> usize {
        let now = Instant::now();
        let state = self.lock();
        state.visible.len()
            + state
                .in_flight
                .values()
                .filter(|entry| entry.visible_at <= now)
                .count()
    }

    /// Messages received but neither acknowledged nor expired.
    pub fn in_flight_len(&self) -> usize {
        let now = Instant::now();
        self.lock()
            .in_flight
            .values()
            .filter(|entry| entry.visible_at > now)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes up to `max` visible messages. Also returns when the next in-flight message
    /// expires, so an empty poll knows how long it may sleep.
    fn take_visible(&self, max: usize) -> (Vec<IngestionEvent>, Option<Instant>) {
        let now = Instant::now();
        let mut state = self.lock();

        let expired: Vec<String> = state
            .in_flight
            .iter()
            .filter(|(_, entry)| entry.visible_at <= now)
            .map(|(token, _)| token.clone())
            .collect();
        for token in expired {
            if let Some(entry) = state.in_flight.remove(&token) {
                trace!(message_id = %entry.message.id, "Visibility timeout expired");
                state.visible.push_back(entry.message);
            }
        }

        let mut batch = Vec::new();
        while batch.len() < max {
            let Some(message) = state.visible.pop_front() else {
                break;
            };
            let token = Uuid::new_v4().to_string();
            batch.push(IngestionEvent {
                message_id: message.id.clone(),
                body: message.body.clone(),
                ack_token: AckToken::new(token.clone()),
            });
            state.in_flight.insert(
                token,
                InFlight {
                    message,
                    visible_at: now + self.visibility_timeout,
                },
            );
        }

        let next_expiry = state.in_flight.values().map(|entry| entry.visible_at).min();
        (batch, next_expiry)
    }
}

#[async_trait]
impl IngestionSource for MemoryQueue {
    async fn receive(
        &self,
        max_events: usize,
        wait: Duration,
    ) -> Result<Vec<IngestionEvent>, IngestionError> {
        let deadline = Instant::now() + wait;
        loop {
            let (batch, next_expiry) = self.take_visible(max_events);
            if !batch.is_empty() || max_events == 0 || Instant::now() >= deadline {
                return Ok(batch);
            }
            let wake_at = next_expiry.map_or(deadline, |at| at.min(deadline));
            tokio::select! {
                _ = self.arrivals.notified() => {}
                _ = sleep_until(wake_at) => {}
            }
        }
    }

    async fn acknowledge(&self, token: &AckToken) -> Result<(), IngestionError> {
        match self.lock().in_flight.remove(token.as_str()) {
            Some(entry) => {
                debug!(message_id = %entry.message.id, "Acknowledged message");
                Ok(())
            }
            None => Err(IngestionError::Acknowledge(
                "receipt token is unknown or has expired".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receive_respects_batch_size() {
        let queue = MemoryQueue::new(Duration::from_secs(30));
        for n in 0..3 {
            queue.publish_with_id(format!("m{n}"), "{}");
        }

        let batch = queue.receive(2, Duration::ZERO).await.unwrap();
        let ids: Vec<_> = batch.iter().map(|e| e.message_id.as_str()).collect();
        assert_eq!(ids, vec!["m0", "m1"]);
        assert_eq!(queue.in_flight_len(), 2);
        assert_eq!(queue.visible_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_receive_returns_after_wait() {
        let queue = MemoryQueue::new(Duration::from_secs(30));
        let started = Instant::now();
        let batch = queue.receive(5, Duration::from_secs(3)).await.unwrap();
        assert!(batch.is_empty());
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_wakes_on_publish() {
        let queue = std::sync::Arc::new(MemoryQueue::new(Duration::from_secs(30)));
        let publisher = queue.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            publisher.publish_with_id("late", "{}");
        });

        let started = Instant::now();
        let batch = queue.receive(5, Duration::from_secs(20)).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unacknowledged_message_is_redelivered() {
        let queue = MemoryQueue::new(Duration::from_secs(30));
        queue.publish_with_id("m1", r#"{"items": ["Taco"]}"#);

        let first = queue.receive(1, Duration::ZERO).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(queue.receive(1, Duration::ZERO).await.unwrap().is_empty());

        tokio::time::advance(Duration::from_secs(31)).await;
        let second = queue.receive(1, Duration::ZERO).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].message_id, "m1");

        // The first receipt went stale when the message was redelivered
        assert!(matches!(
            queue.acknowledge(&first[0].ack_token).await,
            Err(IngestionError::Acknowledge(_))
        ));
        queue.acknowledge(&second[0].ack_token).await.unwrap();
        assert_eq!(queue.in_flight_len(), 0);
        assert_eq!(queue.visible_len(), 0);
    }

    #[tokio::test]
    async fn test_acknowledge_twice_fails() {
        let queue = MemoryQueue::new(Duration::from_secs(30));
        let id = queue.publish("{}");
        let batch = queue.receive(1, Duration::ZERO).await.unwrap();
        assert_eq!(batch[0].message_id, id);

        queue.acknowledge(&batch[0].ack_token).await.unwrap();
        assert!(queue.acknowledge(&batch[0].ack_token).await.is_err());
    }
}
