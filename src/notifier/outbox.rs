use super::CompletionNotifier;
use crate::model::OrderView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Exponential backoff between delivery attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per notification, the first one included. `1` means no retry.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Log the failure and give up.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after `failed_attempts` consecutive failures.
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Delivery counts reported by the outbox worker when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutboxStats {
    pub delivered: usize,
    pub dead_lettered: usize,
}

impl OutboxStats {
    fn record(&mut self, result: Result<bool, JoinError>) {
        match result {
            Ok(true) => self.delivered += 1,
            Ok(false) => self.dead_lettered += 1,
            Err(e) => {
                error!(error = %e, "Notification delivery task failed");
                self.dead_lettered += 1;
            }
        }
    }
}

/// Handle for queueing completion notifications.
///
/// Enqueueing never waits on the network. A single worker task owns the queue and runs
/// one delivery per notification, retrying with [`RetryPolicy`]. The worker finishes when
/// `stop` is cancelled (queued notifications then get one attempt each) or when every
/// handle has been dropped and all deliveries have settled.
#[derive(Clone)]
pub struct NotificationOutbox {
    sender: mpsc::UnboundedSender<OrderView>,
}

impl NotificationOutbox {
    pub fn start(
        notifier: Arc<dyn CompletionNotifier>,
        policy: RetryPolicy,
        stop: CancellationToken,
    ) -> (Self, JoinHandle<OutboxStats>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = OutboxWorker {
            receiver,
            notifier,
            policy,
            stop,
        };
        (Self { sender }, tokio::spawn(worker.run()))
    }

    /// Queues `order` for delivery. Returns false if the worker has already stopped.
    pub fn enqueue(&self, order: OrderView) -> bool {
        match self.sender.send(order) {
            Ok(()) => true,
            Err(mpsc::error::SendError(order)) => {
                error!(order_id = %order.order_id, "Notification outbox is closed, dropping notification");
                false
            }
        }
    }
}

struct OutboxWorker {
    receiver: mpsc::UnboundedReceiver<OrderView>,
    notifier: Arc<dyn CompletionNotifier>,
    policy: RetryPolicy,
    stop: CancellationToken,
}

impl OutboxWorker {
    async fn run(mut self) -> OutboxStats {
        info!(max_attempts = self.policy.max_attempts, "Notification outbox started");
        let mut stats = OutboxStats::default();
        let mut deliveries = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => break,
                Some(result) = deliveries.join_next(), if !deliveries.is_empty() => stats.record(result),
                received = self.receiver.recv() => match received {
                    Some(order) => {
                        deliveries.spawn(deliver(
                            self.notifier.clone(),
                            self.policy.clone(),
                            order,
                            self.stop.clone(),
                        ));
                    }
                    None => break,
                },
            }
        }

        self.receiver.close();
        while let Ok(order) = self.receiver.try_recv() {
            deliveries.spawn(deliver(
                self.notifier.clone(),
                self.policy.clone(),
                order,
                self.stop.clone(),
            ));
        }
        while let Some(result) = deliveries.join_next().await {
            stats.record(result);
        }

        info!(
            delivered = stats.delivered,
            dead_lettered = stats.dead_lettered,
            "Notification outbox stopped"
        );
        stats
    }
}

/// Delivers one notification. Once `stop` is cancelled, the next failure is final.
async fn deliver(
    notifier: Arc<dyn CompletionNotifier>,
    policy: RetryPolicy,
    order: OrderView,
    stop: CancellationToken,
) -> bool {
    let mut attempt = 0;
    loop {
        attempt += 1;
        debug!(order_id = %order.order_id, attempt, "Sending order to check endpoint");

        match notifier.notify(&order).await {
            Ok(()) => {
                info!(order_id = %order.order_id, attempt, "Order sent to check endpoint");
                return true;
            }
            Err(e) if attempt >= policy.max_attempts || stop.is_cancelled() => {
                error!(
                    order_id = %order.order_id,
                    attempt,
                    error = %e,
                    "Giving up on notification, order dead-lettered"
                );
                return false;
            }
            Err(e) => {
                let delay = policy.backoff(attempt);
                warn!(
                    order_id = %order.order_id,
                    attempt,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Notification failed, retrying after delay"
                );
                tokio::select! {
                    _ = sleep(delay) => {}
                    _ = stop.cancelled() => {}
                }
            }
        }
    }
}
