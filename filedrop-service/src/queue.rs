//! Notification queue abstraction.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

/// A message received from the incoming queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Receipt used to delete the message after processing.
    pub receipt: String,
    /// Raw notification body.
    pub body: String,
}

/// Message sent to the outgoing queue when the service goes idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownMessage {
    /// Instance the controller should act on.
    pub instance_id: String,
    /// Action requested of the controller.
    pub action: String,
}

impl ShutdownMessage {
    /// Builds the stop request for `instance_id`.
    pub fn stop(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            action: "stop".to_string(),
        }
    }
}

/// Transport used to receive notifications and emit the shutdown request.
///
/// Transport semantics — redelivery, visibility windows, dead-lettering —
/// belong to the implementation. The service only receives, deletes, and
/// sends.
pub trait NotificationQueue {
    /// Receives the next batch of messages. May return an empty batch when
    /// nothing is pending.
    fn receive(&self) -> impl Future<Output = anyhow::Result<Vec<QueueMessage>>> + Send;

    /// Deletes a processed message.
    fn delete(&self, message: &QueueMessage) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Sends the shutdown request to the outgoing queue.
    fn send_shutdown(
        &self,
        message: ShutdownMessage,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Default)]
struct MemoryQueueInner {
    pending: VecDeque<QueueMessage>,
    deleted: Vec<String>,
    shutdowns: Vec<ShutdownMessage>,
    next_receipt: usize,
}

/// In-process queue for development and tests.
///
/// Clones share the same underlying state, so a test can keep one handle for
/// pushing and inspection while the service loop owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    inner: Arc<Mutex<MemoryQueueInner>>,
}

impl MemoryQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a raw notification body.
    pub async fn push(&self, body: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        let receipt = format!("m-{}", inner.next_receipt);
        inner.next_receipt += 1;
        inner.pending.push_back(QueueMessage {
            receipt,
            body: body.into(),
        });
    }

    /// Receipts of messages deleted so far.
    pub async fn deleted(&self) -> Vec<String> {
        self.inner.lock().await.deleted.clone()
    }

    /// Shutdown requests sent so far.
    pub async fn shutdowns(&self) -> Vec<ShutdownMessage> {
        self.inner.lock().await.shutdowns.clone()
    }
}

impl NotificationQueue for MemoryQueue {
    async fn receive(&self) -> anyhow::Result<Vec<QueueMessage>> {
        let mut inner = self.inner.lock().await;
        Ok(inner.pending.drain(..).collect())
    }

    async fn delete(&self, message: &QueueMessage) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().await;
        inner.deleted.push(message.receipt.clone());
        Ok(())
    }

    async fn send_shutdown(&self, message: ShutdownMessage) -> anyhow::Result<()> {
        info!(instance_id = %message.instance_id, action = %message.action, "sending shutdown request");
        let mut inner = self.inner.lock().await;
        inner.shutdowns.push(message);
        Ok(())
    }
}
