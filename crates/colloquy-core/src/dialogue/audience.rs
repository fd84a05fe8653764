//! Fan-out of dialogue turns to live listeners
//!
//! Each listener gets its own bounded channel. A broadcast snapshots the
//! registered senders and `try_send`s to each one independently: a full
//! channel loses that turn for that listener only, and a closed channel is
//! unregistered. Nothing a listener does can fail a broadcast.

use super::DialogueTurn;
use dashmap::DashMap;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

type Listeners = DashMap<Uuid, mpsc::Sender<DialogueTurn>>;

/// Registry of listeners
#[derive(Debug, Clone)]
pub struct Audience {
    listeners: Arc<Listeners>,
    buffer: usize,
}

impl Audience {
    /// Create an audience whose listeners buffer up to `buffer` turns
    pub fn new(buffer: usize) -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Register a new listener
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.listeners.insert(id, tx);

        tracing::debug!(listener = %id, total = self.listeners.len(), "Listener subscribed");

        Subscription {
            id,
            receiver: rx,
            listeners: self.listeners.clone(),
        }
    }

    /// Deliver `turn` to every registered listener; returns how many received it
    pub fn broadcast(&self, turn: &DialogueTurn) -> usize {
        let targets: Vec<(Uuid, mpsc::Sender<DialogueTurn>)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, sender) in targets {
            match sender.try_send(turn.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(listener = %id, "Listener lagging, turn dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    self.listeners.remove(&id);
                    tracing::debug!(listener = %id, "Listener gone, unregistered");
                }
            }
        }

        delivered
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether nobody is listening
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// A live listener; unregisters itself when dropped
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    receiver: mpsc::Receiver<DialogueTurn>,
    listeners: Arc<Listeners>,
}

impl Subscription {
    /// Listener identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the next turn; `None` once the audience is gone
    pub async fn recv(&mut self) -> Option<DialogueTurn> {
        self.receiver.recv().await
    }

    /// Take a turn if one is already waiting
    pub fn try_recv(&mut self) -> Option<DialogueTurn> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = DialogueTurn;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.listeners.remove(&self.id);
    }
}
