//! Per-task event queue between an executor and the request handler

use std::sync::{Mutex, PoisonError};

use tokio::sync::{mpsc, Mutex as AsyncMutex};

use crate::protocol::{error::A2AError, Event};

/// Ordered, unbounded, single-consumer channel of events
///
/// Executors publish with [`enqueue`](Self::enqueue); the request handler
/// drains with [`dequeue`](Self::dequeue). Once [`close`](Self::close) is
/// called, further enqueues fail and `dequeue` yields `None` after the
/// remaining events have been delivered.
#[derive(Debug)]
pub struct EventQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<Event>>>,
    receiver: AsyncMutex<mpsc::UnboundedReceiver<Event>>,
}

impl EventQueue {
    /// Create an open, empty queue
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: AsyncMutex::new(rx),
        }
    }

    /// Append an event; never blocks
    ///
    /// # Errors
    ///
    /// Returns `A2AError::QueueClosed` once the queue has been closed.
    pub fn enqueue(&self, event: impl Into<Event>) -> Result<(), A2AError> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(tx) => tx.send(event.into()).map_err(|_| A2AError::QueueClosed),
            None => Err(A2AError::QueueClosed),
        }
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the queue is closed and every earlier event has
    /// been handed out.
    pub async fn dequeue(&self) -> Option<Event> {
        self.receiver.lock().await.recv().await
    }

    /// Close the queue; a pending `dequeue` wakes up. Calling it again has no effect.
    pub fn close(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if sender.is_some() {
            tracing::trace!("event queue closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
