//! # Error queue receiver.
//!
//! [`ErrorReceiver`] is the caller's view of a subscriber's bounded error queue.
//! Clones share one underlying receiver, so several tasks may drain the same queue;
//! each error is observed exactly once.
//!
//! The queue is closed by shutdown once every worker of the subscriber has exited:
//! [`ErrorReceiver::recv`] then yields the remaining errors and finally `None`.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::error::HandlerError;

/// Shared receiving half of a subscriber's error queue.
#[derive(Debug, Clone)]
pub struct ErrorReceiver {
    rx: Arc<Mutex<mpsc::Receiver<HandlerError>>>,
}

impl ErrorReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<HandlerError>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Waits for the next handler error.
    ///
    /// Returns `None` once the subscriber has been stopped and the queue is drained.
    pub async fn recv(&self) -> Option<HandlerError> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Returns a queued error without waiting.
    ///
    /// Returns `None` if the queue is empty, closed, or another clone is currently
    /// waiting in [`recv`](Self::recv).
    pub fn try_recv(&self) -> Option<HandlerError> {
        let mut rx = self.rx.try_lock().ok()?;
        rx.try_recv().ok()
    }
}
