//! # Frequency-bound worker pool.
//!
//! A [`Subscriber`] owns everything needed to deliver envelopes of one frequency to one
//! handler:
//! - **Inbound queue**: bounded, capacity `workers` (`0` = synchronous hand-off)
//! - **Worker tasks**: `max(workers, 1)` tokio tasks draining the inbound queue
//! - **Error queue**: bounded, capacity `max(workers, 1)`, drained by the caller via [`Subscriber::errors`]
//! - **Local wait group**: lets `stop()` join on this subscriber's workers only
//!
//! ## Architecture
//! ```text
//! BroadcastAgent::broadcast ──► deliver() ──► [inbound queue] ──► worker 1 ──► handler.handle()
//!                                                  │          ──► worker 2 ──► handler.handle()
//!                                                  │          ──► worker N ──► handler.handle()
//!                                                  │                              │ Err
//!                                                  ▼                              ▼
//!                                          close(): stop()               [error queue] ──► errors().recv()
//! ```
//!
//! ## Rules
//! - `start()` runs at most once; a second call returns [`BroadcastError::AlreadyStarted`].
//! - A subscriber that is never started never consumes its queue: publishes to it stall once
//!   the queue is full.
//! - The inbound queue is closed exactly once, by `stop()`; workers drain what is buffered and
//!   exit, then the error queue is closed.
//! - Per-worker FIFO only; with `workers > 1` invocations may complete in any order.
//!
//! ## Synchronous hand-off
//! With `workers = 0` each delivery carries a one-shot acknowledgement. The worker acks as
//! soon as it dequeues the envelope, and the publisher does not return before the ack.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use crate::core::{GroupGuard, SubscriberConfig, WaitGroup};
use crate::envelope::Envelope;
use crate::error::{BroadcastError, HandlerError};
use crate::handlers::HandlerRef;

use super::errors::ErrorReceiver;
use super::worker::Worker;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// One envelope queued for a subscriber.
pub(crate) struct Delivery<P> {
    pub(crate) envelope: Arc<Envelope<P>>,
    /// Agent-wide pending guard, released once the envelope is handled or discarded.
    pub(crate) pending: GroupGuard,
    /// Acknowledged on dequeue (synchronous subscribers only).
    pub(crate) handoff: Option<oneshot::Sender<()>>,
}

/// Worker pool registered on one frequency.
///
/// Created by [`BroadcastAgent::subscribe`](crate::BroadcastAgent::subscribe); the caller
/// must call [`start`](Self::start) for envelopes to be handled.
pub struct Subscriber<P> {
    frequency: String,
    handler: HandlerRef<P>,
    config: SubscriberConfig,
    inbound_tx: Mutex<Option<mpsc::Sender<Delivery<P>>>>,
    inbound_rx: Arc<Mutex<mpsc::Receiver<Delivery<P>>>>,
    errors_tx: Mutex<Option<mpsc::Sender<HandlerError>>>,
    errors: ErrorReceiver,
    local: WaitGroup,
    exited: WaitGroup,
    busy: WaitGroup,
    pending: WaitGroup,
    state: AtomicU8,
}

impl<P> Subscriber<P>
where
    P: Send + Sync + 'static,
{
    /// Allocates queues per `config`. Does not start workers.
    pub(crate) fn new(
        frequency: String,
        handler: HandlerRef<P>,
        config: SubscriberConfig,
        exited: WaitGroup,
        busy: WaitGroup,
        pending: WaitGroup,
    ) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(config.channel_capacity());
        let (errors_tx, errors_rx) = mpsc::channel(config.error_capacity());

        Self {
            frequency,
            handler,
            config,
            inbound_tx: Mutex::new(Some(inbound_tx)),
            inbound_rx: Arc::new(Mutex::new(inbound_rx)),
            errors_tx: Mutex::new(Some(errors_tx)),
            errors: ErrorReceiver::new(errors_rx),
            local: WaitGroup::default(),
            exited,
            busy,
            pending,
            state: AtomicU8::new(IDLE),
        }
    }

    /// Spawns `max(workers, 1)` worker tasks draining the inbound queue.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// - [`BroadcastError::AlreadyStarted`] if the workers are already running.
    /// - [`BroadcastError::SubscriberStopped`] if the agent was closed.
    pub async fn start(&self) -> Result<(), BroadcastError> {
        // Held until every worker is registered: `stop` takes this lock before joining.
        let errors_tx = self.errors_tx.lock().await;

        match self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(RUNNING) => {
                return Err(BroadcastError::AlreadyStarted {
                    frequency: self.frequency.clone(),
                })
            }
            Err(_) => return Err(self.stopped()),
        }

        let Some(errors) = errors_tx.clone() else {
            return Err(self.stopped());
        };

        let workers = self.config.worker_tasks();
        for id in 0..workers {
            let worker = Worker {
                id,
                frequency: self.frequency.clone(),
                handler: Arc::clone(&self.handler),
                inbound: Arc::clone(&self.inbound_rx),
                errors: errors.clone(),
                policy: self.config.error_policy,
                busy: self.busy.clone(),
                local: self.local.add(),
                exit: self.exited.add(),
            };
            tokio::spawn(worker.run());
        }
        drop(errors_tx);

        debug!(
            frequency = %self.frequency,
            handler = self.handler.name(),
            workers,
            synchronous = self.config.is_synchronous(),
            "subscriber started"
        );
        Ok(())
    }

    /// Closes the inbound queue, waits for this subscriber's workers to exit, then closes
    /// the error queue.
    ///
    /// A subscriber that was never started has no workers to handle envelopes still
    /// buffered in its queue; they are discarded.
    pub(crate) async fn stop(&self) -> Result<(), BroadcastError> {
        let previous = self.state.swap(STOPPED, Ordering::AcqRel);
        if previous == STOPPED {
            return Err(self.stopped());
        }

        drop(self.inbound_tx.lock().await.take());
        // A concurrent `start` that won the state race registers its workers under this lock.
        drop(self.errors_tx.lock().await);
        self.local.wait().await;

        if previous == IDLE {
            let mut rx = self.inbound_rx.lock().await;
            rx.close();
            let mut discarded = 0usize;
            while rx.try_recv().is_ok() {
                discarded += 1;
            }
            if discarded > 0 {
                warn!(
                    frequency = %self.frequency,
                    discarded,
                    "subscriber never started; undelivered envelopes discarded"
                );
            }
        }

        drop(self.errors_tx.lock().await.take());
        debug!(frequency = %self.frequency, "subscriber stopped");
        Ok(())
    }

    /// Queues one envelope, waiting for room in the inbound queue.
    ///
    /// For synchronous subscribers this also waits until a worker has dequeued it.
    pub(crate) async fn deliver(&self, envelope: Arc<Envelope<P>>) -> Result<(), BroadcastError> {
        let Some(tx) = self.inbound_tx.lock().await.clone() else {
            return Err(self.stopped());
        };
        let pending = self.pending.add();

        if self.config.is_synchronous() {
            let (ack_tx, ack_rx) = oneshot::channel();
            tx.send(Delivery {
                envelope,
                pending,
                handoff: Some(ack_tx),
            })
            .await
            .map_err(|_| self.stopped())?;
            ack_rx.await.map_err(|_| self.stopped())
        } else {
            tx.send(Delivery {
                envelope,
                pending,
                handoff: None,
            })
            .await
            .map_err(|_| self.stopped())
        }
    }

    /// Receiver for handler errors of this subscriber.
    pub fn errors(&self) -> ErrorReceiver {
        self.errors.clone()
    }

    /// Frequency this subscriber is registered on.
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    /// Requested worker count (`0` = synchronous hand-off).
    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Subscriber settings.
    pub fn config(&self) -> &SubscriberConfig {
        &self.config
    }

    /// True between `start()` and shutdown.
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }

    /// Number of this subscriber's workers that have not exited.
    pub fn live_workers(&self) -> usize {
        self.local.count()
    }

    fn stopped(&self) -> BroadcastError {
        BroadcastError::SubscriberStopped {
            frequency: self.frequency.clone(),
        }
    }
}

impl<P> fmt::Debug for Subscriber<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("frequency", &self.frequency)
            .field("config", &self.config)
            .field("state", &self.state.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
