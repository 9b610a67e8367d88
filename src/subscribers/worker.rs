//! # Subscriber worker task.
//!
//! Each worker loops over the subscriber's shared inbound queue:
//! ```text
//! loop {
//!   ├─► lock inbound, recv()
//!   │     └─ None (queue closed and drained) ─► exit, drop local + agent guards
//!   ├─► take a busy guard
//!   ├─► ack the hand-off (synchronous subscribers)
//!   ├─► handler.handle(envelope)   (panics caught)
//!   ├─► Err ─► report on the error queue (ErrorPolicy)
//!   └─► release the busy guard, then the pending guard
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

use crate::core::{GroupGuard, WaitGroup};
use crate::error::HandlerError;
use crate::handlers::HandlerRef;
use crate::policies::ErrorPolicy;

use super::subscriber::Delivery;

/// One worker of a subscriber's pool.
pub(crate) struct Worker<P> {
    pub(crate) id: usize,
    pub(crate) frequency: String,
    pub(crate) handler: HandlerRef<P>,
    pub(crate) inbound: Arc<Mutex<mpsc::Receiver<Delivery<P>>>>,
    pub(crate) errors: mpsc::Sender<HandlerError>,
    pub(crate) policy: ErrorPolicy,
    /// Agent-wide count of envelopes being handled.
    pub(crate) busy: WaitGroup,
    /// Subscriber-local exit guard.
    pub(crate) local: GroupGuard,
    /// Agent-wide exit guard.
    pub(crate) exit: GroupGuard,
}

impl<P> Worker<P>
where
    P: Send + Sync + 'static,
{
    pub(crate) async fn run(self) {
        loop {
            let next = {
                let mut rx = self.inbound.lock().await;
                rx.recv().await
            };
            let Some(delivery) = next else { break };
            self.process(delivery).await;
        }

        debug!(frequency = %self.frequency, worker = self.id, "worker exited");
        drop(self.local);
        drop(self.exit);
    }

    async fn process(&self, delivery: Delivery<P>) {
        let Delivery {
            envelope,
            pending,
            handoff,
        } = delivery;
        let busy = self.busy.add();

        if let Some(ack) = handoff {
            let _ = ack.send(());
        }

        let outcome = AssertUnwindSafe(self.handler.handle(envelope))
            .catch_unwind()
            .await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => {
                debug!(
                    frequency = %self.frequency,
                    handler = self.handler.name(),
                    error = %err,
                    "handler returned error"
                );
                Some(err)
            }
            Err(panic_err) => {
                let info = {
                    let any = &*panic_err;
                    if let Some(msg) = any.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = any.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    }
                };
                error!(
                    frequency = %self.frequency,
                    handler = self.handler.name(),
                    info = %info,
                    "handler panicked"
                );
                Some(HandlerError::Panicked {
                    handler: self.handler.name().to_string(),
                    info,
                })
            }
        };

        if let Some(err) = failure {
            self.report(err).await;
        }
        drop(busy);
        drop(pending);
    }

    async fn report(&self, err: HandlerError) {
        match self.policy {
            ErrorPolicy::Block => {
                if let Err(mpsc::error::SendError(err)) = self.errors.send(err).await {
                    warn!(
                        frequency = %self.frequency,
                        error = %err,
                        "error queue closed; handler error lost"
                    );
                }
            }
            ErrorPolicy::DropNewest => match self.errors.try_send(err) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(err)) => {
                    warn!(
                        frequency = %self.frequency,
                        label = err.as_label(),
                        error = %err,
                        "error queue full; dropping handler error"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(err)) => {
                    warn!(
                        frequency = %self.frequency,
                        error = %err,
                        "error queue closed; handler error lost"
                    );
                }
            },
        }
    }
}
