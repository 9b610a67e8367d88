//! # Broadcast agent - frequency registry and fan-out.
//!
//! [`BroadcastAgent`] maps frequencies to the subscribers registered on them and pushes every
//! published payload to each of those subscribers.
//!
//! ## Architecture
//! ```text
//! subscribe(freq, handler, workers) ──► write lock ──► map[freq].push(Subscriber)
//!
//! broadcast(freq, payload)
//!     │  (one Arc<Envelope> per publish)
//!     └──► read lock (held for the whole fan-out)
//!            ├──► sub 1 .deliver()  (awaits room in its inbound queue)
//!            ├──► sub 2 .deliver()
//!            └──► sub N .deliver()   in registration order
//!
//! close()
//!     ├──► mark closed, write lock, snapshot all subscribers
//!     ├──► sub.stop() for each (close inbound → join workers → close error queue)
//!     └──► Completion (agent-wide worker-exit wait group)
//! ```
//!
//! ## Rules
//! - Publishing to a frequency nobody subscribed to is a silent no-op.
//! - The read lock is held while awaiting each inbound queue: one saturated, undrained
//!   subscriber stalls every other publish and every registration until it makes room.
//! - [`wait_for_completion`](BroadcastAgent::wait_for_completion) and
//!   [`wait_for_idle`](BroadcastAgent::wait_for_idle) do not stop delivery; a concurrent
//!   publish can extend the wait.
//! - The agent is closed once. Publishing, subscribing or closing after that returns a
//!   [`BroadcastError`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::core::config::{Config, SubscriberConfig};
use crate::core::wait_group::{Completion, WaitGroup};
use crate::envelope::Envelope;
use crate::error::BroadcastError;
use crate::handlers::HandlerRef;
use crate::subscribers::Subscriber;

/// In-process publish/subscribe broadcaster keyed by frequency.
///
/// Wrap it in an `Arc` to share it between publishing tasks.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use broadcaster::{BroadcastAgent, Envelope, HandlerFn, HandlerError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let agent = BroadcastAgent::<String>::new();
///
///     let sub = agent
///         .subscribe(
///             "greetings",
///             HandlerFn::arc("printer", |env: Arc<Envelope<String>>| async move {
///                 println!("{}", env.payload());
///                 Ok::<_, HandlerError>(())
///             }),
///             2,
///         )
///         .await?;
///     sub.start().await?;
///
///     agent.broadcast("greetings", "hello".to_string()).await?;
///     agent.wait_for_idle().await;
///
///     agent.close().await?.wait().await;
///     Ok(())
/// }
/// ```
pub struct BroadcastAgent<P> {
    subscribers: RwLock<HashMap<String, Vec<Arc<Subscriber<P>>>>>,
    config: Config,
    /// Live worker tasks across all subscribers.
    workers: WaitGroup,
    /// Envelopes dequeued by a worker and not yet handled.
    busy: WaitGroup,
    /// Envelopes accepted by a subscriber queue and not yet handled or discarded.
    pending: WaitGroup,
    closed: AtomicBool,
}

impl<P> BroadcastAgent<P>
where
    P: Send + Sync + 'static,
{
    /// Creates an agent with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an agent with the given defaults.
    pub fn with_config(config: Config) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            config,
            workers: WaitGroup::default(),
            busy: WaitGroup::default(),
            pending: WaitGroup::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// Registers a subscriber with `workers` workers and the agent's default error policy.
    ///
    /// The returned subscriber is idle until [`Subscriber::start`] is called.
    ///
    /// # Errors
    /// [`BroadcastError::Closed`] if the agent was closed.
    pub async fn subscribe(
        &self,
        frequency: impl Into<String>,
        handler: HandlerRef<P>,
        workers: usize,
    ) -> Result<Arc<Subscriber<P>>, BroadcastError> {
        self.subscribe_with(frequency, handler, self.config.subscriber(workers))
            .await
    }

    /// Registers a subscriber with explicit settings.
    ///
    /// # Errors
    /// [`BroadcastError::Closed`] if the agent was closed.
    pub async fn subscribe_with(
        &self,
        frequency: impl Into<String>,
        handler: HandlerRef<P>,
        config: SubscriberConfig,
    ) -> Result<Arc<Subscriber<P>>, BroadcastError> {
        let frequency = frequency.into();
        let handler_name = handler.name().to_string();

        let mut subscribers = self.subscribers.write().await;
        if self.is_closed() {
            return Err(BroadcastError::Closed);
        }

        let sub = Arc::new(Subscriber::new(
            frequency.clone(),
            handler,
            config,
            self.workers.clone(),
            self.busy.clone(),
            self.pending.clone(),
        ));
        let registered = subscribers.entry(frequency).or_default();
        registered.push(Arc::clone(&sub));
        let position = registered.len();
        drop(subscribers);

        debug!(
            frequency = %sub.frequency(),
            handler = %handler_name,
            workers = config.workers,
            position,
            "subscriber registered"
        );
        Ok(sub)
    }

    /// Publishes `payload` to every subscriber registered on `frequency`.
    ///
    /// Awaits room in each subscriber's inbound queue, in registration order, while holding
    /// the registry read lock. Returns once every target has accepted the envelope (for
    /// synchronous subscribers: once a worker has dequeued it), not once it is handled.
    ///
    /// # Errors
    /// - [`BroadcastError::Closed`] if the agent was closed.
    /// - [`BroadcastError::SubscriberStopped`] if a target stopped mid fan-out; earlier
    ///   targets keep the envelope.
    pub async fn broadcast(&self, frequency: &str, payload: P) -> Result<(), BroadcastError> {
        let subscribers = self.subscribers.read().await;
        if self.is_closed() {
            return Err(BroadcastError::Closed);
        }

        let Some(targets) = subscribers.get(frequency) else {
            trace!(frequency, "no subscribers; broadcast dropped");
            return Ok(());
        };

        let envelope = Arc::new(Envelope::new(frequency, payload));
        trace!(frequency, targets = targets.len(), "fan-out");
        for sub in targets {
            sub.deliver(Arc::clone(&envelope)).await?;
        }
        Ok(())
    }

    /// Stops every subscriber and returns a handle resolving once all workers have exited.
    ///
    /// Each subscriber's inbound queue is closed, its workers drain what is buffered and
    /// exit, then its error queue is closed. In-flight handler invocations are not
    /// interrupted. A worker blocked on a full error queue (`ErrorPolicy::Block`) holds the
    /// shutdown until the caller drains that queue.
    ///
    /// # Errors
    /// [`BroadcastError::AlreadyClosed`] on a second call.
    pub async fn close(&self) -> Result<Completion, BroadcastError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(BroadcastError::AlreadyClosed);
        }

        // waits out in-flight publishes; later ones observe `closed`
        let snapshot: Vec<Arc<Subscriber<P>>> = {
            let subscribers = self.subscribers.write().await;
            subscribers.values().flatten().cloned().collect()
        };

        debug!(subscribers = snapshot.len(), "closing broadcast agent");
        for sub in &snapshot {
            if let Err(err) = sub.stop().await {
                warn!(
                    frequency = %sub.frequency(),
                    label = err.as_label(),
                    "subscriber stop failed"
                );
            }
        }

        Ok(Completion::new(self.workers.clone()))
    }

    /// Waits until no worker is executing a handler.
    ///
    /// Envelopes still buffered in a queue are not waited for: one published to a
    /// subscriber that was never started does not hold this call. Use
    /// [`wait_for_idle`](Self::wait_for_idle) to also wait for queued envelopes.
    pub async fn wait_for_completion(&self) {
        self.busy.wait().await;
    }

    /// Waits until no envelope is queued or being handled anywhere in the agent.
    ///
    /// Blocks while a subscriber that was never started holds buffered envelopes, until
    /// it is started or the agent is closed.
    pub async fn wait_for_idle(&self) {
        self.pending.wait().await;
    }

    /// Returns the sorted list of frequencies with at least one subscriber.
    pub async fn frequencies(&self) -> Vec<String> {
        let subscribers = self.subscribers.read().await;
        let mut names: Vec<String> = subscribers.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of subscribers registered on `frequency`.
    pub async fn subscriber_count(&self, frequency: &str) -> usize {
        self.subscribers
            .read()
            .await
            .get(frequency)
            .map_or(0, Vec::len)
    }

    /// True once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Envelopes currently queued or being handled.
    pub fn in_flight(&self) -> usize {
        self.pending.count()
    }

    /// Handler invocations currently executing.
    pub fn executing(&self) -> usize {
        self.busy.count()
    }
}

impl<P> Default for BroadcastAgent<P>
where
    P: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
