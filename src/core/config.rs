//! # Agent and subscriber configuration.
//!
//! Provides [`Config`] agent-wide defaults and [`SubscriberConfig`] per-subscriber settings.
//!
//! Config is used in two ways:
//! 1. **Agent creation**: `BroadcastAgent::with_config(config)`
//! 2. **Subscriber defaults**: `BroadcastAgent::subscribe(freq, handler, workers)` builds a
//!    [`SubscriberConfig`] from the agent's config via [`Config::subscriber`]
//!
//! ## Sentinel values
//! - `workers = 0` → one worker and a synchronous hand-off: a publish returns only once
//!   that worker has taken the envelope.

use crate::policies::ErrorPolicy;

/// Agent-wide defaults.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Error queue policy given to subscribers registered with
    /// [`BroadcastAgent::subscribe`](crate::BroadcastAgent::subscribe).
    pub error_policy: ErrorPolicy,
}

impl Config {
    /// Builds a subscriber config with `workers` and this config's defaults.
    #[inline]
    pub fn subscriber(&self, workers: usize) -> SubscriberConfig {
        SubscriberConfig {
            workers,
            error_policy: self.error_policy,
        }
    }
}

/// Settings for one subscriber's worker pool.
///
/// ## Field semantics
/// - `workers`: number of concurrent handler invocations (`0` = one worker, synchronous hand-off)
/// - `error_policy`: what to do when the error queue is full
///
/// ## Notes
/// Prefer the helper accessors over sprinkling `workers == 0` checks.
#[derive(Clone, Copy, Debug)]
pub struct SubscriberConfig {
    /// Requested worker count.
    pub workers: usize,
    /// Behavior when the error queue is full.
    pub error_policy: ErrorPolicy,
}

impl SubscriberConfig {
    /// Creates a config with `workers` and the default error policy.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Sets the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// True when publishes hand envelopes directly to the worker (`workers == 0`).
    #[inline]
    pub fn is_synchronous(&self) -> bool {
        self.workers == 0
    }

    /// Number of worker tasks spawned on start: `max(workers, 1)`.
    #[inline]
    pub fn worker_tasks(&self) -> usize {
        self.workers.max(1)
    }

    /// Buffered envelopes in the inbound queue: `workers`, `0` for synchronous hand-off.
    #[inline]
    pub fn inbound_capacity(&self) -> usize {
        self.workers
    }

    /// Capacity of the error queue: `max(workers, 1)`.
    #[inline]
    pub fn error_capacity(&self) -> usize {
        self.workers.max(1)
    }

    /// Capacity of the underlying channel, clamped to a minimum of 1.
    ///
    /// A synchronous subscriber still needs one slot; the hand-off acknowledgement
    /// provides the rendezvous.
    #[inline]
    pub(crate) fn channel_capacity(&self) -> usize {
        self.inbound_capacity().max(1)
    }
}

impl Default for SubscriberConfig {
    /// One worker, `ErrorPolicy::Block`.
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_workers_is_synchronous() {
        let cfg = SubscriberConfig::new(0);
        assert!(cfg.is_synchronous());
        assert_eq!(cfg.worker_tasks(), 1);
        assert_eq!(cfg.inbound_capacity(), 0);
        assert_eq!(cfg.error_capacity(), 1);
        assert_eq!(cfg.channel_capacity(), 1);
    }

    #[test]
    fn test_capacities_follow_worker_count() {
        let cfg = SubscriberConfig::new(8);
        assert!(!cfg.is_synchronous());
        assert_eq!(cfg.worker_tasks(), 8);
        assert_eq!(cfg.inbound_capacity(), 8);
        assert_eq!(cfg.error_capacity(), 8);
    }

    #[test]
    fn test_agent_config_propagates_policy() {
        let cfg = Config {
            error_policy: ErrorPolicy::DropNewest,
        };
        let sub = cfg.subscriber(3);
        assert_eq!(sub.workers, 3);
        assert_eq!(sub.error_policy, ErrorPolicy::DropNewest);
        assert_eq!(SubscriberConfig::default().error_policy, ErrorPolicy::Block);
    }
}
