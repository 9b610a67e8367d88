//! Agent core: registry, fan-out and shutdown.
//!
//! The public API from this module is [`BroadcastAgent`] together with its configuration
//! types and the [`Completion`] handle returned by shutdown.
//!
//! Internal modules:
//! - [`agent`]: frequency registry, fan-out and two-phase shutdown;
//! - [`config`]: agent defaults and per-subscriber settings;
//! - [`wait_group`]: counters joined on by `stop()`, `close()`, `wait_for_completion()`
//!   and `wait_for_idle()`.

mod agent;
mod config;
mod wait_group;

pub use agent::BroadcastAgent;
pub use config::{Config, SubscriberConfig};
pub use wait_group::Completion;

pub(crate) use wait_group::{GroupGuard, WaitGroup};
