//! # Subscribers: per-frequency worker pools.
//!
//! This module provides [`Subscriber`], the unit the agent fans envelopes out to, and
//! [`ErrorReceiver`], the caller's end of a subscriber's error queue.
//!
//! ## Architecture
//! ```text
//! Subscriber
//!   ├── inbound queue (bounded) ──► worker tasks ──► Handler::handle(envelope)
//!   ├── error queue (bounded)   ◄── handler errors / caught panics
//!   └── local wait group        ◄── one guard per live worker
//! ```
//!
//! Internal modules:
//! - [`subscriber`]: lifecycle (start / stop) and delivery;
//! - [`worker`]: the worker loop and error reporting;
//! - [`errors`]: shared error queue receiver.

mod errors;
mod subscriber;
mod worker;

pub use errors::ErrorReceiver;
pub use subscriber::Subscriber;
