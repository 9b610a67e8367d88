//! Delivery policies.
//!
//! ## Contents
//! - [`ErrorPolicy`] what a worker does with a handler error when the error queue is full
//!
//! ## Quick wiring
//! ```text
//! Config { error_policy } ──► SubscriberConfig { workers, error_policy }
//!      └─► subscriber worker uses:
//!           - error_policy to block on or drop an overflowing error
//! ```
//!
//! ## Defaults
//! - `ErrorPolicy::Block` (no handler error is ever lost).

mod error_policy;

pub use error_policy::ErrorPolicy;
