//! # Error queue policies.
//!
//! [`ErrorPolicy`] decides what a worker does when its subscriber's error queue is full.
//!
//! - [`ErrorPolicy::Block`] the worker waits until the caller drains an error (default).
//! - [`ErrorPolicy::DropNewest`] the worker drops the new error, logs it and moves on.
//!
//! ## Choosing the right policy
//!
//! **Caller drains `errors()`**:
//! ```text
//! ErrorPolicy::Block       → no error is ever lost; a full queue applies backpressure
//! ```
//!
//! **Caller may never drain `errors()`**:
//! ```text
//! ErrorPolicy::Block       → workers stall once the queue is full, then publishes stall
//! ErrorPolicy::DropNewest  → workers keep going; overflowing errors only reach the log
//! ```

/// Policy applied when a handler error does not fit into the error queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Wait for room in the error queue (default).
    ///
    /// The worker keeps the envelope's busy slot until the error is queued, so an
    /// undrained queue also holds back `wait_for_completion()`.
    #[default]
    Block,
    /// Drop the error if the queue is full; a `warn` event is logged instead.
    DropNewest,
}
