//! Error types used by the broadcaster and by handlers.
//!
//! This module defines two main error enums:
//!
//! - [`BroadcastError`] — usage errors raised by the agent and its subscribers
//!   (publishing after shutdown, closing twice, starting twice).
//! - [`HandlerError`] — failures reported by handler invocations; these never reach
//!   the publisher and surface on the subscriber's error queue instead.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced by the broadcast agent itself.
///
/// Each variant is a violated precondition of the shutdown protocol: the agent
/// is closed once, subscribers are started once, and nothing is delivered after close.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// The agent has been closed; no more publishes or registrations are accepted.
    #[error("broadcast agent is closed")]
    Closed,

    /// `close()` was called on an agent that is already closed.
    #[error("broadcast agent already closed")]
    AlreadyClosed,

    /// `start()` was called on a subscriber whose workers are already running.
    #[error("subscriber on frequency '{frequency}' already started")]
    AlreadyStarted {
        /// Frequency the subscriber is registered on.
        frequency: String,
    },

    /// The subscriber was stopped; it can neither be started nor receive envelopes.
    #[error("subscriber on frequency '{frequency}' is stopped")]
    SubscriberStopped {
        /// Frequency the subscriber is registered on.
        frequency: String,
    },
}

impl BroadcastError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use broadcaster::BroadcastError;
    ///
    /// assert_eq!(BroadcastError::Closed.as_label(), "agent_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BroadcastError::Closed => "agent_closed",
            BroadcastError::AlreadyClosed => "agent_already_closed",
            BroadcastError::AlreadyStarted { .. } => "subscriber_already_started",
            BroadcastError::SubscriberStopped { .. } => "subscriber_stopped",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BroadcastError::Closed => "agent closed; publish and subscribe rejected".to_string(),
            BroadcastError::AlreadyClosed => "agent closed twice".to_string(),
            BroadcastError::AlreadyStarted { frequency } => {
                format!("subscriber already started: frequency={frequency:?}")
            }
            BroadcastError::SubscriberStopped { frequency } => {
                format!("subscriber stopped: frequency={frequency:?}")
            }
        }
    }
}

/// # Errors reported by handler invocations.
///
/// A handler returns one of these to signal failure; the worker forwards it to the
/// subscriber's error queue. Panics are caught and converted into [`HandlerError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler failed while processing the envelope.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The payload did not have the shape this handler expects.
    #[error("unexpected payload on frequency '{frequency}', expected {expected}")]
    UnexpectedPayload {
        /// Frequency the envelope was published on.
        frequency: String,
        /// Name of the payload shape the handler accepts.
        expected: &'static str,
    },

    /// The handler panicked; the worker caught the panic and kept running.
    #[error("handler '{handler}' panicked: {info}")]
    Panicked {
        /// Name of the handler that panicked.
        handler: String,
        /// Panic message, if it was a string.
        info: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    ///
    /// # Example
    /// ```
    /// use broadcaster::HandlerError;
    ///
    /// let err = HandlerError::fail("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Failed {
            error: error.into(),
        }
    }

    /// Shorthand for [`HandlerError::UnexpectedPayload`].
    pub fn unexpected_payload(frequency: impl Into<String>, expected: &'static str) -> Self {
        HandlerError::UnexpectedPayload {
            frequency: frequency.into(),
            expected,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::UnexpectedPayload { .. } => "handler_unexpected_payload",
            HandlerError::Panicked { .. } => "handler_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::UnexpectedPayload {
                frequency,
                expected,
            } => format!("unexpected payload: frequency={frequency:?} expected={expected}"),
            HandlerError::Panicked { handler, info } => {
                format!("panic: handler={handler} info={info}")
            }
        }
    }

    /// True if the error came from a caught panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked { .. })
    }
}
