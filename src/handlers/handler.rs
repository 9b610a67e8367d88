//! # Handler trait.
//!
//! A [`Handler`] receives every envelope published on the frequency its subscriber is
//! registered on and returns `Ok(())` or a [`HandlerError`]. Errors are forwarded to the
//! subscriber's error queue; they never reach the publisher.

use std::sync::Arc;

use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::error::HandlerError;

/// # Envelope handler.
///
/// Invoked from a subscriber's worker tasks, never from the publisher's context.
/// With `workers = N` the same handler may run up to `N` times concurrently, so it must
/// not rely on the identity of the calling task.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use broadcaster::{Envelope, Handler, HandlerError};
///
/// struct Printer;
///
/// #[async_trait]
/// impl Handler<String> for Printer {
///     fn name(&self) -> &str { "printer" }
///
///     async fn handle(&self, envelope: Arc<Envelope<String>>) -> Result<(), HandlerError> {
///         println!("{}: {}", envelope.frequency(), envelope.payload());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<P>: Send + Sync + 'static {
    /// Handles one envelope.
    ///
    /// Panics are caught by the worker and reported as [`HandlerError::Panicked`].
    async fn handle(&self, envelope: Arc<Envelope<P>>) -> Result<(), HandlerError>;

    /// Returns the handler name used in logs and panic reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a handler.
pub type HandlerRef<P> = Arc<dyn Handler<P>>;
