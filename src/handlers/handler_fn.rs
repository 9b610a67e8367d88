//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Arc<Envelope<P>>) -> Fut`, producing a fresh
//! future per invocation. Shared state goes into the closure explicitly (`Arc<...>`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use broadcaster::{Envelope, Handler, HandlerFn, HandlerRef, HandlerError};
//!
//! let h: HandlerRef<u32> = HandlerFn::arc("double", |env: Arc<Envelope<u32>>| async move {
//!     if *env.payload() > 100 {
//!         return Err(HandlerError::fail("too large"));
//!     }
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(h.name(), "double");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::envelope::Envelope;
use crate::error::HandlerError;
use crate::handlers::handler::Handler;

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<P, F, Fut> Handler<P> for HandlerFn<F>
where
    P: Send + Sync + 'static,
    F: Fn(Arc<Envelope<P>>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, envelope: Arc<Envelope<P>>) -> Result<(), HandlerError> {
        (self.f)(envelope).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerRef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_each_call_runs_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let h: HandlerRef<&'static str> =
            HandlerFn::arc("count", move |_env: Arc<Envelope<&'static str>>| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, HandlerError>(())
                }
            });

        for _ in 0..3 {
            h.handle(Arc::new(Envelope::new("f", "x"))).await.unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(h.name(), "count");
    }

    #[tokio::test]
    async fn test_error_is_returned_untouched() {
        let h = HandlerFn::new("fails", |env: Arc<Envelope<u8>>| async move {
            Err::<(), _>(HandlerError::unexpected_payload(env.frequency(), "String"))
        });

        let err = h.handle(Arc::new(Envelope::new("bar", 1))).await.unwrap_err();
        assert_eq!(err, HandlerError::unexpected_payload("bar", "String"));
    }
}
