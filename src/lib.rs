//! # broadcaster
//!
//! **broadcaster** is an in-process publish/subscribe library for Rust.
//!
//! Handlers are registered against named *frequencies*; every payload published on a
//! frequency is fanned out to each subscriber registered on it. Each subscriber owns a
//! bounded inbound queue drained by its own pool of worker tasks, and reports handler
//! failures on a bounded error queue the caller can drain.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   broadcast("foo", payload)              broadcast("bar", payload)
//!            │                                       │
//!            ▼                                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  BroadcastAgent                                                   │
//! │  - RwLock<HashMap<frequency, Vec<Subscriber>>>                    │
//! │  - worker-exit wait group (close → Completion)                    │
//! │  - busy wait group (wait_for_completion)                          │
//! │  - pending wait group (wait_for_idle)                             │
//! └──────┬──────────────────┬──────────────────────────────┬──────────┘
//!        ▼                  ▼                              ▼
//!  ┌────────────┐     ┌────────────┐                 ┌────────────┐
//!  │ Subscriber │     │ Subscriber │                 │ Subscriber │
//!  │  "foo" #1  │     │  "foo" #2  │                 │   "bar"    │
//!  └─────┬──────┘     └─────┬──────┘                 └─────┬──────┘
//!        ▼                  ▼                              ▼
//!  [inbound queue]    [inbound queue]                [inbound queue]
//!   ├► worker 1        ├► worker 1                    ├► worker 1
//!   └► worker N        └► worker N                    └► worker N
//!        │ Err               │ Err                          │ Err
//!        ▼                   ▼                              ▼
//!  [error queue]      [error queue]                  [error queue]
//!        └──────────────► Subscriber::errors().recv() ◄─────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! BroadcastAgent::new()
//!   ├─► subscribe(freq, handler, workers) ─► Subscriber (idle)
//!   ├─► Subscriber::start()               ─► max(workers, 1) worker tasks
//!   ├─► broadcast(freq, payload)          ─► awaits room in each target queue
//!   ├─► wait_for_completion()             ─► no handler running
//!   ├─► wait_for_idle()                   ─► nothing queued or running
//!   └─► close()                           ─► stop every subscriber
//!          ├─ close inbound queue
//!          ├─ join this subscriber's workers (they drain first)
//!          ├─ close error queue
//!          └─ Completion::wait()          ─► every worker exited
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Agent**         | Frequency registry, fan-out, two-phase shutdown.              | [`BroadcastAgent`], [`Completion`]        |
//! | **Subscribers**   | Per-frequency worker pools with bounded queues.               | [`Subscriber`], [`ErrorReceiver`]         |
//! | **Handlers**      | Envelope handlers as trait objects or closures.               | [`Handler`], [`HandlerFn`], [`HandlerRef`]|
//! | **Policies**      | Behavior of a full error queue.                               | [`ErrorPolicy`]                           |
//! | **Errors**        | Typed usage errors and handler errors.                        | [`BroadcastError`], [`HandlerError`]      |
//! | **Configuration** | Agent defaults and per-subscriber settings.                   | [`Config`], [`SubscriberConfig`]          |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use broadcaster::{BroadcastAgent, Envelope, HandlerError, HandlerFn};
//!
//! #[derive(Debug)]
//! enum Payload {
//!     Text(String),
//!     Number(i64),
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = BroadcastAgent::<Payload>::new();
//!
//!     let texts = agent
//!         .subscribe(
//!             "foo",
//!             HandlerFn::arc("texts", |env: Arc<Envelope<Payload>>| async move {
//!                 match env.payload() {
//!                     Payload::Text(text) => {
//!                         println!("text: {text}");
//!                         Ok(())
//!                     }
//!                     _ => Err(HandlerError::unexpected_payload(env.frequency(), "Text")),
//!                 }
//!             }),
//!             4,
//!         )
//!         .await?;
//!     texts.start().await?;
//!
//!     agent.broadcast("foo", Payload::Text("hello".into())).await?;
//!     agent.broadcast("foo", Payload::Number(42)).await?;
//!
//!     let err = texts.errors().recv().await;
//!     assert_eq!(err.map(|e| e.as_label()), Some("handler_unexpected_payload"));
//!
//!     agent.wait_for_idle().await;
//!     agent.close().await?.wait().await;
//!     Ok(())
//! }
//! ```
mod core;
mod envelope;
mod error;
mod handlers;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use core::{BroadcastAgent, Completion, Config, SubscriberConfig};
pub use envelope::Envelope;
pub use error::{BroadcastError, HandlerError};
pub use handlers::{Handler, HandlerFn, HandlerRef};
pub use policies::ErrorPolicy;
pub use subscribers::{ErrorReceiver, Subscriber};
