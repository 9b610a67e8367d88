//! # Example: Basic fan-out
//!
//! Two handlers listen on `foo`, each expecting a different payload shape, and one handler
//! listens on `bar`. Every publish on `foo` reaches both `foo` handlers; the one that gets
//! the wrong shape reports `UnexpectedPayload`, which the error drainers ignore.
//!
//! ## Flow
//! ```text
//! broadcast("foo", FooOne) ──► foo_one ✓   foo_two ✗ (unexpected payload)
//! broadcast("foo", FooTwo) ──► foo_one ✗   foo_two ✓
//! broadcast("bar", Bar)    ──► bar ✓
//!
//! wait_for_idle() ──► close() ──► Completion::wait()
//! ```
//!
//! ## Run
//! ```bash
//! BROADCASTER_LOG=debug cargo run --example basic
//! ```

use std::sync::Arc;
use std::time::Instant;

use broadcaster::{BroadcastAgent, Envelope, HandlerError, HandlerFn, HandlerRef, Subscriber};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum Payload {
    FooOne { value: String },
    FooTwo { key: String, value: i64 },
    Bar { id: String, message: String },
}

fn foo_one() -> HandlerRef<Payload> {
    HandlerFn::arc("foo-one", |env: Arc<Envelope<Payload>>| async move {
        let Payload::FooOne { value } = env.payload() else {
            return Err(HandlerError::unexpected_payload(env.frequency(), "FooOne"));
        };
        info!("FooOne payload value is: {value}");
        Ok(())
    })
}

fn foo_two() -> HandlerRef<Payload> {
    HandlerFn::arc("foo-two", |env: Arc<Envelope<Payload>>| async move {
        let Payload::FooTwo { key, value } = env.payload() else {
            return Err(HandlerError::unexpected_payload(env.frequency(), "FooTwo"));
        };
        info!("FooTwo payload value is: {key} = {value}");
        Ok(())
    })
}

fn bar() -> HandlerRef<Payload> {
    HandlerFn::arc("bar", |env: Arc<Envelope<Payload>>| async move {
        let Payload::Bar { id, message } = env.payload() else {
            return Err(HandlerError::unexpected_payload(env.frequency(), "Bar"));
        };
        info!("Bar payload value is: id={id} message={message}");
        Ok(())
    })
}

/// Drains a subscriber's error queue until shutdown closes it.
fn log_errors(sub: &Subscriber<Payload>) -> tokio::task::JoinHandle<()> {
    let errors = sub.errors();
    let frequency = sub.frequency().to_string();
    tokio::spawn(async move {
        while let Some(err) = errors.recv().await {
            if !matches!(err, HandlerError::UnexpectedPayload { .. }) {
                error!(frequency = %frequency, label = err.as_label(), "{err}");
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BROADCASTER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let workers = 8;
    let agent = BroadcastAgent::<Payload>::new();

    let sub_foo_one = agent.subscribe("foo", foo_one(), workers).await?;
    let sub_foo_two = agent.subscribe("foo", foo_two(), workers).await?;
    let sub_bar = agent.subscribe("bar", bar(), workers).await?;

    let mut drainers = Vec::new();
    for sub in [&sub_foo_one, &sub_foo_two, &sub_bar] {
        sub.start().await?;
        drainers.push(log_errors(sub));
    }

    let now = Instant::now();
    for _ in 0..100 {
        agent
            .broadcast(
                "foo",
                Payload::FooOne {
                    value: "payload for handler 1".into(),
                },
            )
            .await?;
        agent
            .broadcast(
                "foo",
                Payload::FooTwo {
                    key: "payload".into(),
                    value: 42,
                },
            )
            .await?;
        agent
            .broadcast(
                "bar",
                Payload::Bar {
                    id: "payload1".into(),
                    message: "Hello from bar".into(),
                },
            )
            .await?;
    }

    agent.wait_for_idle().await;
    info!("the whole thing took {:?} to execute", now.elapsed());

    info!("closing agent...");
    let now = Instant::now();
    agent.close().await?.wait().await;
    for drainer in drainers {
        drainer.await?;
    }
    info!("closing the agent took {:?}", now.elapsed());
    Ok(())
}
