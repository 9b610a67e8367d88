//! # Async wait group.
//!
//! [`WaitGroup`] counts outstanding units of work. [`WaitGroup::add`] hands out a
//! [`GroupGuard`] that decrements the counter on drop; [`WaitGroup::wait`] resolves once
//! the counter reaches zero. Clones share the same counter.
//!
//! Four wait groups drive shutdown and quiescence:
//! - per-subscriber: live workers of that subscriber (`stop()` joins on it),
//! - agent-wide worker-exit: live workers of every subscriber (the [`Completion`] handle),
//! - agent-wide busy: envelopes a worker has dequeued and not finished (`wait_for_completion()`),
//! - agent-wide pending: envelopes queued or being handled (`wait_for_idle()`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    count: CachePadded<AtomicUsize>,
    notify: Notify,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub(crate) fn add(&self) -> GroupGuard {
        self.inner.count.fetch_add(1, Ordering::AcqRel);
        GroupGuard(Arc::clone(&self.inner))
    }

    pub(crate) fn count(&self) -> usize {
        self.inner.count.load(Ordering::Acquire)
    }

    pub(crate) async fn wait(&self) {
        loop {
            if self.count() == 0 {
                break;
            }

            // registered before the re-check so a concurrent last drop cannot be missed
            let notified = self.inner.notify.notified();

            if self.count() == 0 {
                break;
            }

            notified.await;
        }
    }
}

/// Decrements its wait group on drop.
#[derive(Debug)]
pub(crate) struct GroupGuard(Arc<Inner>);

impl Drop for GroupGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.notify.notify_waiters();
        }
    }
}

/// Handle returned by [`BroadcastAgent::close`](crate::BroadcastAgent::close).
///
/// Resolves once every worker task of every subscriber has observed its closed
/// inbound queue and exited.
#[derive(Debug, Clone)]
pub struct Completion {
    workers: WaitGroup,
}

impl Completion {
    pub(crate) fn new(workers: WaitGroup) -> Self {
        Self { workers }
    }

    /// Waits until all worker tasks have exited.
    pub async fn wait(&self) {
        self.workers.wait().await;
    }

    /// Number of worker tasks that have not exited yet.
    pub fn pending(&self) -> usize {
        self.workers.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_wait_on_empty_group_returns_immediately() {
        let wg = WaitGroup::default();
        timeout(Duration::from_millis(50), wg.wait())
            .await
            .expect("empty group must not block");
    }

    #[tokio::test]
    async fn test_wait_resolves_after_last_guard_dropped() {
        let wg = WaitGroup::default();
        let a = wg.add();
        let b = wg.clone().add();
        assert_eq!(wg.count(), 2);

        let waiter = tokio::spawn({
            let wg = wg.clone();
            async move { wg.wait().await }
        });

        drop(a);
        sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(b);
        timeout(Duration::from_millis(200), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert_eq!(wg.count(), 0);
    }

    #[tokio::test]
    async fn test_completion_reports_pending() {
        let wg = WaitGroup::default();
        let guard = wg.add();
        let done = Completion::new(wg.clone());
        assert_eq!(done.pending(), 1);

        drop(guard);
        done.wait().await;
        assert_eq!(done.pending(), 0);
    }
}
