//! # Cache Slot
//!
//! One memoized cell of the query cache: holds the last fetched value for
//! a single [`crate::QueryKey`], deduplicates concurrent fetches, and
//! enforces the invalidation ordering guarantee.
//!
//! ## Slot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Slot<T> States                                  │
//! │                                                                         │
//! │              get_or_fetch (leader)                                      │
//! │   ┌───────┐ ─────────────────────► ┌──────────┐  fetch done  ┌───────┐ │
//! │   │ Empty │                        │ InFlight │ ───────────► │ Ready │ │
//! │   └───────┘ ◄───────────────────── └──────────┘  (same epoch)└───────┘ │
//! │       ▲       leader cancelled          │                        │      │
//! │       │                                 │ get_or_fetch           │      │
//! │       │                                 ▼ (followers)            │      │
//! │       │                          wait on watch channel           │      │
//! │       │                                                          │      │
//! │       └────────────────── invalidate() ◄─────────────────────────┘      │
//! │                           (epoch += 1)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Guarantee
//! `invalidate` bumps an epoch counter. A fetch records the epoch when it
//! starts and only stores its result if the epoch is unchanged when it
//! finishes. A stale read that was in flight when a write invalidated the
//! slot therefore never overwrites the cache - last writer wins by
//! invalidation epoch, not by completion order.
//!
//! ## Staleness Policy
//! A cached value is valid until explicitly invalidated. There is no
//! time-based expiry.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

// =============================================================================
// Query Outcome
// =============================================================================

/// Where a query result came from.
///
/// This is the loading state surfaced to callers: `Fetched` means this
/// call performed (or joined) a fetch - the loading transition the
/// dashboard renders a spinner for. `Cache` means the value was served
/// without touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuerySource {
    /// Served from the cache; no fetch ran.
    Cache,
    /// This call ran the fetch, or waited on one already in flight.
    Fetched,
}

/// A query result together with its loading provenance.
#[derive(Debug, Clone)]
pub struct QueryOutcome<T> {
    pub value: Arc<T>,
    pub source: QuerySource,
}

impl<T> QueryOutcome<T> {
    /// True when this call observed a loading transition.
    pub fn was_fetched(&self) -> bool {
        self.source == QuerySource::Fetched
    }
}

// =============================================================================
// Slot
// =============================================================================

enum SlotState<T> {
    /// No value and no fetch running.
    Empty,
    /// A fetch is running; followers wait on the channel.
    InFlight(watch::Receiver<Option<Arc<T>>>),
    /// A valid cached value.
    Ready(Arc<T>),
}

struct SlotInner<T> {
    /// Bumped by every invalidation. A fetch only stores its result when
    /// the epoch it started under is still current.
    epoch: u64,
    state: SlotState<T>,
}

/// A single-key cache cell with single-flight fetching.
///
/// The mutex only guards state transitions and is never held across an
/// await; the fetch itself runs unlocked.
pub struct Slot<T> {
    inner: Mutex<SlotInner<T>>,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Slot {
            inner: Mutex::new(SlotInner {
                epoch: 0,
                state: SlotState::Empty,
            }),
        }
    }

    /// Discards any cached value and marks in-flight fetches stale.
    pub fn invalidate(&self) {
        let mut inner = self.inner.lock().expect("slot mutex poisoned");
        inner.epoch = inner.epoch.wrapping_add(1);
        inner.state = SlotState::Empty;
    }

    /// True if a subsequent `get_or_fetch` would hit the cache.
    pub fn is_ready(&self) -> bool {
        let inner = self.inner.lock().expect("slot mutex poisoned");
        matches!(inner.state, SlotState::Ready(_))
    }

    /// Returns the cached value, fetching it if necessary.
    ///
    /// Concurrent callers for the same slot share one fetch: the first
    /// caller becomes the leader and runs `fetch`; everyone else waits on
    /// the leader's result. All callers that waited report
    /// [`QuerySource::Fetched`].
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> QueryOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let (tx, fetch_epoch) = loop {
            let follower_rx = {
                let mut inner = self.inner.lock().expect("slot mutex poisoned");
                match &inner.state {
                    SlotState::Ready(value) => {
                        return QueryOutcome {
                            value: Arc::clone(value),
                            source: QuerySource::Cache,
                        };
                    }
                    SlotState::InFlight(rx) => rx.clone(),
                    SlotState::Empty => {
                        let (tx, rx) = watch::channel(None);
                        inner.state = SlotState::InFlight(rx);
                        break (tx, inner.epoch);
                    }
                }
            };

            if let Some(value) = wait_for_leader(follower_rx).await {
                return QueryOutcome {
                    value,
                    source: QuerySource::Fetched,
                };
            }

            // The leader was cancelled before producing a value. Clear the
            // dead channel if it is still installed, then race to lead.
            let mut inner = self.inner.lock().expect("slot mutex poisoned");
            if let SlotState::InFlight(rx) = &inner.state {
                if rx.has_changed().is_err() {
                    inner.state = SlotState::Empty;
                }
            }
        };

        // Leader path: run the fetch with no lock held.
        let value = Arc::new(fetch().await);

        {
            let mut inner = self.inner.lock().expect("slot mutex poisoned");
            // Only store if no invalidation happened while we were away.
            if inner.epoch == fetch_epoch {
                inner.state = SlotState::Ready(Arc::clone(&value));
            }
        }

        // Wake followers either way; they observed this fetch.
        let _ = tx.send(Some(Arc::clone(&value)));

        QueryOutcome {
            value,
            source: QuerySource::Fetched,
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits until the in-flight leader publishes a value. `None` when the
/// leader went away without one.
async fn wait_for_leader<T>(mut rx: watch::Receiver<Option<Arc<T>>>) -> Option<Arc<T>> {
    loop {
        if let Some(value) = rx.borrow_and_update().as_ref() {
            return Some(Arc::clone(value));
        }
        if rx.changed().await.is_err() {
            return None;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    #[tokio::test]
    async fn test_first_get_fetches_then_caches() {
        let slot = Slot::new();
        let calls = AtomicUsize::new(0);

        let first = slot
            .get_or_fetch(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                41
            })
            .await;
        assert_eq!(*first.value, 41);
        assert!(first.was_fetched());

        let second = slot
            .get_or_fetch(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                99
            })
            .await;
        assert_eq!(*second.value, 41);
        assert_eq!(second.source, QuerySource::Cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let slot = Slot::new();

        let first = slot.get_or_fetch(|| async { 1 }).await;
        assert!(first.was_fetched());
        assert!(slot.is_ready());

        slot.invalidate();
        assert!(!slot.is_ready());

        let second = slot.get_or_fetch(|| async { 2 }).await;
        assert_eq!(*second.value, 2);
        assert!(second.was_fetched());
    }

    #[tokio::test]
    async fn test_concurrent_gets_share_one_fetch() {
        let slot = Arc::new(Slot::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let leader = tokio::spawn({
            let slot = Arc::clone(&slot);
            let calls = Arc::clone(&calls);
            let gate = Arc::clone(&gate);
            async move {
                slot.get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let _permit = gate.acquire().await.unwrap();
                    7
                })
                .await
            }
        });

        // Wait until the leader's fetch has actually started.
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let follower = tokio::spawn({
            let slot = Arc::clone(&slot);
            let calls = Arc::clone(&calls);
            async move {
                slot.get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    999
                })
                .await
            }
        });
        tokio::task::yield_now().await;

        gate.add_permits(1);

        let leader_outcome = leader.await.unwrap();
        let follower_outcome = follower.await.unwrap();

        assert_eq!(*leader_outcome.value, 7);
        assert_eq!(*follower_outcome.value, 7);
        assert!(leader_outcome.was_fetched());
        assert!(follower_outcome.was_fetched());

        // Exactly one fetch ran.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_fetch_does_not_overwrite_after_invalidation() {
        let slot = Arc::new(Slot::new());
        let started = Arc::new(Semaphore::new(0));
        let gate = Arc::new(Semaphore::new(0));

        // A slow fetch that starts before the invalidation and finishes
        // after it.
        let stale = tokio::spawn({
            let slot = Arc::clone(&slot);
            let started = Arc::clone(&started);
            let gate = Arc::clone(&gate);
            async move {
                slot.get_or_fetch(|| async move {
                    started.add_permits(1);
                    let _permit = gate.acquire().await.unwrap();
                    "stale"
                })
                .await
            }
        });

        let _ = started.acquire().await.unwrap();

        // A write lands while the stale read is still in flight.
        slot.invalidate();

        gate.add_permits(1);
        let stale_outcome = stale.await.unwrap();

        // The caller still gets its result...
        assert_eq!(*stale_outcome.value, "stale");

        // ...but the cache was NOT populated with it: the next read
        // refetches and sees fresh data.
        assert!(!slot.is_ready());
        let fresh = slot.get_or_fetch(|| async { "fresh" }).await;
        assert!(fresh.was_fetched());
        assert_eq!(*fresh.value, "fresh");
    }

    #[tokio::test]
    async fn test_followers_recover_from_cancelled_leader() {
        let slot = Arc::new(Slot::new());
        let started = Arc::new(Semaphore::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let leader = tokio::spawn({
            let slot = Arc::clone(&slot);
            let started = Arc::clone(&started);
            let gate = Arc::clone(&gate);
            async move {
                slot.get_or_fetch(|| async move {
                    started.add_permits(1);
                    let _permit = gate.acquire().await.unwrap();
                    0
                })
                .await
            }
        });

        let _ = started.acquire().await.unwrap();
        leader.abort();
        let _ = leader.await;

        // A follower arriving after the abort must not hang; it becomes
        // the new leader and fetches.
        let outcome = slot.get_or_fetch(|| async { 5 }).await;
        assert_eq!(*outcome.value, 5);
        assert!(outcome.was_fetched());
    }
}
