//! Per-parking admission locks.
//!
//! An admission reads the destination parking's current zones or gateways,
//! decides, and then writes. The guard returned by [`ParkingLocks::acquire`]
//! is held across that whole sequence, so two admissions against the same
//! parking are serialized while different parkings proceed in parallel.
//!
//! A caller holds at most one guard at a time (the destination parking's),
//! which keeps lock ordering trivially deadlock-free.
//!
//! Entries exist only while someone holds or waits for them: dropping the
//! last guard removes the entry, so ids that never resolve to a parking
//! leave nothing behind.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct ParkingLocks {
    inner: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// Exclusive admission rights on one parking, released on drop.
pub struct ParkingGuard<'a> {
    locks: &'a ParkingLocks,
    parking_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ParkingGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters cloned the Arc under the shard lock, so a count of one
        // means the map holds the only reference.
        self.locks
            .inner
            .remove_if(&self.parking_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl ParkingLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive admission rights on `parking_id`.
    pub async fn acquire(&self, parking_id: Uuid) -> ParkingGuard<'_> {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self.inner.entry(parking_id).or_default().clone();
        let guard = lock.lock_owned().await;
        ParkingGuard {
            locks: self,
            parking_id,
            guard: Some(guard),
        }
    }

    /// Number of parkings currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_parking_is_serialized() {
        let locks = Arc::new(ParkingLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let parking_id = Uuid::new_v4();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let peak = peak.clone();
                tokio::spawn(async move {
                    let _guard = locks.acquire(parking_id).await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_different_parkings_do_not_block() {
        let locks = ParkingLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let acquired =
            tokio::time::timeout(Duration::from_millis(100), locks.acquire(Uuid::new_v4())).await;
        assert!(acquired.is_ok());
        // the second guard was dropped with the timeout result
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_last_guard_removes_entry() {
        let locks = ParkingLocks::new();
        for _ in 0..100 {
            drop(locks.acquire(Uuid::new_v4()).await);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_survives_while_awaited() {
        let locks = Arc::new(ParkingLocks::new());
        let parking_id = Uuid::new_v4();
        let first = locks.acquire(parking_id).await;

        let waiter = tokio::spawn({
            let locks = locks.clone();
            async move {
                let _guard = locks.acquire(parking_id).await;
            }
        });
        // let the waiter clone the entry and park on the mutex
        tokio::task::yield_now().await;
        drop(first);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
