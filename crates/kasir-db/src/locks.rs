//! # Per-Cashier Checkout Locks
//!
//! ```text
//!   cashier 1 ── checkout A ──► lock(1) ── runs ───────────► unlock
//!   cashier 1 ── checkout B ──► lock(1) ── waits ──────────────────► runs → EmptyCart
//!   cashier 2 ── checkout C ──► lock(2) ── runs (independent)
//! ```
//!
//! A double-submitted "pay" from one cashier is serialized; the second
//! submission finds the cart already cleared. Different cashiers never wait
//! on each other here (SQLite still serializes their writes).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async mutex per cashier.
///
/// Entries exist only while a checkout holds or waits on them; the last
/// guard to release removes its cashier's entry.
#[derive(Debug, Default)]
pub struct CheckoutLocks {
    inner: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl CheckoutLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and holds the checkout lock of `cashier_id`.
    pub async fn acquire(&self, cashier_id: i64) -> CheckoutGuard<'_> {
        // Cloned under the map lock, so a live holder or waiter always keeps
        // the strong count above one.
        let lock = Arc::clone(self.map().entry(cashier_id).or_default());
        CheckoutGuard {
            locks: self,
            cashier_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// The map is only touched under this lock and never left half-updated,
    /// so a poisoned guard is still usable.
    fn map(&self) -> MutexGuard<'_, HashMap<i64, Arc<AsyncMutex<()>>>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release(&self, cashier_id: i64) {
        let mut map = self.map();
        if map
            .get(&cashier_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&cashier_id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.map().len()
    }
}

/// Held checkout lock of one cashier. Dropping it unlocks.
#[derive(Debug)]
pub struct CheckoutGuard<'a> {
    locks: &'a CheckoutLocks,
    cashier_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for CheckoutGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the guard's own Arc no longer counts
        drop(self.guard.take());
        self.locks.release(self.cashier_id);
    }
}
