//! Per-line mutual exclusion
//!
//! Mutations of the same line run one after another, each seeing the state
//! committed by the previous one. Different lines never share a lock.
//! An entry lives only while some task holds or waits for it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct LineLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

/// Exclusive access to one line. Dropping it releases the lock and removes
/// the map entry when nobody else is waiting.
pub struct LineGuard<'a> {
    locks: &'a DashMap<i32, Arc<Mutex<()>>>,
    line_id: i32,
    guard: Option<OwnedMutexGuard<()>>,
}

impl LineLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `line_id`.
    pub async fn acquire(&self, line_id: i32) -> LineGuard<'_> {
        let lock = self.locks.entry(line_id).or_default().clone();
        let guard = lock.lock_owned().await;
        LineGuard {
            locks: &self.locks,
            line_id,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Drop for LineGuard<'_> {
    fn drop(&mut self) {
        // The owned guard holds a clone of the Arc; release it first so the
        // map's own reference is the only one left when nobody waits.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.line_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
