//! Ordering between station deletion and line mutations
//!
//! A line mutation that puts a station on a line holds a shared guard from
//! its existence check until the line is saved. Deleting a station takes
//! the guard exclusively, so its reference check and delete can never
//! interleave with such a mutation.

use std::sync::Arc;

use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

#[derive(Clone, Default)]
pub struct StationGuard {
    lock: Arc<RwLock<()>>,
}

impl StationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Held while a line starts referencing stations.
    pub async fn attach(&self) -> OwnedRwLockReadGuard<()> {
        self.lock.clone().read_owned().await
    }

    /// Held while a station is checked and deleted.
    pub async fn detach(&self) -> OwnedRwLockWriteGuard<()> {
        self.lock.clone().write_owned().await
    }
}
