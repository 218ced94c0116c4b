use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Entries are pruned once the registry grows past this many wagers.
const PRUNE_THRESHOLD: usize = 1024;

/// Registry of per-wager async mutexes.
///
/// Holding the guard returned by [`WagerLocks::acquire`] gives exclusive
/// access to one wager's read-modify-write cycle within this process.
#[derive(Clone, Default)]
pub struct WagerLocks {
    inner: Arc<StdMutex<HashMap<i32, Arc<Mutex<()>>>>>,
}

impl WagerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, wager_id: i32) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            if locks.len() > PRUNE_THRESHOLD {
                // Only the registry holds an idle lock.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }

            Arc::clone(locks.entry(wager_id).or_default())
        };

        lock.lock_owned().await
    }

    /// Number of wagers with a registered lock.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
