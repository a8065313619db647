//! Per-site advisory locks

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes workflow runs that target the same zone.
///
/// Keys are normalized zone names (see [`zone_key`]), so a create and a
/// later update of the same zone share one lock. Runs on different keys
/// never contend. Idle entries are pruned on each acquire.
#[derive(Debug, Default)]
pub struct SiteLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SiteLocks {
    /// Wait for exclusive access to `key`; released when the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|k, lock| k == key || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

/// Lock key for a zone name.
pub(crate) fn zone_key(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
