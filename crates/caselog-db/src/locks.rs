//! Per-case exclusive sections.
//!
//! Mutations of the same case queue behind one another; mutations of
//! different cases never contend. Entries are dropped once nobody holds or
//! waits for them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct CaseLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CaseLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `case_id`.
    pub async fn acquire(&self, case_id: &str) -> CaseGuard<'_> {
        // Clone out of the map so no shard lock is held across the await.
        let lock = Arc::clone(self.locks.entry(case_id.to_string()).or_default().value());
        let guard = lock.lock_owned().await;
        CaseGuard {
            locks: &self.locks,
            case_id: case_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of cases currently held or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one case, released on drop.
pub struct CaseGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    case_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl CaseGuard<'_> {
    #[must_use]
    pub fn case_id(&self) -> &str {
        &self.case_id
    }
}

impl Drop for CaseGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.case_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
