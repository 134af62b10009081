//! Per-host mutual exclusion
//!
//! Two provisioning runs for the same host would interleave their teardown and
//! creation, leaving whichever finishes last on the stream record while the
//! other's ingress leaks. `HostLocks` hands out one async mutex per host id.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Keyed async mutex, cheap to clone
#[derive(Clone, Default)]
pub struct HostLocks {
    locks: Arc<LockMap>,
}

impl HostLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other holder exists for `host_id`
    pub async fn lock(&self, host_id: &str) -> HostGuard {
        let mutex = self
            .locks
            .entry(host_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = mutex.lock_owned().await;

        HostGuard {
            host_id: host_id.to_string(),
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    /// Number of hosts with a live lock entry
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl std::fmt::Debug for HostLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLocks").field("held", &self.locks.len()).finish()
    }
}

/// Held for the duration of one provisioning run
pub struct HostGuard {
    host_id: String,
    locks: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for HostGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Map entry plus nobody else: the host is idle, forget it
        self.locks
            .remove_if(&self.host_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
