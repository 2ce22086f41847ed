//! Per-session mutation locks.
//!
//! Cart mutations are read-modify-write sequences over the whole mapping.
//! Holding the session's lock across the sequence makes two concurrent
//! requests from one browser apply one after the other instead of the
//! later write discarding the earlier one.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use super::SessionId;

/// Lock entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per active session.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `session`. Released on drop.
    pub async fn acquire(&self, session: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the map holds an unused lock
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry(*session)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of tracked sessions.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
