//! Keyed async mutexes for serializing work on one round or one player.
//!
//! Lock order is fixed: a player lock is always taken before a round lock.
//! A slot lives only while someone holds or waits on it.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: DashMap<i64, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. The guard releases on drop.
    pub async fn lock(&self, key: i64) -> KeyedGuard<'_> {
        // Clone the slot out so the map shard is not held across the await
        let slot = self
            .slots
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyedGuard {
            guard: Some(slot.lock_owned().await),
            locks: self,
            key,
        }
    }

    /// Drop the slot for `key` once nobody holds or waits on it.
    fn forget(&self, key: i64) {
        self.slots
            .remove_if(&key, |_, slot| Arc::strong_count(slot) == 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Exclusive access to one key of a [`KeyedLocks`] table.
pub struct KeyedGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a KeyedLocks,
    key: i64,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own slot reference no longer counts
        self.guard.take();
        self.locks.forget(self.key);
    }
}

/// Locks used by round-scoped services.
#[derive(Debug, Default)]
pub struct RoundLocks {
    pub players: KeyedLocks,
    pub rounds: KeyedLocks,
}

impl RoundLocks {
    pub fn new() -> Self {
        Self::default()
    }
}
