//! Per-member mutual exclusion for mutating commands.
//!
//! A command that changes a member's placement also talks to Discord (roles,
//! nicknames) after the store write. Holding the member's guard across both
//! keeps two commands for the same member from interleaving.

use crate::core::league::{League, MemberId};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

/// Lazily created async mutex per `(league, member)`.
#[derive(Debug, Default)]
pub struct MemberLocks {
    slots: Mutex<HashMap<(League, MemberId), Arc<AsyncMutex<()>>>>,
}

impl MemberLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and returns the guard for `(league, member)`.
    pub async fn lock(&self, league: League, member: MemberId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody is holding or waiting on
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry((league, member)).or_default())
        };
        trace!(%league, member = member.get(), "Waiting for member lock");
        slot.lock_owned().await
    }

    /// Number of lock entries currently alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no lock entries are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_member_is_serialized() {
        let locks = Arc::new(MemberLocks::new());
        let guard = locks.lock(League::F1, MemberId(1)).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(League::F1, MemberId(1)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish once the guard is dropped")
            .expect("waiter task panicked");
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = MemberLocks::new();
        let _a = locks.lock(League::F1, MemberId(1)).await;
        let _b = locks.lock(League::F2, MemberId(1)).await;
        let _c = locks.lock(League::F1, MemberId(2)).await;
        assert_eq!(locks.len(), 3);
    }

    #[tokio::test]
    async fn test_released_entries_are_pruned() {
        let locks = MemberLocks::new();
        drop(locks.lock(League::F1, MemberId(1)).await);
        drop(locks.lock(League::F1, MemberId(2)).await);
        assert_eq!(locks.len(), 1);
    }
}
