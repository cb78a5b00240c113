use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use inkstreak_domain::shared::UserId;

/// Idle entries are swept once the map grows past this size
const SWEEP_THRESHOLD: usize = 1024;

/// Serializes read-modify-write cycles per user.
///
/// Holding the guard returned by [`UserLockRegistry::lock`] excludes every
/// other caller for the same user. Different users never contend.
#[derive(Default)]
pub struct UserLockRegistry {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let user_lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= SWEEP_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry(user_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        user_lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked_users(&self) -> usize {
        self.locks.lock().await.len()
    }
}
