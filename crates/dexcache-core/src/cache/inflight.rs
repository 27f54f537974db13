use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// How concurrent lookups of the same uncached key behave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InflightPolicy {
    /// Every caller that misses the cache issues its own request.
    #[default]
    Independent,
    /// Callers missing the same key queue behind the first one, then
    /// re-check the cache before fetching.
    SingleFlight,
}

type LockMap<K> = Arc<StdMutex<HashMap<K, Arc<Mutex<()>>>>>;

/// Per-key async locks used to coalesce concurrent fetches.
pub struct InflightGate<K> {
    policy: InflightPolicy,
    locks: LockMap<K>,
}

/// Held while fetching a key. Dropping it releases the key, including when
/// the fetching future is cancelled.
pub struct InflightPermit<K: Eq + Hash> {
    held: Option<Held<K>>,
}

struct Held<K> {
    key: K,
    guard: OwnedMutexGuard<()>,
    locks: LockMap<K>,
}

impl<K: Eq + Hash + Clone> InflightGate<K> {
    pub fn new(policy: InflightPolicy) -> Self {
        Self {
            policy,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    pub fn policy(&self) -> InflightPolicy {
        self.policy
    }

    /// Wait for exclusive fetch rights on `key` under `SingleFlight`;
    /// returns immediately under `Independent`.
    pub async fn enter(&self, key: &K) -> InflightPermit<K> {
        if self.policy == InflightPolicy::Independent {
            return InflightPermit { held: None };
        }

        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                map.entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        let guard = lock.lock_owned().await;
        InflightPermit {
            held: Some(Held {
                key: key.clone(),
                guard,
                locks: Arc::clone(&self.locks),
            }),
        }
    }

    /// Number of keys with a fetch in progress or queued.
    pub fn pending(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<K: Eq + Hash> Drop for InflightPermit<K> {
    fn drop(&mut self) {
        let Some(Held { key, guard, locks }) = self.held.take() else {
            return;
        };
        drop(guard);

        // Waiters hold their own clone of the lock, so a count of one
        // means only the map still references it.
        let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
        if map.get(&key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&key);
        }
    }
}
