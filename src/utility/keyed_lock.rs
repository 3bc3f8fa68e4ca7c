
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use std::hash::Hash;
use std::sync::Arc;


/// Serializes work per key while letting different keys run concurrently.
pub struct KeyedLock<K: Eq + Hash + Clone> {
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Clone> KeyedLock<K> {

    pub fn new() -> Self {
        KeyedLock { locks: DashMap::new() }
    }

    pub async fn lock(&self, key: K) -> KeyedGuard<'_, K> {
        let mutex = self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        KeyedGuard { owner: self, key, guard: Some(guard) }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

}

pub struct KeyedGuard<'a, K: Eq + Hash + Clone> {
    owner: &'a KeyedLock<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyedGuard<'_, K> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // forget the entry once nobody else waits on it
        self.owner.locks.remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
