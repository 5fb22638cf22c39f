//! Pluggable stores behind the prepared-component and screen caches.
//!
//! Writes are insert-if-absent: when two workers race on the same key the
//! first value stored wins and both callers get it back.

use ahash::{AHashMap, RandomState};
use lru::LruCache;
use serde::Deserialize;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub trait CacheStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    /// Stores `value` unless the key is already present; returns the stored value.
    fn insert_if_absent(&self, key: K, value: V) -> V;
    fn clear(&self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    #[default]
    Lru,
    Unbounded,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A size-bounded store that evicts the least recently used entry.
pub struct LruStore<K: Hash + Eq, V> {
    inner: Mutex<LruCache<K, V, RandomState>>,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::with_hasher(capacity, RandomState::new())),
        }
    }
}

impl<K, V> CacheStore<K, V> for LruStore<K, V>
where
    K: Hash + Eq + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        lock(&self.inner).get(key).cloned()
    }

    fn insert_if_absent(&self, key: K, value: V) -> V {
        let mut cache = lock(&self.inner);
        if let Some(existing) = cache.get(&key) {
            return existing.clone();
        }
        cache.put(key, value.clone());
        value
    }

    fn clear(&self) {
        lock(&self.inner).clear();
    }

    fn len(&self) -> usize {
        lock(&self.inner).len()
    }
}

/// A store that never evicts. Only `clear` shrinks it.
pub struct UnboundedStore<K, V> {
    inner: Mutex<AHashMap<K, V>>,
}

impl<K, V> Default for UnboundedStore<K, V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(AHashMap::new()),
        }
    }
}

impl<K, V> CacheStore<K, V> for UnboundedStore<K, V>
where
    K: Hash + Eq + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        lock(&self.inner).get(key).cloned()
    }

    fn insert_if_absent(&self, key: K, value: V) -> V {
        lock(&self.inner).entry(key).or_insert(value).clone()
    }

    fn clear(&self) {
        lock(&self.inner).clear();
    }

    fn len(&self) -> usize {
        lock(&self.inner).len()
    }
}

/// Builds the store selected by `policy`. `capacity` only bounds LRU stores.
pub fn build_store<K, V>(policy: CachePolicy, capacity: usize) -> Arc<dyn CacheStore<K, V>>
where
    K: Hash + Eq + Send + 'static,
    V: Clone + Send + 'static,
{
    match policy {
        CachePolicy::Lru => Arc::new(LruStore::new(capacity)),
        CachePolicy::Unbounded => Arc::new(UnboundedStore::default()),
    }
}
