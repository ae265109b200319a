//! A bounded least-recently-used caching storage adapter.

use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use parking_lot::Mutex;
use thiserror::Error;

use crate::{
    config::global_config,
    storage::{
        store::MemoryStore, Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
        ReadableWritableStorageTraits, StorageError, StoreKey, StoreKeys, StorePrefix,
        WritableStorageTraits,
    },
};

/// An invalid cache capacity.
#[derive(Debug, Error)]
#[error("cache capacity must be greater than zero")]
pub struct InvalidCacheCapacityError;

/// The cache body and its recency index, guarded together.
#[derive(Debug)]
struct CacheState {
    index: LruCache<StoreKey, ()>,
    cache: MemoryStore,
    evictions: usize,
}

/// A caching storage adapter.
///
/// Holds up to `capacity` values in an auxiliary [`MemoryStore`] in front of the wrapped store.
/// The wrapped store is the source of truth:
///  - `get` serves a cached value, or reads through and caches the value,
///  - `set` caches the value then writes through; a failed write through is propagated and the value is uncached,
///  - `delete` uncaches the value then deletes it from the wrapped store,
///  - `exists` is true if either the cache or the wrapped store has the key,
///  - `list` is the sorted union of cached and wrapped keys.
///
/// When a new key pushes the cache over capacity, the least recently used key is evicted from the cache only.
/// Failures to write or evict cached values are logged and ignored.
///
/// The cache lock is never held while the wrapped store is accessed.
/// Two threads missing on the same key may both read through, in which case the last to cache the value wins.
#[derive(Debug)]
pub struct CachingStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    state: Mutex<CacheState>,
}

impl<TStorage: ?Sized> CachingStorageAdapter<TStorage> {
    /// Create a new caching storage adapter with the configured [cache capacity](crate::config::Config#cache-capacity).
    ///
    /// A configured capacity of zero is treated as one.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        let capacity = global_config().cache_capacity();
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self::new_with_non_zero_capacity(storage, capacity)
    }

    /// Create a new caching storage adapter holding up to `capacity` values.
    ///
    /// # Errors
    /// Returns [`InvalidCacheCapacityError`] if `capacity` is zero.
    pub fn new_with_capacity(
        storage: Arc<TStorage>,
        capacity: usize,
    ) -> Result<Self, InvalidCacheCapacityError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(InvalidCacheCapacityError)?;
        Ok(Self::new_with_non_zero_capacity(storage, capacity))
    }

    fn new_with_non_zero_capacity(storage: Arc<TStorage>, capacity: NonZeroUsize) -> Self {
        Self {
            storage,
            state: Mutex::new(CacheState {
                index: LruCache::new(capacity),
                cache: MemoryStore::new(),
                evictions: 0,
            }),
        }
    }

    /// Returns the maximum number of cached values.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().index.cap().get()
    }

    /// Returns the cached keys, sorted lexicographically.
    #[must_use]
    pub fn cached_keys(&self) -> StoreKeys {
        let mut keys: StoreKeys = self
            .state
            .lock()
            .index
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Returns true if `key` is cached.
    ///
    /// This does not affect recency.
    #[must_use]
    pub fn is_cached(&self, key: &StoreKey) -> bool {
        self.state.lock().index.contains(key)
    }

    /// Returns the number of evictions since creation.
    #[must_use]
    pub fn evictions(&self) -> usize {
        self.state.lock().evictions
    }

    /// Remove all cached values.
    ///
    /// The wrapped store is unaffected.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.cache = MemoryStore::new();
    }

    /// Mark `key` most recently used and cache `value`, evicting the least recently used key if over capacity.
    fn cache_value(&self, key: &StoreKey, value: Bytes) {
        let mut state = self.state.lock();
        if let Some((evicted, ())) = state.index.push(key.clone(), ()) {
            if &evicted != key {
                log::trace!("cache evicted {evicted}");
                state.evictions += 1;
                if let Err(err) = state.cache.delete(&evicted) {
                    log::warn!("failed to evict {evicted} from the cache: {err}");
                }
            }
        }
        if let Err(err) = state.cache.set(key, value) {
            log::warn!("failed to cache {key}: {err}");
            state.index.pop(key);
        }
    }

    fn uncache_value(&self, key: &StoreKey) {
        let mut state = self.state.lock();
        if state.index.pop(key).is_some() {
            if let Err(err) = state.cache.delete(key) {
                log::warn!("failed to remove {key} from the cache: {err}");
            }
        }
    }

    fn cached_value(&self, key: &StoreKey) -> MaybeBytes {
        let mut state = self.state.lock();
        state.index.get(key)?;
        match state.cache.get(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                state.index.pop(key);
                None
            }
            Err(err) => {
                log::warn!("failed to read {key} from the cache: {err}");
                state.index.pop(key);
                None
            }
        }
    }

    fn union_with_cached(&self, mut keys: StoreKeys, prefix: &StorePrefix) -> StoreKeys {
        keys.extend(
            self.state
                .lock()
                .index
                .iter()
                .map(|(k, _)| k)
                .filter(|k| k.has_prefix(prefix))
                .cloned(),
        );
        keys.sort();
        keys.dedup();
        keys
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for CachingStorageAdapter<TStorage>
{
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        if let Some(value) = self.cached_value(key) {
            return Ok(Some(value));
        }
        let value = self.storage.get(key)?;
        if let Some(value) = &value {
            self.cache_value(key, value.clone());
        }
        Ok(value)
    }

    fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        if self.is_cached(key) {
            Ok(true)
        } else {
            self.storage.exists(key)
        }
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for CachingStorageAdapter<TStorage>
{
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.cache_value(key, value.clone());
        self.storage.set(key, value).inspect_err(|_| {
            self.uncache_value(key);
        })
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.uncache_value(key);
        self.storage.delete(key)?;
        // A concurrent read may have cached the value before it was deleted
        self.uncache_value(key);
        Ok(())
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> ReadableWritableStorageTraits
    for CachingStorageAdapter<TStorage>
{
    fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        let written = self.storage.set_if_absent(key, value.clone())?;
        if written {
            self.cache_value(key, value);
        }
        Ok(written)
    }
}

impl<TStorage: ?Sized + ListableStorageTraits> ListableStorageTraits
    for CachingStorageAdapter<TStorage>
{
    fn list(&self) -> Result<StoreKeys, StorageError> {
        let keys = self.storage.list()?;
        Ok(self.union_with_cached(keys, &StorePrefix::root()))
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let keys = self.storage.list_prefix(prefix)?;
        Ok(self.union_with_cached(keys, prefix))
    }
}
