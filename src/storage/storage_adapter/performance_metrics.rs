//! A storage adapter which records performance metrics.

use crate::storage::{
    Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
    ReadableWritableStorageTraits, StorageError, StoreKey, StoreKeys, StorePrefix,
    WritableStorageTraits,
};

#[cfg(feature = "async")]
use crate::storage::{
    AsyncListableStorageTraits, AsyncReadableStorageTraits, AsyncReadableWritableStorageTraits,
    AsyncWritableStorageTraits,
};

use parking_lot::Mutex;
use std::sync::Arc;

/// A snapshot of the counters of a [`PerformanceMetricsStorageAdapter`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreMetrics {
    /// The number of `get` calls.
    pub gets: usize,
    /// The number of `exists` calls.
    pub exists: usize,
    /// The number of `set` and `set_if_absent` calls.
    pub sets: usize,
    /// The number of `delete` calls.
    pub deletes: usize,
    /// The number of `list` and `list_prefix` calls.
    pub lists: usize,
    /// The number of bytes returned by successful `get` calls.
    pub bytes_read: usize,
    /// The number of bytes passed to successful `set` calls, and `set_if_absent` calls that wrote.
    pub bytes_written: usize,
}

/// The performance metrics storage adapter.
///
/// Transparently forwards every operation to the wrapped store and counts each call.
/// A call is counted whether or not it succeeds.
#[derive(Debug)]
pub struct PerformanceMetricsStorageAdapter<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    metrics: Mutex<StoreMetrics>,
}

impl<TStorage: ?Sized> PerformanceMetricsStorageAdapter<TStorage> {
    /// Create a new performance metrics storage adapter wrapping `storage`.
    #[must_use]
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self {
            storage,
            metrics: Mutex::default(),
        }
    }

    /// Returns a snapshot of all counters.
    #[must_use]
    pub fn metrics(&self) -> StoreMetrics {
        *self.metrics.lock()
    }

    /// Returns the number of `get` calls.
    #[must_use]
    pub fn gets(&self) -> usize {
        self.metrics.lock().gets
    }

    /// Returns the number of bytes read.
    #[must_use]
    pub fn bytes_read(&self) -> usize {
        self.metrics.lock().bytes_read
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.metrics.lock().bytes_written
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        *self.metrics.lock() = StoreMetrics::default();
    }

    fn record(&self, f: impl FnOnce(&mut StoreMetrics)) {
        f(&mut self.metrics.lock());
    }

    fn record_get(&self, value: &Result<MaybeBytes, StorageError>) {
        let bytes = match value {
            Ok(Some(bytes)) => bytes.len(),
            _ => 0,
        };
        self.record(|m| {
            m.gets += 1;
            m.bytes_read += bytes;
        });
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> ReadableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        let value = self.storage.get(key);
        self.record_get(&value);
        value
    }

    fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        self.record(|m| m.exists += 1);
        self.storage.exists(key)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> WritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        let len = value.len();
        let result = self.storage.set(key, value);
        self.record(|m| {
            m.sets += 1;
            if result.is_ok() {
                m.bytes_written += len;
            }
        });
        result
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.record(|m| m.deletes += 1);
        self.storage.delete(key)
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> ReadableWritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        let len = value.len();
        let result = self.storage.set_if_absent(key, value);
        self.record(|m| {
            m.sets += 1;
            if matches!(result, Ok(true)) {
                m.bytes_written += len;
            }
        });
        result
    }
}

impl<TStorage: ?Sized + ListableStorageTraits> ListableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    fn list(&self) -> Result<StoreKeys, StorageError> {
        self.record(|m| m.lists += 1);
        self.storage.list()
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        self.record(|m| m.lists += 1);
        self.storage.list_prefix(prefix)
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<TStorage: ?Sized + AsyncReadableStorageTraits> AsyncReadableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    async fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        let value = self.storage.get(key).await;
        self.record_get(&value);
        value
    }

    async fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        self.record(|m| m.exists += 1);
        self.storage.exists(key).await
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<TStorage: ?Sized + AsyncWritableStorageTraits> AsyncWritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    async fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        let len = value.len();
        let result = self.storage.set(key, value).await;
        self.record(|m| {
            m.sets += 1;
            if result.is_ok() {
                m.bytes_written += len;
            }
        });
        result
    }

    async fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.record(|m| m.deletes += 1);
        self.storage.delete(key).await
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<TStorage: ?Sized + AsyncReadableWritableStorageTraits> AsyncReadableWritableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    async fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        let len = value.len();
        let result = self.storage.set_if_absent(key, value).await;
        self.record(|m| {
            m.sets += 1;
            if matches!(result, Ok(true)) {
                m.bytes_written += len;
            }
        });
        result
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<TStorage: ?Sized + AsyncListableStorageTraits> AsyncListableStorageTraits
    for PerformanceMetricsStorageAdapter<TStorage>
{
    async fn list(&self) -> Result<StoreKeys, StorageError> {
        self.record(|m| m.lists += 1);
        self.storage.list().await
    }

    async fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        self.record(|m| m.lists += 1);
        self.storage.list_prefix(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::storage::store::MemoryStore;

    use super::*;

    #[test]
    fn performance_metrics() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let metrics = PerformanceMetricsStorageAdapter::new(store.clone());

        metrics.set(&"a".try_into()?, Bytes::from_static(&[0, 1, 2]))?;
        assert!(!metrics.set_if_absent(&"a".try_into()?, Bytes::from_static(&[9]))?);
        assert_eq!(metrics.get(&"a".try_into()?)?, Some(Bytes::from_static(&[0, 1, 2])));
        assert!(metrics.get(&"b".try_into()?)?.is_none());
        assert!(metrics.exists(&"a".try_into()?)?);
        metrics.delete(&"a".try_into()?)?;
        assert!(metrics.list()?.is_empty());

        assert_eq!(
            metrics.metrics(),
            StoreMetrics {
                gets: 2,
                exists: 1,
                sets: 2,
                deletes: 1,
                lists: 1,
                bytes_read: 3,
                bytes_written: 3,
            }
        );
        assert_eq!(metrics.gets(), 2);
        assert!(store.is_empty());

        metrics.reset();
        assert_eq!(metrics.metrics(), StoreMetrics::default());
        Ok(())
    }
}
