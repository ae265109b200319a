//! An async to sync storage adapter.
//!
//! The docs for the [`AsyncToSyncBlockOn`] trait include an example implementation for the `tokio` runtime.

use crate::storage::{
    AsyncListableStorageTraits, AsyncReadableStorageTraits, AsyncReadableWritableStorageTraits,
    AsyncWritableStorageTraits, Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
    ReadableWritableStorageTraits, StorageError, StoreKey, StoreKeys, StorePrefix,
    WritableStorageTraits,
};

use std::sync::Arc;

/// Trait for an asynchronous runtime implementing `block_on`.
///
/// ### Example `tokio` implementation of [`AsyncToSyncBlockOn`].
/// ```rust
/// # use zarrs_core::storage::storage_adapter::async_to_sync::AsyncToSyncBlockOn;
/// struct TokioBlockOn(tokio::runtime::Handle);
///
/// impl AsyncToSyncBlockOn for TokioBlockOn {
///     fn block_on<F: core::future::Future>(&self, future: F) -> F::Output {
///         self.0.block_on(future)
///     }
/// }
/// ```
pub trait AsyncToSyncBlockOn: Send + Sync {
    /// Runs a future to completion.
    fn block_on<F: core::future::Future>(&self, future: F) -> F::Output;
}

/// An async to sync storage adapter.
///
/// Exposes an asynchronous store through the synchronous storage traits, so it can back a synchronous [`Array`](crate::array::Array).
///
/// The [`AsyncToSyncBlockOn`] implementation must be compatible with the asynchronous store.
/// An [`AsyncToSyncStorageAdapter`] may panic if called within an asynchronous execution context.
pub struct AsyncToSyncStorageAdapter<TStorage: ?Sized, TBlockOn: AsyncToSyncBlockOn> {
    storage: Arc<TStorage>,
    block_on: TBlockOn,
}

impl<TStorage: ?Sized, TBlockOn: AsyncToSyncBlockOn> AsyncToSyncStorageAdapter<TStorage, TBlockOn> {
    /// Create a new async to sync storage adapter.
    #[must_use]
    pub fn new(storage: Arc<TStorage>, block_on: TBlockOn) -> Self {
        Self { storage, block_on }
    }

    fn block_on<F: core::future::Future>(&self, future: F) -> F::Output {
        self.block_on.block_on(future)
    }
}

impl<TStorage: ?Sized + AsyncReadableStorageTraits, TBlockOn: AsyncToSyncBlockOn>
    ReadableStorageTraits for AsyncToSyncStorageAdapter<TStorage, TBlockOn>
{
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        self.block_on(self.storage.get(key))
    }

    fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        self.block_on(self.storage.exists(key))
    }
}

impl<TStorage: ?Sized + AsyncWritableStorageTraits, TBlockOn: AsyncToSyncBlockOn>
    WritableStorageTraits for AsyncToSyncStorageAdapter<TStorage, TBlockOn>
{
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.block_on(self.storage.set(key, value))
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.block_on(self.storage.delete(key))
    }
}

impl<TStorage: ?Sized + AsyncReadableWritableStorageTraits, TBlockOn: AsyncToSyncBlockOn>
    ReadableWritableStorageTraits for AsyncToSyncStorageAdapter<TStorage, TBlockOn>
{
    fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        self.block_on(self.storage.set_if_absent(key, value))
    }
}

impl<TStorage: ?Sized + AsyncListableStorageTraits, TBlockOn: AsyncToSyncBlockOn>
    ListableStorageTraits for AsyncToSyncStorageAdapter<TStorage, TBlockOn>
{
    fn list(&self) -> Result<StoreKeys, StorageError> {
        self.block_on(self.storage.list())
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        self.block_on(self.storage.list_prefix(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::AsyncMemoryStore;
    use std::error::Error;

    struct FuturesBlockOn;

    impl AsyncToSyncBlockOn for FuturesBlockOn {
        fn block_on<F: core::future::Future>(&self, future: F) -> F::Output {
            futures::executor::block_on(future)
        }
    }

    #[test]
    fn async_to_sync() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(AsyncMemoryStore::new());
        let store = AsyncToSyncStorageAdapter::new(store, FuturesBlockOn);
        crate::storage::store::test_util::store_write(&store)?;
        crate::storage::store::test_util::store_read(&store)?;
        crate::storage::store::test_util::store_list(&store)?;
        Ok(())
    }
}
