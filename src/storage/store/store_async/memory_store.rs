//! An asynchronous in-memory store.

use std::collections::BTreeMap;

use async_lock::RwLock;

use crate::storage::{
    AsyncListableStorageTraits, AsyncReadableStorageTraits, AsyncReadableWritableStorageTraits,
    AsyncWritableStorageTraits, Bytes, MaybeBytes, StorageError, StoreKey, StoreKeys, StorePrefix,
};

/// An asynchronous in-memory store.
///
/// Readers share the map, writers hold it exclusively.
#[derive(Debug, Default)]
pub struct AsyncMemoryStore {
    data_map: RwLock<BTreeMap<StoreKey, Bytes>>,
}

impl AsyncMemoryStore {
    /// Create a new empty asynchronous memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AsyncReadableStorageTraits for AsyncMemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        Ok(self.data_map.read().await.get(key).cloned())
    }

    async fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        Ok(self.data_map.read().await.contains_key(key))
    }
}

#[async_trait::async_trait]
impl AsyncWritableStorageTraits for AsyncMemoryStore {
    async fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.data_map.write().await.insert(key.clone(), value);
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.data_map.write().await.remove(key);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AsyncReadableWritableStorageTraits for AsyncMemoryStore {
    async fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        let mut data_map = self.data_map.write().await;
        if data_map.contains_key(key) {
            Ok(false)
        } else {
            data_map.insert(key.clone(), value);
            Ok(true)
        }
    }
}

#[async_trait::async_trait]
impl AsyncListableStorageTraits for AsyncMemoryStore {
    async fn list(&self) -> Result<StoreKeys, StorageError> {
        Ok(self.data_map.read().await.keys().cloned().collect())
    }

    async fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let data_map = self.data_map.read().await;
        Ok(data_map
            .keys()
            .filter(|&key| key.has_prefix(prefix))
            .cloned()
            .collect())
    }
}
