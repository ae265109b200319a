//! An in-memory store.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::storage::{
    Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
    ReadableWritableStorageTraits, StorageError, StoreKey, StoreKeys, StorePrefix,
    WritableStorageTraits,
};

/// An in-memory store.
///
/// A single lock guards the whole map, so operations on overlapping keys are serialised.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data_map: Mutex<BTreeMap<StoreKey, Bytes>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data_map.lock().len()
    }

    /// Returns true if the store has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_map.lock().is_empty()
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        Ok(self.data_map.lock().get(key).cloned())
    }

    fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        Ok(self.data_map.lock().contains_key(key))
    }
}

impl WritableStorageTraits for MemoryStore {
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.data_map.lock().insert(key.clone(), value);
        Ok(())
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.data_map.lock().remove(key);
        Ok(())
    }
}

impl ReadableWritableStorageTraits for MemoryStore {
    fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        let mut data_map = self.data_map.lock();
        if data_map.contains_key(key) {
            Ok(false)
        } else {
            data_map.insert(key.clone(), value);
            Ok(true)
        }
    }
}

impl ListableStorageTraits for MemoryStore {
    fn list(&self) -> Result<StoreKeys, StorageError> {
        Ok(self.data_map.lock().keys().cloned().collect())
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let data_map = self.data_map.lock();
        Ok(data_map
            .keys()
            .filter(|&key| key.has_prefix(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, sync::Arc};

    #[test]
    fn memory() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        super::super::test_util::store_write(&store)?;
        super::super::test_util::store_read(&store)?;
        super::super::test_util::store_list(&store)?;
        Ok(())
    }

    #[test]
    fn memory_set() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let key = "a/b".try_into()?;
        store.set(&key, Bytes::from_static(&[0, 1, 2]))?;
        assert_eq!(store.get(&key)?.unwrap(), &[0, 1, 2][..]);
        store.set(&key, Bytes::from_static(&[3]))?;
        assert_eq!(store.get(&key)?.unwrap(), &[3][..]);
        assert_eq!(store.len(), 1);
        store.delete(&key)?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn memory_set_if_absent_concurrent() -> Result<(), Box<dyn Error>> {
        use rayon::prelude::*;

        let store = Arc::new(MemoryStore::new());
        let key: StoreKey = "zarr.json".try_into()?;
        let written = (0..32u8)
            .into_par_iter()
            .map(|i| store.set_if_absent(&key, Bytes::from(vec![i])))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(written.iter().filter(|&&w| w).count(), 1);
        Ok(())
    }
}
