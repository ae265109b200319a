//! Storage for a chunked array hierarchy ([stores](store) and [storage adapters](storage_adapter)).
//!
//! A [store] is a byte-oriented key/value backend: memory, a filesystem, or a read-only remote server.
//! A [storage adapter](storage_adapter) wraps exactly one other store and has the same interface as a store, so adapters chain.
//!
//! The store interface is split into capabilities:
//!  - [`ReadableStorageTraits`]: `get` and `exists`,
//!  - [`WritableStorageTraits`]: `set` and `delete`,
//!  - [`ListableStorageTraits`]: `list` and `list_prefix`,
//!  - [`ReadableWritableStorageTraits`]: an atomic `set_if_absent`.
//!
//! Read-only stores still implement every capability, but fail writes and listing with [`StorageError::Unsupported`].
//!
//! An asynchronous variant of each trait is available with the `async` feature.

pub mod storage_adapter;
mod storage_sync;
pub mod store;
mod store_key;
mod store_prefix;

#[cfg(feature = "async")]
mod storage_async;

use std::sync::Arc;

use thiserror::Error;

use crate::{array::ChunkKeyEncoding, node::NodePath};

pub use store_key::{StoreKey, StoreKeyError, StoreKeys};
pub use store_prefix::{StorePrefix, StorePrefixError, StorePrefixes};

#[cfg(feature = "async")]
pub use self::storage_async::{
    async_erase_node, AsyncListableStorageTraits, AsyncReadableListableStorageTraits,
    AsyncReadableStorageTraits, AsyncReadableWritableListableStorageTraits,
    AsyncReadableWritableStorageTraits, AsyncWritableStorageTraits,
};

pub use self::storage_sync::{
    erase_node, ListableStorageTraits, ReadableListableStorageTraits, ReadableStorageTraits,
    ReadableWritableListableStorageTraits, ReadableWritableStorageTraits, WritableStorageTraits,
};

/// Store value bytes.
pub type Bytes = bytes::Bytes;

/// Optional store value bytes, [`None`] if the key does not exist.
pub type MaybeBytes = Option<Bytes>;

/// [`Arc`] wrapped readable storage.
pub type ReadableStorage = Arc<dyn ReadableStorageTraits>;

/// [`Arc`] wrapped writable storage.
pub type WritableStorage = Arc<dyn WritableStorageTraits>;

/// [`Arc`] wrapped listable storage.
pub type ListableStorage = Arc<dyn ListableStorageTraits>;

/// [`Arc`] wrapped readable and writable storage.
pub type ReadableWritableStorage = Arc<dyn ReadableWritableStorageTraits>;

/// [`Arc`] wrapped readable and listable storage.
pub type ReadableListableStorage = Arc<dyn ReadableListableStorageTraits>;

/// [`Arc`] wrapped readable, writable, and listable storage.
pub type ReadableWritableListableStorage = Arc<dyn ReadableWritableListableStorageTraits>;

#[cfg(feature = "async")]
/// [`Arc`] wrapped asynchronous readable storage.
pub type AsyncReadableStorage = Arc<dyn AsyncReadableStorageTraits>;

#[cfg(feature = "async")]
/// [`Arc`] wrapped asynchronous readable, writable and listable storage.
pub type AsyncReadableWritableListableStorage = Arc<dyn AsyncReadableWritableListableStorageTraits>;

/// A storage error.
///
/// A missing key is not an error, it is signalled by [`None`] from [`ReadableStorageTraits::get`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// An invalid store key.
    #[error(transparent)]
    InvalidStoreKey(#[from] StoreKeyError),
    /// An invalid store prefix.
    #[error(transparent)]
    InvalidStorePrefix(#[from] StorePrefixError),
    /// The requested operation is not supported by the store.
    #[error("unsupported store operation: {0}")]
    Unsupported(String),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

/// The name of the metadata document of a node.
pub const METADATA_FILE_NAME: &str = "zarr.json";

/// Return the metadata key (`zarr.json`) given a node path.
///
/// This is `zarr.json` for the root node and `<path>/zarr.json` otherwise.
#[must_use]
pub fn meta_key(path: &NodePath) -> StoreKey {
    let path = path.as_str();
    if path.eq("/") {
        unsafe { StoreKey::new_unchecked(METADATA_FILE_NAME) }
    } else {
        let path = path.strip_prefix('/').unwrap_or(path);
        unsafe { StoreKey::new_unchecked(format!("{path}/{METADATA_FILE_NAME}")) }
    }
}

/// Return the data key given a node path, chunk grid indices, and a chunk key encoding.
///
/// # Errors
/// Returns a [`StoreKeyError`] if the encoded chunk key does not form a valid store key.
/// This can only happen with a custom separator that produces empty key components.
pub fn data_key(
    path: &NodePath,
    chunk_grid_indices: &[u64],
    chunk_key_encoding: &ChunkKeyEncoding,
) -> Result<StoreKey, StoreKeyError> {
    let path = path.as_str();
    let path = path.strip_prefix('/').unwrap_or(path);
    let chunk_key = chunk_key_encoding.encode(chunk_grid_indices);
    if path.is_empty() {
        StoreKey::new(chunk_key)
    } else {
        StoreKey::new(format!("{path}/{chunk_key}"))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::array::chunk_key_encoding::{ChunkKeySeparator, DefaultChunkKeyEncoding};

    use super::{
        storage_adapter::{CachingStorageAdapter, PerformanceMetricsStorageAdapter},
        store::MemoryStore,
        *,
    };

    #[test]
    fn metadata_keys() -> Result<(), Box<dyn Error>> {
        assert_eq!(meta_key(&NodePath::root()).as_str(), "zarr.json");
        assert_eq!(meta_key(&"/a/b".try_into()?).as_str(), "a/b/zarr.json");
        Ok(())
    }

    #[test]
    fn data_keys() -> Result<(), Box<dyn Error>> {
        let slash: ChunkKeyEncoding = DefaultChunkKeyEncoding::new(ChunkKeySeparator::Slash).into();
        let dot: ChunkKeyEncoding = DefaultChunkKeyEncoding::new(ChunkKeySeparator::Dot).into();
        assert_eq!(
            data_key(&"/array".try_into()?, &[1, 23, 45], &slash)?.as_str(),
            "array/1/23/45"
        );
        assert_eq!(
            data_key(&"/group/array".try_into()?, &[1, 23, 45], &dot)?.as_str(),
            "group/array/1.23.45"
        );
        assert_eq!(data_key(&NodePath::root(), &[0, 1], &slash)?.as_str(), "0/1");
        Ok(())
    }

    #[test]
    fn adapters_multithreaded() -> Result<(), Box<dyn Error>> {
        use rayon::prelude::*;

        let store = Arc::new(MemoryStore::default());
        let metrics = Arc::new(PerformanceMetricsStorageAdapter::new(store.clone()));
        let cache = Arc::new(CachingStorageAdapter::new_with_capacity(metrics.clone(), 4)?);

        (0..10u8).into_par_iter().try_for_each(|i| {
            cache.set(&StoreKey::new(i.to_string())?, Bytes::from(vec![i; 5]))
        })?;
        (0..10u8).into_par_iter().try_for_each(|i| {
            let value = cache.get(&StoreKey::new(i.to_string())?)?;
            assert_eq!(value, Some(Bytes::from(vec![i; 5])));
            Ok::<_, StorageError>(())
        })?;

        assert!(cache.cached_keys().len() <= 4);
        assert_eq!(store.list()?.len(), 10);
        assert_eq!(metrics.metrics().sets, 10);
        assert_eq!(metrics.metrics().bytes_written, 50);
        Ok(())
    }
}
