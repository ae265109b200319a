//! Stores.
//!
//! Every store implements the full set of storage traits.
//! Read-only stores fail writes and listing with [`StorageError::Unsupported`](crate::storage::StorageError::Unsupported).

#[cfg(feature = "async")]
mod store_async;

mod store_sync;

pub use store_sync::filesystem_store::{FilesystemStore, FilesystemStoreCreateError};
pub use store_sync::memory_store::MemoryStore;

#[cfg(feature = "http")]
pub use store_sync::http_store::{HTTPStore, HTTPStoreCreateError};

#[cfg(feature = "async")]
pub use store_async::memory_store::AsyncMemoryStore;

#[cfg(all(test, feature = "async"))]
pub(crate) use store_sync::test_util;
