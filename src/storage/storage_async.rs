use crate::node::NodePath;

use super::{meta_key, Bytes, MaybeBytes, StorageError, StoreKey, StoreKeys, StorePrefix};

/// Async readable storage traits.
#[async_trait::async_trait]
pub trait AsyncReadableStorageTraits: Send + Sync {
    /// Retrieve the value (bytes) associated with a given [`StoreKey`].
    ///
    /// Returns [`None`] if the key is not found.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    async fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError>;

    /// Returns true if the store has a value for `key`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    async fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Async listable storage traits.
#[async_trait::async_trait]
pub trait AsyncListableStorageTraits: Send + Sync {
    /// Retrieve all [`StoreKeys`] in the store, sorted lexicographically.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    async fn list(&self) -> Result<StoreKeys, StorageError> {
        self.list_prefix(&StorePrefix::root()).await
    }

    /// Retrieve all [`StoreKeys`] with a given [`StorePrefix`], sorted lexicographically.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    async fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError>;
}

/// Async writable storage traits.
#[async_trait::async_trait]
pub trait AsyncWritableStorageTraits: Send + Sync {
    /// Store bytes at a [`StoreKey`], creating or fully overwriting any existing value.
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    async fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError>;

    /// Delete the value at a [`StoreKey`].
    ///
    /// Deleting a key that does not exist succeeds.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    async fn delete(&self, key: &StoreKey) -> Result<(), StorageError>;
}

/// Async readable and writable storage traits.
#[async_trait::async_trait]
pub trait AsyncReadableWritableStorageTraits:
    AsyncReadableStorageTraits + AsyncWritableStorageTraits
{
    /// Store bytes at a [`StoreKey`] only if the key does not already exist.
    ///
    /// Returns true if the value was written.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    async fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError>;
}

/// A supertrait of [`AsyncReadableStorageTraits`] and [`AsyncListableStorageTraits`].
pub trait AsyncReadableListableStorageTraits:
    AsyncReadableStorageTraits + AsyncListableStorageTraits
{
}

impl<T> AsyncReadableListableStorageTraits for T where
    T: AsyncReadableStorageTraits + AsyncListableStorageTraits
{
}

/// A supertrait of [`AsyncReadableWritableStorageTraits`] and [`AsyncListableStorageTraits`].
pub trait AsyncReadableWritableListableStorageTraits:
    AsyncReadableWritableStorageTraits + AsyncListableStorageTraits
{
}

impl<T> AsyncReadableWritableListableStorageTraits for T where
    T: AsyncReadableWritableStorageTraits + AsyncListableStorageTraits
{
}

/// Asynchronously erase a node (group or array) and all of its children.
///
/// # Errors
/// Returns a [`StorageError`] if there is an underlying error with the store.
pub async fn async_erase_node<
    TStorage: ?Sized + AsyncWritableStorageTraits + AsyncListableStorageTraits,
>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<(), StorageError> {
    let prefix: StorePrefix = path.try_into()?;
    for key in storage.list_prefix(&prefix).await? {
        storage.delete(&key).await?;
    }
    storage.delete(&meta_key(path)).await
}
