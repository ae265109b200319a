//! Zarr groups.
//!
//! A Zarr group is a node in a Zarr hierarchy.
//! It can have associated metadata and may have child nodes (groups or [`arrays`](crate::array)).
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#group>.
//!
//! Use [`GroupBuilder`] to setup a new group, [`Group::create`] to write a new group, or [`Group::open`] to read an existing group.
//!
//! A group can optionally store attributes in metadata in an accompanying `zarr.json` file. For example:
//! ```json
//! {
//!     "zarr_format": 3,
//!     "node_type": "group",
//!     "attributes": {
//!         "spam": "ham",
//!         "eggs": 42,
//!     }
//! }
//! ```
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#group-metadata> for more information on group metadata.

mod group_builder;

use std::sync::Arc;

use derive_more::Display;

use crate::{
    error::ZarrError,
    metadata::{create_metadata_document, retrieve_metadata_document, store_metadata_document},
    node::NodePath,
    storage::{ReadableStorageTraits, ReadableWritableStorageTraits, WritableStorageTraits},
};

#[cfg(feature = "async")]
use crate::{
    metadata::{
        async_create_metadata_document, async_retrieve_metadata_document,
        async_store_metadata_document,
    },
    storage::{
        AsyncReadableStorageTraits, AsyncReadableWritableStorageTraits, AsyncWritableStorageTraits,
    },
};

pub use self::group_builder::GroupBuilder;
pub use crate::metadata::GroupMetadataV3;

/// A group.
///
/// A group holds an immutable snapshot of its metadata.
/// Metadata changes made by others are not observed until the group is opened again.
#[derive(Clone, Debug, Display)]
#[display("path {path} metadata {metadata}")]
pub struct Group<TStorage: ?Sized> {
    /// The storage.
    storage: Arc<TStorage>,
    /// The path of the group in the store.
    path: NodePath,
    /// The metadata.
    metadata: GroupMetadataV3,
}

impl<TStorage: ?Sized> Group<TStorage> {
    /// Create a group in `storage` at `path` with `metadata`.
    /// This does **not** write to the store, use [`store_metadata`](Group<WritableStorageTraits>::store_metadata) to write `metadata` to `storage`.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidPath`] if `path` is not a valid node path.
    pub fn new_with_metadata(
        storage: Arc<TStorage>,
        path: &str,
        metadata: GroupMetadataV3,
    ) -> Result<Self, ZarrError> {
        let path = NodePath::new(path)?;
        Ok(Self {
            storage,
            path,
            metadata,
        })
    }

    /// Get path.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Get attributes.
    #[must_use]
    pub fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata.attributes
    }

    /// Get metadata.
    #[must_use]
    pub fn metadata(&self) -> &GroupMetadataV3 {
        &self.metadata
    }

    /// Get the storage.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Group<TStorage> {
    /// Open the group in `storage` at `path`. The metadata is read from the store.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidPath`] if there is no metadata at `path`, [`ZarrError::InvalidNodeType`] if the node is an array, or another [`ZarrError`] on a storage error or invalid metadata.
    pub fn open(storage: Arc<TStorage>, path: &str) -> Result<Self, ZarrError> {
        let node_path = NodePath::new(path)?;
        let metadata = retrieve_metadata_document(&*storage, &node_path)?.into_group_metadata()?;
        Self::new_with_metadata(storage, path, metadata)
    }
}

impl<TStorage: ?Sized + WritableStorageTraits> Group<TStorage> {
    /// Store metadata, overwriting any existing metadata.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if there is an underlying store error.
    pub fn store_metadata(&self) -> Result<(), ZarrError> {
        store_metadata_document(&*self.storage, &self.path, &self.metadata)
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> Group<TStorage> {
    /// Create a group in `storage` at `path` with `metadata` and write its metadata.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidPath`] if the path is invalid or metadata already exists at `path`, or another [`ZarrError`] on a storage error.
    pub fn create(
        storage: Arc<TStorage>,
        path: &str,
        metadata: GroupMetadataV3,
    ) -> Result<Self, ZarrError> {
        let group = Self::new_with_metadata(storage, path, metadata)?;
        create_metadata_document(&*group.storage, &group.path, &group.metadata)?;
        Ok(group)
    }
}

#[cfg(feature = "async")]
impl<TStorage: ?Sized + AsyncReadableStorageTraits> Group<TStorage> {
    /// Async variant of [`open`](Group::open).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_open(storage: Arc<TStorage>, path: &str) -> Result<Self, ZarrError> {
        let node_path = NodePath::new(path)?;
        let metadata = async_retrieve_metadata_document(&*storage, &node_path)
            .await?
            .into_group_metadata()?;
        Self::new_with_metadata(storage, path, metadata)
    }
}

#[cfg(feature = "async")]
impl<TStorage: ?Sized + AsyncWritableStorageTraits> Group<TStorage> {
    /// Async variant of [`store_metadata`](Group::store_metadata).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_store_metadata(&self) -> Result<(), ZarrError> {
        async_store_metadata_document(&*self.storage, &self.path, &self.metadata).await
    }
}

#[cfg(feature = "async")]
impl<TStorage: ?Sized + AsyncReadableWritableStorageTraits> Group<TStorage> {
    /// Async variant of [`create`](Group::create).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_create(
        storage: Arc<TStorage>,
        path: &str,
        metadata: GroupMetadataV3,
    ) -> Result<Self, ZarrError> {
        let group = Self::new_with_metadata(storage, path, metadata)?;
        async_create_metadata_document(&*group.storage, &group.path, &group.metadata).await?;
        Ok(group)
    }
}
