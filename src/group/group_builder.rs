use std::sync::Arc;

use crate::{error::ZarrError, storage::ReadableWritableStorageTraits};

use super::{Group, GroupMetadataV3};

/// A [`Group`] builder.
#[derive(Debug, Default)]
pub struct GroupBuilder {
    metadata: GroupMetadataV3,
}

impl GroupBuilder {
    /// Create a new group builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata.attributes = attributes;
        self
    }

    /// Build into a [`Group`]. Nothing is written to the store.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidPath`] if `path` is not a valid node path.
    pub fn build<TStorage: ?Sized>(
        self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Group<TStorage>, ZarrError> {
        Group::new_with_metadata(storage, path, self.metadata)
    }

    /// Build into a [`Group`] and write its metadata with [`Group::create`].
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if the group cannot be created.
    pub fn create<TStorage: ?Sized + ReadableWritableStorageTraits>(
        self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Group<TStorage>, ZarrError> {
        Group::create(storage, path, self.metadata)
    }
}
