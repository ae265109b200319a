use std::sync::Arc;

use crate::{
    error::ZarrError,
    metadata::{
        async_create_metadata_document, async_retrieve_metadata_document,
        async_store_metadata_document,
    },
    node::NodePath,
    storage::{
        AsyncReadableStorageTraits, AsyncReadableWritableStorageTraits, AsyncWritableStorageTraits,
    },
};

use super::{Array, ArrayMetadataV3};

impl<TStorage: ?Sized + AsyncReadableStorageTraits> Array<TStorage> {
    /// Async variant of [`open`](Array::open).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_open(storage: Arc<TStorage>, path: &str) -> Result<Self, ZarrError> {
        let node_path = NodePath::new(path)?;
        let metadata = async_retrieve_metadata_document(&*storage, &node_path)
            .await?
            .into_array_metadata()?;
        Self::new_with_metadata(storage, path, metadata)
    }

    /// Async variant of [`retrieve_chunk_if_exists`](Array::retrieve_chunk_if_exists).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_retrieve_chunk_if_exists(
        &self,
        chunk_indices: &[u64],
    ) -> Result<Option<Vec<u8>>, ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        self.storage
            .get(&key)
            .await?
            .map(|encoded_chunk| self.decode_chunk(encoded_chunk.to_vec()))
            .transpose()
    }

    /// Async variant of [`retrieve_chunk`](Array::retrieve_chunk).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<Vec<u8>, ZarrError> {
        match self.async_retrieve_chunk_if_exists(chunk_indices).await? {
            Some(chunk) => Ok(chunk),
            None => self.fill_chunk(),
        }
    }
}

impl<TStorage: ?Sized + AsyncWritableStorageTraits> Array<TStorage> {
    /// Async variant of [`store_metadata`](Array::store_metadata).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_store_metadata(&self) -> Result<(), ZarrError> {
        async_store_metadata_document(&*self.storage, &self.path, &self.metadata).await
    }

    /// Async variant of [`store_chunk`](Array::store_chunk).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_store_chunk(
        &self,
        chunk_indices: &[u64],
        chunk_bytes: Vec<u8>,
    ) -> Result<(), ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        let encoded_chunk = self.encode_chunk(chunk_bytes)?;
        self.storage.set(&key, encoded_chunk.into()).await?;
        Ok(())
    }

    /// Async variant of [`erase_chunk`](Array::erase_chunk).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_erase_chunk(&self, chunk_indices: &[u64]) -> Result<(), ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        self.storage.delete(&key).await?;
        Ok(())
    }
}

impl<TStorage: ?Sized + AsyncReadableWritableStorageTraits> Array<TStorage> {
    /// Async variant of [`create`](Array::create).
    #[allow(clippy::missing_errors_doc)]
    pub async fn async_create(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadataV3,
    ) -> Result<Self, ZarrError> {
        let array = Self::new_with_metadata(storage, path, metadata)?;
        async_create_metadata_document(&*array.storage, &array.path, &array.metadata).await?;
        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::{
        array::{ArrayBuilder, DataType},
        storage::store::AsyncMemoryStore,
    };

    use super::*;

    #[tokio::test]
    async fn array_async() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(AsyncMemoryStore::new());
        let metadata =
            ArrayBuilder::new(vec![4, 3], DataType::UInt8, vec![2u64, 2].try_into()?, 7u64)
                .build_metadata();
        let array = Array::async_create(store.clone(), "/array", metadata.clone()).await?;
        assert!(matches!(
            Array::async_create(store.clone(), "/array", metadata).await,
            Err(ZarrError::InvalidPath(_))
        ));

        assert_eq!(array.async_retrieve_chunk(&[1, 1]).await?, vec![7; 4]);
        array.async_store_chunk(&[1, 1], vec![1, 2, 3, 4]).await?;

        let array = Array::async_open(store, "/array").await?;
        assert_eq!(array.async_retrieve_chunk(&[1, 1]).await?, vec![1, 2, 3, 4]);
        array.async_erase_chunk(&[1, 1]).await?;
        assert_eq!(array.async_retrieve_chunk_if_exists(&[1, 1]).await?, None);
        array.async_store_metadata().await?;
        Ok(())
    }
}
