use std::sync::Arc;

use crate::{
    array_subset::{copy_region, ArraySubset},
    error::ZarrError,
    metadata::retrieve_metadata_document,
    node::NodePath,
    storage::ReadableStorageTraits,
};

use super::{transmute_from_bytes_vec, Array};

impl<TStorage: ?Sized + ReadableStorageTraits> Array<TStorage> {
    /// Open an existing array in `storage` at `path`. The metadata is read from the store.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if:
    ///  - there is no metadata at `path` ([`InvalidPath`](ZarrError::InvalidPath)),
    ///  - the node at `path` is a group ([`InvalidNodeType`](ZarrError::InvalidNodeType)),
    ///  - the metadata is invalid, or
    ///  - there is an underlying store error.
    pub fn open(storage: Arc<TStorage>, path: &str) -> Result<Self, ZarrError> {
        let node_path = NodePath::new(path)?;
        let metadata = retrieve_metadata_document(&*storage, &node_path)?.into_array_metadata()?;
        Self::new_with_metadata(storage, path, metadata)
    }

    /// Read the encoded bytes of the chunk at `chunk_indices`.
    ///
    /// # Errors
    /// Returns [`ZarrError::ChunkNotFound`] if the chunk does not exist, or another [`ZarrError`] if `chunk_indices` are invalid or there is an underlying store error.
    pub fn retrieve_encoded_chunk(&self, chunk_indices: &[u64]) -> Result<Vec<u8>, ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        self.storage
            .get(&key)?
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| ZarrError::ChunkNotFound(format!("chunk {key} does not exist")))
    }

    /// Read and decode the chunk at `chunk_indices` into its bytes if it exists.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if
    ///  - `chunk_indices` are invalid,
    ///  - the data type has no fixed size,
    ///  - there is a codec decoding error or the decoded chunk has an unexpected size, or
    ///  - an underlying store error.
    pub fn retrieve_chunk_if_exists(
        &self,
        chunk_indices: &[u64],
    ) -> Result<Option<Vec<u8>>, ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        self.storage
            .get(&key)?
            .map(|encoded_chunk| self.decode_chunk(encoded_chunk.to_vec()))
            .transpose()
    }

    /// Read and decode the chunk at `chunk_indices` into its bytes.
    ///
    /// A chunk that does not exist is composed entirely of the fill value.
    /// The chunk always has the nominal chunk shape, including edge chunks.
    ///
    /// # Errors
    /// See [`retrieve_chunk_if_exists`](Array::retrieve_chunk_if_exists).
    pub fn retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<Vec<u8>, ZarrError> {
        match self.retrieve_chunk_if_exists(chunk_indices)? {
            Some(chunk) => Ok(chunk),
            None => self.fill_chunk(),
        }
    }

    /// Read and decode the chunk at `chunk_indices` into a vector of its elements.
    ///
    /// # Errors
    /// Returns [`ZarrError::DecodingError`] if the size of `T` does not match the data type size, or an error from [`retrieve_chunk`](Array::retrieve_chunk).
    pub fn retrieve_chunk_elements<T: bytemuck::Pod>(
        &self,
        chunk_indices: &[u64],
    ) -> Result<Vec<T>, ZarrError> {
        self.check_decoded_element_size::<T>()?;
        let bytes = self.retrieve_chunk(chunk_indices)?;
        transmute_from_bytes_vec(bytes).ok_or_else(|| self.decoded_element_size_error::<T>())
    }

    /// Read and decode the `array_subset` of the array into its bytes in C order.
    ///
    /// Chunks that do not exist contribute the fill value.
    ///
    /// # Errors
    /// Returns [`ZarrError::DimensionMismatch`] if the array subset has the wrong dimensionality or is not within the array shape, or an error from [`retrieve_chunk`](Array::retrieve_chunk).
    pub fn retrieve_array_subset(&self, array_subset: &ArraySubset) -> Result<Vec<u8>, ZarrError> {
        let size = self.validate_array_subset(array_subset)?;
        let element_size = self.data_type.chunk_element_size()?;
        let mut output = vec![0; size];
        let chunks = self.chunks_in_array_subset(array_subset)?;
        let chunk_shape = self.chunk_shape().to_array_shape();
        for chunk_indices in chunks.indices() {
            let chunk_subset = self.chunk_subset(&chunk_indices)?;
            let overlap = chunk_subset.overlap(array_subset)?;
            let chunk = self.retrieve_chunk(&chunk_indices)?;
            copy_region(
                &chunk,
                &chunk_shape,
                overlap.relative_to(chunk_subset.start())?.start(),
                &mut output,
                array_subset.shape(),
                overlap.relative_to(array_subset.start())?.start(),
                overlap.shape(),
                element_size,
            );
        }
        Ok(output)
    }

    /// Read and decode the `array_subset` of the array into a vector of its elements in C order.
    ///
    /// # Errors
    /// Returns [`ZarrError::DecodingError`] if the size of `T` does not match the data type size, or an error from [`retrieve_array_subset`](Array::retrieve_array_subset).
    pub fn retrieve_array_subset_elements<T: bytemuck::Pod>(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<Vec<T>, ZarrError> {
        self.check_decoded_element_size::<T>()?;
        let bytes = self.retrieve_array_subset(array_subset)?;
        transmute_from_bytes_vec(bytes).ok_or_else(|| self.decoded_element_size_error::<T>())
    }

    fn check_decoded_element_size<T>(&self) -> Result<(), ZarrError> {
        if self.validate_element_size::<T>() {
            Ok(())
        } else {
            Err(self.decoded_element_size_error::<T>())
        }
    }

    fn decoded_element_size_error<T>(&self) -> ZarrError {
        ZarrError::DecodingError(format!(
            "element size {} does not match data type {}",
            core::mem::size_of::<T>(),
            self.data_type
        ))
    }
}
