use std::sync::Arc;

use crate::{
    array_subset::{copy_region, ArraySubset},
    error::ZarrError,
    metadata::{create_metadata_document, store_metadata_document},
    storage::{ReadableWritableStorageTraits, WritableStorageTraits},
};

use super::{transmute_to_bytes_vec, Array, ArrayMetadataV3};

impl<TStorage: ?Sized + WritableStorageTraits> Array<TStorage> {
    /// Store metadata, overwriting any existing metadata at the array path.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if the metadata cannot be serialized or there is an underlying store error.
    pub fn store_metadata(&self) -> Result<(), ZarrError> {
        store_metadata_document(&*self.storage, &self.path, &self.metadata)
    }

    /// Encode `chunk_bytes` and store at `chunk_indices`.
    ///
    /// `chunk_bytes` must hold every element of the chunk at its nominal shape.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if
    ///  - `chunk_indices` are invalid,
    ///  - the length of `chunk_bytes` is not equal to the expected length (the product of the number of elements in the chunk and the data type size in bytes),
    ///  - there is a codec encoding error, or
    ///  - an underlying store error.
    pub fn store_chunk(
        &self,
        chunk_indices: &[u64],
        chunk_bytes: Vec<u8>,
    ) -> Result<(), ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        let encoded_chunk = self.encode_chunk(chunk_bytes)?;
        self.storage.set(&key, encoded_chunk.into())?;
        Ok(())
    }

    /// Encode `chunk_elements` and store at `chunk_indices`.
    ///
    /// # Errors
    /// Returns [`ZarrError::EncodingError`] if the size of `T` does not match the data type size, or an error from [`store_chunk`](Array::store_chunk).
    pub fn store_chunk_elements<T: bytemuck::NoUninit>(
        &self,
        chunk_indices: &[u64],
        chunk_elements: &[T],
    ) -> Result<(), ZarrError> {
        self.check_encoded_element_size::<T>()?;
        self.store_chunk(chunk_indices, transmute_to_bytes_vec(chunk_elements))
    }

    /// Erase the chunk at `chunk_indices`.
    ///
    /// Succeeds if the chunk does not exist.
    /// The chunk subsequently reads as the fill value.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if `chunk_indices` are invalid or there is an underlying store error.
    pub fn erase_chunk(&self, chunk_indices: &[u64]) -> Result<(), ZarrError> {
        let key = self.chunk_key(chunk_indices)?;
        self.storage.delete(&key)?;
        Ok(())
    }

    fn check_encoded_element_size<T>(&self) -> Result<(), ZarrError> {
        if self.validate_element_size::<T>() {
            Ok(())
        } else {
            Err(ZarrError::EncodingError(format!(
                "element size {} does not match data type {}",
                core::mem::size_of::<T>(),
                self.data_type
            )))
        }
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> Array<TStorage> {
    /// Create a new array in `storage` at `path` with `metadata` and write its metadata.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidPath`] if a node already exists at `path`, or another [`ZarrError`] if the metadata is invalid or there is an underlying store error.
    pub fn create(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadataV3,
    ) -> Result<Self, ZarrError> {
        let array = Self::new_with_metadata(storage, path, metadata)?;
        create_metadata_document(&*array.storage, &array.path, &array.metadata)?;
        Ok(array)
    }

    /// Encode `subset_bytes` and store in `array_subset`.
    ///
    /// `subset_bytes` holds the elements of the subset in C order.
    /// Chunks partially covered by the subset are retrieved, updated, and stored.
    ///
    /// # Errors
    /// Returns [`ZarrError::DimensionMismatch`] if
    ///  - the array subset has the wrong dimensionality or is not within the array shape, or
    ///  - the length of `subset_bytes` does not match the subset,
    ///
    /// or another [`ZarrError`] if there is a codec or underlying store error.
    pub fn store_array_subset(
        &self,
        array_subset: &ArraySubset,
        subset_bytes: &[u8],
    ) -> Result<(), ZarrError> {
        let size = self.validate_array_subset(array_subset)?;
        if subset_bytes.len() != size {
            return Err(ZarrError::DimensionMismatch(format!(
                "{} bytes provided for array subset {array_subset}, expected {size}",
                subset_bytes.len()
            )));
        }
        let element_size = self.data_type.chunk_element_size()?;
        let chunks = self.chunks_in_array_subset(array_subset)?;
        let chunk_shape = self.chunk_shape().to_array_shape();
        for chunk_indices in chunks.indices() {
            let chunk_subset = self.chunk_subset(&chunk_indices)?;
            let overlap = chunk_subset.overlap(array_subset)?;
            let mut chunk = if overlap == chunk_subset {
                vec![0; self.chunk_size_bytes()?]
            } else {
                self.retrieve_chunk(&chunk_indices)?
            };
            copy_region(
                subset_bytes,
                array_subset.shape(),
                overlap.relative_to(array_subset.start())?.start(),
                &mut chunk,
                &chunk_shape,
                overlap.relative_to(chunk_subset.start())?.start(),
                overlap.shape(),
                element_size,
            );
            self.store_chunk(&chunk_indices, chunk)?;
        }
        Ok(())
    }

    /// Encode `subset_elements` and store in `array_subset`.
    ///
    /// # Errors
    /// Returns [`ZarrError::EncodingError`] if the size of `T` does not match the data type size, or an error from [`store_array_subset`](Array::store_array_subset).
    pub fn store_array_subset_elements<T: bytemuck::NoUninit>(
        &self,
        array_subset: &ArraySubset,
        subset_elements: &[T],
    ) -> Result<(), ZarrError> {
        self.check_encoded_element_size::<T>()?;
        self.store_array_subset(array_subset, bytemuck::cast_slice(subset_elements))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::{
        array::{ArrayBuilder, DataType},
        storage::{store::MemoryStore, ReadableStorageTraits},
    };

    use super::*;

    #[test]
    fn array_store_retrieve_chunk() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let array =
            ArrayBuilder::new(vec![4, 4], DataType::UInt16, vec![2u64, 2].try_into()?, 0u64)
                .create(store.clone(), "/array")?;
        array.store_chunk_elements::<u16>(&[1, 0], &[1, 2, 3, 4])?;
        assert_eq!(array.retrieve_chunk_elements::<u16>(&[1, 0])?, vec![1, 2, 3, 4]);
        assert!(matches!(
            array.store_chunk_elements::<u16>(&[1, 0], &[1, 2, 3]),
            Err(ZarrError::DimensionMismatch(_))
        ));
        assert!(matches!(
            array.store_chunk_elements::<u8>(&[1, 0], &[1, 2, 3, 4, 5, 6, 7, 8]),
            Err(ZarrError::EncodingError(_))
        ));
        assert!(matches!(
            array.store_chunk(&[2, 0], vec![0; 8]),
            Err(ZarrError::ChunkNotFound(_))
        ));

        array.erase_chunk(&[1, 0])?;
        array.erase_chunk(&[1, 0])?;
        assert!(!store.exists(&array.chunk_key(&[1, 0])?)?);
        assert_eq!(array.retrieve_chunk_elements::<u16>(&[1, 0])?, vec![0; 4]);
        Ok(())
    }

    #[test]
    fn array_create_existing() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let builder = ArrayBuilder::new(vec![4], DataType::UInt8, vec![2u64].try_into()?, 0u64);
        builder.create(store.clone(), "/array")?;
        assert!(matches!(
            builder.create(store.clone(), "/array"),
            Err(ZarrError::InvalidPath(_))
        ));
        builder.build(store, "/array")?.store_metadata()?;
        Ok(())
    }

    #[test]
    fn array_store_array_subset() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let array =
            ArrayBuilder::new(vec![5, 5], DataType::UInt8, vec![2u64, 2].try_into()?, 9u64)
                .build(store, "/")?;
        // A region spanning partial chunks
        let subset = ArraySubset::new_with_ranges(&[1..4, 1..3]);
        array.store_array_subset_elements::<u8>(&subset, &[1, 2, 3, 4, 5, 6])?;
        assert_eq!(
            array.retrieve_array_subset_elements::<u8>(&subset)?,
            vec![1, 2, 3, 4, 5, 6]
        );
        assert_eq!(array.retrieve_chunk(&[0, 0])?, vec![9, 9, 9, 1]);
        assert_eq!(array.retrieve_chunk(&[1, 1])?, vec![4, 9, 6, 9]);

        // Edge chunks keep their padding
        let subset = ArraySubset::new_with_ranges(&[4..5, 4..5]);
        array.store_array_subset_elements::<u8>(&subset, &[7])?;
        assert_eq!(array.retrieve_chunk(&[2, 2])?, vec![7, 9, 9, 9]);

        let all =
            array.retrieve_array_subset_elements::<u8>(&ArraySubset::new_with_shape(vec![5, 5]))?;
        assert_eq!(
            all,
            vec![
                9, 9, 9, 9, 9, //
                9, 1, 2, 9, 9, //
                9, 3, 4, 9, 9, //
                9, 5, 6, 9, 9, //
                9, 9, 9, 9, 7, //
            ]
        );

        assert!(matches!(
            array.store_array_subset(&ArraySubset::new_with_ranges(&[4..6, 0..1]), &[0, 0]),
            Err(ZarrError::DimensionMismatch(_))
        ));
        assert!(matches!(
            array.store_array_subset(&ArraySubset::new_with_ranges(&[0..2]), &[0, 0]),
            Err(ZarrError::DimensionMismatch(_))
        ));
        assert!(matches!(
            array.store_array_subset(&ArraySubset::new_with_ranges(&[0..1, 0..1]), &[0, 0]),
            Err(ZarrError::DimensionMismatch(_))
        ));
        Ok(())
    }
}
