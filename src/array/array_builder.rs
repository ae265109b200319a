use std::sync::Arc;

use crate::{error::ZarrError, metadata::FillValueMetadata};

use super::{
    chunk_key_encoding::{ChunkKeyEncoding, DefaultChunkKeyEncoding},
    codec::Codec,
    Array, ArrayMetadataV3, ArrayShape, ChunkGrid, ChunkKeySeparator, ChunkShape, DataType,
    DimensionName,
};

/// An [`Array`] builder.
///
/// The array builder is initialised from an array shape, data type, chunk shape, and fill value.
///  - The default codec chain is empty, so chunks are stored as raw native endian element bytes.
///  - The default chunk key encoding is `default` with the `/` chunk key separator.
///  - Attributes and dimension names are empty.
///
/// Use the methods in the array builder to change the configuration away from these defaults, and then build the array at a path of some storage with [`ArrayBuilder::build`].
/// Note that [`build`](ArrayBuilder::build) does not modify the store; the array metadata has to be explicitly written with [`Array::store_metadata`] or by using [`ArrayBuilder::create`].
///
/// For example:
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # use std::sync::Arc;
/// use zarrs_core::array::{codec::{Codec, GzipCodec}, ArrayBuilder, DataType};
/// # let store = Arc::new(zarrs_core::storage::store::MemoryStore::new());
/// let gzip: Codec = Arc::new(GzipCodec::new(5)?);
/// let array = ArrayBuilder::new(
///     vec![8, 8], // array shape
///     DataType::Float32,
///     vec![4u64, 4].try_into()?, // regular chunk shape (elements must be non-zero)
///     "NaN",
/// )
/// .codecs(vec![gzip])
/// .dimension_names(Some(["y".to_string(), "x".to_string()]))
/// .create(store.clone(), "/group/array")?; // write metadata to the store
///
/// // array.store_chunk(...)
/// // array.store_array_subset(...)
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArrayBuilder {
    /// Array shape.
    pub shape: ArrayShape,
    /// Data type.
    pub data_type: DataType,
    /// Chunk grid.
    pub chunk_grid: ChunkGrid,
    /// Chunk key encoding.
    pub chunk_key_encoding: ChunkKeyEncoding,
    /// Fill value.
    pub fill_value: FillValueMetadata,
    /// Codecs, applied in order when encoding.
    pub codecs: Vec<Codec>,
    /// Attributes.
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Dimension names.
    pub dimension_names: Option<Vec<DimensionName>>,
}

impl ArrayBuilder {
    /// Create a new array builder.
    ///
    /// The length of the chunk shape must match the length of the array shape.
    /// This is checked when the array is built.
    #[must_use]
    pub fn new(
        shape: ArrayShape,
        data_type: DataType,
        chunk_shape: ChunkShape,
        fill_value: impl Into<FillValueMetadata>,
    ) -> Self {
        Self {
            shape,
            data_type,
            chunk_grid: ChunkGrid::from(chunk_shape),
            chunk_key_encoding: ChunkKeyEncoding::new(DefaultChunkKeyEncoding::default()),
            fill_value: fill_value.into(),
            codecs: Vec::default(),
            attributes: serde_json::Map::default(),
            dimension_names: None,
        }
    }

    /// Create a new builder copying the configuration of an existing array.
    #[must_use]
    pub fn from_array<T: ?Sized>(array: &Array<T>) -> Self {
        let mut builder = Self::new(
            array.shape().to_vec(),
            array.data_type().clone(),
            array.chunk_shape().clone(),
            array.metadata().fill_value.clone(),
        );
        builder
            .attributes(array.attributes().clone())
            .chunk_key_encoding(array.chunk_key_encoding().clone())
            .dimension_names(array.dimension_names().clone())
            .codecs(array.codecs().codecs().to_vec());
        builder
    }

    /// Set the shape.
    pub fn shape(&mut self, shape: ArrayShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// Set the data type.
    pub fn data_type(&mut self, data_type: DataType) -> &mut Self {
        self.data_type = data_type;
        self
    }

    /// Set the chunk shape of the regular chunk grid.
    pub fn chunk_shape(&mut self, chunk_shape: ChunkShape) -> &mut Self {
        self.chunk_grid = ChunkGrid::from(chunk_shape);
        self
    }

    /// Set the fill value.
    pub fn fill_value(&mut self, fill_value: impl Into<FillValueMetadata>) -> &mut Self {
        self.fill_value = fill_value.into();
        self
    }

    /// Set the chunk key encoding.
    ///
    /// If left unmodified, the array will use `default` chunk key encoding with the `/` chunk key separator.
    pub fn chunk_key_encoding(&mut self, chunk_key_encoding: ChunkKeyEncoding) -> &mut Self {
        self.chunk_key_encoding = chunk_key_encoding;
        self
    }

    /// Set the chunk key encoding to default with `separator`.
    pub fn chunk_key_encoding_default_separator(
        &mut self,
        separator: ChunkKeySeparator,
    ) -> &mut Self {
        self.chunk_key_encoding = ChunkKeyEncoding::new(DefaultChunkKeyEncoding::new(separator));
        self
    }

    /// Set the codecs.
    ///
    /// If left unmodified, the array will have no codecs.
    pub fn codecs(&mut self, codecs: Vec<Codec>) -> &mut Self {
        self.codecs = codecs;
        self
    }

    /// Set the user defined attributes.
    ///
    /// If left unmodified, the user defined attributes of the array will be empty.
    pub fn attributes(
        &mut self,
        attributes: serde_json::Map<String, serde_json::Value>,
    ) -> &mut Self {
        self.attributes = attributes;
        self
    }

    /// Set the dimension names.
    ///
    /// If left unmodified, the array has no dimension names.
    pub fn dimension_names<I, D>(&mut self, dimension_names: Option<I>) -> &mut Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DimensionName>,
    {
        self.dimension_names =
            dimension_names.map(|names| names.into_iter().map(Into::into).collect());
        self
    }

    /// Build the array metadata.
    #[must_use]
    pub fn build_metadata(&self) -> ArrayMetadataV3 {
        ArrayMetadataV3::new(
            self.shape.clone(),
            self.data_type.clone(),
            self.chunk_grid.create_metadata(),
            self.chunk_key_encoding.create_metadata(),
            self.fill_value.clone(),
            self.codecs
                .iter()
                .map(|codec| codec.create_metadata())
                .collect(),
        )
        .with_attributes(self.attributes.clone())
        .with_dimension_names(self.dimension_names.clone())
    }

    /// Build into an [`Array`].
    ///
    /// This does not write to the store.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if the path is invalid or the array metadata is invalid.
    pub fn build<TStorage: ?Sized>(
        &self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Array<TStorage>, ZarrError> {
        Array::new_with_metadata(storage, path, self.build_metadata())
    }

    /// Build into an [`Array`] and write its metadata to the store.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if the array is invalid, a node already exists at `path`, or there is an underlying store error.
    pub fn create<TStorage: ?Sized + crate::storage::ReadableWritableStorageTraits>(
        &self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Array<TStorage>, ZarrError> {
        Array::create(storage, path, self.build_metadata())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::{array::chunk_key_encoding::V2ChunkKeyEncoding, storage::store::MemoryStore};

    use super::*;

    #[test]
    fn array_builder() -> Result<(), Box<dyn Error>> {
        let mut builder =
            ArrayBuilder::new(vec![8, 8], DataType::Int8, vec![2u64, 2].try_into()?, 0i64);
        let mut attributes = serde_json::Map::new();
        attributes.insert("key".to_string(), "value".into());
        builder
            .attributes(attributes.clone())
            .dimension_names(Some([Some("y".to_string()), None]))
            .chunk_key_encoding(V2ChunkKeyEncoding::default().into());

        let store = Arc::new(MemoryStore::new());
        let array = builder.build(store.clone(), "/")?;
        assert_eq!(array.attributes(), &attributes);
        assert_eq!(
            array.dimension_names(),
            &Some(vec![Some("y".to_string()), None])
        );
        assert_eq!(array.chunk_key(&[1, 2])?.as_str(), "1.2");

        let array_copy = array.builder().build(store, "/")?;
        assert_eq!(array.metadata(), array_copy.metadata());

        builder.shape(vec![8, 8, 8]);
        assert!(matches!(
            builder.build(Arc::new(MemoryStore::new()), "/"),
            Err(ZarrError::InvalidMetadata(_))
        ));
        Ok(())
    }

    #[test]
    fn array_builder_invalid_fill_value() -> Result<(), Box<dyn Error>> {
        let builder = ArrayBuilder::new(vec![8], DataType::UInt8, vec![2u64].try_into()?, 256u64);
        assert!(matches!(
            builder.build(Arc::new(MemoryStore::new()), "/"),
            Err(ZarrError::InvalidFillValue(_))
        ));
        Ok(())
    }
}
