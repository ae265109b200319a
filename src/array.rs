//! Zarr arrays.
//!
//! An array is a node in a Zarr hierarchy used to hold multidimensional array data and associated metadata.
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#array>.
//!
//! Use [`ArrayBuilder`] to setup a new array, [`Array::create`] to write a new array, or [`Array::open`] to read an existing array.
//! The documentation for [`Array`] details how to interact with arrays.

#[cfg(feature = "async")]
mod array_async;
mod array_builder;
mod array_sync_readable;
mod array_sync_writable;
pub mod chunk_grid;
pub mod chunk_key_encoding;
mod chunk_shape;
pub mod codec;
pub mod data_type;
mod fill_value;

use std::sync::Arc;

use derive_more::Display;

pub use self::{
    array_builder::ArrayBuilder,
    chunk_grid::ChunkGrid,
    chunk_key_encoding::{ChunkKeyEncoding, ChunkKeySeparator},
    chunk_shape::{ChunkShape, NonZeroError},
    codec::CodecChain,
    data_type::DataType,
    fill_value::FillValue,
};
pub use crate::metadata::ArrayMetadataV3;

use crate::{
    array_subset::ArraySubset,
    error::ZarrError,
    node::NodePath,
    storage::{data_key, StoreKey},
};

/// An ND index to an element in an array.
pub type ArrayIndices = Vec<u64>;

/// The shape of an array.
pub type ArrayShape = Vec<u64>;

/// The name of an array dimension, which may be unnamed.
pub type DimensionName = Option<String>;

/// A Zarr array.
///
/// See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#array-metadata>.
///
/// ### Metadata
///
/// An array is defined by the following parameters (which are encoded in its JSON metadata):
///  - **shape**: defines the length of the array dimensions,
///  - **data type**: defines the numerical representation array elements,
///  - **chunk grid**: defines how the array is subdivided into chunks,
///  - **chunk key encoding**: defines how chunk grid cell coordinates are mapped to keys in a store,
///  - **fill value**: an element value to use for uninitialised portions of the array.
///  - **codecs**: used to encode and decode chunks,
///
/// and optional parameters:
///  - **attributes**: user-defined attributes, and
///  - **dimension names**: defines the names of the array dimensions.
///
/// The metadata is validated when the array is constructed and is immutable afterwards.
/// Metadata changes made by others are not observed until the array is opened again.
///
/// ### Chunks
///
/// Every chunk is stored at its nominal chunk shape, including edge chunks that extend beyond the array shape.
/// Elements of an edge chunk outside the array shape hold the fill value unless a chunk is written in full.
/// A chunk that has never been written reads as the fill value.
///
/// ### Methods
///
/// Array operations are divided into several categories based on the traits implemented for the backing [storage](crate::storage):
///  - [`ReadableStorageTraits`](crate::storage::ReadableStorageTraits): read array data and metadata
///    - [`open`](Array::open)
///    - [`retrieve_chunk`](Array::retrieve_chunk) / [`retrieve_chunk_if_exists`](Array::retrieve_chunk_if_exists) / [`retrieve_encoded_chunk`](Array::retrieve_encoded_chunk)
///    - [`retrieve_array_subset`](Array::retrieve_array_subset)
///  - [`WritableStorageTraits`](crate::storage::WritableStorageTraits): write array data and metadata
///    - [`store_metadata`](Array::store_metadata)
///    - [`store_chunk`](Array::store_chunk)
///    - [`erase_chunk`](Array::erase_chunk)
///  - [`ReadableWritableStorageTraits`](crate::storage::ReadableWritableStorageTraits): perform operations requiring both reading and writing
///    - [`create`](Array::create)
///    - [`store_array_subset`](Array::store_array_subset)
///
/// Variants with an `_elements` suffix read and write elements of a [`bytemuck::Pod`] type whose size matches the data type.
/// Element bytes are native endian.
///
/// With the `async` feature and an async store, there are equivalent chunk methods with an `async_` prefix.
///
/// ### Parallel Writing
///
/// If a chunk is written more than once, its element values depend on whichever operation wrote to the chunk last.
/// [`store_array_subset`](Array::store_array_subset) retrieves, updates and stores partially covered chunks without locking, so concurrent writers to the same chunk must be coordinated externally.
#[derive(Debug, Display)]
#[display("array at {path} with shape {:?} and data type {data_type}", metadata.shape)]
pub struct Array<TStorage: ?Sized> {
    /// The storage.
    storage: Arc<TStorage>,
    /// The path of the array in a store.
    path: NodePath,
    /// The array metadata.
    metadata: ArrayMetadataV3,
    /// The data type of the Zarr array.
    data_type: DataType,
    /// The chunk grid of the Zarr array.
    chunk_grid: ChunkGrid,
    /// The number of chunks along each dimension.
    chunk_grid_shape: ArrayShape,
    /// The mapping from chunk grid cell coordinates to keys in the underlying store.
    chunk_key_encoding: ChunkKeyEncoding,
    /// Provides an element value to use for uninitialised portions of the Zarr array.
    fill_value: FillValue,
    /// Specifies a list of codecs to be used for encoding and decoding chunks.
    codecs: CodecChain,
}

/// The validated components of array metadata.
struct ArrayComponents {
    data_type: DataType,
    chunk_grid: ChunkGrid,
    chunk_grid_shape: ArrayShape,
    chunk_key_encoding: ChunkKeyEncoding,
    fill_value: FillValue,
    codecs: CodecChain,
}

/// Validate `metadata` and create its components.
fn validate_metadata(metadata: &ArrayMetadataV3) -> Result<ArrayComponents, ZarrError> {
    let dimensionality = metadata.shape.len();
    let chunk_grid = ChunkGrid::from_metadata(&metadata.chunk_grid)?;
    let chunk_grid_shape = chunk_grid.grid_shape(&metadata.shape).map_err(|_| {
        ZarrError::InvalidMetadata(format!(
            "the chunk grid dimensionality {} does not match the array dimensionality {dimensionality}",
            chunk_grid.dimensionality(),
        ))
    })?;
    if let Some(dimension_names) = &metadata.dimension_names {
        if dimension_names.len() != dimensionality {
            return Err(ZarrError::InvalidMetadata(format!(
                "the number of dimension names {} does not match the array dimensionality {dimensionality}",
                dimension_names.len(),
            )));
        }
    }
    let chunk_key_encoding = ChunkKeyEncoding::from_metadata(&metadata.chunk_key_encoding)?;
    let data_type = metadata.data_type.clone();
    let fill_value = data_type.fill_value_from_metadata(&metadata.fill_value)?;
    let codecs = CodecChain::from_metadata(&metadata.codecs)?;
    Ok(ArrayComponents {
        data_type,
        chunk_grid,
        chunk_grid_shape,
        chunk_key_encoding,
        fill_value,
        codecs,
    })
}

/// Check that `metadata` describes a usable array.
///
/// # Errors
/// Returns a [`ZarrError`] under the same conditions as [`Array::new_with_metadata`].
pub(crate) fn validate_array_metadata(metadata: &ArrayMetadataV3) -> Result<(), ZarrError> {
    validate_metadata(metadata).map(|_| ())
}

impl<TStorage: ?Sized> Array<TStorage> {
    /// Create an array in `storage` at `path` with `metadata`.
    /// This does **not** write to the store, use [`store_metadata`](Array::store_metadata) or [`create`](Array::create) to write `metadata` to `storage`.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if:
    ///  - the path is invalid ([`InvalidPath`](ZarrError::InvalidPath)),
    ///  - the chunk grid, chunk key encoding, or dimension names are invalid or their dimensionality does not match the shape ([`InvalidMetadata`](ZarrError::InvalidMetadata)),
    ///  - the fill value is incompatible with the data type ([`InvalidFillValue`](ZarrError::InvalidFillValue)), or
    ///  - a codec is unsupported or misconfigured ([`UnsupportedCodec`](ZarrError::UnsupportedCodec), [`CodecError`](ZarrError::CodecError)).
    pub fn new_with_metadata(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadataV3,
    ) -> Result<Self, ZarrError> {
        let path = NodePath::new(path)?;
        let ArrayComponents {
            data_type,
            chunk_grid,
            chunk_grid_shape,
            chunk_key_encoding,
            fill_value,
            codecs,
        } = validate_metadata(&metadata)?;
        Ok(Self {
            storage,
            path,
            metadata,
            data_type,
            chunk_grid,
            chunk_grid_shape,
            chunk_key_encoding,
            fill_value,
            codecs,
        })
    }

    /// Get the node path.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Get the storage.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }

    /// Get the array metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ArrayMetadataV3 {
        &self.metadata
    }

    /// Get the data type.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Get the fill value.
    #[must_use]
    pub const fn fill_value(&self) -> &FillValue {
        &self.fill_value
    }

    /// Get the array shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.metadata.shape
    }

    /// Get the dimensionality of the array.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.metadata.shape.len()
    }

    /// Get the codecs.
    #[must_use]
    pub const fn codecs(&self) -> &CodecChain {
        &self.codecs
    }

    /// Get the chunk grid.
    #[must_use]
    pub const fn chunk_grid(&self) -> &ChunkGrid {
        &self.chunk_grid
    }

    /// Get the nominal chunk shape.
    #[must_use]
    pub fn chunk_shape(&self) -> &ChunkShape {
        self.chunk_grid.chunk_shape()
    }

    /// Get the chunk key encoding.
    #[must_use]
    pub const fn chunk_key_encoding(&self) -> &ChunkKeyEncoding {
        &self.chunk_key_encoding
    }

    /// Get the dimension names.
    #[must_use]
    pub const fn dimension_names(&self) -> &Option<Vec<DimensionName>> {
        &self.metadata.dimension_names
    }

    /// Get the attributes.
    #[must_use]
    pub const fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata.attributes
    }

    /// Create an array builder matching the parameters of this array.
    #[must_use]
    pub fn builder(&self) -> ArrayBuilder {
        ArrayBuilder::from_array(self)
    }

    /// Return the shape of the chunk grid (i.e., the number of chunks along each dimension).
    #[must_use]
    pub fn chunk_grid_shape(&self) -> &[u64] {
        &self.chunk_grid_shape
    }

    /// Check that `chunk_indices` address a chunk of the chunk grid.
    ///
    /// # Errors
    /// Returns [`ZarrError::DimensionMismatch`] if the length of `chunk_indices` does not match the dimensionality of the array, or [`ZarrError::ChunkNotFound`] if they lie outside the chunk grid.
    pub fn validate_chunk_indices(&self, chunk_indices: &[u64]) -> Result<(), ZarrError> {
        if chunk_indices.len() != self.dimensionality() {
            Err(ZarrError::DimensionMismatch(format!(
                "chunk indices {chunk_indices:?} do not match the array dimensionality {}",
                self.dimensionality()
            )))
        } else if std::iter::zip(chunk_indices, &self.chunk_grid_shape).any(|(i, n)| i >= n) {
            Err(ZarrError::ChunkNotFound(format!(
                "chunk indices {chunk_indices:?} are outside the chunk grid {:?}",
                self.chunk_grid_shape
            )))
        } else {
            Ok(())
        }
    }

    /// Return the store key of the chunk at `chunk_indices`.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if `chunk_indices` are invalid, see [`validate_chunk_indices`](Array::validate_chunk_indices).
    pub fn chunk_key(&self, chunk_indices: &[u64]) -> Result<StoreKey, ZarrError> {
        self.validate_chunk_indices(chunk_indices)?;
        Ok(data_key(
            &self.path,
            chunk_indices,
            &self.chunk_key_encoding,
        )?)
    }

    /// Return the array subset of the chunk at `chunk_indices` at its nominal shape.
    ///
    /// The subset of an edge chunk extends beyond the array shape.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if `chunk_indices` are invalid.
    pub fn chunk_subset(&self, chunk_indices: &[u64]) -> Result<ArraySubset, ZarrError> {
        self.validate_chunk_indices(chunk_indices)?;
        Ok(self.chunk_grid.chunk_subset(chunk_indices)?)
    }

    /// Return the array subset of the chunk at `chunk_indices` bounded by the array shape.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if `chunk_indices` are invalid.
    pub fn chunk_subset_bounded(&self, chunk_indices: &[u64]) -> Result<ArraySubset, ZarrError> {
        let chunk_subset = self.chunk_subset(chunk_indices)?;
        Ok(chunk_subset.overlap(&ArraySubset::new_with_shape(self.shape().to_vec()))?)
    }

    /// Return an array subset indicating the chunks intersecting `array_subset`.
    ///
    /// # Errors
    /// Returns [`ZarrError::DimensionMismatch`] if the array subset has an incorrect dimensionality.
    pub fn chunks_in_array_subset(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<ArraySubset, ZarrError> {
        Ok(self.chunk_grid.chunks_in_array_subset(array_subset)?)
    }

    /// Return the size in bytes of a decoded chunk.
    ///
    /// # Errors
    /// Returns [`ZarrError::UnsupportedDataType`] if the data type has no fixed size, or [`ZarrError::DimensionMismatch`] if a chunk does not fit in memory.
    pub fn chunk_size_bytes(&self) -> Result<usize, ZarrError> {
        let element_size = self.data_type.chunk_element_size()?;
        self.chunk_shape()
            .num_elements_usize()
            .and_then(|num_elements| num_elements.checked_mul(element_size))
            .ok_or_else(|| {
                ZarrError::DimensionMismatch(format!(
                    "chunk shape {:?} is too large for memory",
                    self.chunk_shape()
                ))
            })
    }

    /// Return the bytes of a chunk with every element equal to the fill value.
    fn fill_chunk(&self) -> Result<Vec<u8>, ZarrError> {
        let size = self.chunk_size_bytes()?;
        Ok(self.fill_value.repeat(size / self.fill_value.size().max(1)))
    }

    /// Decode the stored bytes of a chunk, checking the decoded length.
    fn decode_chunk(&self, encoded_chunk: Vec<u8>) -> Result<Vec<u8>, ZarrError> {
        let chunk_size = self.chunk_size_bytes()?;
        let decoded = self.codecs.decode(encoded_chunk, chunk_size)?;
        if decoded.len() == chunk_size {
            Ok(decoded)
        } else {
            Err(ZarrError::DimensionMismatch(format!(
                "decoded chunk is {} bytes, expected {chunk_size}",
                decoded.len()
            )))
        }
    }

    /// Check the length of chunk bytes and encode them.
    fn encode_chunk(&self, chunk_bytes: Vec<u8>) -> Result<Vec<u8>, ZarrError> {
        let chunk_size = self.chunk_size_bytes()?;
        if chunk_bytes.len() != chunk_size {
            return Err(ZarrError::DimensionMismatch(format!(
                "chunk is {} bytes, expected {chunk_size}",
                chunk_bytes.len()
            )));
        }
        Ok(self.codecs.encode(chunk_bytes)?)
    }

    /// Check that `array_subset` lies within the array and return its size in bytes.
    fn validate_array_subset(&self, array_subset: &ArraySubset) -> Result<usize, ZarrError> {
        if !array_subset.inbounds(self.shape()) {
            return Err(ZarrError::DimensionMismatch(format!(
                "array subset {array_subset} is not within the array shape {:?}",
                self.shape()
            )));
        }
        let element_size = self.data_type.chunk_element_size()?;
        array_subset
            .num_elements_usize()?
            .checked_mul(element_size)
            .ok_or_else(|| {
                ZarrError::DimensionMismatch(format!(
                    "array subset {array_subset} is too large for memory"
                ))
            })
    }

    /// Check that the size of `T` matches the data type size.
    fn validate_element_size<T>(&self) -> bool {
        self.data_type.fixed_size() == Some(core::mem::size_of::<T>())
    }
}

/// Convert a vector of bytes to a vector of elements, failing if the length is not a multiple of the element size.
fn transmute_from_bytes_vec<T: bytemuck::Pod>(bytes: Vec<u8>) -> Option<Vec<T>> {
    let element_size = core::mem::size_of::<T>();
    if element_size == 0 || bytes.len() % element_size != 0 {
        return None;
    }
    Some(bytemuck::allocation::try_cast_vec(bytes).unwrap_or_else(|(_, bytes)| {
        bytemuck::allocation::pod_collect_to_vec(&bytes)
    }))
}

/// Convert a slice of elements to a vector of their bytes.
fn transmute_to_bytes_vec<T: bytemuck::NoUninit>(elements: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(elements).to_vec()
}

/// Ravel ND indices to a linearised index in C order.
#[must_use]
pub fn ravel_indices(indices: &[u64], shape: &[u64]) -> u64 {
    std::iter::zip(indices, shape).fold(0, |index, (&i, &dim)| index * dim + i)
}

/// Unravel a linearised index to ND indices in C order.
#[must_use]
pub fn unravel_index(mut index: u64, shape: &[u64]) -> ArrayIndices {
    let mut indices = vec![0; shape.len()];
    for (indices_i, &dim) in std::iter::zip(indices.iter_mut().rev(), shape.iter().rev()) {
        if dim > 0 {
            *indices_i = index % dim;
            index /= dim;
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::{
        array::chunk_key_encoding::{ChunkKeyEncodingTraits, DefaultChunkKeyEncoding},
        metadata::{v3::MetadataV3, FillValueMetadata},
        storage::store::MemoryStore,
    };

    use super::*;

    fn metadata(shape: ArrayShape, chunk_shape: &[u64]) -> ArrayMetadataV3 {
        ArrayMetadataV3::new(
            shape,
            DataType::UInt8,
            ChunkGrid::from(ChunkShape::try_from(chunk_shape).unwrap()).create_metadata(),
            DefaultChunkKeyEncoding::default().create_metadata(),
            FillValueMetadata::Int(0),
            vec![],
        )
    }

    #[test]
    fn ravel_unravel() {
        let shape = [3, 4, 5];
        assert_eq!(ravel_indices(&[1, 2, 3], &shape), 1 * 20 + 2 * 5 + 3);
        assert_eq!(unravel_index(33, &shape), vec![1, 2, 3]);
        assert_eq!(ravel_indices(&[], &[]), 0);
        assert_eq!(unravel_index(0, &[]), Vec::<u64>::new());
    }

    #[test]
    fn array_rank_mismatch() {
        let store = Arc::new(MemoryStore::new());
        assert!(matches!(
            Array::new_with_metadata(store, "/", metadata(vec![10, 10], &[5])),
            Err(ZarrError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn array_dimension_names_mismatch() {
        let store = Arc::new(MemoryStore::new());
        let metadata = metadata(vec![10, 10], &[5, 5])
            .with_dimension_names(Some(vec![Some("x".to_string())]));
        assert!(matches!(
            Array::new_with_metadata(store, "/", metadata),
            Err(ZarrError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn array_unsupported_codec() {
        let store = Arc::new(MemoryStore::new());
        let mut metadata = metadata(vec![10], &[5]);
        metadata.codecs = vec![MetadataV3::new("identity"), MetadataV3::new("zstd")];
        assert!(matches!(
            Array::new_with_metadata(store, "/", metadata),
            Err(ZarrError::UnsupportedCodec(name)) if name == "zstd"
        ));
    }

    #[test]
    fn array_invalid_fill_value() {
        let store = Arc::new(MemoryStore::new());
        let mut metadata = metadata(vec![10], &[5]);
        metadata.fill_value = FillValueMetadata::Int(-1);
        assert!(matches!(
            Array::new_with_metadata(store, "/", metadata),
            Err(ZarrError::InvalidFillValue(_))
        ));
    }

    #[test]
    fn array_chunk_addressing() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let array =
            Array::new_with_metadata(store, "/group/array", metadata(vec![10, 7], &[5, 5]))?;
        assert_eq!(array.chunk_grid_shape(), &[2, 2]);
        assert_eq!(array.chunk_key(&[1, 1])?.as_str(), "group/array/1/1");
        assert!(matches!(
            array.chunk_key(&[1]),
            Err(ZarrError::DimensionMismatch(_))
        ));
        assert!(matches!(
            array.chunk_key(&[2, 0]),
            Err(ZarrError::ChunkNotFound(_))
        ));
        assert_eq!(
            array.chunk_subset(&[1, 1])?,
            ArraySubset::new_with_ranges(&[5..10, 5..10])
        );
        assert_eq!(
            array.chunk_subset_bounded(&[1, 1])?,
            ArraySubset::new_with_ranges(&[5..10, 5..7])
        );
        assert_eq!(array.chunk_size_bytes()?, 25);
        assert_eq!(
            array.to_string(),
            "array at /group/array with shape [10, 7] and data type uint8"
        );
        Ok(())
    }
}
