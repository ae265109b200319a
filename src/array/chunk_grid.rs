//! Zarr chunk grids.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#chunk-grids>.
//!
//! Only the [regular grid](RegularChunkGrid) is supported. A regular chunk grid partitions an array into chunks of one nominal [`ChunkShape`].
//! Chunks at the upper boundary of an array (edge chunks) extend beyond its shape and keep the nominal shape.

use derive_more::From;

use crate::{
    array_subset::{ArraySubset, IncompatibleDimensionalityError},
    error::ZarrError,
    metadata::v3::{
        chunk_grid::regular::{self, RegularChunkGridConfiguration},
        MetadataV3,
    },
};

use super::{ArrayIndices, ArrayShape, ChunkShape};

/// A chunk grid.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum ChunkGrid {
    /// A regular chunk grid.
    Regular(RegularChunkGrid),
}

impl ChunkGrid {
    /// Create a chunk grid from metadata.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidMetadata`] if the metadata is invalid or does not name a supported chunk grid.
    pub fn from_metadata(metadata: &MetadataV3) -> Result<Self, ZarrError> {
        if metadata.name() == regular::IDENTIFIER {
            let configuration: RegularChunkGridConfiguration = metadata
                .to_configuration()
                .map_err(|err| ZarrError::InvalidMetadata(err.to_string()))?;
            Ok(RegularChunkGrid::new(configuration.chunk_shape).into())
        } else {
            Err(ZarrError::InvalidMetadata(format!(
                "unsupported chunk grid `{}`",
                metadata.name()
            )))
        }
    }

    /// Create the metadata of the chunk grid.
    #[must_use]
    pub fn create_metadata(&self) -> MetadataV3 {
        match self {
            Self::Regular(grid) => grid.create_metadata(),
        }
    }

    /// The dimensionality of the grid.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        match self {
            Self::Regular(grid) => grid.chunk_shape.len(),
        }
    }

    /// The nominal shape of every chunk.
    #[must_use]
    pub fn chunk_shape(&self) -> &ChunkShape {
        match self {
            Self::Regular(grid) => &grid.chunk_shape,
        }
    }

    /// The grid shape (i.e. number of chunks per dimension) of an array with shape `array_shape`.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the length of `array_shape` does not match the dimensionality of the chunk grid.
    pub fn grid_shape(
        &self,
        array_shape: &[u64],
    ) -> Result<ArrayShape, IncompatibleDimensionalityError> {
        match self {
            Self::Regular(grid) => grid.grid_shape(array_shape),
        }
    }

    /// The subset of the array covered by the chunk at `chunk_indices`, at its nominal shape.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the length of `chunk_indices` does not match the dimensionality of the chunk grid.
    pub fn chunk_subset(
        &self,
        chunk_indices: &[u64],
    ) -> Result<ArraySubset, IncompatibleDimensionalityError> {
        match self {
            Self::Regular(grid) => grid.chunk_subset(chunk_indices),
        }
    }

    /// Returns true if `chunk_indices` lie within the grid of an array with shape `array_shape`.
    #[must_use]
    pub fn validate_chunk_indices(&self, chunk_indices: &[u64], array_shape: &[u64]) -> bool {
        self.grid_shape(array_shape).is_ok_and(|grid_shape| {
            chunk_indices.len() == grid_shape.len()
                && std::iter::zip(chunk_indices, &grid_shape).all(|(i, n)| i < n)
        })
    }

    /// The subset of chunk indices of the chunks overlapping `array_subset`.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the dimensionality of `array_subset` does not match the chunk grid.
    pub fn chunks_in_array_subset(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<ArraySubset, IncompatibleDimensionalityError> {
        match self {
            Self::Regular(grid) => grid.chunks_in_array_subset(array_subset),
        }
    }
}

impl From<ChunkShape> for ChunkGrid {
    /// Create a regular chunk grid from a chunk shape.
    fn from(chunk_shape: ChunkShape) -> Self {
        Self::Regular(RegularChunkGrid::new(chunk_shape))
    }
}

/// A `regular` chunk grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularChunkGrid {
    chunk_shape: ChunkShape,
}

impl RegularChunkGrid {
    /// Create a new `regular` chunk grid with chunk shape `chunk_shape`.
    #[must_use]
    pub fn new(chunk_shape: ChunkShape) -> Self {
        Self { chunk_shape }
    }

    /// Return the chunk shape.
    #[must_use]
    pub fn chunk_shape(&self) -> &ChunkShape {
        &self.chunk_shape
    }

    fn create_metadata(&self) -> MetadataV3 {
        let mut configuration = crate::metadata::v3::MetadataConfiguration::new();
        configuration.insert(
            "chunk_shape".to_string(),
            self.chunk_shape.to_array_shape().into(),
        );
        MetadataV3::new_with_configuration(regular::IDENTIFIER, configuration)
    }

    fn check_dimensionality(&self, len: usize) -> Result<(), IncompatibleDimensionalityError> {
        if len == self.chunk_shape.len() {
            Ok(())
        } else {
            Err(IncompatibleDimensionalityError::new(
                len,
                self.chunk_shape.len(),
            ))
        }
    }

    fn grid_shape(&self, array_shape: &[u64]) -> Result<ArrayShape, IncompatibleDimensionalityError> {
        self.check_dimensionality(array_shape.len())?;
        Ok(std::iter::zip(array_shape, self.chunk_shape.iter())
            .map(|(&a, &c)| a.div_ceil(c.get()))
            .collect())
    }

    fn chunk_subset(
        &self,
        chunk_indices: &[u64],
    ) -> Result<ArraySubset, IncompatibleDimensionalityError> {
        self.check_dimensionality(chunk_indices.len())?;
        let start: ArrayIndices = std::iter::zip(chunk_indices, self.chunk_shape.iter())
            .map(|(&i, &c)| i * c.get())
            .collect();
        ArraySubset::new_with_start_shape(start, self.chunk_shape.to_array_shape())
    }

    fn chunks_in_array_subset(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<ArraySubset, IncompatibleDimensionalityError> {
        self.check_dimensionality(array_subset.dimensionality())?;
        if array_subset.is_empty() {
            return Ok(ArraySubset::new_with_shape(vec![0; array_subset.dimensionality()]));
        }
        let start: ArrayIndices = std::iter::zip(array_subset.start(), self.chunk_shape.iter())
            .map(|(&s, &c)| s / c.get())
            .collect();
        let end: ArrayIndices = std::iter::zip(array_subset.end_exc(), self.chunk_shape.iter())
            .map(|(e, &c)| e.div_ceil(c.get()))
            .collect();
        ArraySubset::new_with_start_end_exc(start, &end)
    }
}
