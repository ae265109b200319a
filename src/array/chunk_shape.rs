use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ArrayShape;

/// The shape of a chunk. All dimensions must be non-zero.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ChunkShape(Vec<NonZeroU64>);

/// A chunk shape with a zero dimension.
#[derive(Copy, Clone, Debug, Error)]
#[error("chunk shape dimensions must be non-zero")]
pub struct NonZeroError;

impl ChunkShape {
    /// Return the number of elements.
    ///
    /// Equal to the product of the components of its shape.
    #[must_use]
    pub fn num_elements_u64(&self) -> u64 {
        self.0.iter().copied().map(NonZeroU64::get).product::<u64>()
    }

    /// Return the number of elements as a usize, or [`None`] if it exceeds [`usize::MAX`].
    #[must_use]
    pub fn num_elements_usize(&self) -> Option<usize> {
        usize::try_from(self.num_elements_u64()).ok()
    }

    /// Convert the chunk shape to an [`ArrayShape`].
    #[must_use]
    pub fn to_array_shape(&self) -> ArrayShape {
        self.0.iter().copied().map(NonZeroU64::get).collect()
    }
}

impl From<ChunkShape> for Vec<NonZeroU64> {
    fn from(val: ChunkShape) -> Self {
        val.0
    }
}

impl From<Vec<NonZeroU64>> for ChunkShape {
    fn from(value: Vec<NonZeroU64>) -> Self {
        Self(value)
    }
}

impl std::ops::Deref for ChunkShape {
    type Target = [NonZeroU64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&[u64]> for ChunkShape {
    type Error = NonZeroError;
    fn try_from(value: &[u64]) -> Result<Self, Self::Error> {
        value
            .iter()
            .map(|&v| NonZeroU64::new(v).ok_or(NonZeroError))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<Vec<u64>> for ChunkShape {
    type Error = NonZeroError;
    fn try_from(value: Vec<u64>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl<const N: usize> TryFrom<[u64; N]> for ChunkShape {
    type Error = NonZeroError;
    fn try_from(value: [u64; N]) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_shape() {
        let chunk_shape = ChunkShape::try_from([2, 3, 4]).unwrap();
        assert_eq!(chunk_shape.len(), 3);
        assert_eq!(chunk_shape.num_elements_u64(), 24);
        assert_eq!(chunk_shape.num_elements_usize(), Some(24));
        assert_eq!(chunk_shape.to_array_shape(), vec![2, 3, 4]);
        assert!(ChunkShape::try_from(vec![2, 0]).is_err());
        let scalar = ChunkShape::try_from(Vec::<u64>::new()).unwrap();
        assert_eq!(scalar.num_elements_u64(), 1);
    }

    #[test]
    fn chunk_shape_serde() {
        let chunk_shape: ChunkShape = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(serde_json::to_string(&chunk_shape).unwrap(), "[1,2]");
        assert!(serde_json::from_str::<ChunkShape>("[1, 0]").is_err());
    }
}
