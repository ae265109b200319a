//! Array subsets.
//!
//! An [`ArraySubset`] is a hyperrectangle of array indices, defined by a start and a shape.
//! It is used to address regions of an array, the chunks overlapping a region, and the elements of a region in C (row-major) order.
//!
//! This module also provides [`copy_region`], which copies the bytes of a region between two C-order buffers.

use derive_more::Display;
use thiserror::Error;

use crate::{
    array::{ravel_indices, unravel_index, ArrayIndices, ArrayShape},
    error::ZarrError,
};

/// An array subset.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Default)]
#[display("start {start:?} shape {shape:?}")]
pub struct ArraySubset {
    /// The start of the array subset.
    start: ArrayIndices,
    /// The shape of the array subset.
    shape: ArrayShape,
}

/// An incompatible dimensionality error.
#[derive(Copy, Clone, Debug, Error)]
#[error("incompatible dimensionality {0}, expected {1}")]
pub struct IncompatibleDimensionalityError(usize, usize);

impl IncompatibleDimensionalityError {
    /// Create a new incompatible dimensionality error.
    #[must_use]
    pub const fn new(got: usize, expected: usize) -> Self {
        Self(got, expected)
    }
}

impl From<IncompatibleDimensionalityError> for ZarrError {
    fn from(err: IncompatibleDimensionalityError) -> Self {
        Self::DimensionMismatch(err.to_string())
    }
}

impl ArraySubset {
    /// Create a new array subset with `shape` starting at the origin.
    #[must_use]
    pub fn new_with_shape(shape: ArrayShape) -> Self {
        Self {
            start: vec![0; shape.len()],
            shape,
        }
    }

    /// Create a new array subset.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the lengths of `start` and `shape` do not match.
    pub fn new_with_start_shape(
        start: ArrayIndices,
        shape: ArrayShape,
    ) -> Result<Self, IncompatibleDimensionalityError> {
        if start.len() == shape.len() {
            Ok(Self { start, shape })
        } else {
            Err(IncompatibleDimensionalityError(start.len(), shape.len()))
        }
    }

    /// Create a new array subset from a start and an exclusive end.
    ///
    /// An end before the start produces an empty dimension.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the lengths of `start` and `end` do not match.
    pub fn new_with_start_end_exc(
        start: ArrayIndices,
        end: &[u64],
    ) -> Result<Self, IncompatibleDimensionalityError> {
        if start.len() != end.len() {
            return Err(IncompatibleDimensionalityError(end.len(), start.len()));
        }
        let shape = std::iter::zip(&start, end)
            .map(|(&start, &end)| end.saturating_sub(start))
            .collect();
        Ok(Self { start, shape })
    }

    /// Create a new array subset from a list of [`Range`](std::ops::Range)s.
    #[must_use]
    pub fn new_with_ranges(ranges: &[std::ops::Range<u64>]) -> Self {
        let start = ranges.iter().map(|range| range.start).collect();
        let shape = ranges
            .iter()
            .map(|range| range.end.saturating_sub(range.start))
            .collect();
        Self { start, shape }
    }

    /// Return the start of the array subset.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// Return the shape of the array subset.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the exclusive end of the array subset.
    ///
    /// Saturates at [`u64::MAX`].
    #[must_use]
    pub fn end_exc(&self) -> ArrayIndices {
        std::iter::zip(&self.start, &self.shape)
            .map(|(start, size)| start.saturating_add(*size))
            .collect()
    }

    /// Return the dimensionality of the array subset.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// Return the number of elements of the array subset.
    ///
    /// Equal to the product of the components of its shape, saturating at [`u64::MAX`].
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape
            .iter()
            .fold(1, |num_elements, &size| num_elements.saturating_mul(size))
    }

    /// Return the number of elements of the array subset as a `usize`.
    ///
    /// # Errors
    /// Returns [`ZarrError::DimensionMismatch`] if the number of elements exceeds [`usize::MAX`].
    pub fn num_elements_usize(&self) -> Result<usize, ZarrError> {
        usize::try_from(self.num_elements()).map_err(|_| {
            ZarrError::DimensionMismatch(format!("array subset {self} is too large for memory"))
        })
    }

    /// Returns true if the array subset contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Returns true if the array subset contains `indices`.
    #[must_use]
    pub fn contains(&self, indices: &[u64]) -> bool {
        indices.len() == self.dimensionality()
            && itertools::izip!(indices, &self.start, &self.shape)
                .all(|(&i, &start, &size)| i >= start && i - start < size)
    }

    /// Returns true if the array subset lies within an array of shape `array_shape`.
    ///
    /// A subset whose end overflows [`u64`] is out of bounds.
    #[must_use]
    pub fn inbounds(&self, array_shape: &[u64]) -> bool {
        self.dimensionality() == array_shape.len()
            && itertools::izip!(&self.start, &self.shape, array_shape).all(
                |(&start, &size, &array_size)| {
                    start.checked_add(size).is_some_and(|end| end <= array_size)
                },
            )
    }

    /// Return the overlapping subset between this array subset and `subset_other`.
    ///
    /// An empty subset is returned if they do not overlap.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the dimensionality of `subset_other` does not match.
    pub fn overlap(&self, subset_other: &Self) -> Result<Self, IncompatibleDimensionalityError> {
        if subset_other.dimensionality() != self.dimensionality() {
            return Err(IncompatibleDimensionalityError(
                subset_other.dimensionality(),
                self.dimensionality(),
            ));
        }
        let start: ArrayIndices = std::iter::zip(&self.start, &subset_other.start)
            .map(|(&a, &b)| a.max(b))
            .collect();
        let end: ArrayIndices = std::iter::zip(self.end_exc(), subset_other.end_exc())
            .map(|(a, b)| a.min(b))
            .collect();
        Self::new_with_start_end_exc(start, &end)
    }

    /// Return this array subset relative to `start`.
    ///
    /// # Errors
    /// Returns [`IncompatibleDimensionalityError`] if the length of `start` does not match the dimensionality.
    pub fn relative_to(&self, start: &[u64]) -> Result<Self, IncompatibleDimensionalityError> {
        if start.len() != self.dimensionality() {
            return Err(IncompatibleDimensionalityError(
                start.len(),
                self.dimensionality(),
            ));
        }
        Ok(Self {
            start: std::iter::zip(&self.start, start)
                .map(|(a, b)| a.saturating_sub(*b))
                .collect(),
            shape: self.shape.clone(),
        })
    }

    /// Returns an iterator over the indices of the elements of the array subset in C order.
    pub fn indices(&self) -> impl Iterator<Item = ArrayIndices> + '_ {
        (0..self.num_elements()).map(move |linear| {
            std::iter::zip(unravel_index(linear, &self.shape), &self.start)
                .map(|(index, start)| index + start)
                .collect()
        })
    }
}

/// Copy the bytes of a region between two C-order buffers.
///
/// The region has shape `region_shape` and starts at `src_start` in `src` (an array of shape `src_shape`) and at `dst_start` in `dst` (an array of shape `dst_shape`).
/// Elements are `element_size` bytes.
///
/// # Panics
/// Panics if the region does not lie within both arrays, or the buffer lengths do not match their shapes.
#[allow(clippy::too_many_arguments)]
pub fn copy_region(
    src: &[u8],
    src_shape: &[u64],
    src_start: &[u64],
    dst: &mut [u8],
    dst_shape: &[u64],
    dst_start: &[u64],
    region_shape: &[u64],
    element_size: usize,
) {
    if region_shape.contains(&0) {
        return;
    }
    let Some((&run_elements, outer_shape)) = region_shape.split_last() else {
        // Rank 0, a single element
        dst[..element_size].copy_from_slice(&src[..element_size]);
        return;
    };
    // Offsets are bounded by the lengths of in-memory buffers
    #[allow(clippy::cast_possible_truncation)]
    let to_usize = |v: u64| v as usize;
    let run_bytes = to_usize(run_elements) * element_size;
    let num_runs: u64 = outer_shape.iter().product();
    let mut src_indices = src_start.to_vec();
    let mut dst_indices = dst_start.to_vec();
    for run in 0..num_runs {
        let outer = unravel_index(run, outer_shape);
        for (d, index) in outer.iter().enumerate() {
            src_indices[d] = src_start[d] + index;
            dst_indices[d] = dst_start[d] + index;
        }
        let src_offset = to_usize(ravel_indices(&src_indices, src_shape)) * element_size;
        let dst_offset = to_usize(ravel_indices(&dst_indices, dst_shape)) * element_size;
        dst[dst_offset..dst_offset + run_bytes]
            .copy_from_slice(&src[src_offset..src_offset + run_bytes]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn array_subset() -> Result<(), Box<dyn Error>> {
        assert!(ArraySubset::new_with_start_shape(vec![0, 0], vec![10, 10]).is_ok());
        assert!(ArraySubset::new_with_start_shape(vec![0, 0], vec![10]).is_err());
        let subset = ArraySubset::new_with_ranges(&[1..4, 2..3]);
        assert_eq!(subset.start(), &[1, 2]);
        assert_eq!(subset.shape(), &[3, 1]);
        assert_eq!(subset.end_exc(), vec![4, 3]);
        assert_eq!(subset.num_elements(), 3);
        assert!(subset.contains(&[3, 2]));
        assert!(!subset.contains(&[4, 2]));
        assert!(subset.inbounds(&[4, 3]));
        assert!(!subset.inbounds(&[4, 2]));
        assert_eq!(subset.to_string(), "start [1, 2] shape [3, 1]");
        Ok(())
    }

    #[test]
    fn array_subset_overflow() -> Result<(), Box<dyn Error>> {
        let subset = ArraySubset::new_with_start_shape(vec![u64::MAX], vec![2])?;
        assert!(!subset.inbounds(&[10]));
        assert!(!subset.inbounds(&[u64::MAX]));
        assert_eq!(subset.end_exc(), vec![u64::MAX]);
        assert!(subset.contains(&[u64::MAX]));
        assert!(!subset.contains(&[0]));
        let subset = ArraySubset::new_with_start_shape(vec![0, 0], vec![u64::MAX, 2])?;
        assert_eq!(subset.num_elements(), u64::MAX);
        Ok(())
    }

    #[test]
    fn array_subset_overlap() -> Result<(), Box<dyn Error>> {
        let a = ArraySubset::new_with_ranges(&[0..5, 0..5]);
        let b = ArraySubset::new_with_ranges(&[3..8, 4..6]);
        assert_eq!(a.overlap(&b)?, ArraySubset::new_with_ranges(&[3..5, 4..5]));
        let c = ArraySubset::new_with_ranges(&[6..8, 0..1]);
        assert!(a.overlap(&c)?.is_empty());
        assert!(a.overlap(&ArraySubset::new_with_shape(vec![1])).is_err());
        assert_eq!(
            b.relative_to(&[2, 2])?,
            ArraySubset::new_with_ranges(&[1..6, 2..4])
        );
        Ok(())
    }

    #[test]
    fn array_subset_indices() {
        let subset = ArraySubset::new_with_ranges(&[1..3, 5..7]);
        let indices: Vec<_> = subset.indices().collect();
        assert_eq!(
            indices,
            vec![vec![1, 5], vec![1, 6], vec![2, 5], vec![2, 6]]
        );
        let scalar = ArraySubset::new_with_shape(vec![]);
        assert_eq!(scalar.indices().collect::<Vec<_>>(), vec![Vec::<u64>::new()]);
        assert_eq!(ArraySubset::new_with_shape(vec![0, 3]).indices().count(), 0);
    }

    #[test]
    fn copy_region_2d() {
        // 3x4 source, copy the [1..3, 1..3] region into the origin of a 2x2 destination
        let src: Vec<u8> = (0..12).collect();
        let mut dst = vec![0u8; 4];
        copy_region(&src, &[3, 4], &[1, 1], &mut dst, &[2, 2], &[0, 0], &[2, 2], 1);
        assert_eq!(dst, vec![5, 6, 9, 10]);
    }

    #[test]
    fn copy_region_multibyte() {
        let src: Vec<u8> = (0..8).collect(); // 4 u16 elements in a 2x2 array
        let mut dst = vec![0u8; 12]; // 2x3 array
        copy_region(&src, &[2, 2], &[0, 0], &mut dst, &[2, 3], &[0, 1], &[2, 2], 2);
        assert_eq!(dst, vec![0, 0, 0, 1, 2, 3, 0, 0, 4, 5, 6, 7]);
    }

    #[test]
    fn copy_region_scalar() {
        let src = vec![7u8, 8];
        let mut dst = vec![0u8; 2];
        copy_region(&src, &[], &[], &mut dst, &[], &[], &[], 2);
        assert_eq!(dst, src);
    }
}
