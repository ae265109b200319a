//! Zarr fill values.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#fill-value>.

/// The fill value of the Zarr array.
///
/// Provides an element value to use for uninitialised portions of the Zarr array.
/// Holds the native endian bytes of a single element.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FillValue(Vec<u8>);

impl core::fmt::Display for FillValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Vec<u8>> for FillValue {
    fn from(value: Vec<u8>) -> Self {
        FillValue(value)
    }
}

impl From<bool> for FillValue {
    fn from(value: bool) -> Self {
        FillValue(vec![u8::from(value)])
    }
}

macro_rules! impl_from_pod {
    ( $( $t:ty ),* ) => {
        $(
            impl From<$t> for FillValue {
                fn from(value: $t) -> Self {
                    FillValue(bytemuck::bytes_of(&value).to_vec())
                }
            }
        )*
    };
}

impl_from_pod!(
    u8,
    u16,
    u32,
    u64,
    i8,
    i16,
    i32,
    i64,
    f32,
    f64,
    num_complex::Complex32,
    num_complex::Complex64
);

impl FillValue {
    /// Create a new fill value composed of `bytes`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> FillValue {
        FillValue(bytes)
    }

    /// Returns the size in bytes of the fill value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Return the byte representation of the fill value.
    #[must_use]
    pub fn as_ne_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the bytes of `num_elements` elements equal to the fill value.
    #[must_use]
    pub fn repeat(&self, num_elements: usize) -> Vec<u8> {
        self.0.repeat(num_elements)
    }

    /// Check if all elements of `bytes` are equal to the fill value.
    ///
    /// Returns false if the length of `bytes` is not a multiple of the fill value size.
    #[must_use]
    pub fn equals_all(&self, bytes: &[u8]) -> bool {
        if self.0.is_empty() {
            return bytes.is_empty();
        }
        bytes.len() % self.0.len() == 0 && bytes.chunks_exact(self.0.len()).all(|e| e == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value_bytes() {
        assert_eq!(FillValue::from(true).as_ne_bytes(), &[1]);
        assert_eq!(FillValue::from(7u16).as_ne_bytes(), &7u16.to_ne_bytes());
        assert_eq!(FillValue::from(-1i32).size(), 4);
        let complex = FillValue::from(num_complex::Complex64::new(1.0, 2.0));
        assert_eq!(&complex.as_ne_bytes()[..8], &1.0f64.to_ne_bytes());
        assert_eq!(&complex.as_ne_bytes()[8..], &2.0f64.to_ne_bytes());
    }

    #[test]
    fn fill_value_repeat() {
        let fill_value = FillValue::from(0x0102u16);
        let bytes = fill_value.repeat(3);
        assert_eq!(bytes.len(), 6);
        assert!(fill_value.equals_all(&bytes));
        assert!(!fill_value.equals_all(&bytes[1..]));
        assert!(!fill_value.equals_all(&[0, 0]));
    }
}
