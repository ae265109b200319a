//! Zarr data types.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#data-types>.

use num_complex::{Complex32, Complex64};
use serde::de::Error;

use crate::{error::ZarrError, metadata::FillValueMetadata};

use super::FillValue;

/// A data type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum DataType {
    /// `bool` Boolean.
    Bool,
    /// `int8` Integer in `[-2^7, 2^7-1]`.
    Int8,
    /// `int16` Integer in `[-2^15, 2^15-1]`.
    Int16,
    /// `int32` Integer in `[-2^31, 2^31-1]`.
    Int32,
    /// `int64` Integer in `[-2^63, 2^63-1]`.
    Int64,
    /// `uint8` Integer in `[0, 2^8-1]`.
    UInt8,
    /// `uint16` Integer in `[0, 2^16-1]`.
    UInt16,
    /// `uint32` Integer in `[0, 2^32-1]`.
    UInt32,
    /// `uint64` Integer in `[0, 2^64-1]`.
    UInt64,
    /// `float32` IEEE 754 single-precision floating point: sign bit, 8 bits exponent, 23 bits mantissa.
    Float32,
    /// `float64` IEEE 754 double-precision floating point: sign bit, 11 bits exponent, 52 bits mantissa.
    Float64,
    /// `complex64` real and complex components are each IEEE 754 single-precision floating point.
    Complex64,
    /// `complex128` real and complex components are each IEEE 754 double-precision floating point.
    Complex128,
    /// `S*` fixed-size UTF-8 string of * bits, zero padded, limited to be a multiple of 8.
    FixedString(usize), // the stored usize is the size in bytes
    /// `r*` raw bits, variable size given by *, limited to be a multiple of 8.
    RawBits(usize), // the stored usize is the size in bytes
    /// `string` a variable-length UTF-8 encoded string.
    ///
    /// Has no fixed size, so it can be described by metadata but not stored in chunks.
    String,
}

/// The size of a data type.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataTypeSize {
    /// Fixed size (in bytes).
    Fixed(usize),
    /// Variable sized.
    Variable,
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl serde::Serialize for DataType {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.name())
    }
}

impl<'de> serde::Deserialize<'de> for DataType {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        Self::from_name(&name).map_err(|err| D::Error::custom(err.to_string()))
    }
}

/// Parse the `bits` suffix of a sized data type name into a size in bytes.
fn size_bytes_from_bits(bits: &str) -> Option<usize> {
    let bits = bits.parse::<usize>().ok()?;
    (bits > 0 && bits % 8 == 0).then_some(bits / 8)
}

impl DataType {
    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Int8 => "int8".to_string(),
            Self::Int16 => "int16".to_string(),
            Self::Int32 => "int32".to_string(),
            Self::Int64 => "int64".to_string(),
            Self::UInt8 => "uint8".to_string(),
            Self::UInt16 => "uint16".to_string(),
            Self::UInt32 => "uint32".to_string(),
            Self::UInt64 => "uint64".to_string(),
            Self::Float32 => "float32".to_string(),
            Self::Float64 => "float64".to_string(),
            Self::Complex64 => "complex64".to_string(),
            Self::Complex128 => "complex128".to_string(),
            Self::FixedString(size) => format!("S{}", size * 8),
            Self::RawBits(size) => format!("r{}", size * 8),
            Self::String => "string".to_string(),
        }
    }

    /// Create a data type from its name.
    ///
    /// # Errors
    /// Returns [`ZarrError::UnsupportedDataType`] if `name` is not a known data type.
    pub fn from_name(name: &str) -> Result<Self, ZarrError> {
        let data_type = match name {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            "string" => Self::String,
            _ => {
                let sized = if let Some(bits) = name.strip_prefix('S') {
                    size_bytes_from_bits(bits).map(Self::FixedString)
                } else if let Some(bits) = name.strip_prefix('r') {
                    size_bytes_from_bits(bits).map(Self::RawBits)
                } else {
                    None
                };
                sized.ok_or_else(|| ZarrError::UnsupportedDataType(name.to_string()))?
            }
        };
        Ok(data_type)
    }

    /// Returns the [`DataTypeSize`].
    #[must_use]
    pub const fn size(&self) -> DataTypeSize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => DataTypeSize::Fixed(1),
            Self::Int16 | Self::UInt16 => DataTypeSize::Fixed(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => DataTypeSize::Fixed(4),
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::Complex64 => DataTypeSize::Fixed(8),
            Self::Complex128 => DataTypeSize::Fixed(16),
            Self::FixedString(size) | Self::RawBits(size) => DataTypeSize::Fixed(*size),
            Self::String => DataTypeSize::Variable,
        }
    }

    /// Returns the size in bytes of a fixed-size data type, otherwise returns [`None`].
    #[must_use]
    pub const fn fixed_size(&self) -> Option<usize> {
        match self.size() {
            DataTypeSize::Fixed(size) => Some(size),
            DataTypeSize::Variable => None,
        }
    }

    /// Returns the element size in bytes for chunk storage.
    ///
    /// # Errors
    /// Returns [`ZarrError::UnsupportedDataType`] for a variable-sized data type.
    pub fn chunk_element_size(&self) -> Result<usize, ZarrError> {
        self.fixed_size().ok_or_else(|| {
            ZarrError::UnsupportedDataType(format!(
                "{self} has no fixed size and cannot be stored in chunks"
            ))
        })
    }

    /// Create a fill value from metadata.
    ///
    /// Element bytes are native endian.
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidFillValue`] if the fill value is incompatible with the data type.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_value_from_metadata(
        &self,
        fill_value: &FillValueMetadata,
    ) -> Result<FillValue, ZarrError> {
        use FillValue as FV;
        let err = || {
            ZarrError::InvalidFillValue(format!(
                "fill value {fill_value} is incompatible with data type {self}"
            ))
        };
        let int = || fill_value.as_i64().ok_or_else(err);
        let uint = || fill_value.as_u64().ok_or_else(err);
        let float = || fill_value.as_f64().ok_or_else(err);
        match self {
            Self::Bool => match uint()? {
                0 => Ok(FV::from(false)),
                1 => Ok(FV::from(true)),
                _ => Err(err()),
            },
            Self::Int8 => Ok(FV::from(i8::try_from(int()?).map_err(|_| err())?)),
            Self::Int16 => Ok(FV::from(i16::try_from(int()?).map_err(|_| err())?)),
            Self::Int32 => Ok(FV::from(i32::try_from(int()?).map_err(|_| err())?)),
            Self::Int64 => Ok(FV::from(int()?)),
            Self::UInt8 => Ok(FV::from(u8::try_from(uint()?).map_err(|_| err())?)),
            Self::UInt16 => Ok(FV::from(u16::try_from(uint()?).map_err(|_| err())?)),
            Self::UInt32 => Ok(FV::from(u32::try_from(uint()?).map_err(|_| err())?)),
            Self::UInt64 => Ok(FV::from(uint()?)),
            Self::Float32 => Ok(FV::from(float()? as f32)),
            Self::Float64 => Ok(FV::from(float()?)),
            Self::Complex64 => Ok(FV::from(Complex32::new(float()? as f32, 0.0))),
            Self::Complex128 => Ok(FV::from(Complex64::new(float()?, 0.0))),
            Self::FixedString(size) => match fill_value {
                FillValueMetadata::String(string) if string.len() <= *size => {
                    let mut bytes = string.as_bytes().to_vec();
                    bytes.resize(*size, 0);
                    Ok(FV::new(bytes))
                }
                FillValueMetadata::Null => Ok(FV::new(vec![0; *size])),
                _ => Err(err()),
            },
            Self::RawBits(size) => match fill_value {
                FillValueMetadata::Null | FillValueMetadata::Int(0) => Ok(FV::new(vec![0; *size])),
                _ => Err(err()),
            },
            Self::String => match fill_value {
                FillValueMetadata::String(string) => Ok(FV::new(string.as_bytes().to_vec())),
                FillValueMetadata::Null => Ok(FV::new(vec![])),
                _ => Err(err()),
            },
        }
    }
}
