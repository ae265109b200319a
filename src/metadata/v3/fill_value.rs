//! Fill value metadata.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Fill value metadata.
///
/// A fill value is a JSON integer, float, string, or null.
/// Deserialisation tries each variant in order: [`Int`](FillValueMetadata::Int), [`UInt`](FillValueMetadata::UInt), [`Float`](FillValueMetadata::Float), [`String`](FillValueMetadata::String), then [`Null`](FillValueMetadata::Null).
/// Any other JSON value (a boolean, array, or object) is rejected.
///
/// The value is interpreted relative to a [`DataType`](crate::array::DataType), see [`FillValue`](crate::array::FillValue).
/// Non-finite floats are written as the strings `"NaN"`, `"Infinity"`, or `"-Infinity"`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Display)]
#[serde(untagged)]
pub enum FillValueMetadata {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer above [`i64::MAX`].
    UInt(u64),
    /// A finite floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// No value.
    #[display("null")]
    Null,
}

impl From<i64> for FillValueMetadata {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for FillValueMetadata {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::UInt(value), Self::Int)
    }
}

impl From<f64> for FillValueMetadata {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<&str> for FillValueMetadata {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl FillValueMetadata {
    /// Create fill value metadata from a floating point number.
    ///
    /// Non-finite numbers become their string representation.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::String("NaN".to_string())
        } else if value == f64::INFINITY {
            Self::String("Infinity".to_string())
        } else if value == f64::NEG_INFINITY {
            Self::String("-Infinity".to_string())
        } else {
            Self::Float(value)
        }
    }

    /// Interpret the fill value as a floating point number.
    ///
    /// Accepts numbers and the strings `"NaN"`, `"Infinity"`, and `"-Infinity"`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::UInt(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::String(value) => match value.as_str() {
                "NaN" => Some(f64::NAN),
                "Infinity" => Some(f64::INFINITY),
                "-Infinity" => Some(f64::NEG_INFINITY),
                _ => None,
            },
            Self::Null => None,
        }
    }

    /// Interpret the fill value as a signed integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Interpret the fill value as an unsigned integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(value) => u64::try_from(*value).ok(),
            Self::UInt(value) => Some(*value),
            _ => None,
        }
    }
}
