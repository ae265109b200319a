use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The identifier for the `gzip` codec.
pub const IDENTIFIER: &str = "gzip";

/// Configuration parameters for the `gzip` codec.
///
/// The `level` is optional when reading metadata.
/// A codec created from a configuration without a level uses the [configured default](crate::config::Config#gzip-compression-level).
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Display, Default)]
#[serde(deny_unknown_fields)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct GzipCodecConfiguration {
    /// The compression level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<GzipCompressionLevel>,
}

impl GzipCodecConfiguration {
    /// Create a new `gzip` codec configuration given a [`GzipCompressionLevel`].
    #[must_use]
    pub const fn new(level: GzipCompressionLevel) -> Self {
        Self { level: Some(level) }
    }
}

/// A compression level. Used by the `gzip` codec.
///
/// An integer from 0 to 9 which controls the speed and level of compression.
/// A level of 1 is the fastest compression method and produces the least compression, while 9 is slowest and produces the most compression.
/// Compression is turned off completely when level is 0.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub struct GzipCompressionLevel(u32);

/// An invalid compression level.
#[derive(Debug, thiserror::Error)]
#[error("invalid compression level {0}, must be 0-9")]
pub struct GzipCompressionLevelError(u32);

impl TryFrom<u32> for GzipCompressionLevel {
    type Error = GzipCompressionLevelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value < 10 {
            Ok(Self(value))
        } else {
            Err(GzipCompressionLevelError(value))
        }
    }
}

impl serde::Serialize for GzipCompressionLevel {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for GzipCompressionLevel {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(d)?;
        if let serde_json::Value::Number(level) = value {
            if let Some(level) = level.as_u64().and_then(|level| u32::try_from(level).ok()) {
                if level < 10 {
                    return Ok(Self(level));
                }
            }
        }
        Err(serde::de::Error::custom(
            "compression level must be an integer between 0 and 9.",
        ))
    }
}

impl GzipCompressionLevel {
    /// The highest compression level, 9.
    pub const MAX: Self = Self(9);

    /// The underlying integer compression level.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn codec_gzip_configuration_valid() -> Result<(), Box<dyn Error>> {
        const JSON_VALID: &str = r#"{
            "level": 1
        }"#;
        let configuration = serde_json::from_str::<GzipCodecConfiguration>(JSON_VALID)?;
        assert_eq!(configuration.level.map(|l| l.as_u32()), Some(1));
        let configuration = serde_json::from_str::<GzipCodecConfiguration>("{}")?;
        assert!(configuration.level.is_none());
        Ok(())
    }

    #[test]
    fn codec_gzip_configuration_invalid() {
        for json in [r#"{"level": -1}"#, r#"{"level": 10}"#, r#"{"level": "1"}"#, r#"{"lvl": 1}"#] {
            assert!(serde_json::from_str::<GzipCodecConfiguration>(json).is_err());
        }
    }
}
