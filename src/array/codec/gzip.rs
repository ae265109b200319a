//! The `gzip` codec.
//!
//! Applies gzip compression.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/codecs/gzip/v1.0.html>.

use std::io::{Cursor, Read};

use flate2::bufread::{GzDecoder, GzEncoder};

use crate::{
    config::global_config,
    metadata::v3::{
        codec::gzip::{
            GzipCodecConfiguration, GzipCompressionLevel, GzipCompressionLevelError,
        },
        MetadataV3,
    },
    plugin::{PluginCreateError, PluginMetadataInvalidError},
};

use super::{Codec, CodecError, CodecTraits};

pub(super) use crate::metadata::v3::codec::gzip::IDENTIFIER;

pub(super) fn is_name_gzip(name: &str) -> bool {
    name.eq(IDENTIFIER)
}

pub(super) fn create_codec_gzip(metadata: &MetadataV3) -> Result<Codec, PluginCreateError> {
    let configuration: GzipCodecConfiguration = metadata
        .to_configuration()
        .map_err(|_| PluginMetadataInvalidError::new(IDENTIFIER, "codec", metadata.clone()))?;
    Ok(std::sync::Arc::new(GzipCodec::new_with_configuration(
        &configuration,
    )))
}

/// A `gzip` codec implementation.
#[derive(Clone, Debug)]
pub struct GzipCodec {
    compression_level: GzipCompressionLevel,
}

impl GzipCodec {
    /// Create a new `gzip` codec.
    ///
    /// # Errors
    /// Returns [`GzipCompressionLevelError`] if `compression_level` is not valid.
    pub fn new(compression_level: u32) -> Result<Self, GzipCompressionLevelError> {
        let compression_level: GzipCompressionLevel = compression_level.try_into()?;
        Ok(Self { compression_level })
    }

    /// Create a new `gzip` codec from configuration.
    ///
    /// An absent level is the [configured default](crate::config::Config#gzip-compression-level).
    #[must_use]
    pub fn new_with_configuration(configuration: &GzipCodecConfiguration) -> Self {
        configuration
            .level
            .map_or_else(Self::default, |compression_level| Self { compression_level })
    }

    /// Returns the compression level.
    #[must_use]
    pub const fn compression_level(&self) -> GzipCompressionLevel {
        self.compression_level
    }
}

impl Default for GzipCodec {
    fn default() -> Self {
        let level = global_config().gzip_compression_level();
        // The configured level is clamped to 9
        let compression_level =
            GzipCompressionLevel::try_from(level.min(9)).unwrap_or(GzipCompressionLevel::MAX);
        Self { compression_level }
    }
}

impl CodecTraits for GzipCodec {
    fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    fn create_metadata(&self) -> MetadataV3 {
        let mut configuration = crate::metadata::v3::MetadataConfiguration::new();
        configuration.insert("level".to_string(), self.compression_level.as_u32().into());
        MetadataV3::new_with_configuration(IDENTIFIER, configuration)
    }

    fn encode(&self, decoded_value: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        let mut encoder = GzEncoder::new(
            Cursor::new(decoded_value),
            flate2::Compression::new(self.compression_level.as_u32()),
        );
        let mut out: Vec<u8> = Vec::new();
        encoder.read_to_end(&mut out)?;
        Ok(out)
    }

    fn decode(
        &self,
        encoded_value: Vec<u8>,
        decoded_size: Option<usize>,
    ) -> Result<Vec<u8>, CodecError> {
        let mut decoder = GzDecoder::new(Cursor::new(encoded_value));
        let Some(decoded_size) = decoded_size else {
            let mut out: Vec<u8> = Vec::new();
            decoder.read_to_end(&mut out)?;
            return Ok(out);
        };
        // Stop one byte past the expected size, which is enough to detect an oversized chunk
        let limit = u64::try_from(decoded_size).unwrap_or(u64::MAX).saturating_add(1);
        let mut out: Vec<u8> = Vec::with_capacity(decoded_size);
        decoder.take(limit).read_to_end(&mut out)?;
        if out.len() == decoded_size {
            Ok(out)
        } else {
            Err(CodecError::UnexpectedDecodedSize {
                expected: decoded_size,
                actual: out.len(),
            })
        }
    }
}
