//! A sequence of codecs applied to the bytes of a chunk.

use crate::metadata::v3::MetadataV3;

use super::{codec_from_metadata, Codec, CodecError};

/// A codec chain is a sequence of codecs.
///
/// Encoding applies the codecs in order, decoding applies them in reverse order.
/// Only the first codec decodes to a known size, the size of a decoded chunk.
/// The sizes of intermediate representations are unknown.
/// An empty chain passes bytes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct CodecChain {
    codecs: Vec<Codec>,
}

impl CodecChain {
    /// Create a new codec chain.
    #[must_use]
    pub fn new(codecs: Vec<Codec>) -> Self {
        Self { codecs }
    }

    /// Create a new codec chain from a list of metadata.
    ///
    /// Every codec is created before the chain is returned, so an unsupported codec anywhere in the list fails without any codec being applied.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if a codec could not be created.
    pub fn from_metadata(metadatas: &[MetadataV3]) -> Result<Self, CodecError> {
        let codecs = metadatas
            .iter()
            .map(codec_from_metadata)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { codecs })
    }

    /// Create the metadata of each codec in the chain.
    #[must_use]
    pub fn create_metadatas(&self) -> Vec<MetadataV3> {
        self.codecs
            .iter()
            .map(|codec| codec.create_metadata())
            .collect()
    }

    /// Returns the codecs in the chain.
    #[must_use]
    pub fn codecs(&self) -> &[Codec] {
        &self.codecs
    }

    /// Encode chunk bytes, applying each codec in order.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if a codec fails.
    pub fn encode(&self, decoded_value: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        self.codecs
            .iter()
            .try_fold(decoded_value, |value, codec| codec.encode(value))
    }

    /// Decode chunk bytes into `decoded_size` bytes, applying each codec in reverse order.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if a codec fails.
    pub fn decode(&self, encoded_value: Vec<u8>, decoded_size: usize) -> Result<Vec<u8>, CodecError> {
        let Some((first, rest)) = self.codecs.split_first() else {
            return Ok(encoded_value);
        };
        let value = rest
            .iter()
            .rev()
            .try_fold(encoded_value, |value, codec| codec.decode(value, None))?;
        first.decode(value, Some(decoded_size))
    }
}
