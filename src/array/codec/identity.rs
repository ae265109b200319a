//! The `identity` codec.
//!
//! Passes bytes through unchanged.

use crate::{
    metadata::v3::{codec::identity, MetadataV3},
    plugin::{PluginCreateError, PluginMetadataInvalidError},
};

use super::{Codec, CodecError, CodecTraits};

pub(super) use identity::IDENTIFIER;

pub(super) fn is_name_identity(name: &str) -> bool {
    name.eq(IDENTIFIER)
}

pub(super) fn create_codec_identity(metadata: &MetadataV3) -> Result<Codec, PluginCreateError> {
    if metadata.configuration().is_some() {
        return Err(
            PluginMetadataInvalidError::new(IDENTIFIER, "codec", metadata.clone()).into(),
        );
    }
    Ok(std::sync::Arc::new(IdentityCodec))
}

/// An `identity` codec implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityCodec;

impl IdentityCodec {
    /// Create a new `identity` codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CodecTraits for IdentityCodec {
    fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    fn create_metadata(&self) -> MetadataV3 {
        MetadataV3::new(IDENTIFIER)
    }

    fn encode(&self, decoded_value: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        Ok(decoded_value)
    }

    fn decode(
        &self,
        encoded_value: Vec<u8>,
        _decoded_size: Option<usize>,
    ) -> Result<Vec<u8>, CodecError> {
        Ok(encoded_value)
    }
}
