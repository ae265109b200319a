//! Zarr codecs.
//!
//! Array chunks are encoded using a sequence of codecs, each of which specifies a bidirectional transform (an encode transform and a decode transform).
//! Every codec maps bytes to bytes: encoding consumes the stored representation of one chunk and decoding restores it, to a caller supplied size where known.
//!
//! A [`CodecChain`] applies a codec sequence, encoding in declaration order and decoding in reverse.
//!
//! Codecs are created from metadata through a closed registry.
//! The supported codecs are:
//!  - `identity`: [`IdentityCodec`],
//!  - `gzip` (feature `gzip`): [`GzipCodec`].
//!
//! Any other codec name fails with [`CodecError::Unsupported`].
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#id18>.

mod codec_chain;
#[cfg(feature = "gzip")]
mod gzip;
mod identity;

pub use codec_chain::CodecChain;
#[cfg(feature = "gzip")]
pub use gzip::GzipCodec;
pub use identity::IdentityCodec;

use std::sync::Arc;

use thiserror::Error;

use crate::{
    metadata::v3::MetadataV3,
    plugin::{create_from_registry, Plugin, PluginCreateError},
};

/// A codec.
pub type Codec = Arc<dyn CodecTraits>;

/// A codec plugin.
pub type CodecPlugin = Plugin<Codec>;

static CODEC_PLUGINS: &[CodecPlugin] = &[
    CodecPlugin::new(
        identity::IDENTIFIER,
        identity::is_name_identity,
        identity::create_codec_identity,
    ),
    #[cfg(feature = "gzip")]
    CodecPlugin::new(gzip::IDENTIFIER, gzip::is_name_gzip, gzip::create_codec_gzip),
];

/// Create a codec from metadata.
///
/// # Errors
/// Returns [`CodecError::Unsupported`] if the metadata names an unsupported codec, or [`CodecError::InvalidConfiguration`] if its configuration is invalid.
pub fn codec_from_metadata(metadata: &MetadataV3) -> Result<Codec, CodecError> {
    Ok(create_from_registry(CODEC_PLUGINS, "codec", metadata)?)
}

/// Codec traits.
pub trait CodecTraits: core::fmt::Debug + Send + Sync {
    /// The codec name.
    fn identifier(&self) -> &'static str;

    /// Create the metadata of this codec.
    fn create_metadata(&self) -> MetadataV3;

    /// Encode chunk bytes.
    ///
    /// # Errors
    /// Returns [`CodecError`] if a codec fails.
    fn encode(&self, decoded_value: Vec<u8>) -> Result<Vec<u8>, CodecError>;

    /// Decode chunk bytes.
    ///
    /// `decoded_size` is the expected size of the decoded bytes if known.
    /// It is unknown for every codec of a [`CodecChain`] except the first, which restores the chunk itself.
    ///
    /// # Errors
    /// Returns [`CodecError`] if a codec fails or the decoded output is not `decoded_size` bytes long.
    fn decode(
        &self,
        encoded_value: Vec<u8>,
        decoded_size: Option<usize>,
    ) -> Result<Vec<u8>, CodecError>;
}

/// A codec error.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The codec name is not supported.
    #[error("codec {name} is not supported")]
    #[allow(missing_docs)]
    Unsupported { name: String },
    /// The codec configuration is invalid.
    #[error("invalid codec configuration: {0}")]
    InvalidConfiguration(String),
    /// The decoded size of a chunk did not match what was expected.
    #[error("the size of a decoded chunk is {actual}, expected {expected}")]
    #[allow(missing_docs)]
    UnexpectedDecodedSize { expected: usize, actual: usize },
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// Other
    #[error("{_0}")]
    Other(String),
}

impl From<PluginCreateError> for CodecError {
    fn from(err: PluginCreateError) -> Self {
        match err {
            PluginCreateError::Unsupported { name, .. } => Self::Unsupported { name },
            err => Self::InvalidConfiguration(err.to_string()),
        }
    }
}

impl From<&str> for CodecError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for CodecError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn codec_registry() -> Result<(), Box<dyn Error>> {
        let identity = codec_from_metadata(&MetadataV3::new("identity"))?;
        assert_eq!(identity.identifier(), "identity");
        assert!(matches!(
            codec_from_metadata(&MetadataV3::new("zstd")),
            Err(CodecError::Unsupported { name }) if name == "zstd"
        ));
        Ok(())
    }

    #[test]
    fn codec_round_trip_all() -> Result<(), Box<dyn Error>> {
        let metadatas: Vec<MetadataV3> = vec![
            MetadataV3::new("identity"),
            #[cfg(feature = "gzip")]
            serde_json::from_str(r#"{"name":"gzip","configuration":{"level":1}}"#)?,
        ];
        let inputs: [Vec<u8>; 3] = [vec![], vec![42], (0..=255).cycle().take(5000).collect()];
        for metadata in &metadatas {
            let codec = codec_from_metadata(metadata)?;
            assert_eq!(&codec.create_metadata(), metadata);
            for input in &inputs {
                let encoded = codec.encode(input.clone())?;
                assert_eq!(&codec.decode(encoded, Some(input.len()))?, input);
            }
        }
        Ok(())
    }
}
