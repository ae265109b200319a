//! Zarr chunk key encodings. Includes a [default](default::DefaultChunkKeyEncoding) and [v2](v2::V2ChunkKeyEncoding) implementation.
//!
//! See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#chunk-key-encoding>.
//!
//! A chunk key encoding maps chunk grid indices to the suffix of a store key under the path of an array.
//! The full key is formed by [`data_key`](crate::storage::data_key).

pub mod default;
pub mod v2;

pub use default::DefaultChunkKeyEncoding;
pub use v2::V2ChunkKeyEncoding;

use std::sync::Arc;

use derive_more::{Deref, Display};

use crate::{
    metadata::v3::{MetadataConfiguration, MetadataV3},
    plugin::{create_from_registry, Plugin, PluginCreateError},
};

/// A chunk key encoding.
#[derive(Debug, Clone, Deref)]
pub struct ChunkKeyEncoding(Arc<dyn ChunkKeyEncodingTraits>);

/// A chunk key encoding plugin.
pub type ChunkKeyEncodingPlugin = Plugin<ChunkKeyEncoding>;

static CHUNK_KEY_ENCODING_PLUGINS: &[ChunkKeyEncodingPlugin] = &[
    ChunkKeyEncodingPlugin::new(
        default::IDENTIFIER,
        default::is_name_default,
        default::create_chunk_key_encoding_default,
    ),
    ChunkKeyEncodingPlugin::new(
        v2::IDENTIFIER,
        v2::is_name_v2,
        v2::create_chunk_key_encoding_v2,
    ),
];

impl ChunkKeyEncoding {
    /// Create a chunk key encoding.
    pub fn new<T: ChunkKeyEncodingTraits + 'static>(chunk_key_encoding: T) -> Self {
        Self(Arc::new(chunk_key_encoding))
    }

    /// Create a chunk key encoding from metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PluginCreateError`] if the metadata is invalid or does not name a supported chunk key encoding.
    pub fn from_metadata(metadata: &MetadataV3) -> Result<Self, PluginCreateError> {
        create_from_registry(CHUNK_KEY_ENCODING_PLUGINS, "chunk key encoding", metadata)
    }
}

impl<T> From<T> for ChunkKeyEncoding
where
    T: ChunkKeyEncodingTraits + 'static,
{
    fn from(chunk_key_encoding: T) -> Self {
        Self::new(chunk_key_encoding)
    }
}

/// Chunk key encoding traits.
pub trait ChunkKeyEncodingTraits: core::fmt::Debug + Send + Sync {
    /// Create the metadata of this chunk key encoding.
    fn create_metadata(&self) -> MetadataV3;

    /// Encode chunk grid indices (grid cell coordinates) into the chunk key.
    fn encode(&self, chunk_grid_indices: &[u64]) -> String;
}

/// A chunk key separator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum ChunkKeySeparator {
    /// The slash '/' character.
    #[display("/")]
    Slash,
    /// The dot '.' character.
    #[display(".")]
    Dot,
}

impl TryFrom<char> for ChunkKeySeparator {
    type Error = char;

    fn try_from(separator: char) -> Result<Self, Self::Error> {
        match separator {
            '/' => Ok(Self::Slash),
            '.' => Ok(Self::Dot),
            _ => Err(separator),
        }
    }
}

impl serde::Serialize for ChunkKeySeparator {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Slash => s.serialize_char('/'),
            Self::Dot => s.serialize_char('.'),
        }
    }
}

impl<'de> serde::Deserialize<'de> for ChunkKeySeparator {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(d)?;
        if let serde_json::Value::String(separator) = value {
            if separator == "/" {
                return Ok(Self::Slash);
            } else if separator == "." {
                return Ok(Self::Dot);
            }
        }
        Err(serde::de::Error::custom(
            "chunk key separator must be a `.` or `/`.",
        ))
    }
}

/// Join chunk grid indices with a separator. Rank 0 indices encode as `0`.
fn join_indices(chunk_grid_indices: &[u64], separator: ChunkKeySeparator) -> String {
    if chunk_grid_indices.is_empty() {
        "0".to_string()
    } else {
        itertools::join(chunk_grid_indices, &separator.to_string())
    }
}

/// The `{"separator": ...}` configuration shared by the chunk key encodings.
fn separator_configuration(separator: ChunkKeySeparator) -> MetadataConfiguration {
    let mut configuration = MetadataConfiguration::new();
    configuration.insert("separator".to_string(), separator.to_string().into());
    configuration
}
