//! The default chunk key encoding.

use crate::{
    metadata::v3::{chunk_key_encoding::default, MetadataV3},
    plugin::{PluginCreateError, PluginMetadataInvalidError},
};

use super::{
    join_indices, separator_configuration, ChunkKeyEncoding, ChunkKeyEncodingTraits,
    ChunkKeySeparator,
};

pub use default::{DefaultChunkKeyEncodingConfiguration, IDENTIFIER};

pub(super) fn is_name_default(name: &str) -> bool {
    name.eq(IDENTIFIER)
}

pub(super) fn create_chunk_key_encoding_default(
    metadata: &MetadataV3,
) -> Result<ChunkKeyEncoding, PluginCreateError> {
    let configuration: DefaultChunkKeyEncodingConfiguration =
        metadata.to_configuration().map_err(|_| {
            PluginMetadataInvalidError::new(IDENTIFIER, "chunk key encoding", metadata.clone())
        })?;
    let default = DefaultChunkKeyEncoding::new(configuration.separator);
    Ok(ChunkKeyEncoding::new(default))
}

/// A `default` chunk key encoding.
///
/// The key for a chunk with grid index (k, j, i, ...) is the ASCII decimal representation of each index joined by the separator, e.g. `1/23/45`.
/// The key of the single chunk of a rank 0 array is `0`.
#[derive(Debug, Clone)]
pub struct DefaultChunkKeyEncoding {
    separator: ChunkKeySeparator,
}

impl DefaultChunkKeyEncoding {
    /// Create a new `default` chunk key encoding with separator `separator`.
    #[must_use]
    pub const fn new(separator: ChunkKeySeparator) -> Self {
        Self { separator }
    }

    /// Create a new `default` chunk key encoding with separator `.`.
    #[must_use]
    pub const fn new_dot() -> Self {
        Self::new(ChunkKeySeparator::Dot)
    }

    /// Create a new `default` chunk key encoding with separator `/`.
    #[must_use]
    pub const fn new_slash() -> Self {
        Self::new(ChunkKeySeparator::Slash)
    }
}

impl Default for DefaultChunkKeyEncoding {
    /// Create a `default` chunk key encoding with default separator: `/`.
    fn default() -> Self {
        Self::new_slash()
    }
}

impl ChunkKeyEncodingTraits for DefaultChunkKeyEncoding {
    fn create_metadata(&self) -> MetadataV3 {
        MetadataV3::new_with_configuration(IDENTIFIER, separator_configuration(self.separator))
    }

    fn encode(&self, chunk_grid_indices: &[u64]) -> String {
        join_indices(chunk_grid_indices, self.separator)
    }
}

#[cfg(test)]
mod tests {
    use crate::{node::NodePath, storage::data_key, storage::StoreKey};

    use super::*;

    #[test]
    fn slash_nd() {
        let key = data_key(
            &NodePath::root(),
            &[1, 23, 45],
            &DefaultChunkKeyEncoding::new_slash().into(),
        );
        assert_eq!(key.unwrap(), StoreKey::new("1/23/45").unwrap());
    }

    #[test]
    fn dot_nd() {
        let key = data_key(
            &NodePath::root(),
            &[1, 23, 45],
            &DefaultChunkKeyEncoding::new_dot().into(),
        );
        assert_eq!(key.unwrap(), StoreKey::new("1.23.45").unwrap());
    }

    #[test]
    fn slash_scalar() {
        let key = data_key(
            &NodePath::root(),
            &[],
            &DefaultChunkKeyEncoding::new_slash().into(),
        );
        assert_eq!(key.unwrap(), StoreKey::new("0").unwrap());
    }

    #[test]
    fn default_metadata() {
        assert_eq!(
            serde_json::to_string(&DefaultChunkKeyEncoding::default().create_metadata()).unwrap(),
            r#"{"configuration":{"separator":"/"},"name":"default"}"#
        );
    }
}
