//! The v2 chunk key encoding.

use crate::{
    metadata::v3::{chunk_key_encoding::v2, MetadataV3},
    plugin::{PluginCreateError, PluginMetadataInvalidError},
};

use super::{
    join_indices, separator_configuration, ChunkKeyEncoding, ChunkKeyEncodingTraits,
    ChunkKeySeparator,
};

pub use v2::{V2ChunkKeyEncodingConfiguration, IDENTIFIER};

pub(super) fn is_name_v2(name: &str) -> bool {
    name.eq(IDENTIFIER)
}

pub(super) fn create_chunk_key_encoding_v2(
    metadata: &MetadataV3,
) -> Result<ChunkKeyEncoding, PluginCreateError> {
    let configuration: V2ChunkKeyEncodingConfiguration =
        metadata.to_configuration().map_err(|_| {
            PluginMetadataInvalidError::new(IDENTIFIER, "chunk key encoding", metadata.clone())
        })?;
    Ok(ChunkKeyEncoding::new(V2ChunkKeyEncoding::new(
        configuration.separator,
    )))
}

/// A `v2` chunk key encoding.
///
/// Identical to the `default` encoding except that the separator defaults to `.`.
#[derive(Debug, Clone)]
pub struct V2ChunkKeyEncoding {
    separator: ChunkKeySeparator,
}

impl V2ChunkKeyEncoding {
    /// Create a new `v2` chunk key encoding with separator `separator`.
    #[must_use]
    pub const fn new(separator: ChunkKeySeparator) -> Self {
        Self { separator }
    }
}

impl Default for V2ChunkKeyEncoding {
    /// Create a `v2` chunk key encoding with default separator: `.`.
    fn default() -> Self {
        Self::new(ChunkKeySeparator::Dot)
    }
}

impl ChunkKeyEncodingTraits for V2ChunkKeyEncoding {
    fn create_metadata(&self) -> MetadataV3 {
        MetadataV3::new_with_configuration(IDENTIFIER, separator_configuration(self.separator))
    }

    fn encode(&self, chunk_grid_indices: &[u64]) -> String {
        join_indices(chunk_grid_indices, self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v2_encode() {
        assert_eq!(V2ChunkKeyEncoding::default().encode(&[1, 23, 45]), "1.23.45");
        assert_eq!(
            V2ChunkKeyEncoding::new(ChunkKeySeparator::Slash).encode(&[1, 23, 45]),
            "1/23/45"
        );
        assert_eq!(V2ChunkKeyEncoding::default().encode(&[]), "0");
    }
}
