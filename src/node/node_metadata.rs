use crate::metadata::{to_canonical_json, ArrayMetadataV3, GroupMetadataV3};
use crate::error::ZarrError;

use super::NodeType;

/// Node metadata ([`ArrayMetadataV3`] or [`GroupMetadataV3`]).
#[derive(serde::Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum NodeMetadata {
    /// Array metadata.
    Array(ArrayMetadataV3),

    /// Group metadata.
    Group(GroupMetadataV3),
}

impl NodeMetadata {
    /// Returns the type of the node described by the metadata.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Array(_) => NodeType::Array,
            Self::Group(_) => NodeType::Group,
        }
    }

    /// Returns the user defined attributes.
    #[must_use]
    pub fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        match self {
            Self::Array(metadata) => &metadata.attributes,
            Self::Group(metadata) => &metadata.attributes,
        }
    }

    /// Serialize the metadata to its canonical JSON form.
    ///
    /// # Errors
    /// Returns [`ZarrError::EncodingError`] if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, ZarrError> {
        to_canonical_json(self)
    }
}

impl From<ArrayMetadataV3> for NodeMetadata {
    fn from(metadata: ArrayMetadataV3) -> Self {
        Self::Array(metadata)
    }
}

impl From<GroupMetadataV3> for NodeMetadata {
    fn from(metadata: GroupMetadataV3) -> Self {
        Self::Group(metadata)
    }
}
