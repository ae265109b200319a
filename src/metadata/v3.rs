//! Zarr V3 metadata.

/// Zarr V3 group metadata.
mod group;

/// Zarr V3 array metadata.
mod array;

/// Zarr V3 codec metadata.
pub mod codec {
    /// `gzip` codec metadata.
    pub mod gzip;
    /// `identity` codec metadata.
    pub mod identity;
}

/// Zarr V3 chunk grid metadata.
pub mod chunk_grid {
    /// `regular` chunk grid metadata.
    pub mod regular;
}

/// Zarr V3 chunk key encoding metadata.
pub mod chunk_key_encoding {
    /// `default` chunk key encoding metadata.
    pub mod default;
    /// `v2` chunk key encoding metadata.
    pub mod v2;
}

mod fill_value;
mod metadata;

pub use array::ArrayMetadataV3;
pub use fill_value::FillValueMetadata;
pub use group::GroupMetadataV3;
pub use metadata::{ConfigurationInvalidError, MetadataConfiguration, MetadataV3};

pub use crate::array::ChunkKeySeparator;
