//! The node-level error type.
//!
//! Every [`Array`](crate::array::Array), [`Group`](crate::group::Group) and [`Node`](crate::node::Node) operation fails with a [`ZarrError`].
//! Lower level errors ([`StorageError`], [`CodecError`], [`NodePathError`], ...) are mapped into its closed set of kinds.

use thiserror::Error;

use crate::{
    array::codec::CodecError,
    node::NodePathError,
    plugin::PluginCreateError,
    storage::{StorageError, StoreKeyError, StorePrefixError},
};

/// A Zarr error.
#[derive(Debug, Error)]
pub enum ZarrError {
    /// A required metadata field is absent.
    #[error("missing metadata field `{0}`")]
    MissingMetadata(String),
    /// The metadata describes a different kind of node.
    #[error("invalid node type `{found}`, expected `{expected}`")]
    #[allow(missing_docs)]
    InvalidNodeType { expected: String, found: String },
    /// A codec name is not in the codec registry.
    #[error("unsupported codec `{0}`")]
    UnsupportedCodec(String),
    /// The metadata is semantically invalid.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    /// The node path is invalid, or has no (or conflicting) metadata.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// The chunk does not exist.
    #[error("chunk not found: {0}")]
    ChunkNotFound(String),
    /// An error encoding metadata or elements.
    #[error("encoding error: {0}")]
    EncodingError(String),
    /// An error decoding metadata or elements.
    #[error("decoding error: {0}")]
    DecodingError(String),
    /// An unknown data type, or a data type that cannot be stored in chunks.
    #[error("unsupported data type `{0}`")]
    UnsupportedDataType(String),
    /// Incompatible dimensionality or length.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// A backend failure.
    #[error(transparent)]
    StoreIOError(StorageError),
    /// A codec failure.
    #[error(transparent)]
    CodecError(CodecError),
    /// The store does not support the operation, e.g. a write to a read-only store.
    #[error(transparent)]
    UnsupportedStoreOperation(StorageError),
    /// The fill value is incompatible with the data type.
    #[error("invalid fill value: {0}")]
    InvalidFillValue(String),
}

impl From<StorageError> for ZarrError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unsupported(_) => Self::UnsupportedStoreOperation(err),
            err => Self::StoreIOError(err),
        }
    }
}

impl From<CodecError> for ZarrError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Unsupported { name } => Self::UnsupportedCodec(name),
            err => Self::CodecError(err),
        }
    }
}

impl From<NodePathError> for ZarrError {
    fn from(err: NodePathError) -> Self {
        Self::InvalidPath(err.to_string())
    }
}

impl From<StoreKeyError> for ZarrError {
    fn from(err: StoreKeyError) -> Self {
        Self::InvalidPath(err.to_string())
    }
}

impl From<StorePrefixError> for ZarrError {
    fn from(err: StorePrefixError) -> Self {
        Self::InvalidPath(err.to_string())
    }
}

impl From<PluginCreateError> for ZarrError {
    fn from(err: PluginCreateError) -> Self {
        Self::InvalidMetadata(err.to_string())
    }
}
