//! Zarr metadata.
//!
//! Node metadata is stored as a `zarr.json` document in [canonical form](to_canonical_json): keys sorted and pretty printed.
//! Writing logically identical metadata twice produces identical bytes.
//!
//! Decoding validates the document before it is converted to [`ArrayMetadataV3`] or [`GroupMetadataV3`] so that failures map to precise [`ZarrError`] kinds:
//!  - invalid JSON is a [`DecodingError`](ZarrError::DecodingError),
//!  - an absent required field is [`MissingMetadata`](ZarrError::MissingMetadata),
//!  - a `node_type` other than the one requested is [`InvalidNodeType`](ZarrError::InvalidNodeType),
//!  - an unknown `data_type` is [`UnsupportedDataType`](ZarrError::UnsupportedDataType), and
//!  - anything else that does not conform is [`InvalidMetadata`](ZarrError::InvalidMetadata).

pub mod v3;

use serde::Serialize;
use serde_json::{Map, Value};

pub use v3::{
    ArrayMetadataV3, ConfigurationInvalidError, FillValueMetadata, GroupMetadataV3,
    MetadataConfiguration, MetadataV3,
};

use crate::{
    array::DataType,
    error::ZarrError,
    node::{NodePath, NodeType},
    storage::{
        meta_key, ReadableStorageTraits, ReadableWritableStorageTraits, WritableStorageTraits,
    },
};

#[cfg(feature = "async")]
use crate::storage::{
    AsyncReadableStorageTraits, AsyncReadableWritableStorageTraits, AsyncWritableStorageTraits,
};

const ARRAY_REQUIRED_FIELDS: [&str; 6] = [
    "shape",
    "data_type",
    "chunk_grid",
    "chunk_key_encoding",
    "fill_value",
    "codecs",
];

/// Serialize metadata to its canonical JSON form.
///
/// # Errors
/// Returns [`ZarrError::EncodingError`] if `metadata` cannot be serialized.
pub fn to_canonical_json<T: Serialize>(metadata: &T) -> Result<Vec<u8>, ZarrError> {
    // Value maps are ordered by key
    let value =
        serde_json::to_value(metadata).map_err(|err| ZarrError::EncodingError(err.to_string()))?;
    serde_json::to_vec_pretty(&value).map_err(|err| ZarrError::EncodingError(err.to_string()))
}

/// A parsed `zarr.json` document with a valid `zarr_format` and a `node_type`.
pub(crate) struct MetadataDocument {
    document: Map<String, Value>,
    node_type: NodeType,
}

impl MetadataDocument {
    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self, ZarrError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|err| ZarrError::DecodingError(err.to_string()))?;
        let Value::Object(document) = value else {
            return Err(ZarrError::InvalidMetadata(
                "the metadata document is not a JSON object".to_string(),
            ));
        };

        match document.get("zarr_format") {
            None => return Err(ZarrError::MissingMetadata("zarr_format".to_string())),
            Some(zarr_format) if zarr_format.as_u64() != Some(3) => {
                return Err(ZarrError::InvalidMetadata(format!(
                    "unsupported zarr_format {zarr_format}, expected 3"
                )));
            }
            Some(_) => {}
        }

        let node_type = match document.get("node_type") {
            None => return Err(ZarrError::MissingMetadata("node_type".to_string())),
            Some(Value::String(node_type)) if node_type == "array" => NodeType::Array,
            Some(Value::String(node_type)) if node_type == "group" => NodeType::Group,
            Some(node_type) => {
                return Err(ZarrError::InvalidNodeType {
                    expected: "array or group".to_string(),
                    found: node_type.to_string(),
                })
            }
        };

        Ok(Self {
            document,
            node_type,
        })
    }

    pub(crate) fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn expect_node_type(&self, expected: NodeType) -> Result<(), ZarrError> {
        if self.node_type == expected {
            Ok(())
        } else {
            Err(ZarrError::InvalidNodeType {
                expected: expected.to_string(),
                found: self.node_type.to_string(),
            })
        }
    }

    pub(crate) fn into_array_metadata(self) -> Result<ArrayMetadataV3, ZarrError> {
        self.expect_node_type(NodeType::Array)?;
        for field in ARRAY_REQUIRED_FIELDS {
            if !self.document.contains_key(field) {
                return Err(ZarrError::MissingMetadata(field.to_string()));
            }
        }
        if let Some(Value::String(data_type)) = self.document.get("data_type") {
            DataType::from_name(data_type)?;
        }
        serde_json::from_value(Value::Object(self.document))
            .map_err(|err| ZarrError::InvalidMetadata(err.to_string()))
    }

    pub(crate) fn into_group_metadata(self) -> Result<GroupMetadataV3, ZarrError> {
        self.expect_node_type(NodeType::Group)?;
        serde_json::from_value(Value::Object(self.document))
            .map_err(|err| ZarrError::InvalidMetadata(err.to_string()))
    }
}

/// Decode array metadata from a `zarr.json` document.
///
/// # Errors
/// Returns a [`ZarrError`] if the document is not valid array metadata.
pub fn array_metadata_from_json(bytes: &[u8]) -> Result<ArrayMetadataV3, ZarrError> {
    MetadataDocument::from_json(bytes)?.into_array_metadata()
}

/// Decode group metadata from a `zarr.json` document.
///
/// # Errors
/// Returns a [`ZarrError`] if the document is not valid group metadata.
pub fn group_metadata_from_json(bytes: &[u8]) -> Result<GroupMetadataV3, ZarrError> {
    MetadataDocument::from_json(bytes)?.into_group_metadata()
}

fn metadata_not_found(path: &NodePath) -> ZarrError {
    ZarrError::InvalidPath(format!("metadata not found at {}", meta_key(path)))
}

fn metadata_exists(path: &NodePath) -> ZarrError {
    ZarrError::InvalidPath(format!("metadata already exists at {}", meta_key(path)))
}

/// Read and parse the `zarr.json` document of the node at `path`.
pub(crate) fn retrieve_metadata_document<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<MetadataDocument, ZarrError> {
    let bytes = storage
        .get(&meta_key(path))?
        .ok_or_else(|| metadata_not_found(path))?;
    MetadataDocument::from_json(&bytes)
}

/// Write the `zarr.json` document of the node at `path`, overwriting any existing document.
pub(crate) fn store_metadata_document<TStorage: ?Sized + WritableStorageTraits, T: Serialize>(
    storage: &TStorage,
    path: &NodePath,
    metadata: &T,
) -> Result<(), ZarrError> {
    let json = to_canonical_json(metadata)?;
    storage.set(&meta_key(path), json.into())?;
    Ok(())
}

/// Write the `zarr.json` document of the node at `path` only if there is none.
pub(crate) fn create_metadata_document<
    TStorage: ?Sized + ReadableWritableStorageTraits,
    T: Serialize,
>(
    storage: &TStorage,
    path: &NodePath,
    metadata: &T,
) -> Result<(), ZarrError> {
    let json = to_canonical_json(metadata)?;
    if storage.set_if_absent(&meta_key(path), json.into())? {
        Ok(())
    } else {
        Err(metadata_exists(path))
    }
}

#[cfg(feature = "async")]
pub(crate) async fn async_retrieve_metadata_document<
    TStorage: ?Sized + AsyncReadableStorageTraits,
>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<MetadataDocument, ZarrError> {
    let bytes = storage
        .get(&meta_key(path))
        .await?
        .ok_or_else(|| metadata_not_found(path))?;
    MetadataDocument::from_json(&bytes)
}

#[cfg(feature = "async")]
pub(crate) async fn async_store_metadata_document<
    TStorage: ?Sized + AsyncWritableStorageTraits,
    T: Serialize,
>(
    storage: &TStorage,
    path: &NodePath,
    metadata: &T,
) -> Result<(), ZarrError> {
    let json = to_canonical_json(metadata)?;
    storage.set(&meta_key(path), json.into()).await?;
    Ok(())
}

#[cfg(feature = "async")]
pub(crate) async fn async_create_metadata_document<
    TStorage: ?Sized + AsyncReadableWritableStorageTraits,
    T: Serialize,
>(
    storage: &TStorage,
    path: &NodePath,
    metadata: &T,
) -> Result<(), ZarrError> {
    let json = to_canonical_json(metadata)?;
    if storage.set_if_absent(&meta_key(path), json.into()).await? {
        Ok(())
    } else {
        Err(metadata_exists(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    const ARRAY_JSON: &str = r#"{
        "zarr_format": 3,
        "node_type": "array",
        "shape": [10, 10],
        "data_type": "float32",
        "chunk_grid": {"name": "regular", "configuration": {"chunk_shape": [5, 5]}},
        "chunk_key_encoding": {"name": "default", "configuration": {"separator": "/"}},
        "fill_value": "NaN",
        "codecs": [{"name": "gzip", "configuration": {"level": 1}}],
        "attributes": {"b": 1, "a": [1, 2]},
        "dimension_names": ["y", null]
    }"#;

    #[test]
    fn array_metadata_round_trip() -> Result<(), Box<dyn Error>> {
        let metadata = array_metadata_from_json(ARRAY_JSON.as_bytes())?;
        assert_eq!(metadata.shape, vec![10, 10]);
        assert_eq!(metadata.data_type, DataType::Float32);
        assert_eq!(metadata.fill_value, FillValueMetadata::String("NaN".to_string()));
        assert_eq!(
            metadata.dimension_names,
            Some(vec![Some("y".to_string()), None])
        );

        let json = to_canonical_json(&metadata)?;
        assert_eq!(array_metadata_from_json(&json)?, metadata);
        Ok(())
    }

    #[test]
    fn canonical_json_is_stable() -> Result<(), Box<dyn Error>> {
        let metadata = array_metadata_from_json(ARRAY_JSON.as_bytes())?;
        let json = to_canonical_json(&metadata)?;
        let reencoded = to_canonical_json(&array_metadata_from_json(&json)?)?;
        assert_eq!(json, reencoded);

        let json = String::from_utf8(json)?;
        let attributes = json.find(r#""attributes""#).ok_or("attributes")?;
        let zarr_format = json.find(r#""zarr_format""#).ok_or("zarr_format")?;
        let a = json.find(r#""a""#).ok_or("a")?;
        let b = json.find(r#""b""#).ok_or("b")?;
        assert!(attributes < zarr_format);
        assert!(a < b);
        Ok(())
    }

    #[test]
    fn group_metadata_round_trip() -> Result<(), Box<dyn Error>> {
        let mut attributes = serde_json::Map::new();
        attributes.insert("spam".to_string(), "ham".into());
        let metadata = GroupMetadataV3::new(attributes);
        let json = to_canonical_json(&metadata)?;
        assert_eq!(group_metadata_from_json(&json)?, metadata);

        let empty = to_canonical_json(&GroupMetadataV3::default())?;
        assert_eq!(
            serde_json::from_slice::<Value>(&empty)?,
            serde_json::json!({"zarr_format": 3, "node_type": "group"})
        );
        Ok(())
    }

    #[test]
    fn metadata_errors() {
        assert!(matches!(
            group_metadata_from_json(b"{"),
            Err(ZarrError::DecodingError(_))
        ));
        assert!(matches!(
            group_metadata_from_json(br#"{"node_type": "group"}"#),
            Err(ZarrError::MissingMetadata(field)) if field == "zarr_format"
        ));
        assert!(matches!(
            group_metadata_from_json(br#"{"zarr_format": 2, "node_type": "group"}"#),
            Err(ZarrError::InvalidMetadata(_))
        ));
        assert!(matches!(
            group_metadata_from_json(br#"{"zarr_format": 3}"#),
            Err(ZarrError::MissingMetadata(field)) if field == "node_type"
        ));
        assert!(matches!(
            group_metadata_from_json(br#"{"zarr_format": 3, "node_type": "thing"}"#),
            Err(ZarrError::InvalidNodeType { .. })
        ));
        assert!(matches!(
            array_metadata_from_json(br#"{"zarr_format": 3, "node_type": "group"}"#),
            Err(ZarrError::InvalidNodeType { .. })
        ));
        assert!(matches!(
            array_metadata_from_json(br#"{"zarr_format": 3, "node_type": "array", "shape": [1]}"#),
            Err(ZarrError::MissingMetadata(field)) if field == "data_type"
        ));
    }

    #[test]
    fn array_metadata_unsupported_data_type() {
        let json = ARRAY_JSON.replace(r#""float32""#, r#""float17""#);
        assert!(matches!(
            array_metadata_from_json(json.as_bytes()),
            Err(ZarrError::UnsupportedDataType(_))
        ));
        let json = ARRAY_JSON.replace(r#""shape": [10, 10]"#, r#""shape": [-1, 10]"#);
        assert!(matches!(
            array_metadata_from_json(json.as_bytes()),
            Err(ZarrError::InvalidMetadata(_))
        ));
    }
}
