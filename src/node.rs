//! Zarr nodes.
//!
//! A node in a Zarr hierarchy represents either an [`Array`](crate::array::Array) or a [`Group`](crate::group::Group).
//!
//! A [`Node`] has an associated [`NodePath`], [`NodeMetadata`], and children.
//! [`Node::open`] reads the `zarr.json` document of a node and dispatches on its `node_type`.
//!
//! The [`Node::hierarchy_tree`] function can be used to create a string representation of a the hierarchy below a node.

mod node_metadata;
mod node_path;

pub use node_metadata::NodeMetadata;
pub use node_path::{NodePath, NodePathError};

use derive_more::Display;

use crate::{
    array::validate_array_metadata,
    error::ZarrError,
    metadata::retrieve_metadata_document,
    storage::{ListableStorageTraits, ReadableStorageTraits, StorePrefix},
};

/// The type of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum NodeType {
    /// An array.
    #[display("array")]
    Array,
    /// A group.
    #[display("group")]
    Group,
}

/// A Zarr hierarchy node.
///
/// See <https://zarr-specs.readthedocs.io/en/latest/v3/core/v3.0.html#hierarchy>.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node path.
    path: NodePath,
    /// Node metadata.
    metadata: NodeMetadata,
    /// Node children.
    ///
    /// Only group nodes can have children.
    children: Vec<Node>,
}

impl Node {
    /// Create a new node at `path` with `metadata` and `children`.
    #[must_use]
    pub fn new(path: NodePath, metadata: NodeMetadata, children: Vec<Node>) -> Self {
        Self {
            path,
            metadata,
            children,
        }
    }

    /// Open the node at `path` by reading its metadata from `storage`.
    ///
    /// Children are not read, see [`Node::open_hierarchy`].
    ///
    /// # Errors
    /// Returns [`ZarrError::InvalidPath`] if there is no metadata at `path`, or another [`ZarrError`] if the metadata is invalid or cannot be read.
    /// Array metadata is validated as by [`Array::open`](crate::array::Array::open).
    pub fn open<TStorage: ?Sized + ReadableStorageTraits>(
        storage: &TStorage,
        path: &str,
    ) -> Result<Self, ZarrError> {
        let path: NodePath = path.try_into()?;
        let document = retrieve_metadata_document(storage, &path)?;
        let metadata = match document.node_type() {
            NodeType::Array => {
                let metadata = document.into_array_metadata()?;
                validate_array_metadata(&metadata)?;
                NodeMetadata::Array(metadata)
            }
            NodeType::Group => NodeMetadata::Group(document.into_group_metadata()?),
        };
        Ok(Self::new(path, metadata, Vec::new()))
    }

    /// Open the node at `path` and, if it is a group, every node below it.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if any node cannot be opened, or listing fails.
    pub fn open_hierarchy<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &str,
    ) -> Result<Self, ZarrError> {
        let mut node = Self::open(storage, path)?;
        if node.node_type() == NodeType::Group {
            node.children = Self::child_paths(storage, &node.path)?
                .iter()
                .map(|child| Self::open_hierarchy(storage, child.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
        }
        Ok(node)
    }

    /// Returns the paths of the direct children of the node at `path`, sorted.
    ///
    /// A child is any `<name>/zarr.json` key directly under the node.
    ///
    /// # Errors
    /// Returns a [`ZarrError`] if listing fails.
    pub fn child_paths<TStorage: ?Sized + ListableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Vec<NodePath>, ZarrError> {
        let prefix = StorePrefix::try_from(path)?;
        let mut children = storage
            .list_prefix(&prefix)?
            .iter()
            .filter_map(|key| {
                let name = key
                    .as_str()
                    .strip_prefix(prefix.as_str())?
                    .strip_suffix("/zarr.json")?;
                (!name.is_empty() && !name.contains('/')).then(|| path.child(name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        children.sort();
        Ok(children)
    }

    /// Indicates if a node is the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// Returns the name of the node.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// Returns the path of the node.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Returns the metadata of the node.
    #[must_use]
    pub const fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Returns the type of the node.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.metadata.node_type()
    }

    /// Returns the children of the node.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Return a tree representation of a hierarchy as a string.
    ///
    /// Arrays are annotated with their shape and data type.
    /// For example:
    /// ```text
    /// /
    ///   a
    ///     baz [10000, 1000] float64
    ///     foo [10000, 1000] float64
    ///   b
    /// ```
    #[must_use]
    pub fn hierarchy_tree(&self) -> String {
        fn print_metadata(name: &str, string: &mut String, metadata: &NodeMetadata) {
            match metadata {
                NodeMetadata::Array(array_metadata) => {
                    let s = format!(
                        "{} {:?} {}",
                        name, array_metadata.shape, array_metadata.data_type
                    );
                    string.push_str(&s);
                }
                NodeMetadata::Group(_) => {
                    string.push_str(name);
                }
            };
            string.push('\n');
        }

        fn update_tree(string: &mut String, children: &[Node], depth: usize) {
            for child in children {
                string.push_str(&" ".repeat(depth * 2));
                print_metadata(child.name(), string, &child.metadata);
                update_tree(string, &child.children, depth + 1);
            }
        }

        let mut string = String::default();
        print_metadata(self.path.as_str(), &mut string, &self.metadata);
        update_tree(&mut string, &self.children, 1);
        string
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::storage::{store::MemoryStore, Bytes, StoreKey, WritableStorageTraits};

    use super::*;

    const JSON_ARRAY: &str = r#"{
        "zarr_format": 3,
        "node_type": "array",
        "shape": [10000, 1000],
        "data_type": "float64",
        "chunk_grid": {
            "name": "regular",
            "configuration": {"chunk_shape": [1000, 100]}
        },
        "chunk_key_encoding": {
            "name": "default",
            "configuration": {"separator": "/"}
        },
        "fill_value": "NaN",
        "codecs": [{"name": "identity"}],
        "attributes": {"foo": 42},
        "dimension_names": ["rows", "columns"]
    }"#;

    const JSON_GROUP: &str = r#"{
        "zarr_format": 3,
        "node_type": "group",
        "attributes": {"spam": "ham", "eggs": 42}
    }"#;

    fn set(store: &MemoryStore, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        store.set(&StoreKey::new(key)?, Bytes::copy_from_slice(value.as_bytes()))?;
        Ok(())
    }

    #[test]
    fn node_open() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        set(&store, "zarr.json", JSON_GROUP)?;
        set(&store, "a/zarr.json", JSON_ARRAY)?;

        let root = Node::open(&store, "/")?;
        assert_eq!(root.node_type(), NodeType::Group);
        assert_eq!(root.metadata().attributes()["eggs"], 42);
        let array = Node::open(&store, "/a")?;
        assert_eq!(array.node_type(), NodeType::Array);
        assert_eq!(array.name(), "a");
        assert!(matches!(
            Node::open(&store, "/b"),
            Err(ZarrError::InvalidPath(_))
        ));
        Ok(())
    }

    #[test]
    fn node_hierarchy() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        set(&store, "zarr.json", JSON_GROUP)?;
        set(&store, "b/zarr.json", JSON_GROUP)?;
        set(&store, "b/c/zarr.json", JSON_ARRAY)?;
        set(&store, "a/zarr.json", JSON_ARRAY)?;
        set(&store, "a/0/0", "chunk")?;

        assert_eq!(
            Node::child_paths(&store, &NodePath::root())?,
            vec![NodePath::new("/a")?, NodePath::new("/b")?]
        );
        assert_eq!(
            Node::child_paths(&store, &NodePath::new("/b")?)?,
            vec![NodePath::new("/b/c")?]
        );
        assert!(Node::child_paths(&store, &NodePath::new("/a")?)?.is_empty());

        let root = Node::open_hierarchy(&store, "/")?;
        assert_eq!(root.children().len(), 2);
        assert_eq!(
            root.hierarchy_tree(),
            "/\n  a [10000, 1000] float64\n  b\n    c [10000, 1000] float64\n"
        );
        Ok(())
    }

    #[test]
    fn node_open_invalid_array() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        set(
            &store,
            "a/zarr.json",
            &JSON_ARRAY.replace("[1000, 100]", "[1000, 100, 10]"),
        )?;
        assert!(matches!(
            Node::open(&store, "/a"),
            Err(ZarrError::InvalidMetadata(_))
        ));
        set(
            &store,
            "b/zarr.json",
            &JSON_ARRAY.replace(r#"{"name": "identity"}"#, r#"{"name": "blosc"}"#),
        )?;
        assert!(matches!(
            Node::open(&store, "/b"),
            Err(ZarrError::UnsupportedCodec(_))
        ));
        Ok(())
    }

    #[test]
    fn node_invalid_node_type() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        set(&store, "zarr.json", r#"{"zarr_format": 3, "node_type": "other"}"#)?;
        assert!(matches!(
            Node::open(&store, "/"),
            Err(ZarrError::InvalidNodeType { .. })
        ));
        Ok(())
    }
}
