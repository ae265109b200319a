//! A filesystem store.
//!
//! Keys map to relative paths under a base directory.

use crate::storage::{
    Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
    ReadableWritableStorageTraits, StorageError, StoreKey, StoreKeyError, StoreKeys, StorePrefix,
    WritableStorageTraits,
};

use itertools::Itertools;
use parking_lot::RwLock;
use thiserror::Error;
use walkdir::WalkDir;

use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// A synchronous file system store.
///
/// Reads share a store-wide lock, writes and deletes hold it exclusively.
#[derive(Debug)]
pub struct FilesystemStore {
    base_path: PathBuf,
    readonly: bool,
    lock: RwLock<()>,
}

impl FilesystemStore {
    /// Create a new file system store at a given `base_path`.
    ///
    /// The base directory is created if it does not exist.
    ///
    /// # Errors
    /// Returns a [`FilesystemStoreCreateError`] if `base_directory`:
    ///   - is not valid,
    ///   - points to an existing file rather than a directory, or
    ///   - cannot be created.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, FilesystemStoreCreateError> {
        let base_path = base_path.as_ref().to_path_buf();
        if base_path.to_str().is_none() || base_path.is_file() {
            return Err(FilesystemStoreCreateError::InvalidBasePath(base_path));
        }

        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)?;
        }
        let readonly = std::fs::metadata(&base_path)?.permissions().readonly();

        Ok(Self {
            base_path,
            readonly,
            lock: RwLock::default(),
        })
    }

    /// Returns the base path of the store.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Maps a [`StoreKey`] to a filesystem [`PathBuf`].
    #[must_use]
    pub fn key_to_fspath(&self, key: &StoreKey) -> PathBuf {
        let mut path = self.base_path.clone();
        path.extend(key.as_str().split('/'));
        path
    }

    /// Maps a filesystem [`PathBuf`] to a [`StoreKey`].
    fn fspath_to_key(&self, path: &Path) -> Result<StoreKey, StoreKeyError> {
        let path = pathdiff::diff_paths(path, &self.base_path)
            .ok_or_else(|| StoreKeyError::from(path.to_string_lossy().to_string()))?;
        StoreKey::new(
            path.components()
                .map(|component| component.as_os_str().to_string_lossy())
                .join("/"),
        )
    }

    /// Maps a store [`StorePrefix`] to a filesystem [`PathBuf`].
    #[must_use]
    pub fn prefix_to_fs_path(&self, prefix: &StorePrefix) -> PathBuf {
        let mut path = self.base_path.clone();
        path.extend(prefix.as_str().split('/').filter(|c| !c.is_empty()));
        path
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.readonly {
            Err(StorageError::Unsupported(format!(
                "the filesystem store at {} is read only",
                self.base_path.display()
            )))
        } else {
            Ok(())
        }
    }

    fn create_parent_dirs(key_path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = key_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl ReadableStorageTraits for FilesystemStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        let _lock = self.lock.read();
        let key_path = self.key_to_fspath(key);
        if key_path.is_dir() {
            return Ok(None);
        }
        match std::fs::read(key_path) {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        let _lock = self.lock.read();
        Ok(self.key_to_fspath(key).is_file())
    }
}

impl WritableStorageTraits for FilesystemStore {
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.check_writable()?;
        let _lock = self.lock.write();

        let key_path = self.key_to_fspath(key);
        Self::create_parent_dirs(&key_path)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(key_path)?;
        file.write_all(&value)?;
        Ok(())
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StorageError> {
        self.check_writable()?;
        let _lock = self.lock.write();

        match std::fs::remove_file(self.key_to_fspath(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl ReadableWritableStorageTraits for FilesystemStore {
    fn set_if_absent(&self, key: &StoreKey, value: Bytes) -> Result<bool, StorageError> {
        self.check_writable()?;
        let _lock = self.lock.write();

        let key_path = self.key_to_fspath(key);
        Self::create_parent_dirs(&key_path)?;
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(key_path);
        match file {
            Ok(mut file) => {
                file.write_all(&value)?;
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

impl ListableStorageTraits for FilesystemStore {
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let _lock = self.lock.read();
        let mut keys: StoreKeys = WalkDir::new(self.prefix_to_fs_path(prefix))
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|v| v.file_type().is_file())
            .filter_map(|v| self.fspath_to_key(v.path()).ok())
            .collect();
        // Directory walk order differs from key order, e.g. `a/b` sorts after `a.b`
        keys.sort();
        Ok(keys)
    }
}

/// A filesystem store creation error.
#[derive(Debug, Error)]
pub enum FilesystemStoreCreateError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// The path is not valid on this system.
    #[error("base path {0} is not valid")]
    InvalidBasePath(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    #[cfg_attr(miri, ignore)]
    fn filesystem() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path())?;
        super::super::test_util::store_write(&store)?;
        super::super::test_util::store_read(&store)?;
        super::super::test_util::store_list(&store)?;
        Ok(())
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn filesystem_reopen() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        {
            let store = FilesystemStore::new(path.path())?;
            store.set(&"x/y".try_into()?, Bytes::from_static(&[1, 2, 3]))?;
        }
        let store = FilesystemStore::new(path.path())?;
        assert_eq!(
            store.get(&"x/y".try_into()?)?,
            Some(Bytes::from_static(&[1, 2, 3]))
        );
        assert!(path.path().join("x").is_dir());
        Ok(())
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn filesystem_list_sorted() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path())?;
        store.set(&"b/c".try_into()?, Bytes::new())?;
        store.set(&"a".try_into()?, Bytes::new())?;
        assert_eq!(store.list()?, &["a".try_into()?, "b/c".try_into()?]);

        store.set(&"d/e".try_into()?, Bytes::new())?;
        store.set(&"d.f".try_into()?, Bytes::new())?;
        assert_eq!(
            store.list()?,
            &[
                "a".try_into()?,
                "b/c".try_into()?,
                "d.f".try_into()?,
                "d/e".try_into()?
            ]
        );
        Ok(())
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn filesystem_get_directory() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let store = FilesystemStore::new(path.path())?;
        store.set(&"a/b".try_into()?, Bytes::new())?;
        assert!(store.get(&"a".try_into()?)?.is_none());
        assert!(!store.exists(&"a".try_into()?)?);
        Ok(())
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn filesystem_invalid_base_path() -> Result<(), Box<dyn Error>> {
        let path = tempfile::TempDir::new()?;
        let file = path.path().join("file");
        std::fs::write(&file, [0])?;
        assert!(matches!(
            FilesystemStore::new(&file),
            Err(FilesystemStoreCreateError::InvalidBasePath(_))
        ));
        Ok(())
    }
}
