pub mod filesystem_store;
pub mod memory_store;

#[cfg(feature = "http")]
pub mod http_store;

#[cfg(test)]
pub(crate) mod test_util {
    use std::error::Error;

    use crate::storage::{
        Bytes, ListableStorageTraits, ReadableStorageTraits, ReadableWritableStorageTraits,
        StorePrefix,
    };

    /// Create a store with the following data
    /// - a/
    ///   - b [0, 1, 2, 3]
    ///   - c [0]
    ///   - d/
    ///     - e
    ///   - f/
    ///     - g
    ///     - h
    /// - i/
    ///   - j/
    ///     - k [0, 1]
    pub fn store_write<T: ReadableWritableStorageTraits + ListableStorageTraits>(
        store: &T,
    ) -> Result<(), Box<dyn Error>> {
        for key in store.list()? {
            store.delete(&key)?;
        }

        store.set(&"a/b".try_into()?, Bytes::from_static(&[255, 255, 255]))?;
        store.set(&"a/b".try_into()?, Bytes::from_static(&[0, 1, 2, 3]))?;
        store.set(&"a/c".try_into()?, Bytes::from_static(&[0]))?;
        store.set(&"a/d/e".try_into()?, Bytes::new())?;
        store.set(&"a/f/g".try_into()?, Bytes::new())?;
        store.set(&"a/f/h".try_into()?, Bytes::new())?;
        assert!(store.set_if_absent(&"i/j/k".try_into()?, Bytes::from_static(&[0, 1]))?);
        assert!(!store.set_if_absent(&"i/j/k".try_into()?, Bytes::from_static(&[2]))?);

        store.set(&"delete".try_into()?, Bytes::new())?;
        store.delete(&"delete".try_into()?)?;
        store.delete(&"delete".try_into()?)?; // succeeds

        Ok(())
    }

    pub fn store_read<T: ReadableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
        assert!(store.get(&"notfound".try_into()?)?.is_none());
        assert!(!store.exists(&"notfound".try_into()?)?);
        assert!(!store.exists(&"delete".try_into()?)?);
        assert_eq!(
            store.get(&"a/b".try_into()?)?,
            Some(Bytes::from_static(&[0, 1, 2, 3]))
        );
        assert_eq!(store.get(&"a/c".try_into()?)?, Some(Bytes::from_static(&[0])));
        assert_eq!(store.get(&"a/d/e".try_into()?)?, Some(Bytes::new()));
        assert!(store.exists(&"a/d/e".try_into()?)?);
        assert_eq!(
            store.get(&"i/j/k".try_into()?)?,
            Some(Bytes::from_static(&[0, 1]))
        );
        Ok(())
    }

    pub fn store_list<T: ListableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
        assert_eq!(
            store.list()?,
            &[
                "a/b".try_into()?,
                "a/c".try_into()?,
                "a/d/e".try_into()?,
                "a/f/g".try_into()?,
                "a/f/h".try_into()?,
                "i/j/k".try_into()?
            ]
        );
        assert_eq!(store.list_prefix(&StorePrefix::root())?, store.list()?);
        assert_eq!(
            store.list_prefix(&"a/".try_into()?)?,
            &[
                "a/b".try_into()?,
                "a/c".try_into()?,
                "a/d/e".try_into()?,
                "a/f/g".try_into()?,
                "a/f/h".try_into()?
            ]
        );
        assert_eq!(
            store.list_prefix(&"a/f/".try_into()?)?,
            &["a/f/g".try_into()?, "a/f/h".try_into()?]
        );
        assert!(store.list_prefix(&"b/".try_into()?)?.is_empty());
        Ok(())
    }
}
