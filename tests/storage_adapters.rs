use std::{error::Error, sync::Arc};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use zarrs_core::{
    array::{Array, ArrayBuilder, DataType},
    storage::{
        storage_adapter::{CachingStorageAdapter, PerformanceMetricsStorageAdapter},
        store::MemoryStore,
    },
};

#[test]
fn array_cached_reads() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let metrics = Arc::new(PerformanceMetricsStorageAdapter::new(store));
    let cache = Arc::new(CachingStorageAdapter::new_with_capacity(metrics.clone(), 2)?);

    let array = ArrayBuilder::new(vec![8], DataType::UInt8, vec![2u64].try_into()?, 0u64)
        .create(cache.clone(), "/array")?;
    array.store_chunk(&[0], vec![1, 2])?;
    array.store_chunk(&[1], vec![3, 4])?;
    array.store_chunk(&[2], vec![5, 6])?;
    // The metadata and the first chunk were evicted
    assert_eq!(cache.evictions(), 2);
    metrics.reset();

    // Hits do not reach the wrapped store
    assert_eq!(array.retrieve_chunk(&[1])?, vec![3, 4]);
    assert_eq!(metrics.gets(), 0);

    // A miss reads through and evicts the least recently used key
    assert_eq!(array.retrieve_chunk(&[0])?, vec![1, 2]);
    assert_eq!(metrics.gets(), 1);
    assert!(cache.is_cached(&array.chunk_key(&[0])?));
    assert!(cache.is_cached(&array.chunk_key(&[1])?));
    assert!(!cache.is_cached(&array.chunk_key(&[2])?));
    assert_eq!(cache.evictions(), 3);

    // Absent chunks are not cached
    assert_eq!(array.retrieve_chunk(&[3])?, vec![0, 0]);
    assert!(!cache.is_cached(&array.chunk_key(&[3])?));
    assert_eq!(metrics.gets(), 2);

    // Reopening reads the metadata through the cache
    let array = Array::open(cache.clone(), "/array")?;
    assert_eq!(array.shape(), &[8]);
    assert_eq!(metrics.gets(), 3);
    Ok(())
}

#[test]
fn array_parallel_chunk_writes() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(CachingStorageAdapter::new_with_capacity(store.clone(), 4)?);
    let array = ArrayBuilder::new(vec![64], DataType::UInt16, vec![4u64].try_into()?, 0u64)
        .create(cache, "/")?;

    (0..16u64)
        .into_par_iter()
        .try_for_each(|chunk| {
            let value = u16::try_from(chunk).unwrap_or(u16::MAX);
            array.store_chunk_elements::<u16>(&[chunk], &[value; 4])
        })?;
    (0..16u64).into_par_iter().try_for_each(|chunk| {
        let value = u16::try_from(chunk).unwrap_or(u16::MAX);
        assert_eq!(array.retrieve_chunk_elements::<u16>(&[chunk])?, vec![value; 4]);
        Ok::<_, zarrs_core::error::ZarrError>(())
    })?;
    // Every chunk and the metadata reached the wrapped store
    assert_eq!(store.len(), 17);
    Ok(())
}
