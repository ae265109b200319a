use std::sync::Arc;

use zarrs_core::array::{codec::Codec, Array, ArrayBuilder, ChunkShape, DataType};
use zarrs_core::array_subset::ArraySubset;
use zarrs_core::error::ZarrError;
use zarrs_core::metadata::v3::MetadataV3;
use zarrs_core::storage::{store::MemoryStore, ReadableStorageTraits};

#[rustfmt::skip]
fn array_sync_read(array: &Array<MemoryStore>) -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(array.data_type(), &DataType::UInt8);
    assert_eq!(array.fill_value().as_ne_bytes(), &[0u8]);
    assert_eq!(array.shape(), &[4, 4]);
    assert_eq!(array.chunk_shape(), &ChunkShape::try_from(vec![2u64, 2])?);
    assert_eq!(array.chunk_grid_shape(), &[2, 2]);

    // 1  2 | 3  4
    // 5  6 | 7  8
    // -----|-----
    // 9 10 | 0  0
    // 0  0 | 0  0
    array.store_chunk(&[0, 0], vec![1, 2, 0, 0])?;
    array.store_chunk(&[0, 1], vec![3, 4, 7, 8])?;
    array.store_array_subset(&ArraySubset::new_with_ranges(&[1..3, 0..2]), &[5, 6, 9, 10])?;

    assert!(matches!(array.retrieve_chunk(&[0, 0, 0]), Err(ZarrError::DimensionMismatch(_))));
    assert!(matches!(array.retrieve_chunk(&[0, 2]), Err(ZarrError::ChunkNotFound(_))));
    assert_eq!(array.retrieve_chunk(&[0, 0])?, vec![1, 2, 5, 6]);
    assert_eq!(array.retrieve_chunk(&[0, 1])?, vec![3, 4, 7, 8]);
    assert_eq!(array.retrieve_chunk(&[1, 0])?, vec![9, 10, 0, 0]);
    assert_eq!(array.retrieve_chunk(&[1, 1])?, vec![0, 0, 0, 0]);

    assert!(array.retrieve_chunk_if_exists(&[0, 0, 0]).is_err());
    assert_eq!(array.retrieve_chunk_if_exists(&[0, 0])?, Some(vec![1, 2, 5, 6]));
    assert_eq!(array.retrieve_chunk_if_exists(&[0, 1])?, Some(vec![3, 4, 7, 8]));
    assert_eq!(array.retrieve_chunk_if_exists(&[1, 0])?, Some(vec![9, 10, 0, 0]));
    assert_eq!(array.retrieve_chunk_if_exists(&[1, 1])?, None);

    assert!(array.retrieve_chunk_elements::<u16>(&[0, 0]).is_err());
    assert_eq!(array.retrieve_chunk_elements::<u8>(&[0, 0])?, vec![1, 2, 5, 6]);

    assert!(array.retrieve_array_subset(&ArraySubset::new_with_ranges(&[0..2])).is_err());
    assert!(array.retrieve_array_subset(&ArraySubset::new_with_ranges(&[0..5, 0..1])).is_err());
    assert_eq!(array.retrieve_array_subset(&ArraySubset::new_with_ranges(&[0..0, 0..0]))?, Vec::<u8>::new());
    assert_eq!(array.retrieve_array_subset(&ArraySubset::new_with_ranges(&[0..4, 0..4]))?, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0, 0, 0, 0, 0, 0]);
    assert_eq!(array.retrieve_array_subset(&ArraySubset::new_with_ranges(&[1..3, 1..3]))?, vec![6, 7, 10, 0]);
    assert_eq!(array.retrieve_array_subset_elements::<u8>(&ArraySubset::new_with_ranges(&[0..1, 1..4]))?, vec![2, 3, 4]);

    Ok(())
}

#[test]
fn array_sync_read_uncompressed() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let array_path = "/array";
    let array = ArrayBuilder::new(vec![4, 4], DataType::UInt8, vec![2u64, 2].try_into()?, 0u64)
        .create(store, array_path)?;
    array_sync_read(&array)
}

#[cfg(feature = "gzip")]
#[test]
fn array_sync_read_gzip() -> Result<(), Box<dyn std::error::Error>> {
    use zarrs_core::array::codec::{GzipCodec, IdentityCodec};

    let store = Arc::new(MemoryStore::new());
    let array_path = "/array";
    let codecs: Vec<Codec> = vec![Arc::new(IdentityCodec::new()), Arc::new(GzipCodec::new(9)?)];
    let array = ArrayBuilder::new(vec![4, 4], DataType::UInt8, vec![2u64, 2].try_into()?, 0u64)
        .codecs(codecs)
        .create(store.clone(), array_path)?;
    array_sync_read(&array)?;

    // The stored chunks are compressed
    let encoded = store.get(&array.chunk_key(&[0, 0])?)?.ok_or("chunk missing")?;
    assert_eq!(&encoded[..2], &[0x1f, 0x8b]);
    Ok(())
}

#[cfg(feature = "gzip")]
#[test]
fn array_sync_read_gzip_gzip() -> Result<(), Box<dyn std::error::Error>> {
    use zarrs_core::array::codec::GzipCodec;

    let store = Arc::new(MemoryStore::new());
    let codecs: Vec<Codec> = vec![Arc::new(GzipCodec::new(1)?), Arc::new(GzipCodec::new(9)?)];
    let array = ArrayBuilder::new(vec![4, 4], DataType::UInt8, vec![2u64, 2].try_into()?, 0u64)
        .codecs(codecs)
        .create(store.clone(), "/array")?;
    array_sync_read(&array)?;

    let array = Array::open(store, "/array")?;
    assert_eq!(array.codecs().codecs().len(), 2);
    assert_eq!(array.retrieve_chunk(&[0, 1])?, vec![3, 4, 7, 8]);
    Ok(())
}

#[test]
fn array_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let mut attributes = serde_json::Map::new();
    attributes.insert("units".to_string(), "m".into());
    let array = ArrayBuilder::new(vec![3, 5], DataType::Float64, vec![2u64, 2].try_into()?, "NaN")
        .attributes(attributes)
        .dimension_names(Some(["y".to_string(), "x".to_string()]))
        .create(store.clone(), "/group/array")?;
    array.store_array_subset_elements::<f64>(
        &ArraySubset::new_with_ranges(&[2..3, 0..5]),
        &[1.0, 2.0, 3.0, 4.0, 5.0],
    )?;

    let reopened = Array::open(store, "/group/array")?;
    assert_eq!(reopened.metadata(), array.metadata());
    assert_eq!(reopened.attributes()["units"], "m");
    let elements = reopened.retrieve_array_subset_elements::<f64>(&ArraySubset::new_with_ranges(&[1..3, 3..5]))?;
    assert!(elements[0].is_nan() && elements[1].is_nan());
    assert_eq!(&elements[2..], &[4.0, 5.0]);

    // An edge chunk is stored at its nominal shape, padded with the fill value
    let edge_chunk = reopened.retrieve_chunk_elements::<f64>(&[1, 2])?;
    assert_eq!(edge_chunk.len(), 4);
    assert_eq!(edge_chunk[0], 5.0);
    assert!(edge_chunk[1..].iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn array_rank_zero() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let array = ArrayBuilder::new(vec![], DataType::Int32, Vec::<u64>::new().try_into()?, 5i64)
        .create(store, "/")?;
    assert_eq!(array.chunk_key(&[])?.as_str(), "0");
    assert_eq!(array.retrieve_chunk_elements::<i32>(&[])?, vec![5]);
    array.store_chunk_elements::<i32>(&[], &[-3])?;
    assert_eq!(array.retrieve_array_subset_elements::<i32>(&ArraySubset::new_with_shape(vec![]))?, vec![-3]);
    Ok(())
}

#[test]
fn array_unsupported_codec() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let mut metadata = ArrayBuilder::new(vec![4], DataType::UInt8, vec![2u64].try_into()?, 0u64)
        .build_metadata();
    metadata.codecs.push(MetadataV3::new("blosc"));
    assert!(matches!(
        Array::create(store, "/", metadata),
        Err(ZarrError::UnsupportedCodec(name)) if name == "blosc"
    ));
    Ok(())
}

#[test]
fn array_string_data_type() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let array = ArrayBuilder::new(vec![4], DataType::String, vec![2u64].try_into()?, "")
        .create(store, "/")?;
    assert!(matches!(
        array.retrieve_chunk(&[0]),
        Err(ZarrError::UnsupportedDataType(_))
    ));
    Ok(())
}
