//! A rust library for chunked multidimensional arrays in the [Zarr V3](https://zarr.dev) storage format.
//!
//! A Zarr hierarchy is a tree of nodes (groups and arrays) stored in a byte-oriented key/value [store](storage).
//! Every node has a `zarr.json` metadata document.
//! An array is split into equally shaped chunks, each encoded through a codec pipeline and stored under its own key.
//!
//! ## Getting Started
//! - [`array::Array`] and [`storage`] are good places to start.
//! - [`node::Node`] opens any node of a hierarchy, whether a group or an array.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use zarrs_core::array::{Array, ArrayBuilder, DataType};
//! use zarrs_core::array_subset::ArraySubset;
//! use zarrs_core::storage::store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let array = ArrayBuilder::new(
//!     vec![8, 8], // array shape
//!     DataType::Float32,
//!     vec![4u64, 4].try_into()?, // regular chunk shape
//!     0.0,
//! )
//! .create(store.clone(), "/group/array")?;
//!
//! array.store_chunk_elements::<f32>(&[1, 0], &[1.0; 16])?;
//!
//! let array = Array::open(store, "/group/array")?;
//! let subset = ArraySubset::new_with_ranges(&[3..5, 0..2]);
//! let elements = array.retrieve_array_subset_elements::<f32>(&subset)?;
//! assert_eq!(elements, vec![0.0, 0.0, 1.0, 1.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Features
//! #### Default
//!  - `gzip`: the `gzip` codec.
//!
//! #### Non-Default
//!  - `async`: an asynchronous API for [`stores`](storage), [`Array`](crate::array::Array), and [`Group`](group::Group).
//!  - `http`: a read-only HTTP store, which also serves public Amazon S3 buckets.
//!  - `cli`: the `zarrs_tool` binary.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod array;
pub mod array_subset;
pub mod config;
pub mod error;
pub mod group;
pub mod metadata;
pub mod node;
pub mod plugin;
pub mod storage;
