//! Storage adapters.
//!
//! An adapter wraps exactly one store and satisfies the same storage traits, so adapters compose in any order.
//!  - [`CachingStorageAdapter`]: a bounded least-recently-used cache in front of a store.
//!  - [`PerformanceMetricsStorageAdapter`]: counts calls and bytes passing through to a store.
//!  - [`AsyncToSyncStorageAdapter`](async_to_sync::AsyncToSyncStorageAdapter): exposes an asynchronous store through the synchronous traits (requires the `async` feature).

#[cfg(feature = "async")]
pub mod async_to_sync;
mod caching;
mod performance_metrics;

pub use caching::{CachingStorageAdapter, InvalidCacheCapacityError};
pub use performance_metrics::{PerformanceMetricsStorageAdapter, StoreMetrics};
