//! Global configuration options.
//!
//! The configuration only supplies defaults that are read when an instance (store, adapter, codec) is constructed.
//! Store contents, caches, and counters are always owned by explicit instances.

use std::{
    sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

/// Global configuration options for the zarrs_core crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Cache Capacity
/// > default: `256`
///
/// The number of keys held by a [`CachingStorageAdapter`](crate::storage::storage_adapter::CachingStorageAdapter) created without an explicit capacity.
///
/// ## Gzip Compression Level
/// > default: `5`
///
/// The compression level of a [`GzipCodec`](crate::array::codec::GzipCodec) whose configuration does not include a `level`.
///
/// ## HTTP Request Timeout
/// > default: 30 seconds
///
/// The request-level timeout of a read-only HTTP store.
/// A request that times out fails with an I/O error.
#[derive(Debug)]
pub struct Config {
    cache_capacity: usize,
    gzip_compression_level: u32,
    http_request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_capacity: 256,
            gzip_compression_level: 5,
            http_request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Get the [cache capacity](#cache-capacity) configuration.
    #[must_use]
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Set the [cache capacity](#cache-capacity) configuration.
    pub fn set_cache_capacity(&mut self, cache_capacity: usize) {
        self.cache_capacity = cache_capacity;
    }

    /// Get the [gzip compression level](#gzip-compression-level) configuration.
    #[must_use]
    pub fn gzip_compression_level(&self) -> u32 {
        self.gzip_compression_level
    }

    /// Set the [gzip compression level](#gzip-compression-level) configuration.
    ///
    /// Levels above 9 are clamped to 9.
    pub fn set_gzip_compression_level(&mut self, gzip_compression_level: u32) {
        self.gzip_compression_level = gzip_compression_level.min(9);
    }

    /// Get the [HTTP request timeout](#http-request-timeout) configuration.
    #[must_use]
    pub fn http_request_timeout(&self) -> Duration {
        self.http_request_timeout
    }

    /// Set the [HTTP request timeout](#http-request-timeout) configuration.
    pub fn set_http_request_timeout(&mut self, http_request_timeout: Duration) {
        self.http_request_timeout = http_request_timeout;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global zarrs_core configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global zarrs_core configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}
