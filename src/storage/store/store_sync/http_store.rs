//! A read-only HTTP store.
//!
//! Also serves public Amazon S3 buckets through their virtual-hosted style URLs.

use crate::{
    config::global_config,
    storage::{
        Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
        ReadableWritableStorageTraits, StorageError, StoreKey, StoreKeys, StorePrefix,
        WritableStorageTraits,
    },
};

use reqwest::{StatusCode, Url};
use std::str::FromStr;
use thiserror::Error;

/// A read-only HTTP store.
///
/// `get` and `exists` perform a request per call.
/// `set`, `delete`, `set_if_absent`, and listing fail with [`StorageError::Unsupported`] without any network access.
#[derive(Debug)]
pub struct HTTPStore {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<url::ParseError> for StorageError {
    fn from(err: url::ParseError) -> Self {
        Self::Other(err.to_string())
    }
}

impl HTTPStore {
    /// Create a new HTTP store at a given `base_url`.
    ///
    /// Requests time out after the configured [HTTP request timeout](crate::config::Config#http-request-timeout).
    ///
    /// # Errors
    /// Returns a [`HTTPStoreCreateError`] if `base_url` is not a valid URL or the HTTP client cannot be created.
    pub fn new(base_url: &str) -> Result<Self, HTTPStoreCreateError> {
        let base_url = Url::from_str(base_url)
            .map_err(|_| HTTPStoreCreateError::InvalidBaseURL(base_url.into()))?;
        let timeout = global_config().http_request_timeout();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { base_url, client })
    }

    /// Create a new HTTP store for a public Amazon S3 `bucket` in `region`.
    ///
    /// The base URL is `https://{bucket}.s3.{region}.amazonaws.com`.
    ///
    /// # Errors
    /// Returns a [`HTTPStoreCreateError`] if the bucket or region do not form a valid URL.
    pub fn new_amazon_s3(bucket: &str, region: &str) -> Result<Self, HTTPStoreCreateError> {
        Self::new(&format!("https://{bucket}.s3.{region}.amazonaws.com"))
    }

    /// Returns the base URL of the store.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Maps a [`StoreKey`] to a HTTP [`Url`].
    ///
    /// # Errors
    /// Returns an error if the URL is invalid.
    pub fn key_to_url(&self, key: &StoreKey) -> Result<Url, url::ParseError> {
        let base_url = self.base_url.as_str();
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        Url::parse(&format!("{base_url}/{}", key.as_str()))
    }

    fn unsupported(operation: &str) -> StorageError {
        StorageError::Unsupported(format!("{operation} on a read only HTTP store"))
    }
}

impl ReadableStorageTraits for HTTPStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        let url = self.key_to_url(key)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send()?;
        match response.status() {
            StatusCode::OK => Ok(Some(response.bytes()?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(StorageError::from(format!(
                "http unexpected status code: {status}"
            ))),
        }
    }

    fn exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        let url = self.key_to_url(key)?;
        log::debug!("HEAD {url}");
        let response = self.client.head(url).send()?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::from(format!(
                "http unexpected status code: {status}"
            ))),
        }
    }
}

impl WritableStorageTraits for HTTPStore {
    fn set(&self, _key: &StoreKey, _value: Bytes) -> Result<(), StorageError> {
        Err(Self::unsupported("set"))
    }

    fn delete(&self, _key: &StoreKey) -> Result<(), StorageError> {
        Err(Self::unsupported("delete"))
    }
}

impl ReadableWritableStorageTraits for HTTPStore {
    fn set_if_absent(&self, _key: &StoreKey, _value: Bytes) -> Result<bool, StorageError> {
        Err(Self::unsupported("set"))
    }
}

impl ListableStorageTraits for HTTPStore {
    fn list(&self) -> Result<StoreKeys, StorageError> {
        Err(Self::unsupported("list"))
    }

    fn list_prefix(&self, _prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        Err(Self::unsupported("list"))
    }
}

/// A HTTP store creation error.
#[derive(Debug, Error)]
pub enum HTTPStoreCreateError {
    /// The URL is not valid.
    #[error("base URL {0} is not valid")]
    InvalidBaseURL(String),
    /// The HTTP client could not be created.
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}
