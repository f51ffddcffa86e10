//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use souk_core::UploadError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Provider-style status code for the failure, when one applies.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StorageError::BucketNotFound(_) => Some(404),
            StorageError::PermissionDenied(_) => Some(400),
            StorageError::AlreadyExists(_) => Some(409),
            StorageError::InvalidKey(_) => Some(400),
            _ => None,
        }
    }

    /// Classify a failed upload for the pipeline by its status code.
    ///
    /// 404 and 400 become configuration errors with their own message; any
    /// other code, or none, is treated as transient.
    pub fn into_upload_error(self, bucket: &str) -> UploadError {
        match self.status_code() {
            Some(404) => UploadError::bucket_not_found(bucket),
            Some(400) => UploadError::permission_denied(&self.to_string()),
            _ => UploadError::Transient(self.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Options applied to a single object write.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    pub content_type: String,
    pub cache_control: String,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
}

impl UploadOptions {
    pub fn new(content_type: impl Into<String>, cache_control: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            cache_control: cache_control.into(),
            upsert: true,
        }
    }
}

/// Object storage port
///
/// All storage backends (S3, local filesystem) implement this trait, and tests
/// substitute in-memory fakes. Paths are expected to be sanitized already.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `data` to `bucket/path`.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<()>;

    /// Resolve a stored object's path to its public URL.
    async fn public_url(&self, bucket: &str, path: &str) -> StorageResult<String>;

    /// Remove the given objects from `bucket`.
    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
