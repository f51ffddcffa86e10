//! Souk Storage Library
//!
//! This crate provides the object storage port used by the media pipeline and
//! its implementations for S3 and the local filesystem.
//!
//! # Storage path format
//!
//! Objects live in a bucket under `{owner_id}/{listings|profile}/{filename}`,
//! where `filename` is `{millis}-{token}.{ext}`. Paths are passed through
//! [`keys::sanitize_path`] before they reach a backend, so they never contain
//! `..`, duplicate slashes, or a leading/trailing `/`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_filename, sanitize_path, storage_path};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use souk_core::StorageBackend;
pub use traits::{ObjectStorage, StorageError, StorageResult, UploadOptions};
