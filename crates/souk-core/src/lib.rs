//! Souk Core Library
//!
//! This crate provides the domain types, error taxonomy, configuration and
//! session port shared by the Souk media ingestion crates.

pub mod config;
pub mod content_types;
pub mod error;
pub mod models;
pub mod session;
pub mod storage_types;

// Re-export commonly used types
pub use config::UploadConfig;
pub use error::{
    ConfigurationKind, ErrorKind, LogLevel, TransformError, UploadError, UploadResult,
    ValidationError,
};
pub use models::{MediaFile, UploadPurpose, ValidationPolicy};
pub use session::{Session, SessionError, SessionProvider, StaticSessionProvider};
pub use storage_types::StorageBackend;
