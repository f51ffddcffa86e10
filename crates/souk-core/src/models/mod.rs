//! Domain models for media ingestion.

pub mod policy;
pub mod upload;

pub use policy::ValidationPolicy;
pub use upload::{MediaFile, UploadPurpose, UploadRequest};
