use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// What an uploaded image is for. Drives policy, watermarking and path layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPurpose {
    Listing,
    Profile,
}

impl UploadPurpose {
    /// Path segment placed between the owner id and the filename.
    pub fn path_segment(self) -> &'static str {
        match self {
            UploadPurpose::Listing => "listings",
            UploadPurpose::Profile => "profile",
        }
    }

    /// Only listing images carry the brand watermark.
    pub fn is_watermarked(self) -> bool {
        matches!(self, UploadPurpose::Listing)
    }
}

impl Display for UploadPurpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadPurpose::Listing => write!(f, "listing"),
            UploadPurpose::Profile => write!(f, "profile"),
        }
    }
}

/// A user-submitted file: bytes plus the declared MIME type and original name.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// One upload call. Lives only for the duration of the call.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub owner_id: String,
    pub file: MediaFile,
    pub purpose: UploadPurpose,
}
