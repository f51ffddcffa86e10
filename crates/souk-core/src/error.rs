//! Error types module
//!
//! All failures of the media ingestion pipeline are unified under [`UploadError`].
//! Each variant belongs to one [`ErrorKind`]; the retry combinator decides what to
//! retry by kind, and callers use the messages directly for user-facing text.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Coarse classification of an [`UploadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Transform,
    Auth,
    Transient,
    Configuration,
}

/// Which storage misconfiguration was reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationKind {
    /// 404: the target bucket does not exist.
    BucketNotFound,
    /// 400/403: the storage policy rejected the write.
    PermissionDenied,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File size exceeds the maximum of {max_mb}MB")]
    FileTooLarge { size: u64, max_mb: String },

    #[error("Invalid file type: {content_type}. Allowed formats: {allowed}")]
    UnsupportedType {
        content_type: String,
        allowed: String,
    },

    #[error("Empty file")]
    EmptyFile,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to load image: {0}")]
    Decode(String),

    #[error("Image processing unavailable: {0}")]
    Environment(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("Upload error: {0}")]
    Transient(String),

    #[error("{message}")]
    Configuration {
        kind: ConfigurationKind,
        message: String,
    },

    #[error("Upload failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<UploadError>,
    },

    #[error("Failed to delete file: {0}")]
    Delete(String),
}

pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    pub fn bucket_not_found(bucket: &str) -> Self {
        UploadError::Configuration {
            kind: ConfigurationKind::BucketNotFound,
            message: format!(
                "Storage bucket '{}' not found. Please check the storage configuration.",
                bucket
            ),
        }
    }

    pub fn permission_denied(detail: &str) -> Self {
        UploadError::Configuration {
            kind: ConfigurationKind::PermissionDenied,
            message: format!(
                "Permission denied by storage policy. Please check bucket permissions. ({})",
                detail
            ),
        }
    }

    /// Kind of the error. `RetriesExhausted` reports the kind of the last attempt.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::Validation(_) => ErrorKind::Validation,
            UploadError::Transform(_) => ErrorKind::Transform,
            UploadError::Auth(_) => ErrorKind::Auth,
            UploadError::Transient(_) | UploadError::Delete(_) => ErrorKind::Transient,
            UploadError::Configuration { .. } => ErrorKind::Configuration,
            UploadError::RetriesExhausted { last, .. } => last.kind(),
        }
    }

    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Validation(ValidationError::FileTooLarge { .. }) => "FILE_TOO_LARGE",
            UploadError::Validation(ValidationError::UnsupportedType { .. }) => {
                "UNSUPPORTED_FILE_TYPE"
            }
            UploadError::Validation(ValidationError::EmptyFile) => "EMPTY_FILE",
            UploadError::Transform(_) => "TRANSFORM_ERROR",
            UploadError::Auth(_) => "AUTHENTICATION_REQUIRED",
            UploadError::Transient(_) => "STORAGE_ERROR",
            UploadError::Configuration {
                kind: ConfigurationKind::BucketNotFound,
                ..
            } => "BUCKET_NOT_FOUND",
            UploadError::Configuration {
                kind: ConfigurationKind::PermissionDenied,
                ..
            } => "PERMISSION_DENIED",
            UploadError::RetriesExhausted { .. } => "UPLOAD_RETRIES_EXHAUSTED",
            UploadError::Delete(_) => "DELETE_FAILED",
        }
    }

    /// Whether the caller can fix the problem and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Auth | ErrorKind::Transient
        )
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self.kind() {
            ErrorKind::Validation => LogLevel::Debug,
            ErrorKind::Auth | ErrorKind::Transient => LogLevel::Warn,
            ErrorKind::Transform | ErrorKind::Configuration => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_names_limit() {
        let err = UploadError::from(ValidationError::FileTooLarge {
            size: 11 * 1024 * 1024,
            max_mb: "10".to_string(),
        });
        assert!(err.to_string().contains("10MB"));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn exhausted_reports_kind_of_last_error() {
        let err = UploadError::RetriesExhausted {
            attempts: 3,
            last: Box::new(UploadError::bucket_not_found("listing-images")),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().starts_with("Upload failed after 3 attempts"));
        assert!(err.to_string().contains("listing-images"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn configuration_messages_are_distinct() {
        let missing = UploadError::bucket_not_found("b");
        let denied = UploadError::permission_denied("403");
        assert_ne!(missing.to_string(), denied.to_string());
        assert_eq!(missing.error_code(), "BUCKET_NOT_FOUND");
        assert_eq!(denied.error_code(), "PERMISSION_DENIED");
    }

    #[test]
    fn decode_failure_mentions_loading() {
        let err = UploadError::from(TransformError::Decode("bad header".into()));
        assert!(err.to_string().starts_with("Failed to load image"));
        assert_eq!(err.kind(), ErrorKind::Transform);
    }
}
