use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use souk_core::content_types::content_type_for_filename;
use souk_core::{MediaFile, UploadError};

/// Sent when the extension is unknown; the validation gate rejects it with the allowed list.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";
const BAR_WIDTH: usize = 20;

/// Result printed for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadOutput {
    pub success: bool,
    pub url: String,
}

/// Result printed for a failed command.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub error_code: &'static str,
    pub message: String,
    pub recoverable: bool,
}

impl From<&UploadError> for ErrorOutput {
    fn from(err: &UploadError) -> Self {
        Self {
            success: false,
            error_code: err.error_code(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

/// Read a local file; the MIME type comes from its extension.
pub async fn read_media_file(path: &Path) -> anyhow::Result<MediaFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = content_type_for_filename(&filename).unwrap_or(UNKNOWN_CONTENT_TYPE);

    Ok(MediaFile::new(filename, content_type, data))
}

/// Render a percentage as `[#####...............]  25%`.
pub fn format_progress(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = BAR_WIDTH * percent as usize / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("souk=info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use souk_core::ValidationError;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(format_progress(0), "[....................]   0%");
        assert_eq!(format_progress(40), "[########............]  40%");
        assert_eq!(format_progress(100), "[####################] 100%");
        assert_eq!(format_progress(250), format_progress(100));
    }

    #[test]
    fn error_output_carries_code_and_message() {
        let err = UploadError::Validation(ValidationError::EmptyFile);
        let output = ErrorOutput::from(&err);
        assert!(!output.success);
        assert_eq!(output.error_code, err.error_code());
        assert_eq!(output.message, err.to_string());

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn reads_file_with_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sofa.JPG");
        tokio::fs::write(&path, b"bytes").await.unwrap();

        let file = read_media_file(&path).await.unwrap();
        assert_eq!(file.filename, "Sofa.JPG");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.size(), 5);
    }

    #[tokio::test]
    async fn unknown_extension_gets_generic_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hi").await.unwrap();

        let file = read_media_file(&path).await.unwrap();
        assert_eq!(file.content_type, UNKNOWN_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = read_media_file(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
