//! Media ingestion pipeline.
//!
//! Stages run strictly in order: validate → watermark (listing images only) →
//! name/sanitize → authenticate → upload with retry → resolve public URL.
//! The storage and session ports are injected so tests can substitute fakes.

use std::sync::Arc;
use std::time::Instant;

use souk_core::models::UploadRequest;
use souk_core::{
    LogLevel, MediaFile, SessionProvider, TransformError, UploadConfig, UploadError,
    UploadPurpose, UploadResult,
};
use souk_storage::{generate_filename, sanitize_path, storage_path, ObjectStorage, UploadOptions};

use super::progress::{self, ProgressSender};
use super::retry::{retry, RetryPolicy};
use crate::image::TextWatermark;
use crate::validator::MediaValidator;

pub struct MediaPipeline {
    storage: Arc<dyn ObjectStorage>,
    sessions: Arc<dyn SessionProvider>,
    config: UploadConfig,
    retry_policy: RetryPolicy,
    watermark: TextWatermark,
}

impl MediaPipeline {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        sessions: Arc<dyn SessionProvider>,
        config: UploadConfig,
    ) -> Self {
        let retry_policy = RetryPolicy::from_config(&config);
        let watermark = TextWatermark::new(config.watermark_text.clone());
        Self {
            storage,
            sessions,
            config,
            retry_policy,
            watermark,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Validate, watermark and store a listing image; returns its public URL.
    pub async fn upload_listing_image(
        &self,
        owner_id: &str,
        file: MediaFile,
        progress: Option<&ProgressSender>,
    ) -> UploadResult<String> {
        self.upload(
            UploadRequest {
                owner_id: owner_id.to_string(),
                file,
                purpose: UploadPurpose::Listing,
            },
            progress,
        )
        .await
    }

    /// Validate and store a profile photo (no watermark); returns its public URL.
    pub async fn upload_profile_photo(
        &self,
        owner_id: &str,
        file: MediaFile,
        progress: Option<&ProgressSender>,
    ) -> UploadResult<String> {
        self.upload(
            UploadRequest {
                owner_id: owner_id.to_string(),
                file,
                purpose: UploadPurpose::Profile,
            },
            progress,
        )
        .await
    }

    pub async fn upload(
        &self,
        request: UploadRequest,
        progress: Option<&ProgressSender>,
    ) -> UploadResult<String> {
        let result = self.run(request, progress).await;
        if let Err(ref err) = result {
            log_failure(err);
        }
        result
    }

    async fn run(
        &self,
        request: UploadRequest,
        progress: Option<&ProgressSender>,
    ) -> UploadResult<String> {
        let UploadRequest {
            owner_id,
            file,
            purpose,
        } = request;
        let report = |percent: u8| {
            if let Some(sender) = progress {
                sender.report(percent);
            }
        };

        MediaValidator::new(self.config.policy_for(purpose)).validate(&file)?;
        report(progress::AFTER_VALIDATION);

        let file = if purpose.is_watermarked() {
            let stamped = self.apply_watermark(file).await?;
            report(progress::AFTER_WATERMARK);
            stamped
        } else {
            file
        };

        let filename = generate_filename(&file.content_type);
        let path = storage_path(&owner_id, purpose, &filename);
        let bucket = self.config.bucket_for(purpose);

        tracing::debug!(
            owner_id = %owner_id,
            purpose = %purpose,
            bucket = %bucket,
            path = %path,
            "Prepared storage path"
        );

        self.require_session().await?;

        let options = UploadOptions::new(
            file.content_type.clone(),
            self.config.cache_control.clone(),
        );
        let storage = &self.storage;
        let path_ref = path.as_str();
        let options_ref = &options;
        let data = file.data;
        let size_bytes = data.len();
        let start = Instant::now();

        let attempt = retry(&self.retry_policy, |attempt| {
            report(progress::before_attempt(attempt));
            let data = data.clone();
            async move {
                storage
                    .upload(bucket, path_ref, data, options_ref)
                    .await
                    .map(|()| attempt)
                    .map_err(|e| e.into_upload_error(bucket))
            }
        })
        .await?;

        let url = self
            .storage
            .public_url(bucket, &path)
            .await
            .map_err(|e| e.into_upload_error(bucket))?;

        tracing::info!(
            owner_id = %owner_id,
            purpose = %purpose,
            bucket = %bucket,
            path = %path,
            size_bytes = size_bytes,
            attempt = attempt + 1,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload complete"
        );

        report(progress::COMPLETE);
        Ok(url)
    }

    async fn apply_watermark(&self, file: MediaFile) -> UploadResult<MediaFile> {
        let watermark = self.watermark.clone();
        // Decode and re-encode are CPU-bound; keep them off the async workers.
        let stamped = tokio::task::spawn_blocking(move || watermark.stamp(&file))
            .await
            .map_err(|e| TransformError::Environment(e.to_string()))??;
        Ok(stamped)
    }

    async fn require_session(&self) -> UploadResult<()> {
        match self.sessions.get_session().await {
            Ok(Some(session)) if !session.is_expired() => Ok(()),
            Ok(Some(_)) => Err(UploadError::Auth("session expired".to_string())),
            Ok(None) => Err(UploadError::Auth("no active session".to_string())),
            Err(e) => Err(UploadError::Auth(e.to_string())),
        }
    }

    /// Remove a single object. Not retried.
    pub async fn delete_file(&self, bucket: &str, path: &str) -> UploadResult<()> {
        let path = sanitize_path(path);

        self.storage
            .remove(bucket, std::slice::from_ref(&path))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %bucket, path = %path, "Delete failed");
                UploadError::Delete(e.to_string())
            })?;

        tracing::info!(bucket = %bucket, path = %path, "File deleted");
        Ok(())
    }
}

fn log_failure(err: &UploadError) {
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error_code = err.error_code(), error = %err, "Upload rejected")
        }
        LogLevel::Warn => {
            tracing::warn!(error_code = err.error_code(), error = %err, "Upload failed")
        }
        LogLevel::Error => {
            tracing::error!(error_code = err.error_code(), error = %err, "Upload failed")
        }
    }
}
