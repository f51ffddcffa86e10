//! Configuration module
//!
//! Upload policies, retry settings, watermark text and storage backend settings,
//! read from the environment (with `.env` support).

use std::env;
use std::time::Duration;

use crate::models::{UploadPurpose, ValidationPolicy};
use crate::storage_types::StorageBackend;

const LISTING_MAX_FILE_SIZE_MB: u64 = 10;
const PROFILE_MAX_FILE_SIZE_MB: u64 = 5;
const DEFAULT_CONTENT_TYPES: &str = "image/jpeg,image/png,image/webp";
const LISTING_BUCKET: &str = "listing-images";
const PROFILE_BUCKET: &str = "profile-photos";
const WATERMARK_TEXT: &str = "SOUK";
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;
const CACHE_CONTROL: &str = "3600";

/// Storage backend settings
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    pub backend: Option<StorageBackend>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    /// Optional prefix prepended to logical bucket names on S3 (`{prefix}{bucket}`).
    pub s3_bucket_prefix: Option<String>,
    pub s3_region: Option<String>,
    pub aws_region: Option<String>,
    pub s3_endpoint: Option<String>,
}

/// Media ingestion configuration.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub listing_policy: ValidationPolicy,
    pub profile_policy: ValidationPolicy,
    pub listing_bucket: String,
    pub profile_bucket: String,
    pub watermark_text: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub retry_configuration_errors: bool,
    pub cache_control: String,
    pub storage: StorageConfig,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            listing_policy: ValidationPolicy::listing_default(),
            profile_policy: ValidationPolicy::profile_default(),
            listing_bucket: LISTING_BUCKET.to_string(),
            profile_bucket: PROFILE_BUCKET.to_string(),
            watermark_text: WATERMARK_TEXT.to_string(),
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
            retry_configuration_errors: true,
            cache_control: CACHE_CONTROL.to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let listing_max_mb = env::var("LISTING_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| LISTING_MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(LISTING_MAX_FILE_SIZE_MB);
        let profile_max_mb = env::var("PROFILE_MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| PROFILE_MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(PROFILE_MAX_FILE_SIZE_MB);

        let listing_types = content_type_list("LISTING_ALLOWED_CONTENT_TYPES");
        let profile_types = content_type_list("PROFILE_ALLOWED_CONTENT_TYPES");

        let backend = match env::var("STORAGE_BACKEND").ok() {
            Some(value) => Some(value.parse::<StorageBackend>()?),
            None => None,
        };

        let config = Self {
            listing_policy: ValidationPolicy::from_megabytes(listing_max_mb, listing_types),
            profile_policy: ValidationPolicy::from_megabytes(profile_max_mb, profile_types),
            listing_bucket: env::var("LISTING_BUCKET")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| LISTING_BUCKET.to_string()),
            profile_bucket: env::var("PROFILE_BUCKET")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| PROFILE_BUCKET.to_string()),
            watermark_text: env::var("WATERMARK_TEXT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| WATERMARK_TEXT.to_string()),
            max_retries: env::var("UPLOAD_MAX_RETRIES")
                .unwrap_or_else(|_| MAX_RETRIES.to_string())
                .parse()
                .unwrap_or(MAX_RETRIES),
            retry_delay: Duration::from_millis(
                env::var("UPLOAD_RETRY_DELAY_MS")
                    .unwrap_or_else(|_| RETRY_DELAY_MS.to_string())
                    .parse()
                    .unwrap_or(RETRY_DELAY_MS),
            ),
            retry_configuration_errors: env::var("UPLOAD_RETRY_CONFIGURATION_ERRORS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            cache_control: env::var("UPLOAD_CACHE_CONTROL")
                .unwrap_or_else(|_| CACHE_CONTROL.to_string()),
            storage: StorageConfig {
                backend,
                local_storage_path: env::var("LOCAL_STORAGE_PATH")
                    .ok()
                    .filter(|s| !s.is_empty()),
                local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                    .ok()
                    .filter(|s| !s.is_empty()),
                s3_bucket_prefix: env::var("S3_BUCKET_PREFIX").ok().filter(|s| !s.is_empty()),
                s3_region: env::var("S3_REGION").ok().filter(|s| !s.is_empty()),
                aws_region: env::var("AWS_REGION").ok().filter(|s| !s.is_empty()),
                s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, policy) in [
            ("LISTING", &self.listing_policy),
            ("PROFILE", &self.profile_policy),
        ] {
            if policy.max_bytes == 0 {
                return Err(anyhow::anyhow!(
                    "{}_MAX_FILE_SIZE_MB must be greater than zero",
                    name
                ));
            }
            if policy.allowed_content_types.is_empty() {
                return Err(anyhow::anyhow!(
                    "{}_ALLOWED_CONTENT_TYPES must list at least one MIME type",
                    name
                ));
            }
        }

        if self.max_retries == 0 {
            return Err(anyhow::anyhow!(
                "UPLOAD_MAX_RETRIES must be at least 1"
            ));
        }

        match self.storage_backend() {
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.storage.s3_region.is_none() && self.storage.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend.unwrap_or(StorageBackend::Local)
    }

    pub fn policy_for(&self, purpose: UploadPurpose) -> &ValidationPolicy {
        match purpose {
            UploadPurpose::Listing => &self.listing_policy,
            UploadPurpose::Profile => &self.profile_policy,
        }
    }

    pub fn bucket_for(&self, purpose: UploadPurpose) -> &str {
        match purpose {
            UploadPurpose::Listing => &self.listing_bucket,
            UploadPurpose::Profile => &self.profile_bucket,
        }
    }

    /// All logical buckets the pipeline writes to.
    pub fn buckets(&self) -> Vec<String> {
        vec![self.listing_bucket.clone(), self.profile_bucket.clone()]
    }
}

fn content_type_list(var: &str) -> Vec<String> {
    env::var(var)
        .unwrap_or_else(|_| DEFAULT_CONTENT_TYPES.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> UploadConfig {
        UploadConfig {
            storage: StorageConfig {
                backend: Some(StorageBackend::Local),
                local_storage_path: Some("/tmp/souk".into()),
                local_storage_base_url: Some("http://localhost:4000/storage".into()),
                ..StorageConfig::default()
            },
            ..UploadConfig::default()
        }
    }

    #[test]
    fn defaults_match_pipeline_constants() {
        let config = UploadConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert!(config.retry_configuration_errors);
        assert_eq!(config.bucket_for(UploadPurpose::Listing), "listing-images");
        assert_eq!(config.bucket_for(UploadPurpose::Profile), "profile-photos");
        assert_eq!(config.storage_backend(), StorageBackend::Local);
    }

    #[test]
    fn validate_accepts_complete_local_config() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn validate_requires_local_paths() {
        let config = UploadConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LOCAL_STORAGE_PATH"));
    }

    #[test]
    fn validate_requires_s3_region() {
        let mut config = local_config();
        config.storage.backend = Some(StorageBackend::S3);
        assert!(config.validate().is_err());
        config.storage.aws_region = Some("eu-west-1".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_retries_and_empty_types() {
        let mut config = local_config();
        config.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = local_config();
        config.profile_policy.allowed_content_types.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PROFILE_ALLOWED_CONTENT_TYPES"));
    }
}
