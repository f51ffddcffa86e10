use crate::traits::{ObjectStorage, StorageError, StorageResult, UploadOptions};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutMode, PutOptions, PutPayload,
};
use std::collections::HashMap;

/// S3 storage implementation
///
/// Holds one client per logical bucket. The physical bucket name is the
/// logical name with the optional configured prefix in front.
#[derive(Clone)]
pub struct S3Storage {
    stores: HashMap<String, (String, AmazonS3)>,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `buckets` - Logical bucket names the pipeline writes to
    /// * `bucket_prefix` - Optional prefix added to each bucket name on S3
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        buckets: &[String],
        bucket_prefix: Option<String>,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let prefix = bucket_prefix.unwrap_or_default();
        let mut stores = HashMap::new();

        for bucket in buckets {
            let physical = format!("{}{}", prefix, bucket);
            let mut builder = AmazonS3Builder::from_env()
                .with_region(region.clone())
                .with_bucket_name(physical.clone());

            if let Some(ref endpoint) = endpoint_url {
                let allow_http = endpoint.starts_with("http://");
                builder = builder
                    .with_endpoint(endpoint.clone())
                    .with_allow_http(allow_http);
            }

            let store = builder
                .build()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;
            stores.insert(bucket.clone(), (physical, store));
        }

        Ok(S3Storage {
            stores,
            region,
            endpoint_url,
        })
    }

    fn store(&self, bucket: &str) -> StorageResult<&(String, AmazonS3)> {
        self.stores
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, physical_bucket: &str, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                physical_bucket,
                key
            )
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                physical_bucket, self.region, key
            )
        }
    }
}

/// Object key as `object_store` writes it; `.` segments come out percent-encoded.
fn object_key(path: &str) -> Path {
    Path::from(path)
}

fn map_object_store_error(bucket: &str, err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::NotFound { .. } => StorageError::BucketNotFound(bucket.to_string()),
        ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
            StorageError::PermissionDenied(err.to_string())
        }
        ObjectStoreError::AlreadyExists { path, .. } => StorageError::AlreadyExists(path),
        other => StorageError::BackendError(other.to_string()),
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<()> {
        let (physical, store) = self.store(bucket)?;
        let size = data.len() as u64;
        let location = object_key(path);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, options.content_type.clone().into());
        attributes.insert(
            Attribute::CacheControl,
            format!("max-age={}", options.cache_control).into(),
        );
        let put_options = PutOptions {
            mode: if options.upsert {
                PutMode::Overwrite
            } else {
                PutMode::Create
            },
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        store
            .put_opts(&location, PutPayload::from(data), put_options)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %physical,
                    key = %path,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                map_object_store_error(bucket, e)
            })?;

        tracing::info!(
            bucket = %physical,
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn public_url(&self, bucket: &str, path: &str) -> StorageResult<String> {
        let (physical, _) = self.store(bucket)?;
        Ok(self.generate_url(physical, object_key(path).as_ref()))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        let (physical, store) = self.store(bucket)?;

        for path in paths {
            let location = object_key(path);
            match store.delete(&location).await {
                Ok(()) => {
                    tracing::info!(bucket = %physical, key = %path, "S3 delete successful");
                }
                Err(ObjectStoreError::NotFound { .. }) => {
                    tracing::debug!(bucket = %physical, key = %path, "Object already absent");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        bucket = %physical,
                        key = %path,
                        "S3 delete failed"
                    );
                    return Err(map_object_store_error(bucket, e));
                }
            }
        }

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
