//! Shared fakes and fixtures for pipeline integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration as ChronoDuration, Utc};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use souk_core::{Session, SessionError, SessionProvider, StorageBackend, UploadConfig};
use souk_storage::{ObjectStorage, StorageError, StorageResult, UploadOptions};
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// One recorded `upload` call.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub bucket: String,
    pub path: String,
    pub data: Bytes,
    pub options: UploadOptions,
    pub at: Instant,
}

/// In-memory storage port that records calls and fails on demand.
pub struct FakeStorage {
    failures_left: Mutex<u32>,
    failure: fn() -> StorageError,
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub removed: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::failing(0, || StorageError::BackendError("unused".into()))
    }

    /// Fail the first `times` uploads with `failure()`, then succeed.
    pub fn failing(times: u32, failure: fn() -> StorageError) -> Self {
        Self {
            failures_left: Mutex::new(times),
            failure,
            uploads: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing(failure: fn() -> StorageError) -> Self {
        Self::failing(u32::MAX, failure)
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    /// Gaps between consecutive upload attempts.
    pub fn attempt_gaps(&self) -> Vec<Duration> {
        let uploads = self.uploads();
        uploads
            .windows(2)
            .map(|pair| pair[1].at.duration_since(pair[0].at))
            .collect()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> StorageResult<()> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            data,
            options: options.clone(),
            at: Instant::now(),
        });

        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err((self.failure)());
        }
        Ok(())
    }

    async fn public_url(&self, bucket: &str, path: &str) -> StorageResult<String> {
        Ok(format!("https://cdn.souk.test/{}/{}", bucket, path))
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        self.removed
            .lock()
            .unwrap()
            .push((bucket.to_string(), paths.to_vec()));
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Session port returning a scripted result.
pub enum FakeSessions {
    Active,
    Expired,
    SignedOut,
    Broken,
}

#[async_trait]
impl SessionProvider for FakeSessions {
    async fn get_session(&self) -> Result<Option<Session>, SessionError> {
        let session = |expires_at| Session {
            user_id: "user-1".to_string(),
            access_token: "token".to_string(),
            expires_at,
        };
        match self {
            FakeSessions::Active => Ok(Some(session(Some(Utc::now() + ChronoDuration::hours(1))))),
            FakeSessions::Expired => Ok(Some(session(Some(Utc::now() - ChronoDuration::minutes(5))))),
            FakeSessions::SignedOut => Ok(None),
            FakeSessions::Broken => Err(SessionError("identity service unavailable".into())),
        }
    }
}

/// Config with a short retry delay so tests stay fast.
pub fn test_config() -> UploadConfig {
    UploadConfig {
        retry_delay: Duration::from_millis(10),
        ..UploadConfig::default()
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 90, 160])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// A noisy photo-like JPEG; noise keeps the encoded size realistic.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    buffer
}
