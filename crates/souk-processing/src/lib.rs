//! Souk media ingestion
//!
//! Validates, watermarks, names and stores user-submitted images:
//! validate → watermark (listing images only) → name/sanitize → authenticate → upload with retry.

pub mod image;
pub mod upload;
pub mod validator;

pub use image::{TextWatermark, WatermarkLayout};
pub use upload::pipeline::MediaPipeline;
pub use upload::progress::{ProgressReceiver, ProgressSender};
pub use upload::retry::{retry, RetryPolicy};
pub use validator::MediaValidator;
