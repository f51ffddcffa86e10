//! Image processing module
//!
//! - Decoding and MIME-preserving re-encoding (codec)
//! - Bitmap text rasterization (glyphs)
//! - Brand watermark for listing images (watermark)

pub mod codec;
pub mod glyphs;
pub mod watermark;

pub use watermark::{TextWatermark, WatermarkLayout};
