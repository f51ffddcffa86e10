//! Decoding and MIME-preserving re-encoding of uploaded images.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use souk_core::content_types::normalize;
use souk_core::TransformError;
use std::io::Cursor;

/// Quality used when re-encoding lossy formats (0-100).
pub const ENCODE_QUALITY: u8 = 95;

/// Decode image bytes, guessing the format from the content.
pub fn decode(data: &[u8]) -> Result<DynamicImage, TransformError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode(e.to_string()))?;
    reader
        .decode()
        .map_err(|e| TransformError::Decode(e.to_string()))
}

/// Encode `img` in the given MIME type.
pub fn encode(img: &DynamicImage, content_type: &str) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Vec::new();

    match normalize(content_type).as_str() {
        "image/jpeg" | "image/jpg" => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, ENCODE_QUALITY))
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
        "image/png" => {
            img.write_with_encoder(PngEncoder::new(&mut buffer))
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
        "image/webp" => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            let encoder = webp::Encoder::from_rgba(&rgba, width, height);
            let webp_data = encoder.encode(ENCODE_QUALITY as f32);
            buffer.extend_from_slice(&webp_data);
        }
        "image/gif" => {
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Gif)
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
        other => {
            return Err(TransformError::Environment(format!(
                "no encoder available for {}",
                other
            )));
        }
    }

    Ok(buffer)
}
