use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use souk_core::{MediaFile, TransformError};

use super::{codec, glyphs};

/// Text colour alpha (≈0.4 opacity white).
const TEXT_ALPHA: u8 = 102;
const SHADOW_ALPHA: u8 = 128;
const MIN_FONT_SIZE: f32 = 16.0;
const MIN_PADDING: f32 = 12.0;

/// Placement of the watermark text, derived from the image dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkLayout {
    pub font_size: f32,
    pub padding: f32,
    pub shadow_blur: f32,
    pub shadow_offset: f32,
    /// Left edge of the text; the right edge sits `padding` from the image edge.
    pub x: f32,
    pub y: f32,
    pub text_width: f32,
}

impl WatermarkLayout {
    pub fn font_size_for(width: u32, height: u32) -> f32 {
        MIN_FONT_SIZE.max((width as f32 * 0.02).min(height as f32 * 0.03))
    }

    pub fn compute(text: &str, width: u32, height: u32) -> Self {
        let font_size = Self::font_size_for(width, height);
        let padding = MIN_PADDING.max(font_size * 0.5);
        let text_width = glyphs::text_width(text, font_size);

        Self {
            font_size,
            padding,
            shadow_blur: font_size * 0.2,
            shadow_offset: (font_size * 0.06).max(1.0),
            x: width as f32 - padding - text_width,
            y: padding,
            text_width,
        }
    }
}

/// Stamps a brand string onto the top-right corner of listing images.
#[derive(Debug, Clone)]
pub struct TextWatermark {
    text: String,
}

impl TextWatermark {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Draw the watermark (soft shadow first, then semi-transparent white text).
    pub fn apply(&self, img: DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        let layout = WatermarkLayout::compute(&self.text, width, height);
        let mask = glyphs::render_mask(&self.text, layout.font_size);

        // Work on a region around the text only; the blur needs room to spread.
        let margin = (layout.shadow_blur * 3.0 + layout.shadow_offset).ceil() as u32 + 1;
        let origin_x = layout.x.floor() as i64 - margin as i64;
        let origin_y = layout.y.floor() as i64 - margin as i64;
        let region_w = mask.width() + margin * 2;
        let region_h = mask.height() + margin * 2;

        let offset = layout.shadow_offset.round() as u32;
        let mut shadow = RgbaImage::new(region_w, region_h);
        let mut text = RgbaImage::new(region_w, region_h);
        for (x, y, coverage) in mask.enumerate_pixels() {
            if coverage[0] == 0 {
                continue;
            }
            let (sx, sy) = (x + margin + offset, y + margin + offset);
            if sx < region_w && sy < region_h {
                shadow.put_pixel(sx, sy, Rgba([0, 0, 0, SHADOW_ALPHA]));
            }
            text.put_pixel(x + margin, y + margin, Rgba([255, 255, 255, TEXT_ALPHA]));
        }
        let shadow = gaussian_blur_f32(&shadow, (layout.shadow_blur / 2.0).max(0.5));

        let mut canvas = img.to_rgba8();
        imageops::overlay(&mut canvas, &shadow, origin_x, origin_y);
        imageops::overlay(&mut canvas, &text, origin_x, origin_y);

        DynamicImage::ImageRgba8(canvas)
    }

    /// Decode, watermark and re-encode a file in its original MIME type.
    ///
    /// The filename and content type carry over unchanged.
    pub fn stamp(&self, file: &MediaFile) -> Result<MediaFile, TransformError> {
        let img = codec::decode(&file.data)?;
        let stamped = self.apply(img);
        let data = codec::encode(&stamped, &file.content_type)?;

        tracing::debug!(
            filename = %file.filename,
            content_type = %file.content_type,
            original_bytes = file.data.len(),
            watermarked_bytes = data.len(),
            "Watermark applied"
        );

        Ok(MediaFile::new(
            file.filename.clone(),
            file.content_type.clone(),
            data,
        ))
    }
}
