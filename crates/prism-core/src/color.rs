//! Dominant color extraction.
//!
//! The quantization algorithm sits behind the [`ColorExtractor`] capability
//! trait so the underlying library can be swapped without touching pipeline
//! logic. The default implementation decodes the source bytes and takes the
//! top entry of a median-cut palette.

use crate::error::PipelineError;

/// Trait implemented by dominant color extraction algorithms.
pub trait ColorExtractor: Send + Sync {
    /// Algorithm name for logging (e.g. "median-cut").
    fn name(&self) -> &str;

    /// Extract the dominant color from raw (encoded) image bytes.
    fn extract(&self, bytes: &[u8]) -> Result<[u8; 3], PipelineError>;
}

/// Median-cut (MMCQ) extractor backed by color-thief.
#[derive(Debug, Clone)]
pub struct MedianCut {
    /// Pixel sampling stride; 1 scans every pixel, 10 is the library default
    quality: u8,

    /// Palette size to quantize into before taking the top entry
    max_colors: u8,
}

impl MedianCut {
    pub fn new(quality: u8, max_colors: u8) -> Self {
        Self {
            quality,
            max_colors,
        }
    }
}

impl Default for MedianCut {
    fn default() -> Self {
        Self::new(10, 5)
    }
}

impl ColorExtractor for MedianCut {
    fn name(&self) -> &str {
        "median-cut"
    }

    fn extract(&self, bytes: &[u8]) -> Result<[u8; 3], PipelineError> {
        let image = image::load_from_memory(bytes).map_err(|e| PipelineError::ColorExtraction {
            message: format!("decode failed: {e}"),
        })?;
        let pixels = image.to_rgb8();

        let palette = color_thief::get_palette(
            pixels.as_raw(),
            color_thief::ColorFormat::Rgb,
            self.quality,
            self.max_colors,
        )
        .map_err(|e| PipelineError::ColorExtraction {
            message: format!("quantization failed: {e:?}"),
        })?;

        let dominant = palette
            .first()
            .ok_or_else(|| PipelineError::ColorExtraction {
                message: "empty palette".to_string(),
            })?;
        Ok([dominant.r, dominant.g, dominant.b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: impl Fn(u32, u32) -> Rgb<u8>) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = pixel(x, y);
        }
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_extract_red_dominant() {
        // Mostly-red gradient: the dominant entry must land in the red family
        let bytes = png_bytes(64, 64, |x, y| {
            Rgb([220u8.saturating_sub((x % 16) as u8), (y % 24) as u8, 30])
        });
        let rgb = MedianCut::default().extract(&bytes).unwrap();
        assert!(rgb[0] > rgb[1], "red should dominate green: {rgb:?}");
        assert!(rgb[0] > rgb[2], "red should dominate blue: {rgb:?}");
        assert!(rgb[0] > 150, "expected a strong red channel: {rgb:?}");
    }

    #[test]
    fn test_extract_rejects_garbage() {
        let err = MedianCut::default().extract(b"definitely not an image");
        assert!(matches!(
            err,
            Err(PipelineError::ColorExtraction { .. })
        ));
    }

    #[test]
    fn test_extractor_name() {
        assert_eq!(MedianCut::default().name(), "median-cut");
    }
}
