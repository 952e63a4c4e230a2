//! Photo re-encoding under a fixed byte ceiling.
//!
//! Moderators review these photos, so compression favors keeping the full
//! frame legible: downscale by longest edge first, then walk quality down
//! until the encoded output fits.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

use arbora_core::models::CompressedAsset;
use arbora_core::AppConfig;

/// Quality steps tried at each resolution, best first.
const QUALITY_LADDER: [u8; 6] = [85, 75, 65, 55, 45, 35];

/// Smallest longest-edge worth emitting; below this the photo is useless for
/// moderation review.
const MIN_EDGE: u32 = 64;

/// Compression errors
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("Image does not fit {ceiling} bytes even at minimum quality")]
    CeilingUnreachable { ceiling: usize },
}

/// Output format for compressed photos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// WebP sources stay WebP (alpha survives); everything else becomes JPEG.
    fn for_content_type(content_type: &str) -> Self {
        if content_type.eq_ignore_ascii_case("image/webp") {
            OutputFormat::WebP
        } else {
            OutputFormat::Jpeg
        }
    }
}

/// Photo compressor with a deterministic byte budget.
#[derive(Debug, Clone, Copy)]
pub struct PhotoCompressor {
    ceiling_bytes: usize,
    max_edge: u32,
}

impl PhotoCompressor {
    pub fn new(ceiling_bytes: usize, max_edge: u32) -> Self {
        Self {
            ceiling_bytes,
            max_edge,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.compressed_ceiling_bytes, config.max_image_edge)
    }

    /// Re-encode `data` so the result fits the byte ceiling.
    ///
    /// The source is downscaled proportionally when its longest edge exceeds
    /// the configured maximum, then encoded down the quality ladder; if the
    /// ladder bottoms out the image is halved and the ladder restarts.
    /// CPU-bound; callers on the async runtime should wrap this in
    /// `spawn_blocking`.
    pub fn compress(
        &self,
        data: &[u8],
        content_type: &str,
    ) -> Result<CompressedAsset, CompressionError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CompressionError::Decode(e.to_string()))?;
        let mut img = reader
            .decode()
            .map_err(|e| CompressionError::Decode(e.to_string()))?;

        let format = OutputFormat::for_content_type(content_type);
        let source_edge = longest_edge(&img);

        if source_edge > self.max_edge {
            img = img.resize(self.max_edge, self.max_edge, FilterType::Lanczos3);
            tracing::debug!(
                source_edge,
                max_edge = self.max_edge,
                "Downscaled photo before encoding"
            );
        }

        loop {
            for quality in QUALITY_LADDER {
                let encoded = encode(&img, format, quality)?;
                if encoded.len() <= self.ceiling_bytes {
                    let (width, height) = img.dimensions();
                    tracing::debug!(
                        quality,
                        width,
                        height,
                        size_bytes = encoded.len(),
                        format = format.to_mime_type(),
                        "Photo compressed"
                    );
                    return Ok(CompressedAsset {
                        data: Bytes::from(encoded),
                        content_type: format.to_mime_type().to_string(),
                        width,
                        height,
                    });
                }
            }

            let edge = longest_edge(&img);
            if edge / 2 < MIN_EDGE {
                return Err(CompressionError::CeilingUnreachable {
                    ceiling: self.ceiling_bytes,
                });
            }
            img = img.resize(edge / 2, edge / 2, FilterType::Lanczos3);
        }
    }
}

fn longest_edge(img: &DynamicImage) -> u32 {
    let (width, height) = img.dimensions();
    width.max(height)
}

fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, CompressionError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality),
        OutputFormat::WebP => encode_webp(img, quality),
    }
}

/// Encode to JPEG using mozjpeg
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, CompressionError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| CompressionError::Encode(e.to_string()))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| CompressionError::Encode(e.to_string()))?;
    comp.finish()
        .map_err(|e| CompressionError::Encode(e.to_string()))
}

/// Encode to WebP
fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, CompressionError> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality as f32);

    Ok(webp_data.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// Gradient fill so JPEG output is not trivially tiny.
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_small_image_is_not_resized() {
        let compressor = PhotoCompressor::new(1024 * 1024, 1920);
        let data = png_bytes(&gradient(320, 240));

        let asset = compressor.compress(&data, "image/png").unwrap();
        assert_eq!((asset.width, asset.height), (320, 240));
        assert_eq!(asset.content_type, "image/jpeg");
        assert!(asset.size() <= 1024 * 1024);
    }

    #[test]
    fn test_oversized_image_downscaled_with_ratio_preserved() {
        let compressor = PhotoCompressor::new(1024 * 1024, 1920);
        let data = png_bytes(&gradient(4000, 2000));

        let asset = compressor.compress(&data, "image/png").unwrap();
        assert_eq!(asset.width.max(asset.height), 1920);
        // 2:1 source ratio preserved within rounding.
        let ratio = asset.width as f64 / asset.height as f64;
        assert!((ratio - 2.0).abs() < 0.01, "ratio was {}", ratio);
        assert!(asset.size() <= 1024 * 1024);
    }

    #[test]
    fn test_output_respects_tight_ceiling() {
        let ceiling = 16 * 1024;
        let compressor = PhotoCompressor::new(ceiling, 1920);
        let data = png_bytes(&gradient(1600, 1200));

        let asset = compressor.compress(&data, "image/png").unwrap();
        assert!(
            asset.size() <= ceiling,
            "{} bytes exceeds ceiling",
            asset.size()
        );
    }

    #[test]
    fn test_webp_input_stays_webp() {
        let compressor = PhotoCompressor::new(1024 * 1024, 1920);
        let img = gradient(400, 300);
        let rgba = DynamicImage::ImageRgb8(img).to_rgba8();
        let data = webp::Encoder::from_rgba(&rgba, 400, 300)
            .encode(90.0)
            .to_vec();

        let asset = compressor.compress(&data, "image/webp").unwrap();
        assert_eq!(asset.content_type, "image/webp");
        assert_eq!((asset.width, asset.height), (400, 300));
    }

    #[test]
    fn test_jpeg_input_stays_jpeg() {
        let compressor = PhotoCompressor::new(1024 * 1024, 1920);
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(gradient(300, 300))
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();

        let asset = compressor.compress(&buf.into_inner(), "image/jpeg").unwrap();
        assert_eq!(asset.content_type, "image/jpeg");
    }

    #[test]
    fn test_undecodable_input_is_terminal() {
        let compressor = PhotoCompressor::new(1024 * 1024, 1920);
        assert!(matches!(
            compressor.compress(b"not an image at all", "image/jpeg"),
            Err(CompressionError::Decode(_))
        ));
    }

    #[test]
    fn test_deterministic_output() {
        let compressor = PhotoCompressor::new(1024 * 1024, 1920);
        let data = png_bytes(&gradient(640, 480));

        let first = compressor.compress(&data, "image/png").unwrap();
        let second = compressor.compress(&data, "image/png").unwrap();
        assert_eq!(first.data, second.data);
    }
}
