//! Bitmap export to PNG and JPEG.
//!
//! Composed bitmaps use BGR channel order and little-endian samples; the
//! `image` crate expects RGB in native order, so every export goes through
//! [`to_dynamic_image`].
//!
//! # Format limits
//!
//! - **PNG** keeps 16-bit samples and alpha.
//! - **JPEG** is 8-bit without alpha, so 16-bit data is reduced and alpha
//!   dropped before encoding.
//! - Float pixel types are converted to 8-bit first (values clamped to
//!   `[0, 255]`).

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};

use crate::error::ExportError;
use crate::pixel::{convert, Bitmap, PixelType};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Values below 1 become 1, values above 100 become 100.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Output Format
// =============================================================================

/// Image file format to encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// Pick the format from a file extension (`png`, `jpg`, `jpeg`).
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for a missing or unknown extension.
    pub fn from_path(path: &Path, quality: u8) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg {
                quality: clamp_quality(quality),
            }),
            _ => Err(ExportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Convert a bitmap into an RGB(A) `DynamicImage`.
///
/// # Errors
///
/// Returns `UnsupportedPixelType` for complex and 64-bit float types.
pub fn to_dynamic_image(bitmap: &Bitmap) -> Result<DynamicImage, ExportError> {
    match bitmap.pixel_type() {
        PixelType::Gray32Float => return to_dynamic_image(&convert(bitmap, PixelType::Gray8)?),
        PixelType::Bgr96Float => return to_dynamic_image(&convert(bitmap, PixelType::Bgr24)?),
        _ => {}
    }

    let (width, height) = (bitmap.width(), bitmap.height());
    let image = match bitmap.pixel_type() {
        PixelType::Gray8 => {
            let pixels = packed_rows(bitmap);
            DynamicImage::ImageLuma8(buffer::<Luma<u8>>(width, height, pixels)?)
        }
        PixelType::Gray16 => {
            let pixels = u16_samples(&packed_rows(bitmap));
            DynamicImage::ImageLuma16(buffer::<Luma<u16>>(width, height, pixels)?)
        }
        PixelType::Bgr24 => {
            let mut pixels = packed_rows(bitmap);
            swap_red_blue(&mut pixels, 3);
            DynamicImage::ImageRgb8(buffer::<Rgb<u8>>(width, height, pixels)?)
        }
        PixelType::Bgra32 => {
            let mut pixels = packed_rows(bitmap);
            swap_red_blue(&mut pixels, 4);
            DynamicImage::ImageRgba8(buffer::<Rgba<u8>>(width, height, pixels)?)
        }
        PixelType::Bgr48 => {
            let mut pixels = u16_samples(&packed_rows(bitmap));
            swap_red_blue(&mut pixels, 3);
            DynamicImage::ImageRgb16(buffer::<Rgb<u16>>(width, height, pixels)?)
        }
        other => return Err(ExportError::UnsupportedPixelType(other)),
    };

    Ok(image)
}

/// Encode a bitmap in `format`.
///
/// # Errors
///
/// Returns an error if the pixel type cannot be exported or encoding fails.
pub fn encode(bitmap: &Bitmap, format: OutputFormat) -> Result<Bytes, ExportError> {
    let image = to_dynamic_image(bitmap)?;
    let mut output = Vec::new();

    match format {
        OutputFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
                .map_err(|e| ExportError::Encode {
                    message: e.to_string(),
                })?;
        }
        OutputFormat::Jpeg { quality } => {
            let mut encoder = JpegEncoder::new_with_quality(&mut output, clamp_quality(quality));
            let result = if image.color().has_color() {
                encoder.encode_image(&image.to_rgb8())
            } else {
                encoder.encode_image(&image.to_luma8())
            };
            result.map_err(|e| ExportError::Encode {
                message: e.to_string(),
            })?;
        }
    }

    Ok(Bytes::from(output))
}

/// Encode a bitmap and write it to `path`, picking the format from the
/// extension.
pub async fn write_to_path(bitmap: &Bitmap, path: &Path, quality: u8) -> Result<usize, ExportError> {
    let format = OutputFormat::from_path(path, quality)?;
    let encoded = encode(bitmap, format)?;
    tokio::fs::write(path, &encoded)
        .await
        .map_err(|e| ExportError::Encode {
            message: format!("{}: {}", path.display(), e),
        })?;
    Ok(encoded.len())
}

// =============================================================================
// Helpers
// =============================================================================

/// Pixel rows without stride padding.
fn packed_rows(bitmap: &Bitmap) -> Vec<u8> {
    let line = bitmap.line_size();
    let mut out = Vec::with_capacity(line * bitmap.height() as usize);
    for y in 0..bitmap.height() {
        out.extend_from_slice(&bitmap.row(y)[..line]);
    }
    out
}

fn u16_samples(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

fn swap_red_blue<T>(samples: &mut [T], channels: usize) {
    for px in samples.chunks_exact_mut(channels) {
        px.swap(0, 2);
    }
}

fn buffer<P: image::Pixel>(
    width: u32,
    height: u32,
    samples: Vec<P::Subpixel>,
) -> Result<ImageBuffer<P, Vec<P::Subpixel>>, ExportError> {
    ImageBuffer::from_raw(width, height, samples).ok_or_else(|| ExportError::Encode {
        message: format!("pixel buffer does not match {}x{}", width, height),
    })
}

// =============================================================================
// Tests
// =============================================================================
