//! JPEG XR backend on top of jxrlib.

use std::io::Cursor;

use ::jpegxr::{ImageDecode, JXRError, PixelFormat};

use crate::error::DecodeError;
use crate::pixel::{Bitmap, PixelType, MAX_BITMAP_BYTES};

use super::JpegXrDecoder;

/// Decodes JPEG XR streams with the reference jxrlib codec.
///
/// This is the backend [`CodecDispatch::new`](super::CodecDispatch::new)
/// installs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JxrLibDecoder;

/// How a jxrlib pixel format is turned into one of ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repack {
    /// Bytes are already in our layout
    None,
    /// Swap the first and third byte of each 3-byte pixel
    SwapRgb,
    /// Drop the fourth (padding) byte of each pixel
    DropPad,
}

/// Target pixel type, bytes per decoded pixel, and repacking for `format`.
///
/// 48-bit RGB streams in CZI documents carry BGR samples, so they map to
/// `Bgr48` unchanged.
fn layout(format: PixelFormat) -> Option<(PixelType, usize, Repack)> {
    let layout = match format {
        PixelFormat::PixelFormat8bppGray => (PixelType::Gray8, 1, Repack::None),
        PixelFormat::PixelFormat16bppGray => (PixelType::Gray16, 2, Repack::None),
        PixelFormat::PixelFormat32bppGrayFloat => (PixelType::Gray32Float, 4, Repack::None),
        PixelFormat::PixelFormat24bppBGR => (PixelType::Bgr24, 3, Repack::None),
        PixelFormat::PixelFormat24bppRGB => (PixelType::Bgr24, 3, Repack::SwapRgb),
        PixelFormat::PixelFormat32bppBGR => (PixelType::Bgr24, 4, Repack::DropPad),
        PixelFormat::PixelFormat32bppBGRA => (PixelType::Bgra32, 4, Repack::None),
        PixelFormat::PixelFormat48bppRGB => (PixelType::Bgr48, 6, Repack::None),
        _ => return None,
    };
    Some(layout)
}

fn jxr_error(e: JXRError) -> DecodeError {
    DecodeError::JpegXr(e.to_string())
}

impl JpegXrDecoder for JxrLibDecoder {
    fn decode(&self, data: &[u8]) -> Result<Bitmap, DecodeError> {
        let mut image = ImageDecode::with_reader(Cursor::new(data)).map_err(jxr_error)?;
        let (width, height) = image.get_size().map_err(jxr_error)?;
        let format = image.get_pixel_format().map_err(jxr_error)?;

        let (pixel_type, decoded_bpp, repack) = layout(format).ok_or_else(|| {
            DecodeError::CorruptData(format!("unsupported JPEG XR pixel format {:?}", format))
        })?;

        let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(DecodeError::CorruptData(format!(
                    "invalid JPEG XR image size {}x{}",
                    width, height
                )))
            }
        };

        let stride = width as usize * decoded_bpp;
        let size = stride
            .checked_mul(height as usize)
            .filter(|&s| s <= MAX_BITMAP_BYTES)
            .ok_or_else(|| {
                DecodeError::CorruptData(format!(
                    "JPEG XR image {}x{} exceeds {} bytes",
                    width, height, MAX_BITMAP_BYTES
                ))
            })?;

        let mut buffer = vec![0u8; size];
        image.copy_all(&mut buffer, stride).map_err(jxr_error)?;

        let data = match repack {
            Repack::None => buffer,
            Repack::SwapRgb => {
                for px in buffer.chunks_exact_mut(3) {
                    px.swap(0, 2);
                }
                buffer
            }
            Repack::DropPad => buffer
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        };

        let line = width as usize * pixel_type.bytes_per_pixel();
        Ok(Bitmap::from_data(pixel_type, width, height, line, data)?)
    }
}
