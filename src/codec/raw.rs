use tracing::warn;

use crate::error::DecodeError;
use crate::pixel::{Bitmap, PixelType};

use super::{packed_size, DecodeOptions};

/// Wrap an uncompressed payload.
///
/// The stride is exactly one line of pixels. A short payload can never be
/// reconstructed and fails regardless of the policy.
pub(super) fn decode(
    data: &[u8],
    pixel_type: PixelType,
    width: u32,
    height: u32,
    options: &DecodeOptions,
) -> Result<Bitmap, DecodeError> {
    let expected = packed_size(pixel_type, width, height);

    if data.len() < expected {
        return Err(DecodeError::CorruptData(format!(
            "uncompressed payload has {} bytes, {}x{} {} needs {}",
            data.len(),
            width,
            height,
            pixel_type,
            expected
        )));
    }

    if data.len() > expected {
        if !options.handle_uncompressed_data_size_mismatch {
            return Err(DecodeError::Mismatch(format!(
                "uncompressed payload has {} bytes, expected {}",
                data.len(),
                expected
            )));
        }
        warn!(
            actual = data.len(),
            expected, "Ignoring trailing bytes of uncompressed sub-block"
        );
    }

    let stride = width as usize * pixel_type.bytes_per_pixel();
    Ok(Bitmap::from_data(
        pixel_type,
        width,
        height,
        stride,
        data[..expected].to_vec(),
    )?)
}
