use tracing::warn;

use crate::error::DecodeError;
use crate::geometry::IntRect;
use crate::pixel::{convert, Bitmap, PixelType};

use super::DecodeOptions;

/// Backend capable of decoding a JPEG XR stream.
///
/// The stream determines its own size and pixel type; the dispatcher
/// reconciles them with the sub-block's declared values.
pub trait JpegXrDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<Bitmap, DecodeError>;
}

pub(super) fn decode(
    decoder: &dyn JpegXrDecoder,
    data: &[u8],
    pixel_type: PixelType,
    width: u32,
    height: u32,
    options: &DecodeOptions,
) -> Result<Bitmap, DecodeError> {
    let decoded = decoder.decode(data)?;
    let type_differs = decoded.pixel_type() != pixel_type;
    let size_differs = decoded.width() != width || decoded.height() != height;

    if !type_differs && !size_differs {
        return Ok(decoded);
    }

    if !options.handle_jpgxr_bitmap_mismatch {
        return Err(DecodeError::Mismatch(format!(
            "JPEG XR stream is {}x{} {}, sub-block declares {}x{} {}",
            decoded.width(),
            decoded.height(),
            decoded.pixel_type(),
            width,
            height,
            pixel_type
        )));
    }

    warn!(
        decoded_width = decoded.width(),
        decoded_height = decoded.height(),
        decoded_type = %decoded.pixel_type(),
        width,
        height,
        pixel_type = %pixel_type,
        "Reconciling JPEG XR bitmap with declared sub-block information"
    );

    let converted = if type_differs {
        convert(&decoded, pixel_type)?
    } else {
        decoded
    };

    if !size_differs {
        return Ok(converted);
    }

    // Clip or zero-pad to the declared size, anchored at the top-left
    let mut out = Bitmap::new(pixel_type, width, height);
    let placement = IntRect::new(0, 0, converted.width() as i32, converted.height() as i32);
    out.paint(&converted, placement, None)?;
    Ok(out)
}
