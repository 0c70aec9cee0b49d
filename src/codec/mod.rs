//! Codec dispatch: compressed sub-block bytes to bitmaps.
//!
//! The set of codecs is fixed by the file format, so it is a closed enum
//! with a single dispatch function. JPEG XR goes through the
//! [`JpegXrDecoder`] seam: [`CodecDispatch::new`] installs the jxrlib
//! backend, and callers may replace or remove it. There is no process-wide
//! registry.
//!
//! # Discrepancy handling
//!
//! Each payload kind has its own flag in [`DecodeOptions`]. When a flag is
//! set (the default), declared and actual sizes that disagree are resolved
//! by clipping or zero padding to the declared size. When cleared, the
//! disagreement is returned as [`DecodeError::Mismatch`]. An uncompressed
//! payload that is too short is always an error.

mod jpegxr;
mod jxrlib;
mod raw;
mod zstd_codec;

use std::sync::Arc;

use crate::error::DecodeError;
use crate::pixel::{checked_packed_size, Bitmap, PixelType, MAX_BITMAP_BYTES};

pub use self::jpegxr::JpegXrDecoder;
pub use jxrlib::JxrLibDecoder;

// =============================================================================
// Codec
// =============================================================================

/// Compression codes that can appear in a sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Raw pixels, stride equal to the line size
    Uncompressed,
    /// JPEG XR stream
    JpegXr,
    /// Bare zstd frame
    Zstd0,
    /// Small header followed by a zstd frame
    Zstd1,
}

/// Raw compression code of [`Codec::Uncompressed`].
pub const COMPRESSION_UNCOMPRESSED: i32 = 0;
/// Raw compression code of JPEG (not supported).
pub const COMPRESSION_JPG: i32 = 1;
/// Raw compression code of LZW (not supported).
pub const COMPRESSION_LZW: i32 = 2;
/// Raw compression code of [`Codec::JpegXr`].
pub const COMPRESSION_JPGXR: i32 = 4;
/// Raw compression code of [`Codec::Zstd0`].
pub const COMPRESSION_ZSTD0: i32 = 5;
/// Raw compression code of [`Codec::Zstd1`].
pub const COMPRESSION_ZSTD1: i32 = 6;

impl Codec {
    /// Map a raw compression code.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCompression` for every code outside the
    /// supported set, including JPEG and LZW.
    pub fn from_raw(code: i32) -> Result<Codec, DecodeError> {
        match code {
            COMPRESSION_UNCOMPRESSED => Ok(Codec::Uncompressed),
            COMPRESSION_JPGXR => Ok(Codec::JpegXr),
            COMPRESSION_ZSTD0 => Ok(Codec::Zstd0),
            COMPRESSION_ZSTD1 => Ok(Codec::Zstd1),
            other => Err(DecodeError::UnsupportedCompression(other)),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Codec::Uncompressed => COMPRESSION_UNCOMPRESSED,
            Codec::JpegXr => COMPRESSION_JPGXR,
            Codec::Zstd0 => COMPRESSION_ZSTD0,
            Codec::Zstd1 => COMPRESSION_ZSTD1,
        }
    }

    pub fn is_compressed(self) -> bool {
        self != Codec::Uncompressed
    }

    pub fn name(self) -> &'static str {
        match self {
            Codec::Uncompressed => "uncompressed",
            Codec::JpegXr => "jpgxr",
            Codec::Zstd0 => "zstd0",
            Codec::Zstd1 => "zstd1",
        }
    }
}

// =============================================================================
// DecodeOptions
// =============================================================================

/// Discrepancy policy per payload kind. `true` means tolerant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Uncompressed payload longer than declared: ignore the extra bytes
    pub handle_uncompressed_data_size_mismatch: bool,

    /// JPEG XR bitmap differs from the declared size or pixel type:
    /// convert and clip/pad
    pub handle_jpgxr_bitmap_mismatch: bool,

    /// Decompressed zstd size differs from the declared size: clip/pad
    pub handle_zstd_data_size_mismatch: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            handle_uncompressed_data_size_mismatch: true,
            handle_jpgxr_bitmap_mismatch: true,
            handle_zstd_data_size_mismatch: true,
        }
    }
}

impl DecodeOptions {
    /// Every discrepancy is an error.
    pub fn strict() -> Self {
        Self {
            handle_uncompressed_data_size_mismatch: false,
            handle_jpgxr_bitmap_mismatch: false,
            handle_zstd_data_size_mismatch: false,
        }
    }
}

// =============================================================================
// CodecDispatch
// =============================================================================

/// Decodes sub-block payloads into bitmaps of the declared geometry.
#[derive(Clone)]
pub struct CodecDispatch {
    jpegxr: Option<Arc<dyn JpegXrDecoder>>,
}

impl std::fmt::Debug for CodecDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecDispatch")
            .field("jpegxr", &self.jpegxr.is_some())
            .finish()
    }
}

impl Default for CodecDispatch {
    fn default() -> Self {
        Self {
            jpegxr: Some(Arc::new(JxrLibDecoder)),
        }
    }
}

impl CodecDispatch {
    /// A dispatcher with every supported codec, JPEG XR through jxrlib.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the JPEG XR backend.
    pub fn with_jpegxr(mut self, decoder: Arc<dyn JpegXrDecoder>) -> Self {
        self.jpegxr = Some(decoder);
        self
    }

    /// Remove the JPEG XR backend; such sub-blocks then fail with
    /// `DecoderUnavailable`.
    pub fn without_jpegxr(mut self) -> Self {
        self.jpegxr = None;
        self
    }

    /// Whether `codec` can be decoded with the configured backends.
    pub fn supports(&self, codec: Codec) -> bool {
        codec != Codec::JpegXr || self.jpegxr.is_some()
    }

    /// Decode `data` into a bitmap of `pixel_type` and `width` x `height`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedCompression` for codes outside the supported set
    /// - `DecoderUnavailable` for JPEG XR without a backend
    /// - `CorruptData` for truncated payloads or malformed framing
    /// - `Mismatch` when a strict policy flag is hit
    ///
    /// A declared geometry larger than [`MAX_BITMAP_BYTES`] is rejected as
    /// `CorruptData` before any payload is touched.
    pub fn decode(
        &self,
        compression_raw: i32,
        data: &[u8],
        pixel_type: PixelType,
        width: u32,
        height: u32,
        options: &DecodeOptions,
    ) -> Result<Bitmap, DecodeError> {
        let codec = Codec::from_raw(compression_raw)?;
        if checked_packed_size(pixel_type, width as u64, height as u64).is_none() {
            return Err(DecodeError::CorruptData(format!(
                "declared {}x{} {} sub-block exceeds {} bytes",
                width, height, pixel_type, MAX_BITMAP_BYTES
            )));
        }

        match codec {
            Codec::Uncompressed => raw::decode(data, pixel_type, width, height, options),
            Codec::Zstd0 => zstd_codec::decode_zstd0(data, pixel_type, width, height, options),
            Codec::Zstd1 => zstd_codec::decode_zstd1(data, pixel_type, width, height, options),
            Codec::JpegXr => {
                let decoder = self
                    .jpegxr
                    .as_ref()
                    .ok_or(DecodeError::DecoderUnavailable("jpgxr"))?;
                jpegxr::decode(decoder.as_ref(), data, pixel_type, width, height, options)
            }
        }
    }
}

/// Bytes of a packed `width` x `height` buffer of `pixel_type`.
pub(crate) fn packed_size(pixel_type: PixelType, width: u32, height: u32) -> usize {
    width as usize * pixel_type.bytes_per_pixel() * height as usize
}
