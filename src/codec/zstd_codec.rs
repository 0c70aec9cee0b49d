//! zstd-compressed sub-blocks.
//!
//! `zstd0` payloads are a bare zstd frame. `zstd1` payloads start with a
//! small header:
//!
//! ```text
//! byte 0      header size in bytes, including this byte
//! byte 1..    chunks: one type byte followed by its payload
//!             type 1: one flags byte, bit 0 = hi/lo byte packing
//! ```
//!
//! With hi/lo packing, a 16-bit image is stored as all low bytes followed by
//! all high bytes, which compresses better. Only Gray16 and Bgr48 can use it.

use std::io::Read;

use tracing::warn;

use crate::error::DecodeError;
use crate::pixel::{Bitmap, PixelType};

use super::{packed_size, DecodeOptions};

/// Chunk type carrying the packing flags.
const CHUNK_PACKING: u8 = 1;

/// Flag bit for hi/lo byte packing.
const FLAG_HILO_PACKED: u8 = 0x01;

/// Parsed `zstd1` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Zstd1Header {
    pub header_size: usize,
    pub hilo_packed: bool,
}

pub(crate) fn parse_zstd1_header(data: &[u8]) -> Result<Zstd1Header, DecodeError> {
    let header_size = *data
        .first()
        .ok_or_else(|| DecodeError::CorruptData("empty zstd1 payload".into()))?
        as usize;

    if header_size == 0 || header_size > data.len() {
        return Err(DecodeError::CorruptData(format!(
            "invalid zstd1 header size {} for payload of {} bytes",
            header_size,
            data.len()
        )));
    }

    let mut header = Zstd1Header {
        header_size,
        hilo_packed: false,
    };

    let mut pos = 1;
    while pos < header_size {
        match data[pos] {
            CHUNK_PACKING => {
                if pos + 1 >= header_size {
                    return Err(DecodeError::CorruptData("truncated zstd1 header chunk".into()));
                }
                header.hilo_packed = data[pos + 1] & FLAG_HILO_PACKED != 0;
                pos += 2;
            }
            other => {
                return Err(DecodeError::CorruptData(format!(
                    "unknown zstd1 header chunk type {}",
                    other
                )));
            }
        }
    }

    Ok(header)
}

pub(super) fn decode_zstd0(
    data: &[u8],
    pixel_type: PixelType,
    width: u32,
    height: u32,
    options: &DecodeOptions,
) -> Result<Bitmap, DecodeError> {
    let expected = packed_size(pixel_type, width, height);
    let raw = decompress(data, expected)?;
    let raw = fit_to_size(raw, expected, options)?;
    to_bitmap(raw, pixel_type, width, height)
}

pub(super) fn decode_zstd1(
    data: &[u8],
    pixel_type: PixelType,
    width: u32,
    height: u32,
    options: &DecodeOptions,
) -> Result<Bitmap, DecodeError> {
    let header = parse_zstd1_header(data)?;
    if header.hilo_packed && !matches!(pixel_type, PixelType::Gray16 | PixelType::Bgr48) {
        return Err(DecodeError::CorruptData(format!(
            "hi/lo byte packing is not valid for {}",
            pixel_type
        )));
    }

    let expected = packed_size(pixel_type, width, height);
    let raw = decompress(&data[header.header_size..], expected)?;
    let mut raw = fit_to_size(raw, expected, options)?;
    if header.hilo_packed {
        raw = unpack_hilo(&raw);
    }
    to_bitmap(raw, pixel_type, width, height)
}

/// Decompress at most `expected + 1` bytes.
///
/// One byte past the declared size is enough to tell an oversized frame
/// apart, so a small payload never expands beyond the sub-block it claims.
fn decompress(data: &[u8], expected: usize) -> Result<Vec<u8>, DecodeError> {
    let decoder =
        zstd::stream::read::Decoder::with_buffer(data).map_err(|e| DecodeError::Zstd(e.to_string()))?;

    let mut raw = Vec::with_capacity(expected);
    decoder
        .take(expected as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|e| DecodeError::Zstd(e.to_string()))?;
    Ok(raw)
}

/// Pad with zeros or truncate to `expected`, or fail under a strict policy.
///
/// `raw` holds at most `expected + 1` bytes, so a longer length only means
/// the frame is larger than declared.
fn fit_to_size(
    mut raw: Vec<u8>,
    expected: usize,
    options: &DecodeOptions,
) -> Result<Vec<u8>, DecodeError> {
    if raw.len() == expected {
        return Ok(raw);
    }

    let oversized = raw.len() > expected;
    if !options.handle_zstd_data_size_mismatch {
        return Err(DecodeError::Mismatch(if oversized {
            format!("zstd payload decompresses to more than {} bytes", expected)
        } else {
            format!(
                "zstd payload decompressed to {} bytes, expected {}",
                raw.len(),
                expected
            )
        }));
    }

    warn!(
        actual = raw.len(),
        expected, oversized, "Resizing decompressed zstd sub-block to declared size"
    );
    raw.resize(expected, 0);
    Ok(raw)
}

/// Interleave a buffer stored as `[lo bytes..., hi bytes...]` back into
/// little-endian 16-bit samples.
pub(crate) fn unpack_hilo(packed: &[u8]) -> Vec<u8> {
    let half = packed.len() / 2;
    let (lo, hi) = packed.split_at(half);
    let mut out = Vec::with_capacity(packed.len());
    for (l, h) in lo.iter().zip(hi.iter()) {
        out.push(*l);
        out.push(*h);
    }
    out
}

fn to_bitmap(
    raw: Vec<u8>,
    pixel_type: PixelType,
    width: u32,
    height: u32,
) -> Result<Bitmap, DecodeError> {
    let stride = width as usize * pixel_type.bytes_per_pixel();
    Ok(Bitmap::from_data(pixel_type, width, height, stride, raw)?)
}
