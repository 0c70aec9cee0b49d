//! Explicit pixel type conversion.
//!
//! Rules between the supported types:
//! - 8 bit to 16 bit multiplies by 257, 16 bit to 8 bit keeps the high byte.
//! - Integer to float keeps the raw value; float to integer clamps to the
//!   target range and rounds.
//! - Gray to color replicates the value; color to gray uses luminance
//!   weights (0.299 R, 0.587 G, 0.114 B).
//! - Alpha is dropped when reading Bgra32 and set to opaque when writing it.
//!
//! Complex and 32-bit integer gray types only convert to themselves.

use crate::error::BitmapError;

use super::{Bitmap, PixelType};

#[derive(Clone, Copy, PartialEq)]
enum Depth {
    U8,
    U16,
    F32,
}

#[derive(Clone, Copy)]
struct Layout {
    depth: Depth,
    /// Channels stored per pixel (1 gray, 3 bgr, 4 bgra).
    channels: usize,
}

fn layout(pixel_type: PixelType) -> Option<Layout> {
    let (depth, channels) = match pixel_type {
        PixelType::Gray8 => (Depth::U8, 1),
        PixelType::Gray16 => (Depth::U16, 1),
        PixelType::Gray32Float => (Depth::F32, 1),
        PixelType::Bgr24 => (Depth::U8, 3),
        PixelType::Bgr48 => (Depth::U16, 3),
        PixelType::Bgr96Float => (Depth::F32, 3),
        PixelType::Bgra32 => (Depth::U8, 4),
        _ => return None,
    };
    Some(Layout { depth, channels })
}

#[inline]
fn read_sample(bytes: &[u8], depth: Depth) -> f32 {
    match depth {
        Depth::U8 => bytes[0] as f32,
        Depth::U16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f32,
        Depth::F32 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    }
}

#[inline]
fn write_sample(out: &mut [u8], depth: Depth, value: f32) {
    match depth {
        Depth::U8 => out[0] = value.clamp(0.0, 255.0).round() as u8,
        Depth::U16 => out[..2].copy_from_slice(&(value.clamp(0.0, 65535.0).round() as u16).to_le_bytes()),
        Depth::F32 => out[..4].copy_from_slice(&value.to_le_bytes()),
    }
}

#[inline]
fn sample_size(depth: Depth) -> usize {
    match depth {
        Depth::U8 => 1,
        Depth::U16 => 2,
        Depth::F32 => 4,
    }
}

/// Rescale a sample from one depth to another.
#[inline]
fn rescale(value: f32, from: Depth, to: Depth) -> f32 {
    match (from, to) {
        (Depth::U8, Depth::U16) => value * 257.0,
        (Depth::U16, Depth::U8) => ((value as u32) >> 8) as f32,
        _ => value,
    }
}

#[inline]
fn luminance(b: f32, g: f32, r: f32) -> f32 {
    0.114 * b + 0.587 * g + 0.299 * r
}

/// Convert `src` to `target`. Returns a clone when the types already match.
///
/// # Errors
///
/// Returns `BitmapError::UnsupportedConversion` when no rule exists for the
/// pair of types.
pub fn convert(src: &Bitmap, target: PixelType) -> Result<Bitmap, BitmapError> {
    if src.pixel_type() == target {
        return Ok(src.clone());
    }

    let unsupported = BitmapError::UnsupportedConversion {
        from: src.pixel_type(),
        to: target,
    };
    let from = layout(src.pixel_type()).ok_or_else(|| unsupported.clone())?;
    let to = layout(target).ok_or(unsupported)?;

    let mut out = Bitmap::new(target, src.width(), src.height());
    let in_sample = sample_size(from.depth);
    let out_sample = sample_size(to.depth);
    let in_bpp = src.pixel_type().bytes_per_pixel();
    let out_bpp = target.bytes_per_pixel();

    for y in 0..src.height() {
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);

        for (src_px, dst_px) in src_row
            .chunks_exact(in_bpp)
            .zip(dst_row.chunks_exact_mut(out_bpp))
        {
            // Gather as b, g, r in the source depth
            let bgr = if from.channels == 1 {
                let v = read_sample(src_px, from.depth);
                [v, v, v]
            } else {
                [
                    read_sample(&src_px[0..], from.depth),
                    read_sample(&src_px[in_sample..], from.depth),
                    read_sample(&src_px[2 * in_sample..], from.depth),
                ]
            };

            if to.channels == 1 {
                let mut v = if from.channels == 1 {
                    bgr[0]
                } else {
                    luminance(bgr[0], bgr[1], bgr[2])
                };
                if from.depth != Depth::F32 {
                    v = v.round();
                }
                write_sample(dst_px, to.depth, rescale(v, from.depth, to.depth));
            } else {
                for (i, &c) in bgr.iter().enumerate() {
                    write_sample(
                        &mut dst_px[i * out_sample..],
                        to.depth,
                        rescale(c, from.depth, to.depth),
                    );
                }
                if to.channels == 4 {
                    dst_px[3] = 255;
                }
            }
        }
    }

    Ok(out)
}
