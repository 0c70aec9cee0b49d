//! Pixel types and owned bitmaps.
//!
//! Samples are stored little-endian, as they are in CZI sub-blocks. Color
//! types keep the on-disk channel order (blue, green, red).

mod bitmap;
mod convert;

pub use bitmap::{checked_packed_size, Background, Bitmap, MAX_BITMAP_BYTES};
pub use convert::convert;

use std::fmt;
use std::str::FromStr;

/// Pixel formats that can appear in a CZI document.
///
/// Discriminants are the numeric codes used on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PixelType {
    Gray8 = 0,
    Gray16 = 1,
    Gray32Float = 2,
    Bgr24 = 3,
    Bgr48 = 4,
    Bgr96Float = 8,
    Bgra32 = 9,
    Gray64ComplexFloat = 10,
    Bgr192ComplexFloat = 11,
    Gray32 = 12,
    Gray64Float = 13,
}

impl PixelType {
    /// Map an on-disk pixel type code. Returns `None` for unknown codes.
    pub fn from_code(code: i32) -> Option<PixelType> {
        let pt = match code {
            0 => PixelType::Gray8,
            1 => PixelType::Gray16,
            2 => PixelType::Gray32Float,
            3 => PixelType::Bgr24,
            4 => PixelType::Bgr48,
            8 => PixelType::Bgr96Float,
            9 => PixelType::Bgra32,
            10 => PixelType::Gray64ComplexFloat,
            11 => PixelType::Bgr192ComplexFloat,
            12 => PixelType::Gray32,
            13 => PixelType::Gray64Float,
            _ => return None,
        };
        Some(pt)
    }

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Size of one pixel in bytes.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelType::Gray8 => 1,
            PixelType::Gray16 => 2,
            PixelType::Gray32Float => 4,
            PixelType::Bgr24 => 3,
            PixelType::Bgr48 => 6,
            PixelType::Bgr96Float => 12,
            PixelType::Bgra32 => 4,
            PixelType::Gray64ComplexFloat => 16,
            PixelType::Bgr192ComplexFloat => 48,
            PixelType::Gray32 => 4,
            PixelType::Gray64Float => 8,
        }
    }

    /// Whether the type holds a single intensity channel.
    pub fn is_gray(self) -> bool {
        matches!(
            self,
            PixelType::Gray8
                | PixelType::Gray16
                | PixelType::Gray32Float
                | PixelType::Gray64ComplexFloat
                | PixelType::Gray32
                | PixelType::Gray64Float
        )
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            PixelType::Gray8 => "gray8",
            PixelType::Gray16 => "gray16",
            PixelType::Gray32Float => "gray32float",
            PixelType::Bgr24 => "bgr24",
            PixelType::Bgr48 => "bgr48",
            PixelType::Bgr96Float => "bgr96float",
            PixelType::Bgra32 => "bgra32",
            PixelType::Gray64ComplexFloat => "gray64complexfloat",
            PixelType::Bgr192ComplexFloat => "bgr192complexfloat",
            PixelType::Gray32 => "gray32",
            PixelType::Gray64Float => "gray64float",
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        [
            PixelType::Gray8,
            PixelType::Gray16,
            PixelType::Gray32Float,
            PixelType::Bgr24,
            PixelType::Bgr48,
            PixelType::Bgr96Float,
            PixelType::Bgra32,
            PixelType::Gray64ComplexFloat,
            PixelType::Bgr192ComplexFloat,
            PixelType::Gray32,
            PixelType::Gray64Float,
        ]
        .into_iter()
        .find(|pt| pt.name() == lower)
        .ok_or_else(|| format!("unknown pixel type '{}'", s))
    }
}
