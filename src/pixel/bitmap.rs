use crate::error::BitmapError;
use crate::geometry::IntRect;

use super::PixelType;

/// Background color used to fill a canvas before painting.
///
/// Components are normalized to `[0, 1]`. Gray pixel types use the mean of
/// the three components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Background {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    fn mean(&self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }
}

/// Largest pixel buffer a decoded sub-block or composed region may occupy.
pub const MAX_BITMAP_BYTES: usize = 1 << 31;

/// Bytes of a packed `width` x `height` bitmap of `pixel_type`.
///
/// Returns `None` if the size overflows or exceeds [`MAX_BITMAP_BYTES`].
pub fn checked_packed_size(pixel_type: PixelType, width: u64, height: u64) -> Option<usize> {
    let bytes = width
        .checked_mul(height)?
        .checked_mul(pixel_type.bytes_per_pixel() as u64)?;
    usize::try_from(bytes)
        .ok()
        .filter(|&b| b <= MAX_BITMAP_BYTES)
}

/// An owned, row-major bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pixel_type: PixelType,
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zero-filled bitmap with a packed stride.
    pub fn new(pixel_type: PixelType, width: u32, height: u32) -> Self {
        let stride = width as usize * pixel_type.bytes_per_pixel();
        Self {
            pixel_type,
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    /// Wrap existing pixel data.
    ///
    /// `stride` must be at least one line of pixels and `data` must hold
    /// `stride * height` bytes. Extra bytes are dropped.
    pub fn from_data(
        pixel_type: PixelType,
        width: u32,
        height: u32,
        stride: usize,
        mut data: Vec<u8>,
    ) -> Result<Self, BitmapError> {
        let line = width as usize * pixel_type.bytes_per_pixel();
        if stride < line {
            return Err(BitmapError::InvalidSize {
                width: width as i64,
                height: height as i64,
            });
        }

        let required = stride * height as usize;
        if data.len() < required {
            return Err(BitmapError::BufferTooSmall {
                required,
                actual: data.len(),
            });
        }
        data.truncate(required);

        Ok(Self {
            pixel_type,
            width,
            height,
            stride,
            data,
        })
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of bytes used by the pixel buffer.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Bytes of one line of pixels, excluding stride padding.
    #[inline]
    pub fn line_size(&self) -> usize {
        self.width as usize * self.pixel_type.bytes_per_pixel()
    }

    /// Row `y` without stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.line_size()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let line = self.line_size();
        &mut self.data[start..start + line]
    }

    /// The bytes of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.pixel_type.bytes_per_pixel();
        let start = y as usize * self.stride + x as usize * bpp;
        &self.data[start..start + bpp]
    }

    /// Fill every pixel with `background`.
    ///
    /// Integer types scale the normalized components to their full range;
    /// float types store them unscaled.
    pub fn fill(&mut self, background: Background) -> Result<(), BitmapError> {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let to_u16 = |v: f32| (v.clamp(0.0, 1.0) * 65535.0).round() as u16;

        let pixel: Vec<u8> = match self.pixel_type {
            PixelType::Gray8 => vec![to_u8(background.mean())],
            PixelType::Gray16 => to_u16(background.mean()).to_le_bytes().to_vec(),
            PixelType::Gray32Float => background.mean().to_le_bytes().to_vec(),
            PixelType::Bgr24 => vec![to_u8(background.b), to_u8(background.g), to_u8(background.r)],
            PixelType::Bgra32 => vec![
                to_u8(background.b),
                to_u8(background.g),
                to_u8(background.r),
                255,
            ],
            PixelType::Bgr48 => [background.b, background.g, background.r]
                .into_iter()
                .flat_map(|c| to_u16(c).to_le_bytes())
                .collect(),
            PixelType::Bgr96Float => [background.b, background.g, background.r]
                .into_iter()
                .flat_map(f32::to_le_bytes)
                .collect(),
            other => return Err(BitmapError::UnsupportedPixelType(other)),
        };

        for y in 0..self.height {
            for chunk in self.row_mut(y).chunks_exact_mut(pixel.len()) {
                chunk.copy_from_slice(&pixel);
            }
        }
        Ok(())
    }

    /// Paint `src` onto this bitmap.
    ///
    /// `placement` is where `src` lands, in this bitmap's pixel coordinates.
    /// It may extend past the edges (only the overlap is written) and may
    /// differ in size from `src`, in which case `src` is scaled with
    /// nearest-neighbour sampling. `clip` further restricts the written area.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel types differ.
    pub fn paint(
        &mut self,
        src: &Bitmap,
        placement: IntRect,
        clip: Option<IntRect>,
    ) -> Result<(), BitmapError> {
        if src.pixel_type != self.pixel_type {
            return Err(BitmapError::UnsupportedConversion {
                from: src.pixel_type,
                to: self.pixel_type,
            });
        }

        let bounds = IntRect::new(0, 0, self.width as i32, self.height as i32);
        let mut target = match placement.intersect(&bounds) {
            Some(r) => r,
            None => return Ok(()),
        };
        if let Some(clip) = clip {
            target = match target.intersect(&clip) {
                Some(r) => r,
                None => return Ok(()),
            };
        }
        if src.width == 0 || src.height == 0 {
            return Ok(());
        }

        let bpp = self.pixel_type.bytes_per_pixel();
        let unscaled = src.width as i64 == placement.w as i64 && src.height as i64 == placement.h as i64;

        for ty in target.y..(target.y + target.h) {
            let sy = scale_index(ty - placement.y, placement.h, src.height);
            let src_row = src.row(sy);
            let dst_start = target.x as usize * bpp;
            let dst_row = &mut self.row_mut(ty as u32)[dst_start..dst_start + target.w as usize * bpp];

            if unscaled {
                let sx = (target.x - placement.x) as usize * bpp;
                dst_row.copy_from_slice(&src_row[sx..sx + target.w as usize * bpp]);
            } else {
                for (i, dst_px) in dst_row.chunks_exact_mut(bpp).enumerate() {
                    let sx = scale_index(target.x + i as i32 - placement.x, placement.w, src.width)
                        as usize
                        * bpp;
                    dst_px.copy_from_slice(&src_row[sx..sx + bpp]);
                }
            }
        }

        Ok(())
    }
}

/// Map offset `pos` within a logical extent onto a stored extent.
#[inline]
fn scale_index(pos: i32, logical: i32, stored: u32) -> u32 {
    let idx = pos as i64 * stored as i64 / logical as i64;
    idx.clamp(0, stored as i64 - 1) as u32
}
