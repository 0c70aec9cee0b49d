use crate::dimension::DimCoordinate;
use crate::error::DirectoryError;
use crate::geometry::{IntRect, IntSize};
use crate::pixel::PixelType;

/// Catalog entry for one sub-block.
///
/// The descriptor's index is its position in the directory; it is not
/// stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct SubBlockDescriptor {
    /// Non-spatial coordinate (scene, time, channel, z, ...)
    pub coordinate: DimCoordinate,

    /// Placement and size in the document's pixel coordinate system
    pub logical_rect: IntRect,

    /// Stored pixel dimensions. Smaller than the logical size for
    /// down-sampled pyramid tiles.
    pub physical_size: IntSize,

    /// Pixel format of the stored data
    pub pixel_type: PixelType,

    /// Compression code as found in the file
    pub compression_raw: i32,

    /// Tile index, if the sub-block has one
    pub m_index: Option<i32>,
}

impl SubBlockDescriptor {
    /// Ratio of stored to logical size, measured on the axis that is longer
    /// in stored size. 1.0 for full-resolution tiles, below 1.0 for
    /// down-sampled ones.
    ///
    /// Not well defined when a pyramid layer changes the aspect ratio.
    pub fn zoom(&self) -> f64 {
        if self.physical_size.w > self.physical_size.h {
            self.physical_size.w as f64 / self.logical_rect.w as f64
        } else {
            self.physical_size.h as f64 / self.logical_rect.h as f64
        }
    }

    /// Whether stored and logical sizes differ.
    pub fn is_scaled(&self) -> bool {
        self.physical_size.w as i64 != self.logical_rect.w as i64
            || self.physical_size.h as i64 != self.logical_rect.h as i64
    }

    pub(crate) fn validate(&self) -> Result<(), DirectoryError> {
        if self.logical_rect.w <= 0 || self.logical_rect.h <= 0 {
            return Err(DirectoryError::InvalidDescriptor(format!(
                "logical size must be positive, got {}x{}",
                self.logical_rect.w, self.logical_rect.h
            )));
        }
        if self.physical_size.w == 0 || self.physical_size.h == 0 {
            return Err(DirectoryError::InvalidDescriptor(format!(
                "physical size must be positive, got {}x{}",
                self.physical_size.w, self.physical_size.h
            )));
        }
        Ok(())
    }
}

/// Map a raw M-index to `Some` unless it is one of the "absent" sentinels.
pub fn m_index_from_raw(raw: i32) -> Option<i32> {
    if raw == i32::MAX || raw == i32::MIN {
        None
    } else {
        Some(raw)
    }
}
