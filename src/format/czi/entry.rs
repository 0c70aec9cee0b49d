//! `DV` directory entries.
//!
//! The same entry layout appears in the sub-block directory segment and in
//! the header of every sub-block segment:
//!
//! ```text
//! Bytes 0-1:   Schema type "DV"
//! Bytes 2-5:   Pixel type (i32)
//! Bytes 6-13:  File position of the sub-block segment (i64)
//! Bytes 14-17: File part (i32)
//! Bytes 18-21: Compression (i32)
//! Byte  22:    Pyramid type (legacy, ignored)
//! Bytes 23-27: Spare
//! Bytes 28-31: Dimension count (i32)
//! Then 20 bytes per dimension:
//!   Bytes 0-3:   Dimension name, NUL padded ("X", "Y", "C", "M", ...)
//!   Bytes 4-7:   Start (i32)
//!   Bytes 8-11:  Size (i32)
//!   Bytes 12-15: Start coordinate (f32)
//!   Bytes 16-19: Stored size (i32)
//! ```

use tracing::trace;

use crate::dimension::{DimCoordinate, Dimension};
use crate::directory::{m_index_from_raw, SubBlockDescriptor};
use crate::error::CziError;
use crate::geometry::{IntRect, IntSize};
use crate::io::{read_f32_le, read_i32_le, read_i64_le};
use crate::pixel::PixelType;

/// Size of the fixed part of a `DV` entry
pub const DV_FIXED_SIZE: usize = 32;

/// Size of one dimension entry
pub const DIMENSION_ENTRY_SIZE: usize = 20;

/// Upper bound on dimensions per entry; anything larger is corrupt.
const MAX_DIMENSIONS: i32 = 64;

/// One dimension of a `DV` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionEntry {
    /// Dimension name, e.g. `'X'`
    pub name: char,
    pub start: i32,
    pub size: i32,
    pub start_coordinate: f32,
    pub stored_size: i32,
}

/// A parsed `DV` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub pixel_type_raw: i32,
    pub file_position: i64,
    pub file_part: i32,
    pub compression: i32,
    pub pyramid_type: u8,
    pub dimensions: Vec<DimensionEntry>,
}

/// Number of bytes a `DV` entry with `dimension_count` dimensions takes.
pub fn dv_entry_size(dimension_count: usize) -> usize {
    DV_FIXED_SIZE + dimension_count * DIMENSION_ENTRY_SIZE
}

impl DirectoryEntry {
    /// Parse one entry from the start of `bytes`.
    ///
    /// Returns the entry and the number of bytes consumed.
    pub fn parse(bytes: &[u8]) -> Result<(Self, usize), CziError> {
        if bytes.len() < DV_FIXED_SIZE {
            return Err(CziError::CorruptSegment("truncated DV entry".into()));
        }
        if &bytes[0..2] != b"DV" {
            return Err(CziError::CorruptSegment(format!(
                "unsupported directory entry schema {:?}",
                String::from_utf8_lossy(&bytes[0..2])
            )));
        }

        let dimension_count = read_i32_le(&bytes[28..32]);
        if !(0..=MAX_DIMENSIONS).contains(&dimension_count) {
            return Err(CziError::CorruptSegment(format!(
                "DV entry declares {} dimensions",
                dimension_count
            )));
        }

        let total = dv_entry_size(dimension_count as usize);
        if bytes.len() < total {
            return Err(CziError::CorruptSegment("truncated DV dimension entries".into()));
        }

        let dimensions = bytes[DV_FIXED_SIZE..total]
            .chunks_exact(DIMENSION_ENTRY_SIZE)
            .map(|d| DimensionEntry {
                name: d[0] as char,
                start: read_i32_le(&d[4..8]),
                size: read_i32_le(&d[8..12]),
                start_coordinate: read_f32_le(&d[12..16]),
                stored_size: read_i32_le(&d[16..20]),
            })
            .collect();

        let entry = DirectoryEntry {
            pixel_type_raw: read_i32_le(&bytes[2..6]),
            file_position: read_i64_le(&bytes[6..14]),
            file_part: read_i32_le(&bytes[14..18]),
            compression: read_i32_le(&bytes[18..22]),
            pyramid_type: bytes[22],
            dimensions,
        };

        Ok((entry, total))
    }

    fn dimension(&self, name: char) -> Option<&DimensionEntry> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Build the directory descriptor for this entry.
    ///
    /// X and Y are required. M becomes the tile index; other known
    /// dimensions form the coordinate; unknown names are skipped.
    pub fn to_descriptor(&self) -> Result<SubBlockDescriptor, CziError> {
        let pixel_type = PixelType::from_code(self.pixel_type_raw)
            .ok_or(CziError::UnsupportedPixelType(self.pixel_type_raw))?;

        let x = self
            .dimension('X')
            .ok_or_else(|| CziError::CorruptSegment("DV entry without X dimension".into()))?;
        let y = self
            .dimension('Y')
            .ok_or_else(|| CziError::CorruptSegment("DV entry without Y dimension".into()))?;

        if x.stored_size < 0 || y.stored_size < 0 {
            return Err(CziError::CorruptSegment(format!(
                "negative stored size {}x{}",
                x.stored_size, y.stored_size
            )));
        }

        let mut coordinate = DimCoordinate::new();
        let mut m_index = None;
        for d in &self.dimensions {
            match d.name {
                'X' | 'Y' => {}
                'M' => m_index = m_index_from_raw(d.start),
                name => match Dimension::from_char(name) {
                    Some(dim) => coordinate.set(dim, d.start),
                    None => trace!(dimension = %name, "Skipping unknown dimension"),
                },
            }
        }

        Ok(SubBlockDescriptor {
            coordinate,
            logical_rect: IntRect::new(x.start, y.start, x.size, y.size),
            physical_size: IntSize::new(x.stored_size as u32, y.stored_size as u32),
            pixel_type,
            compression_raw: self.compression,
            m_index,
        })
    }
}
