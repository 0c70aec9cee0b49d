//! CZI segment framing and the file header.
//!
//! A CZI file is a sequence of segments. Each segment starts with a 32-byte
//! header:
//!
//! ```text
//! Bytes 0-15:  ASCII id, NUL padded ("ZISRAWFILE", "ZISRAWDIRECTORY", ...)
//! Bytes 16-23: Allocated size of the segment data (i64)
//! Bytes 24-31: Used size of the segment data (i64, may be 0 = unknown)
//! ```
//!
//! The file header segment sits at offset 0:
//!
//! ```text
//! Bytes 0-3:   Major version (i32)
//! Bytes 4-7:   Minor version (i32)
//! Bytes 8-15:  Reserved
//! Bytes 16-31: Primary file GUID
//! Bytes 32-47: File GUID
//! Bytes 48-51: File part (i32)
//! Bytes 52-59: Sub-block directory position (i64)
//! Bytes 60-67: Metadata position (i64)
//! Bytes 68-71: Update pending flag (i32)
//! Bytes 72-79: Attachment directory position (i64)
//! ```

use crate::error::CziError;
use crate::io::{read_i32_le, read_i64_le};

// =============================================================================
// Constants
// =============================================================================

/// Size of a segment header in bytes
pub const SEGMENT_HEADER_SIZE: usize = 32;

/// Length of the segment id field
const SEGMENT_ID_SIZE: usize = 16;

/// Bytes of the file header that carry data (the segment is padded to 512)
pub const FILE_HEADER_SIZE: usize = 80;

/// Allocated size of the file header segment data
pub const FILE_HEADER_ALLOCATED_SIZE: usize = 512;

pub const SEGMENT_ID_FILE: &str = "ZISRAWFILE";
pub const SEGMENT_ID_DIRECTORY: &str = "ZISRAWDIRECTORY";
pub const SEGMENT_ID_SUBBLOCK: &str = "ZISRAWSUBBLOCK";
pub const SEGMENT_ID_METADATA: &str = "ZISRAWMETADATA";

// =============================================================================
// SegmentHeader
// =============================================================================

/// The 32-byte header in front of every segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Segment id with NUL padding removed
    pub id: String,

    /// Bytes reserved for the segment data
    pub allocated_size: i64,

    /// Bytes actually used; 0 when the writer did not record it
    pub used_size: i64,
}

impl SegmentHeader {
    /// Parse a segment header and check its id.
    ///
    /// # Arguments
    ///
    /// * `bytes` - At least 32 bytes starting at the segment
    /// * `offset` - File offset of the segment (for error messages)
    /// * `expected` - Expected segment id
    pub fn parse(bytes: &[u8], offset: u64, expected: &'static str) -> Result<Self, CziError> {
        if bytes.len() < SEGMENT_HEADER_SIZE {
            return Err(CziError::CorruptSegment(format!(
                "segment header at offset {} is truncated",
                offset
            )));
        }

        let id_bytes = &bytes[..SEGMENT_ID_SIZE];
        let id_len = id_bytes.iter().position(|&b| b == 0).unwrap_or(SEGMENT_ID_SIZE);
        let id = String::from_utf8_lossy(&id_bytes[..id_len]).into_owned();

        if id != expected {
            return Err(CziError::InvalidSegmentId {
                offset,
                expected,
                found: id,
            });
        }

        let allocated_size = read_i64_le(&bytes[16..24]);
        let used_size = read_i64_le(&bytes[24..32]);
        if allocated_size < 0 || used_size < 0 {
            return Err(CziError::CorruptSegment(format!(
                "segment {} at offset {} has negative size",
                id, offset
            )));
        }

        Ok(Self {
            id,
            allocated_size,
            used_size,
        })
    }

    /// Size of the segment data: the used size if recorded, else the
    /// allocated size.
    pub fn data_size(&self) -> u64 {
        if self.used_size > 0 {
            self.used_size as u64
        } else {
            self.allocated_size as u64
        }
    }
}

// =============================================================================
// FileHeader
// =============================================================================

/// Contents of the `ZISRAWFILE` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub major: i32,
    pub minor: i32,

    /// GUID shared by all parts of a multi-file document
    pub primary_file_guid: [u8; 16],

    /// GUID of this file
    pub file_guid: [u8; 16],

    pub file_part: i32,

    /// Offset of the `ZISRAWDIRECTORY` segment (0 if absent)
    pub directory_position: u64,

    /// Offset of the `ZISRAWMETADATA` segment (0 if absent)
    pub metadata_position: u64,

    pub update_pending: bool,

    /// Offset of the attachment directory segment (0 if absent)
    pub attachment_directory_position: u64,
}

impl FileHeader {
    /// Parse the file header data (the bytes after the segment header).
    pub fn parse(bytes: &[u8]) -> Result<Self, CziError> {
        if bytes.len() < FILE_HEADER_SIZE {
            return Err(CziError::CorruptSegment(format!(
                "file header has {} bytes, need {}",
                bytes.len(),
                FILE_HEADER_SIZE
            )));
        }

        let position = |start: usize, name: &str| -> Result<u64, CziError> {
            let value = read_i64_le(&bytes[start..start + 8]);
            u64::try_from(value)
                .map_err(|_| CziError::CorruptSegment(format!("negative {} {}", name, value)))
        };

        let mut primary_file_guid = [0u8; 16];
        primary_file_guid.copy_from_slice(&bytes[16..32]);
        let mut file_guid = [0u8; 16];
        file_guid.copy_from_slice(&bytes[32..48]);

        Ok(Self {
            major: read_i32_le(&bytes[0..4]),
            minor: read_i32_le(&bytes[4..8]),
            primary_file_guid,
            file_guid,
            file_part: read_i32_le(&bytes[48..52]),
            directory_position: position(52, "directory position")?,
            metadata_position: position(60, "metadata position")?,
            update_pending: read_i32_le(&bytes[68..72]) != 0,
            attachment_directory_position: position(72, "attachment directory position")?,
        })
    }

    /// Version as `major.minor`.
    pub fn version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}
