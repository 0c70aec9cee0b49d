//! CZI ("ZISRAW") container parsing.
//!
//! Only the segments needed to serve pixels are read: the file header, the
//! sub-block directory, sub-block segments and the raw XML metadata.
//! Attachment directories are not interpreted.

mod entry;
mod reader;
mod segment;

pub use entry::{dv_entry_size, DimensionEntry, DirectoryEntry, DIMENSION_ENTRY_SIZE, DV_FIXED_SIZE};
pub use reader::{CziReader, OpenOptions, Precedence, SubBlockInfoPolicy};
pub use segment::{
    FileHeader, SegmentHeader, FILE_HEADER_ALLOCATED_SIZE, FILE_HEADER_SIZE, SEGMENT_HEADER_SIZE,
    SEGMENT_ID_DIRECTORY, SEGMENT_ID_FILE, SEGMENT_ID_METADATA, SEGMENT_ID_SUBBLOCK,
};
