//! Read-only CZI document access.
//!
//! [`CziReader::open`] reads the file header and the sub-block directory
//! segment, builds and finalizes the [`SubBlockDirectory`], and keeps the
//! file position of every sub-block. Sub-block segments are read on demand.
//!
//! # Sub-block layout
//!
//! ```text
//! Segment header (32 bytes, id "ZISRAWSUBBLOCK")
//! Bytes 0-3:   Metadata size (i32)
//! Bytes 4-7:   Attachment size (i32)
//! Bytes 8-15:  Data size (i64)
//! Bytes 16-:   DV entry
//! Header padded to max(256, 16 + DV entry size), followed by
//! metadata, data and attachment, in that order.
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::directory::{SubBlockDescriptor, SubBlockDirectory};
use crate::error::CziError;
use crate::io::{read_i32_le, read_i64_le, RangeReader};
use crate::repository::{SubBlock, SubBlockRepository};

use super::entry::{dv_entry_size, DirectoryEntry, DV_FIXED_SIZE};
use super::segment::{
    FileHeader, SegmentHeader, FILE_HEADER_SIZE, SEGMENT_HEADER_SIZE, SEGMENT_ID_DIRECTORY,
    SEGMENT_ID_FILE, SEGMENT_ID_METADATA, SEGMENT_ID_SUBBLOCK,
};

// =============================================================================
// Constants
// =============================================================================

/// Size of the directory segment header (entry count + reserved)
const DIRECTORY_HEADER_SIZE: usize = 128;

/// Minimum size of a sub-block segment header
const SUBBLOCK_HEADER_MIN_SIZE: usize = 256;

/// Fixed part of the sub-block header before the DV entry
const SUBBLOCK_FIXED_SIZE: usize = 16;

/// Size of the metadata segment header (xml size, attachment size, spare)
const METADATA_HEADER_SIZE: usize = 256;

// =============================================================================
// OpenOptions
// =============================================================================

/// Which source wins when the directory entry and the sub-block header
/// describe a sub-block differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precedence {
    /// Trust the sub-block directory
    #[default]
    Directory,
    /// Trust the header stored in front of the sub-block
    SubBlockHeader,
}

/// Policy for disagreements between directory and sub-block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubBlockInfoPolicy {
    pub precedence: Precedence,

    /// When false (the default) a disagreement fails the read with
    /// `CziError::Discrepancy`. When true the preferred source is used and
    /// a warning is logged.
    pub ignore_discrepancy: bool,
}

/// Options for [`CziReader::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    pub sub_block_info_policy: SubBlockInfoPolicy,
}

// =============================================================================
// CziReader
// =============================================================================

/// A CZI document opened for reading.
///
/// Dropping the reader closes the document. All methods take `&self`; share
/// the reader across tasks with `Arc`.
pub struct CziReader<R: RangeReader> {
    reader: R,
    header: FileHeader,
    directory: SubBlockDirectory,
    /// File position of each sub-block segment, by directory index
    positions: Vec<u64>,
    options: OpenOptions,
}

impl<R: RangeReader> CziReader<R> {
    /// Open a document: parse the file header and the sub-block directory.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, missing or malformed segments, and directory
    /// entries with unknown pixel types or invalid sizes.
    pub async fn open(reader: R, options: OpenOptions) -> Result<Self, CziError> {
        let required = (SEGMENT_HEADER_SIZE + FILE_HEADER_SIZE) as u64;
        if reader.size() < required {
            return Err(CziError::FileTooSmall {
                required,
                actual: reader.size(),
            });
        }

        let bytes = reader.read_exact_at(0, required as usize).await?;
        SegmentHeader::parse(&bytes, 0, SEGMENT_ID_FILE)?;
        let header = FileHeader::parse(&bytes[SEGMENT_HEADER_SIZE..])?;

        let mut directory = SubBlockDirectory::new();
        let mut positions = Vec::new();

        if header.directory_position != 0 {
            let entries = read_directory_entries(&reader, header.directory_position).await?;
            positions.reserve(entries.len());
            for entry in entries {
                let position = u64::try_from(entry.file_position).map_err(|_| {
                    CziError::CorruptSegment(format!(
                        "negative sub-block position {}",
                        entry.file_position
                    ))
                })?;
                directory.add(entry.to_descriptor()?)?;
                positions.push(position);
            }
        } else {
            warn!(file = reader.identifier(), "Document has no sub-block directory");
        }

        directory.finalize()?;

        info!(
            file = reader.identifier(),
            version = %header.version(),
            sub_blocks = directory.len(),
            "Opened CZI document"
        );

        Ok(Self {
            reader,
            header,
            directory,
            positions,
            options,
        })
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.header
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Identifier of the underlying byte source.
    pub fn identifier(&self) -> &str {
        self.reader.identifier()
    }

    /// Read the document's XML metadata segment.
    ///
    /// Returns `Ok(None)` when the document has no metadata segment. The
    /// XML is returned as stored; it is not parsed.
    pub async fn read_metadata_xml(&self) -> Result<Option<String>, CziError> {
        let position = self.header.metadata_position;
        if position == 0 {
            return Ok(None);
        }

        let head = self
            .reader
            .read_exact_at(position, SEGMENT_HEADER_SIZE + METADATA_HEADER_SIZE)
            .await?;
        SegmentHeader::parse(&head, position, SEGMENT_ID_METADATA)?;

        let xml_size = read_i32_le(&head[SEGMENT_HEADER_SIZE..SEGMENT_HEADER_SIZE + 4]);
        let xml_size = usize::try_from(xml_size)
            .map_err(|_| CziError::CorruptSegment(format!("negative XML size {}", xml_size)))?;

        let xml_offset = position + (SEGMENT_HEADER_SIZE + METADATA_HEADER_SIZE) as u64;
        let xml = self.reader.read_exact_at(xml_offset, xml_size).await?;

        let text = String::from_utf8(xml.to_vec())
            .map_err(|e| CziError::CorruptSegment(format!("metadata is not UTF-8: {}", e)))?;
        // Writers commonly pad with trailing NULs
        Ok(Some(text.trim_end_matches('\0').to_string()))
    }

    /// Pick the descriptor to use for a sub-block according to the policy.
    fn reconcile(
        &self,
        index: usize,
        from_directory: &SubBlockDescriptor,
        from_header: SubBlockDescriptor,
    ) -> Result<SubBlockDescriptor, CziError> {
        let Some(field) = first_difference(from_directory, &from_header) else {
            return Ok(from_directory.clone());
        };

        let policy = self.options.sub_block_info_policy;
        if !policy.ignore_discrepancy {
            return Err(CziError::Discrepancy { index, field });
        }

        warn!(
            index,
            field,
            precedence = ?policy.precedence,
            "Directory and sub-block header disagree"
        );
        Ok(match policy.precedence {
            Precedence::Directory => from_directory.clone(),
            Precedence::SubBlockHeader => from_header,
        })
    }
}

/// Read and parse all `DV` entries of the directory segment at `position`.
async fn read_directory_entries<R: RangeReader>(
    reader: &R,
    position: u64,
) -> Result<Vec<DirectoryEntry>, CziError> {
    let head = reader
        .read_exact_at(position, SEGMENT_HEADER_SIZE + DIRECTORY_HEADER_SIZE)
        .await?;
    let segment = SegmentHeader::parse(&head, position, SEGMENT_ID_DIRECTORY)?;

    let count = read_i32_le(&head[SEGMENT_HEADER_SIZE..SEGMENT_HEADER_SIZE + 4]);
    let count = usize::try_from(count)
        .map_err(|_| CziError::CorruptSegment(format!("negative entry count {}", count)))?;

    let entries_offset = position + (SEGMENT_HEADER_SIZE + DIRECTORY_HEADER_SIZE) as u64;
    let available = reader.size().saturating_sub(entries_offset);
    let entries_size = segment
        .data_size()
        .saturating_sub(DIRECTORY_HEADER_SIZE as u64)
        .min(available);

    // Every entry takes at least its fixed part
    if count as u64 > entries_size / DV_FIXED_SIZE as u64 {
        return Err(CziError::CorruptSegment(format!(
            "directory declares {} entries but holds only {} bytes",
            count, entries_size
        )));
    }

    let bytes = reader
        .read_exact_at(entries_offset, entries_size as usize)
        .await?;

    let mut entries = Vec::with_capacity(count);
    let mut pos = 0usize;
    for i in 0..count {
        let (entry, consumed) = DirectoryEntry::parse(&bytes[pos..]).map_err(|e| {
            CziError::CorruptSegment(format!("directory entry {}: {}", i, e))
        })?;
        entries.push(entry);
        pos += consumed;
    }

    debug!(count, bytes = pos, "Parsed sub-block directory");
    Ok(entries)
}

/// Name of the first descriptor field that differs, if any.
fn first_difference(a: &SubBlockDescriptor, b: &SubBlockDescriptor) -> Option<&'static str> {
    if a.pixel_type != b.pixel_type {
        Some("pixel type")
    } else if a.compression_raw != b.compression_raw {
        Some("compression")
    } else if a.logical_rect != b.logical_rect {
        Some("logical rectangle")
    } else if a.physical_size != b.physical_size {
        Some("physical size")
    } else if a.coordinate != b.coordinate {
        Some("coordinate")
    } else if a.m_index != b.m_index {
        Some("M-index")
    } else {
        None
    }
}

fn to_size(value: i64, what: &str) -> Result<usize, CziError> {
    usize::try_from(value).map_err(|_| CziError::CorruptSegment(format!("invalid {} {}", what, value)))
}

#[async_trait]
impl<R: RangeReader> SubBlockRepository for CziReader<R> {
    fn directory(&self) -> &SubBlockDirectory {
        &self.directory
    }

    async fn read_sub_block(&self, index: usize) -> Result<Option<SubBlock>, CziError> {
        let (Some(&position), Some(from_directory)) =
            (self.positions.get(index), self.directory.try_get(index)?)
        else {
            return Ok(None);
        };

        // Segment header plus the minimum sub-block header; the DV entry
        // usually fits, otherwise read the remainder below.
        let available = self.reader.size().saturating_sub(position);
        let first_len = ((SEGMENT_HEADER_SIZE + SUBBLOCK_HEADER_MIN_SIZE) as u64).min(available);
        let mut head = self.reader.read_exact_at(position, first_len as usize).await?;
        SegmentHeader::parse(&head, position, SEGMENT_ID_SUBBLOCK)?;

        let fixed_end = SEGMENT_HEADER_SIZE + SUBBLOCK_FIXED_SIZE;
        if head.len() < fixed_end + DV_FIXED_SIZE {
            return Err(CziError::CorruptSegment(format!(
                "sub-block {} header is truncated",
                index
            )));
        }
        let dim_count = read_i32_le(&head[fixed_end + 28..fixed_end + 32]);
        let dv_size = dv_entry_size(to_size(dim_count as i64, "dimension count")?);
        let header_size = SUBBLOCK_HEADER_MIN_SIZE.max(SUBBLOCK_FIXED_SIZE + dv_size);

        if head.len() < fixed_end + dv_size {
            head = self
                .reader
                .read_exact_at(position, fixed_end + dv_size)
                .await?;
        }

        let body = &head[SEGMENT_HEADER_SIZE..];
        let metadata_size = to_size(read_i32_le(&body[0..4]) as i64, "metadata size")?;
        let attachment_size = to_size(read_i32_le(&body[4..8]) as i64, "attachment size")?;
        let data_size = to_size(read_i64_le(&body[8..16]), "data size")?;

        let (entry, _) = DirectoryEntry::parse(&body[SUBBLOCK_FIXED_SIZE..])?;
        let descriptor = self.reconcile(index, from_directory, entry.to_descriptor()?)?;

        let payload_offset = position + (SEGMENT_HEADER_SIZE + header_size) as u64;
        let payload_size = metadata_size + data_size + attachment_size;
        let payload = self
            .reader
            .read_exact_at(payload_offset, payload_size)
            .await?;

        let metadata = payload.slice(0..metadata_size);
        let data = payload.slice(metadata_size..metadata_size + data_size);
        let attachment = payload.slice(metadata_size + data_size..);

        debug!(
            index,
            position,
            data_size,
            compression = descriptor.compression_raw,
            "Read sub-block"
        );

        Ok(Some(SubBlock {
            index,
            descriptor,
            data,
            metadata,
            attachment,
        }))
    }
}
