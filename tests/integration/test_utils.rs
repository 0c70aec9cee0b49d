//! Test utilities for integration tests.
//!
//! This module provides a builder that writes small but complete CZI
//! documents in memory, and a repository wrapper that records which
//! sub-blocks were read.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use czi_tiles::directory::SubBlockDirectory;
use czi_tiles::error::CziError;
use czi_tiles::format::{CziReader, OpenOptions};
use czi_tiles::geometry::{IntRect, IntSize};
use czi_tiles::io::MemoryRangeReader;
use czi_tiles::repository::{SubBlock, SubBlockRepository};

const SEGMENT_HEADER_SIZE: usize = 32;
const FILE_HEADER_ALLOCATED_SIZE: usize = 512;
const DIRECTORY_HEADER_SIZE: usize = 128;
const METADATA_HEADER_SIZE: usize = 256;
const SUBBLOCK_HEADER_MIN_SIZE: usize = 256;
const DV_FIXED_SIZE: usize = 32;
const DIMENSION_ENTRY_SIZE: usize = 20;

pub const PIXEL_GRAY8: i32 = 0;
pub const PIXEL_GRAY16: i32 = 1;
pub const PIXEL_BGR24: i32 = 3;

// =============================================================================
// Document Builder
// =============================================================================

/// The fields of one `DV` entry.
#[derive(Debug, Clone)]
pub struct DvSpec {
    /// Non-spatial dimensions, including `M`
    pub dims: Vec<(char, i32)>,
    pub rect: IntRect,
    pub stored: IntSize,
    pub pixel_type: i32,
    pub compression: i32,
}

impl DvSpec {
    pub fn new(dims: &[(char, i32)], rect: IntRect, pixel_type: i32, compression: i32) -> Self {
        Self {
            dims: dims.to_vec(),
            rect,
            stored: IntSize::new(rect.w as u32, rect.h as u32),
            pixel_type,
            compression,
        }
    }

    pub fn with_stored(mut self, w: u32, h: u32) -> Self {
        self.stored = IntSize::new(w, h);
        self
    }

    fn encode(&self, file_position: u64) -> Vec<u8> {
        let mut entry = vec![0u8; DV_FIXED_SIZE];
        entry[0..2].copy_from_slice(b"DV");
        entry[2..6].copy_from_slice(&self.pixel_type.to_le_bytes());
        entry[6..14].copy_from_slice(&(file_position as i64).to_le_bytes());
        entry[18..22].copy_from_slice(&self.compression.to_le_bytes());

        let mut dims = vec![
            ('X', self.rect.x, self.rect.w, self.stored.w as i32),
            ('Y', self.rect.y, self.rect.h, self.stored.h as i32),
        ];
        dims.extend(self.dims.iter().map(|&(name, value)| (name, value, 1, 1)));

        entry[28..32].copy_from_slice(&(dims.len() as i32).to_le_bytes());
        for (name, start, size, stored) in dims {
            let mut d = vec![0u8; DIMENSION_ENTRY_SIZE];
            d[0] = name as u8;
            d[4..8].copy_from_slice(&start.to_le_bytes());
            d[8..12].copy_from_slice(&size.to_le_bytes());
            d[12..16].copy_from_slice(&(start as f32).to_le_bytes());
            d[16..20].copy_from_slice(&stored.to_le_bytes());
            entry.extend_from_slice(&d);
        }
        entry
    }
}

/// One sub-block to write.
#[derive(Debug, Clone)]
pub struct BlockSpec {
    /// Entry written to the directory
    pub dv: DvSpec,
    /// Entry written to the sub-block header; defaults to `dv`
    pub header_dv: Option<DvSpec>,
    pub data: Vec<u8>,
    pub metadata: Vec<u8>,
    pub attachment: Vec<u8>,
}

impl BlockSpec {
    pub fn new(dv: DvSpec, data: Vec<u8>) -> Self {
        Self {
            dv,
            header_dv: None,
            data,
            metadata: Vec::new(),
            attachment: Vec::new(),
        }
    }

    /// An uncompressed Gray8 tile filled with `value`.
    pub fn gray8(dims: &[(char, i32)], rect: IntRect, value: u8) -> Self {
        let len = (rect.w * rect.h) as usize;
        Self::new(DvSpec::new(dims, rect, PIXEL_GRAY8, 0), vec![value; len])
    }
}

/// Writes a CZI document: file header, sub-blocks, optional metadata, and
/// the sub-block directory last.
#[derive(Debug, Clone, Default)]
pub struct CziBuilder {
    blocks: Vec<BlockSpec>,
    metadata_xml: Option<String>,
}

impl CziBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sub_block(mut self, block: BlockSpec) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn metadata(mut self, xml: impl Into<String>) -> Self {
        self.metadata_xml = Some(xml.into());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = segment_header("ZISRAWFILE", FILE_HEADER_ALLOCATED_SIZE);
        out.extend_from_slice(&[0u8; FILE_HEADER_ALLOCATED_SIZE]);

        let mut positions = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let position = out.len() as u64;
            positions.push(position);

            let dv = block.header_dv.as_ref().unwrap_or(&block.dv).encode(position);
            let header_size = SUBBLOCK_HEADER_MIN_SIZE.max(16 + dv.len());

            let mut body = Vec::new();
            body.extend_from_slice(&(block.metadata.len() as i32).to_le_bytes());
            body.extend_from_slice(&(block.attachment.len() as i32).to_le_bytes());
            body.extend_from_slice(&(block.data.len() as i64).to_le_bytes());
            body.extend_from_slice(&dv);
            body.resize(header_size, 0);
            body.extend_from_slice(&block.metadata);
            body.extend_from_slice(&block.data);
            body.extend_from_slice(&block.attachment);

            out.extend_from_slice(&segment_header("ZISRAWSUBBLOCK", body.len()));
            out.extend_from_slice(&body);
        }

        let mut metadata_position = 0u64;
        if let Some(xml) = &self.metadata_xml {
            metadata_position = out.len() as u64;
            let mut body = vec![0u8; METADATA_HEADER_SIZE];
            body[0..4].copy_from_slice(&(xml.len() as i32).to_le_bytes());
            body.extend_from_slice(xml.as_bytes());
            out.extend_from_slice(&segment_header("ZISRAWMETADATA", body.len()));
            out.extend_from_slice(&body);
        }

        let directory_position = out.len() as u64;
        let mut body = vec![0u8; DIRECTORY_HEADER_SIZE];
        body[0..4].copy_from_slice(&(self.blocks.len() as i32).to_le_bytes());
        for (block, &position) in self.blocks.iter().zip(&positions) {
            body.extend_from_slice(&block.dv.encode(position));
        }
        out.extend_from_slice(&segment_header("ZISRAWDIRECTORY", body.len()));
        out.extend_from_slice(&body);

        // File header fields
        let header = SEGMENT_HEADER_SIZE;
        out[header..header + 4].copy_from_slice(&1i32.to_le_bytes());
        out[header + 4..header + 8].copy_from_slice(&0i32.to_le_bytes());
        out[header + 52..header + 60].copy_from_slice(&(directory_position as i64).to_le_bytes());
        out[header + 60..header + 68].copy_from_slice(&(metadata_position as i64).to_le_bytes());

        out
    }

    /// Build the document and open it from memory.
    pub async fn open(&self, options: OpenOptions) -> CziReader<MemoryRangeReader> {
        let reader = MemoryRangeReader::new(self.build(), "test.czi");
        CziReader::open(reader, options).await.unwrap()
    }
}

fn segment_header(id: &str, size: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; SEGMENT_HEADER_SIZE];
    bytes[..id.len()].copy_from_slice(id.as_bytes());
    bytes[16..24].copy_from_slice(&(size as i64).to_le_bytes());
    bytes[24..32].copy_from_slice(&(size as i64).to_le_bytes());
    bytes
}

// =============================================================================
// Read Tracking
// =============================================================================

/// Wraps a repository and records every sub-block read.
pub struct TrackingRepository<R> {
    inner: R,
    read_count: AtomicUsize,
    reads: Mutex<Vec<usize>>,
}

impl<R: SubBlockRepository> TrackingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            read_count: AtomicUsize::new(0),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Indices read so far, sorted.
    pub fn read_indices(&self) -> Vec<usize> {
        let mut reads = self.reads.lock().unwrap().clone();
        reads.sort();
        reads
    }

    pub fn was_read(&self, index: usize) -> bool {
        self.reads.lock().unwrap().contains(&index)
    }

    pub fn reset_tracking(&self) {
        self.read_count.store(0, Ordering::SeqCst);
        self.reads.lock().unwrap().clear();
    }
}

#[async_trait]
impl<R: SubBlockRepository> SubBlockRepository for TrackingRepository<R> {
    fn directory(&self) -> &SubBlockDirectory {
        self.inner.directory()
    }

    async fn read_sub_block(&self, index: usize) -> Result<Option<SubBlock>, CziError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.reads.lock().unwrap().push(index);
        self.inner.read_sub_block(index).await
    }
}
