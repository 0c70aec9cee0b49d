//! CZI container parsing through the repository interface.

use std::io::Write;

use czi_tiles::codec::{CodecDispatch, DecodeOptions, COMPRESSION_ZSTD1};
use czi_tiles::dimension::Dimension;
use czi_tiles::error::{CziError, IoError};
use czi_tiles::format::{CziReader, OpenOptions, Precedence, SubBlockInfoPolicy};
use czi_tiles::geometry::{IntRect, IntSize};
use czi_tiles::io::{FileRangeReader, MemoryRangeReader};
use czi_tiles::pixel::PixelType;
use czi_tiles::repository::{MemBlkType, SubBlockRepository};

use super::test_utils::{BlockSpec, CziBuilder, DvSpec, PIXEL_BGR24, PIXEL_GRAY16};

fn three_tile_document() -> CziBuilder {
    let mut with_payloads = BlockSpec::gray8(&[('C', 1), ('S', 0), ('M', 2)], IntRect::new(4, 0, 4, 2), 9);
    with_payloads.metadata = b"<METADATA/>".to_vec();
    with_payloads.attachment = vec![0xAA, 0xBB];

    CziBuilder::new()
        .sub_block(BlockSpec::gray8(&[('C', 0), ('S', 0), ('M', 0)], IntRect::new(0, 0, 4, 2), 1))
        .sub_block(BlockSpec::gray8(&[('C', 0), ('S', 0), ('M', 1)], IntRect::new(4, 0, 4, 2), 2))
        .sub_block(with_payloads)
}

#[tokio::test]
async fn test_open_builds_directory() {
    let reader = three_tile_document().open(OpenOptions::default()).await;

    assert_eq!(reader.file_header().version(), "1.0");
    assert_eq!(reader.identifier(), "test.czi");

    let dir = reader.directory();
    assert!(dir.is_finalized());
    assert_eq!(dir.len(), 3);

    let d = dir.try_get(2).unwrap().unwrap();
    assert_eq!(d.coordinate.get(Dimension::C), Some(1));
    assert_eq!(d.coordinate.get(Dimension::S), Some(0));
    assert_eq!(d.m_index, Some(2));
    assert_eq!(d.logical_rect, IntRect::new(4, 0, 4, 2));
    assert_eq!(d.physical_size, IntSize::new(4, 2));
    assert_eq!(d.pixel_type, PixelType::Gray8);

    let stats = dir.statistics().unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.bounding_box, Some(IntRect::new(0, 0, 8, 2)));
    assert_eq!(stats.m_index_range(), Some((0, 2)));
}

#[tokio::test]
async fn test_read_sub_block_payloads() {
    let reader = three_tile_document().open(OpenOptions::default()).await;

    let block = reader.read_sub_block(1).await.unwrap().unwrap();
    assert_eq!(block.index, 1);
    assert_eq!(block.data.as_ref(), &[2u8; 8]);
    assert!(block.metadata.is_empty());
    assert!(block.attachment.is_empty());

    let block = reader.read_sub_block(2).await.unwrap().unwrap();
    assert_eq!(block.data.as_ref(), &[9u8; 8]);
    assert_eq!(block.metadata.as_ref(), b"<METADATA/>");
    assert_eq!(block.attachment.as_ref(), &[0xAA, 0xBB]);

    let attachment = reader.read_raw_bytes(2, MemBlkType::Attachment).await.unwrap();
    assert_eq!(attachment.unwrap().as_ref(), &[0xAA, 0xBB]);
    let metadata = reader.read_raw_bytes(0, MemBlkType::Metadata).await.unwrap();
    assert!(metadata.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_index() {
    let reader = three_tile_document().open(OpenOptions::default()).await;

    assert!(reader.contains(2));
    assert!(!reader.contains(3));
    assert!(reader.read_sub_block(3).await.unwrap().is_none());
    assert!(reader
        .read_raw_bytes(42, MemBlkType::Data)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_metadata_xml() {
    let xml = "<ImageDocument><Metadata/></ImageDocument>";
    let reader = three_tile_document()
        .metadata(xml)
        .open(OpenOptions::default())
        .await;
    assert_eq!(reader.read_metadata_xml().await.unwrap().as_deref(), Some(xml));

    let reader = three_tile_document().open(OpenOptions::default()).await;
    assert!(reader.read_metadata_xml().await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_document() {
    let reader = CziBuilder::new().open(OpenOptions::default()).await;
    let dir = reader.directory();
    assert!(dir.is_empty());
    assert_eq!(dir.statistics().unwrap().count, 0);
    assert!(dir.statistics().unwrap().bounding_box.is_none());
    assert!(dir.try_get_arbitrary_in_channel(0).unwrap().is_none());
}

#[tokio::test]
async fn test_large_dimension_entry() {
    // 13 dimension entries push the DV entry past the 256-byte minimum header
    let dims: Vec<(char, i32)> = vec![
        ('C', 0), ('T', 1), ('Z', 2), ('R', 0), ('I', 0), ('H', 0), ('V', 0), ('B', 0),
        ('S', 0), ('M', 7), ('Q', 3),
    ];
    let block = BlockSpec::gray8(&dims, IntRect::new(0, 0, 3, 1), 5);
    let reader = CziBuilder::new()
        .sub_block(block)
        .open(OpenOptions::default())
        .await;

    let d = reader.directory().try_get(0).unwrap().unwrap();
    assert_eq!(d.coordinate.get(Dimension::Z), Some(2));
    assert_eq!(d.m_index, Some(7));

    let block = reader.read_sub_block(0).await.unwrap().unwrap();
    assert_eq!(block.data.as_ref(), &[5, 5, 5]);
}

// =============================================================================
// Directory vs. sub-block header
// =============================================================================

fn disagreeing_document() -> CziBuilder {
    let rect = IntRect::new(0, 0, 2, 1);
    let mut block = BlockSpec::gray8(&[('C', 0)], rect, 3);
    block.header_dv = Some(DvSpec::new(&[('C', 0)], rect, PIXEL_GRAY16, 0).with_stored(1, 1));
    CziBuilder::new().sub_block(block)
}

fn policy(precedence: Precedence, ignore_discrepancy: bool) -> OpenOptions {
    OpenOptions {
        sub_block_info_policy: SubBlockInfoPolicy {
            precedence,
            ignore_discrepancy,
        },
    }
}

#[tokio::test]
async fn test_discrepancy_reported_by_default() {
    let reader = disagreeing_document().open(OpenOptions::default()).await;
    let result = reader.read_sub_block(0).await;
    assert!(matches!(
        result,
        Err(CziError::Discrepancy { index: 0, field: "pixel type" })
    ));
}

#[tokio::test]
async fn test_directory_precedence() {
    let reader = disagreeing_document()
        .open(policy(Precedence::Directory, true))
        .await;
    let block = reader.read_sub_block(0).await.unwrap().unwrap();
    assert_eq!(block.descriptor.pixel_type, PixelType::Gray8);
    assert_eq!(block.descriptor.physical_size, IntSize::new(2, 1));
}

#[tokio::test]
async fn test_header_precedence() {
    let reader = disagreeing_document()
        .open(policy(Precedence::SubBlockHeader, true))
        .await;
    let block = reader.read_sub_block(0).await.unwrap().unwrap();
    assert_eq!(block.descriptor.pixel_type, PixelType::Gray16);
    assert_eq!(block.descriptor.physical_size, IntSize::new(1, 1));
    // The directory itself is unchanged
    assert_eq!(
        reader.directory().try_get(0).unwrap().unwrap().pixel_type,
        PixelType::Gray8
    );
}

// =============================================================================
// Codecs through the reader
// =============================================================================

#[tokio::test]
async fn test_zstd1_hilo_sub_block() {
    // Two Gray16 pixels 0x1234 and 0xABCD, low bytes first then high bytes
    let packed = [0x34u8, 0xCD, 0x12, 0xAB];
    let mut payload = vec![3u8, 1, 1];
    payload.extend(zstd::stream::encode_all(&packed[..], 3).unwrap());

    let rect = IntRect::new(0, 0, 2, 1);
    let reader = CziBuilder::new()
        .sub_block(BlockSpec::new(
            DvSpec::new(&[('C', 0)], rect, PIXEL_GRAY16, COMPRESSION_ZSTD1),
            payload,
        ))
        .open(OpenOptions::default())
        .await;

    let block = reader.read_sub_block(0).await.unwrap().unwrap();
    let d = &block.descriptor;
    let bitmap = CodecDispatch::new()
        .decode(
            d.compression_raw,
            &block.data,
            d.pixel_type,
            d.physical_size.w,
            d.physical_size.h,
            &DecodeOptions::default(),
        )
        .unwrap();

    assert_eq!(bitmap.pixel_type(), PixelType::Gray16);
    assert_eq!(bitmap.data(), &[0x34, 0x12, 0xCD, 0xAB]);
}

#[tokio::test]
async fn test_bgr24_sub_block() {
    let rect = IntRect::new(0, 0, 1, 1);
    let reader = CziBuilder::new()
        .sub_block(BlockSpec::new(
            DvSpec::new(&[('C', 0)], rect, PIXEL_BGR24, 0),
            vec![1, 2, 3],
        ))
        .open(OpenOptions::default())
        .await;

    let d = reader.directory().try_get(0).unwrap().unwrap();
    assert_eq!(d.pixel_type, PixelType::Bgr24);
    let block = reader.read_sub_block(0).await.unwrap().unwrap();
    assert_eq!(block.data.as_ref(), &[1, 2, 3]);
}

// =============================================================================
// Malformed input
// =============================================================================

#[tokio::test]
async fn test_file_too_small() {
    let reader = MemoryRangeReader::new(vec![0u8; 40], "tiny.czi");
    let result = CziReader::open(reader, OpenOptions::default()).await;
    assert!(matches!(result, Err(CziError::FileTooSmall { actual: 40, .. })));
}

#[tokio::test]
async fn test_wrong_magic() {
    let mut bytes = three_tile_document().build();
    bytes[..10].copy_from_slice(b"NOTACZIDOC");
    let reader = MemoryRangeReader::new(bytes, "bad.czi");
    let result = CziReader::open(reader, OpenOptions::default()).await;
    assert!(matches!(
        result,
        Err(CziError::InvalidSegmentId { offset: 0, .. })
    ));
}

#[tokio::test]
async fn test_unknown_pixel_type_rejected_at_open() {
    let rect = IntRect::new(0, 0, 1, 1);
    let bytes = CziBuilder::new()
        .sub_block(BlockSpec::new(DvSpec::new(&[('C', 0)], rect, 77, 0), vec![0]))
        .build();
    let reader = MemoryRangeReader::new(bytes, "odd.czi");
    let result = CziReader::open(reader, OpenOptions::default()).await;
    assert!(matches!(result, Err(CziError::UnsupportedPixelType(77))));
}

/// Overwrite the entry count of the directory segment.
fn with_directory_count(mut bytes: Vec<u8>, count: i32) -> Vec<u8> {
    // Directory position is a field of the file header, after the segment header
    let field = 32 + 52;
    let position = i64::from_le_bytes(bytes[field..field + 8].try_into().unwrap()) as usize;
    bytes[position + 32..position + 36].copy_from_slice(&count.to_le_bytes());
    bytes
}

#[tokio::test]
async fn test_huge_directory_count() {
    let bytes = with_directory_count(three_tile_document().build(), i32::MAX);
    let reader = MemoryRangeReader::new(bytes, "count.czi");
    let result = CziReader::open(reader, OpenOptions::default()).await;
    assert!(matches!(result, Err(CziError::CorruptSegment(_))));
}

#[tokio::test]
async fn test_directory_count_past_last_entry() {
    let bytes = with_directory_count(three_tile_document().build(), 4);
    let reader = MemoryRangeReader::new(bytes, "count.czi");
    let result = CziReader::open(reader, OpenOptions::default()).await;
    assert!(matches!(result, Err(CziError::CorruptSegment(_))));
}

#[tokio::test]
async fn test_truncated_document() {
    let bytes = three_tile_document().build();
    // Drop the tail, which holds the directory
    let truncated = bytes[..bytes.len() - 40].to_vec();
    let reader = MemoryRangeReader::new(truncated, "cut.czi");
    assert!(CziReader::open(reader, OpenOptions::default()).await.is_err());
}

// =============================================================================
// File-backed reading
// =============================================================================

#[tokio::test]
async fn test_open_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&three_tile_document().metadata("<X/>").build())
        .unwrap();
    file.flush().unwrap();

    let source = FileRangeReader::open(file.path()).await.unwrap();
    let reader = CziReader::open(source, OpenOptions::default()).await.unwrap();

    assert_eq!(reader.directory().len(), 3);
    assert_eq!(reader.read_metadata_xml().await.unwrap().as_deref(), Some("<X/>"));
    let block = reader.read_sub_block(0).await.unwrap().unwrap();
    assert_eq!(block.data.as_ref(), &[1u8; 8]);
}

#[tokio::test]
async fn test_open_missing_file() {
    let result = FileRangeReader::open("/nonexistent/definitely-missing.czi").await;
    assert!(matches!(result, Err(IoError::NotFound(_))));
}
