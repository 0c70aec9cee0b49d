//! # czi-tiles
//!
//! A reader and tile compositor for CZI microscopy documents.
//!
//! A CZI document stores its pixels as sub-blocks: tiles at various
//! positions, planes and pyramid resolutions. This crate builds an
//! in-memory directory of those sub-blocks when a document is opened, and
//! composes arbitrary regions of a plane from them, decoding only the
//! sub-blocks that are actually visible.
//!
//! ## Features
//!
//! - **Range-based reading**: only the bytes of the segments needed are read
//! - **Sub-block directory**: statistics, pyramid classification, spatial and
//!   plane queries
//! - **Occlusion culling**: sub-blocks painted over completely are never read
//! - **Codecs**: uncompressed, zstd (plain and with hi/lo byte packing), and
//!   JPEG XR through an injected decoder
//! - **Decoded sub-block cache**: LRU sized by bytes
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`io`] - Async range readers over files and memory
//! - [`mod@format`] - CZI segment parsing, implementing the repository
//! - [`directory`] - Sub-block catalog, statistics and pyramid layers
//! - [`codec`] - Compression dispatch and discrepancy policy
//! - [`accessor`] - Culling, decoding and painting of a region
//! - [`pixel`] - Pixel types, bitmaps and conversion
//! - [`export`] - PNG/JPEG output
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use czi_tiles::{
//!     AccessorOptions, CodecDispatch, CziReader, FileRangeReader, IntRect, OpenOptions,
//!     PixelType, TileAccessor,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = FileRangeReader::open("slide.czi").await?;
//!     let reader = CziReader::open(file, OpenOptions::default()).await?;
//!     let accessor = TileAccessor::new(Arc::new(reader), CodecDispatch::new());
//!
//!     let plane: czi_tiles::DimCoordinate = "C0".parse()?;
//!     let bitmap = accessor
//!         .get(PixelType::Gray8, IntRect::new(0, 0, 256, 256), &plane, &AccessorOptions::default())
//!         .await?;
//!     println!("{}x{}", bitmap.width(), bitmap.height());
//!     Ok(())
//! }
//! ```

pub mod accessor;
pub mod codec;
pub mod config;
pub mod dimension;
pub mod directory;
pub mod error;
pub mod export;
pub mod format;
pub mod geometry;
pub mod io;
pub mod pixel;
pub mod repository;

// Re-export commonly used types
pub use accessor::{
    plan_composition, AccessorOptions, CompositionPlan, PlannedSubBlock, SubBlockCache,
    TileAccessor,
};
pub use codec::{Codec, CodecDispatch, DecodeOptions, JpegXrDecoder};
pub use dimension::{DimBounds, DimCoordinate, Dimension};
pub use directory::{
    PyramidLayerInfo, PyramidLayerStatistics, PyramidStatistics, SubBlockDescriptor,
    SubBlockDirectory, SubBlockStatistics,
};
pub use error::{
    AccessorError, BitmapError, CoordinateParseError, CziError, DecodeError, DirectoryError,
    ExportError, IoError,
};
pub use format::{CziReader, OpenOptions, Precedence, SubBlockInfoPolicy};
pub use geometry::{IntRect, IntSize, Region};
pub use io::{FileRangeReader, MemoryRangeReader, RangeReader};
pub use pixel::{Background, Bitmap, PixelType};
pub use repository::{MemBlkType, SubBlock, SubBlockRepository};
