//! Single-channel tile accessor.
//!
//! # Architecture
//!
//! ```text
//! get(pixel_type, roi, plane, options)
//!   1. Validate ROI            3. Decode planned sub-blocks (parallel)
//!   2. Plan + cull             4. Paint in ascending order onto canvas
//!
//!        │                          │                         │
//!        ▼                          ▼                         ▼
//!  SubBlockDirectory      SubBlockRepository + Codecs     Bitmap::paint
//!                           (SubBlockCache if set)
//! ```
//!
//! Reads and decodes run concurrently, but painting happens in plan order
//! once every sub-block is available, so the result does not depend on
//! which decode finishes first.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, trace};

use crate::codec::{Codec, CodecDispatch, DecodeOptions};
use crate::dimension::DimCoordinate;
use crate::error::AccessorError;
use crate::geometry::IntRect;
use crate::pixel::{checked_packed_size, convert, Bitmap, PixelType, MAX_BITMAP_BYTES};
use crate::repository::SubBlockRepository;

use super::cache::SubBlockCache;
use super::options::AccessorOptions;
use super::plan::{plan_composition, validate_roi, CompositionPlan};

/// Composes a region of one plane from the sub-blocks of a repository.
///
/// # Type Parameters
///
/// * `R` - The sub-block repository (e.g. a [`CziReader`](crate::format::CziReader))
///
/// # Example
///
/// ```ignore
/// let reader = CziReader::open(FileRangeReader::open(path).await?, OpenOptions::default()).await?;
/// let accessor = TileAccessor::new(Arc::new(reader), CodecDispatch::new());
///
/// let plane: DimCoordinate = "C0".parse()?;
/// let bitmap = accessor
///     .get(PixelType::Gray8, IntRect::new(0, 0, 512, 512), &plane, &AccessorOptions::default())
///     .await?;
/// ```
pub struct TileAccessor<R: SubBlockRepository> {
    repository: Arc<R>,
    codecs: Arc<CodecDispatch>,
}

impl<R: SubBlockRepository> Clone for TileAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            codecs: Arc::clone(&self.codecs),
        }
    }
}

impl<R: SubBlockRepository + 'static> TileAccessor<R> {
    /// Create an accessor over `repository` decoding with `codecs`.
    pub fn new(repository: Arc<R>, codecs: CodecDispatch) -> Self {
        Self {
            repository,
            codecs: Arc::new(codecs),
        }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Compute which sub-blocks a query would decode, without reading any.
    pub fn plan(
        &self,
        roi: &IntRect,
        plane: &DimCoordinate,
        options: &AccessorOptions,
    ) -> Result<CompositionPlan, AccessorError> {
        plan_composition(self.repository.directory(), roi, plane, options)
    }

    /// Compose `roi` of `plane` into a new bitmap of `pixel_type`.
    ///
    /// Pixels not covered by any matching sub-block hold the background
    /// color, or zero if none is set. Sub-blocks are painted in ascending
    /// order so a later sub-block wins where two overlap.
    ///
    /// # Arguments
    ///
    /// * `pixel_type` - Pixel type of the result; sub-blocks are converted
    /// * `roi` - Region in logical coordinates, must have positive size
    /// * `plane` - Plane coordinate (typically at least C)
    /// * `options` - Background, ordering, culling and cache settings
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty or negative ROI, or one whose bitmap
    ///   would exceed [`MAX_BITMAP_BYTES`]
    /// - `Read` / `SubBlockMissing` if a planned sub-block cannot be read
    /// - `Decode` if a planned sub-block cannot be decoded
    /// - `Bitmap` if a pixel conversion or the background fill is undefined
    pub async fn get(
        &self,
        pixel_type: PixelType,
        roi: IntRect,
        plane: &DimCoordinate,
        options: &AccessorOptions,
    ) -> Result<Bitmap, AccessorError> {
        validate_roi(&roi)?;
        if checked_packed_size(pixel_type, roi.w as u64, roi.h as u64).is_none() {
            return Err(AccessorError::InvalidArgument(format!(
                "{} region {} exceeds {} bytes",
                pixel_type, roi, MAX_BITMAP_BYTES
            )));
        }
        let plan = self.plan(&roi, plane, options)?;

        let mut canvas = Bitmap::new(pixel_type, roi.w as u32, roi.h as u32);
        if let Some(background) = options.background {
            canvas.fill(background)?;
        }

        self.paint_plan(&plan, &mut canvas, options).await?;
        Ok(canvas)
    }

    /// Decode every sub-block in `plan` and paint them onto `canvas`.
    ///
    /// `canvas` covers `plan.roi` and determines the target pixel type.
    pub async fn paint_plan(
        &self,
        plan: &CompositionPlan,
        canvas: &mut Bitmap,
        options: &AccessorOptions,
    ) -> Result<(), AccessorError> {
        if plan.is_empty() {
            return Ok(());
        }

        let mut tasks = JoinSet::new();
        for (slot, item) in plan.items.iter().enumerate() {
            let repository = Arc::clone(&self.repository);
            let codecs = Arc::clone(&self.codecs);
            let cache = cache_for(options, item.descriptor.compression_raw);
            let decode_options = options.decode_options;
            let index = item.index;

            tasks.spawn(async move {
                let bitmap =
                    load_sub_block(repository, codecs, cache, index, decode_options).await;
                (slot, bitmap)
            });
        }

        let mut decoded: Vec<Option<Arc<Bitmap>>> = vec![None; plan.items.len()];
        while let Some(joined) = tasks.join_next().await {
            let (slot, bitmap) = joined.map_err(|e| AccessorError::Task(e.to_string()))?;
            // Returning drops the JoinSet, which aborts the remaining tasks
            decoded[slot] = Some(bitmap?);
        }

        let target = canvas.pixel_type();
        for (item, bitmap) in plan.items.iter().zip(decoded) {
            let bitmap = bitmap.ok_or(AccessorError::SubBlockMissing(item.index))?;
            let placement = translate(&item.descriptor.logical_rect, &plan.roi);

            if bitmap.pixel_type() == target {
                canvas.paint(&bitmap, placement, None)?;
            } else {
                let converted = convert(&bitmap, target)?;
                canvas.paint(&converted, placement, None)?;
            }
        }

        debug!(
            roi = %plan.roi,
            painted = plan.items.len(),
            culled = plan.culled(),
            "Composed tile"
        );
        Ok(())
    }
}

/// The cache to use for a sub-block with `compression_raw`, if any.
fn cache_for(options: &AccessorOptions, compression_raw: i32) -> Option<Arc<SubBlockCache>> {
    let cache = options.sub_block_cache.as_ref()?;
    if options.only_use_cache_for_compressed {
        // Unknown codes fail at decode; treat them as compressed here
        let compressed = Codec::from_raw(compression_raw)
            .map(Codec::is_compressed)
            .unwrap_or(true);
        if !compressed {
            return None;
        }
    }
    Some(Arc::clone(cache))
}

/// Fetch one sub-block from the cache, or read and decode it.
async fn load_sub_block<R: SubBlockRepository + 'static>(
    repository: Arc<R>,
    codecs: Arc<CodecDispatch>,
    cache: Option<Arc<SubBlockCache>>,
    index: usize,
    decode_options: DecodeOptions,
) -> Result<Arc<Bitmap>, AccessorError> {
    if let Some(cache) = &cache {
        if let Some(bitmap) = cache.get(index).await {
            trace!(index, "Sub-block cache hit");
            return Ok(bitmap);
        }
    }

    let block = repository
        .read_sub_block(index)
        .await?
        .ok_or(AccessorError::SubBlockMissing(index))?;

    let descriptor = block.descriptor;
    let data = block.data;
    let bitmap = tokio::task::spawn_blocking(move || {
        codecs.decode(
            descriptor.compression_raw,
            &data,
            descriptor.pixel_type,
            descriptor.physical_size.w,
            descriptor.physical_size.h,
            &decode_options,
        )
    })
    .await
    .map_err(|e| AccessorError::Task(e.to_string()))??;

    let bitmap = Arc::new(bitmap);
    if let Some(cache) = &cache {
        cache.put(index, Arc::clone(&bitmap)).await;
    }
    Ok(bitmap)
}

/// `rect` relative to the origin of `roi`.
fn translate(rect: &IntRect, roi: &IntRect) -> IntRect {
    IntRect::new(rect.x - roi.x, rect.y - roi.y, rect.w, rect.h)
}

// =============================================================================
// Tests
// =============================================================================
