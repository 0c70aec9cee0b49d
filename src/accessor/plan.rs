//! Occlusion culling: which sub-blocks must be decoded for a query.
//!
//! Candidates are walked topmost first (reverse paint order) while keeping
//! the region of the ROI already covered. A candidate whose visible part is
//! entirely inside that region would be painted over completely, so it is
//! dropped and never read. The surviving candidates are returned in paint
//! order (ascending), so later sub-blocks still overwrite earlier ones where
//! they partially overlap.

use tracing::debug;

use crate::dimension::{DimCoordinate, Dimension};
use crate::directory::{SubBlockDescriptor, SubBlockDirectory};
use crate::error::AccessorError;
use crate::geometry::{IntRect, Region};

use super::options::AccessorOptions;

/// One sub-block to decode and paint.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSubBlock {
    /// Directory index
    pub index: usize,

    /// Descriptor as found in the directory
    pub descriptor: SubBlockDescriptor,

    /// Intersection of the sub-block's logical rectangle with the ROI
    pub visible: IntRect,
}

/// The sub-blocks needed to answer one query, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionPlan {
    pub roi: IntRect,
    pub items: Vec<PlannedSubBlock>,

    /// Number of candidates before culling
    pub candidates: usize,
}

impl CompositionPlan {
    /// Directory indices in paint order.
    pub fn indices(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.index).collect()
    }

    /// Number of candidates culled as fully covered.
    pub fn culled(&self) -> usize {
        self.candidates - self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Check that a ROI has a positive size.
pub(crate) fn validate_roi(roi: &IntRect) -> Result<(), AccessorError> {
    if roi.w <= 0 || roi.h <= 0 {
        return Err(AccessorError::InvalidArgument(format!(
            "ROI must have positive size, got {}x{}",
            roi.w, roi.h
        )));
    }
    Ok(())
}

/// Compute the composition plan for `roi` on `plane`.
///
/// # Errors
///
/// - `InvalidArgument` if the ROI has a non-positive width or height
/// - `Directory` if the directory is not finalized
pub fn plan_composition(
    directory: &SubBlockDirectory,
    roi: &IntRect,
    plane: &DimCoordinate,
    options: &AccessorOptions,
) -> Result<CompositionPlan, AccessorError> {
    validate_roi(roi)?;

    let mut candidates: Vec<PlannedSubBlock> = Vec::new();
    directory.enum_subset(Some(plane), Some(roi), options.only_layer0, |index, descriptor| {
        if options.accepts_scene(descriptor.coordinate.get(Dimension::S)) {
            if let Some(visible) = descriptor.logical_rect.intersect(roi) {
                candidates.push(PlannedSubBlock {
                    index,
                    descriptor: descriptor.clone(),
                    visible,
                });
            }
        }
        true
    })?;

    if options.sort_by_m {
        // None orders before Some; the sort is stable so ties keep index order
        candidates.sort_by_key(|c| c.descriptor.m_index);
    }

    let total = candidates.len();
    let items = if options.use_visibility_check_optimization {
        cull_occluded(candidates)
    } else {
        candidates
    };

    debug!(
        roi = %roi,
        plane = %plane,
        candidates = total,
        planned = items.len(),
        "Composition plan"
    );

    Ok(CompositionPlan {
        roi: *roi,
        items,
        candidates: total,
    })
}

/// Drop candidates fully covered by those painted after them.
///
/// `candidates` is in paint order; the result keeps that order.
fn cull_occluded(candidates: Vec<PlannedSubBlock>) -> Vec<PlannedSubBlock> {
    let mut covered = Region::new();
    let mut kept = Vec::with_capacity(candidates.len());

    for candidate in candidates.into_iter().rev() {
        if covered.covers(&candidate.visible) {
            continue;
        }
        covered.add(&candidate.visible);
        kept.push(candidate);
    }

    kept.reverse();
    kept
}
