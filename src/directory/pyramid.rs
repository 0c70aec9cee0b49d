//! Pyramid layer classification.
//!
//! Down-sampled sub-blocks carry a logical size larger than their stored
//! size. The ratio between the two identifies the pyramid layer: a ratio of
//! `f^n` is layer `n` of a pyramid with minification factor `f`.
//!
//! # Classification
//!
//! 1. `factor = logical / stored` on the axis that is longer in stored size.
//! 2. `factor ≈ 1` is layer 0, reported as minification 0 and layer 0.
//! 3. Otherwise `factor` is matched against powers of 2 then 3 with a
//!    relative tolerance of 1%.
//! 4. Anything else is reported as unclassified (0xFF/0xFF) rather than
//!    guessed.

use std::collections::BTreeMap;

use serde::Serialize;

use super::descriptor::SubBlockDescriptor;

// =============================================================================
// Constants
// =============================================================================

/// Minification factors tried in order.
const CANDIDATE_FACTORS: [u8; 2] = [2, 3];

/// Relative tolerance for matching a ratio against `f^n`.
const RELATIVE_TOLERANCE: f64 = 0.01;

/// Largest layer number representable without hitting the sentinel.
const MAX_LAYER: i32 = 0xFE;

/// Scene key used in [`PyramidStatistics`] when a sub-block has no scene.
pub const NO_SCENE_KEY: i32 = i32::MAX;

// =============================================================================
// PyramidLayerInfo
// =============================================================================

/// Which pyramid layer a sub-block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PyramidLayerInfo {
    /// Factor by which adjacent layers shrink (commonly 2 or 3). 0 for layer 0.
    pub minification_factor: u8,

    /// Layer number, 0 being full resolution.
    pub layer: u8,
}

impl PyramidLayerInfo {
    pub const LAYER0: PyramidLayerInfo = PyramidLayerInfo {
        minification_factor: 0,
        layer: 0,
    };

    pub const UNCLASSIFIED: PyramidLayerInfo = PyramidLayerInfo {
        minification_factor: 0xFF,
        layer: 0xFF,
    };

    #[inline]
    pub fn is_layer0(&self) -> bool {
        *self == Self::LAYER0
    }

    #[inline]
    pub fn is_unclassified(&self) -> bool {
        *self == Self::UNCLASSIFIED
    }

    /// Total down-sampling relative to layer 0, or `None` when unclassified.
    pub fn downsample(&self) -> Option<f64> {
        if self.is_unclassified() {
            None
        } else if self.is_layer0() {
            Some(1.0)
        } else {
            Some((self.minification_factor as f64).powi(self.layer as i32))
        }
    }
}

/// Classify a descriptor by its stored/logical size ratio.
pub fn classify(descriptor: &SubBlockDescriptor) -> PyramidLayerInfo {
    classify_factor(1.0 / descriptor.zoom())
}

/// Classify a logical/stored size ratio.
pub fn classify_factor(factor: f64) -> PyramidLayerInfo {
    if !factor.is_finite() || factor <= 0.0 {
        return PyramidLayerInfo::UNCLASSIFIED;
    }

    if (factor - 1.0).abs() <= RELATIVE_TOLERANCE {
        return PyramidLayerInfo::LAYER0;
    }

    for f in CANDIDATE_FACTORS {
        let base = f as f64;
        let n = (factor.ln() / base.ln()).round() as i32;
        if !(1..=MAX_LAYER).contains(&n) {
            continue;
        }

        let expected = base.powi(n);
        if (factor - expected).abs() <= RELATIVE_TOLERANCE * expected {
            return PyramidLayerInfo {
                minification_factor: f,
                layer: n as u8,
            };
        }
    }

    PyramidLayerInfo::UNCLASSIFIED
}

// =============================================================================
// PyramidStatistics
// =============================================================================

/// Sub-block count for one pyramid layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PyramidLayerStatistics {
    pub layer_info: PyramidLayerInfo,
    pub count: usize,
}

/// Per scene, the number of sub-blocks in each pyramid layer.
///
/// Sub-blocks without a scene are counted under [`NO_SCENE_KEY`]. Each
/// scene's list is ordered by layer info, so layer 0 comes first and the
/// unclassified bucket (if any) comes last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PyramidStatistics {
    pub scene_pyramid_statistics: BTreeMap<i32, Vec<PyramidLayerStatistics>>,
}

impl PyramidStatistics {
    pub(crate) fn from_counts(counts: BTreeMap<i32, BTreeMap<PyramidLayerInfo, usize>>) -> Self {
        let scene_pyramid_statistics = counts
            .into_iter()
            .map(|(scene, layers)| {
                let list = layers
                    .into_iter()
                    .map(|(layer_info, count)| PyramidLayerStatistics { layer_info, count })
                    .collect();
                (scene, list)
            })
            .collect();

        Self {
            scene_pyramid_statistics,
        }
    }

    /// The per-layer counts for `scene` (use [`NO_SCENE_KEY`] for sub-blocks
    /// without a scene).
    pub fn layers(&self, scene: i32) -> Option<&[PyramidLayerStatistics]> {
        self.scene_pyramid_statistics.get(&scene).map(Vec::as_slice)
    }
}
