use std::collections::BTreeMap;

use serde::Serialize;

use crate::dimension::{DimBounds, Dimension};
use crate::geometry::IntRect;

use super::descriptor::SubBlockDescriptor;
use super::pyramid::PyramidLayerInfo;

/// Bounding boxes of one scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoundingBoxes {
    /// Union of the logical rectangles of all sub-blocks in the scene
    pub bounding_box: Option<IntRect>,

    /// Same, restricted to layer-0 sub-blocks
    pub bounding_box_layer0: Option<IntRect>,
}

impl BoundingBoxes {
    fn include(&mut self, rect: IntRect, layer0: bool) {
        self.bounding_box = Some(union_opt(self.bounding_box, rect));
        if layer0 {
            self.bounding_box_layer0 = Some(union_opt(self.bounding_box_layer0, rect));
        }
    }
}

fn union_opt(current: Option<IntRect>, rect: IntRect) -> IntRect {
    match current {
        Some(r) => r.union(&rect),
        None => rect,
    }
}

/// Aggregate statistics over all sub-blocks, computed once at finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubBlockStatistics {
    /// Number of sub-blocks
    pub count: usize,

    /// Smallest M-index, or `i32::MAX` if no sub-block has one
    pub min_m_index: i32,

    /// Largest M-index, or `i32::MIN` if no sub-block has one
    pub max_m_index: i32,

    /// Union of all logical rectangles (`None` when empty)
    pub bounding_box: Option<IntRect>,

    /// Union of the logical rectangles of layer-0 sub-blocks
    pub bounding_box_layer0: Option<IntRect>,

    /// Per-dimension `[start, start + size)` over the sub-blocks carrying it
    pub dim_bounds: DimBounds,

    /// Bounding boxes keyed by scene index. Empty when no sub-block has S.
    pub scene_bounding_boxes: BTreeMap<i32, BoundingBoxes>,
}

impl Default for SubBlockStatistics {
    fn default() -> Self {
        Self {
            count: 0,
            min_m_index: i32::MAX,
            max_m_index: i32::MIN,
            bounding_box: None,
            bounding_box_layer0: None,
            dim_bounds: DimBounds::new(),
            scene_bounding_boxes: BTreeMap::new(),
        }
    }
}

impl SubBlockStatistics {
    /// Whether the M-index range holds data (min ≤ max).
    pub fn is_m_index_valid(&self) -> bool {
        self.min_m_index <= self.max_m_index
    }

    /// `(min, max)` M-index, if any sub-block has one.
    pub fn m_index_range(&self) -> Option<(i32, i32)> {
        self.is_m_index_valid()
            .then_some((self.min_m_index, self.max_m_index))
    }

    /// Fold one descriptor into the aggregates.
    pub(crate) fn include(&mut self, descriptor: &SubBlockDescriptor, layer: PyramidLayerInfo) {
        self.count += 1;

        if let Some(m) = descriptor.m_index {
            self.min_m_index = self.min_m_index.min(m);
            self.max_m_index = self.max_m_index.max(m);
        }

        let rect = descriptor.logical_rect;
        let layer0 = layer.is_layer0();
        self.bounding_box = Some(union_opt(self.bounding_box, rect));
        if layer0 {
            self.bounding_box_layer0 = Some(union_opt(self.bounding_box_layer0, rect));
        }

        for (dim, value) in descriptor.coordinate.iter() {
            self.dim_bounds.include(dim, value);
        }

        if let Some(scene) = descriptor.coordinate.get(Dimension::S) {
            self.scene_bounding_boxes
                .entry(scene)
                .or_default()
                .include(rect, layer0);
        }
    }
}
