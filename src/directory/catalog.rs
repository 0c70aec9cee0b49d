use std::collections::BTreeMap;

use tracing::debug;

use crate::dimension::{DimCoordinate, Dimension};
use crate::error::DirectoryError;
use crate::geometry::IntRect;

use super::descriptor::SubBlockDescriptor;
use super::pyramid::{classify, PyramidLayerInfo, PyramidStatistics, NO_SCENE_KEY};
use super::statistics::SubBlockStatistics;

/// Data computed once by [`SubBlockDirectory::finalize`].
#[derive(Debug)]
struct Frozen {
    statistics: SubBlockStatistics,
    pyramid_statistics: PyramidStatistics,
    layer_infos: Vec<PyramidLayerInfo>,
    /// First descriptor index per channel value
    first_in_channel: BTreeMap<i32, usize>,
    any_channel: bool,
}

/// In-memory catalog of every sub-block in a document.
///
/// Built by a series of [`add`](Self::add) calls followed by exactly one
/// [`finalize`](Self::finalize). After that the directory is immutable and
/// all queries take `&self`, so it can be shared across tasks without
/// locking. Queries before finalize fail with
/// [`DirectoryError::InvalidState`].
///
/// A descriptor's index is its insertion position.
#[derive(Debug, Default)]
pub struct SubBlockDirectory {
    descriptors: Vec<SubBlockDescriptor>,
    frozen: Option<Frozen>,
}

impl SubBlockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor and return its index.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the directory is already finalized
    /// - `InvalidDescriptor` if the logical or physical size is not positive
    pub fn add(&mut self, descriptor: SubBlockDescriptor) -> Result<usize, DirectoryError> {
        if self.frozen.is_some() {
            return Err(DirectoryError::InvalidState("add after finalize"));
        }
        descriptor.validate()?;

        self.descriptors.push(descriptor);
        Ok(self.descriptors.len() - 1)
    }

    /// Freeze the directory and compute statistics in a single pass.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if called more than once.
    pub fn finalize(&mut self) -> Result<(), DirectoryError> {
        if self.frozen.is_some() {
            return Err(DirectoryError::InvalidState("finalize called twice"));
        }

        let mut statistics = SubBlockStatistics::default();
        let mut pyramid_counts: BTreeMap<i32, BTreeMap<PyramidLayerInfo, usize>> = BTreeMap::new();
        let mut layer_infos = Vec::with_capacity(self.descriptors.len());
        let mut first_in_channel = BTreeMap::new();
        let mut any_channel = false;

        for (index, descriptor) in self.descriptors.iter().enumerate() {
            let layer = classify(descriptor);
            layer_infos.push(layer);
            statistics.include(descriptor, layer);

            let scene = descriptor
                .coordinate
                .get(Dimension::S)
                .unwrap_or(NO_SCENE_KEY);
            *pyramid_counts
                .entry(scene)
                .or_default()
                .entry(layer)
                .or_insert(0) += 1;

            if let Some(c) = descriptor.coordinate.get(Dimension::C) {
                any_channel = true;
                first_in_channel.entry(c).or_insert(index);
            }
        }

        debug!(
            count = statistics.count,
            scenes = pyramid_counts.len(),
            "Sub-block directory finalized"
        );

        self.frozen = Some(Frozen {
            statistics,
            pyramid_statistics: PyramidStatistics::from_counts(pyramid_counts),
            layer_infos,
            first_in_channel,
            any_channel,
        });
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.frozen.is_some()
    }

    /// Number of descriptors added so far.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn frozen(&self) -> Result<&Frozen, DirectoryError> {
        self.frozen
            .as_ref()
            .ok_or(DirectoryError::InvalidState("directory not finalized"))
    }

    /// Visit descriptors in index order until `f` returns `false`.
    pub fn enumerate<F>(&self, mut f: F) -> Result<(), DirectoryError>
    where
        F: FnMut(usize, &SubBlockDescriptor) -> bool,
    {
        self.frozen()?;
        for (index, descriptor) in self.descriptors.iter().enumerate() {
            if !f(index, descriptor) {
                break;
            }
        }
        Ok(())
    }

    /// Visit, in index order, the descriptors that match `plane`, intersect
    /// `roi` and (if `only_layer0`) are on pyramid layer 0.
    ///
    /// For each dimension present in `plane`, a descriptor carrying that
    /// dimension must have the same value. A descriptor that does not carry
    /// a filtered dimension is not excluded by it.
    pub fn enum_subset<F>(
        &self,
        plane: Option<&DimCoordinate>,
        roi: Option<&IntRect>,
        only_layer0: bool,
        mut f: F,
    ) -> Result<(), DirectoryError>
    where
        F: FnMut(usize, &SubBlockDescriptor) -> bool,
    {
        let frozen = self.frozen()?;

        for (index, descriptor) in self.descriptors.iter().enumerate() {
            if only_layer0 && !frozen.layer_infos[index].is_layer0() {
                continue;
            }
            if let Some(plane) = plane {
                if !descriptor.coordinate.matches(plane) {
                    continue;
                }
            }
            if let Some(roi) = roi {
                if !descriptor.logical_rect.intersects(roi) {
                    continue;
                }
            }
            if !f(index, descriptor) {
                break;
            }
        }
        Ok(())
    }

    /// Indices visited by [`enum_subset`](Self::enum_subset).
    pub fn subset_indices(
        &self,
        plane: Option<&DimCoordinate>,
        roi: Option<&IntRect>,
        only_layer0: bool,
    ) -> Result<Vec<usize>, DirectoryError> {
        let mut indices = Vec::new();
        self.enum_subset(plane, roi, only_layer0, |index, _| {
            indices.push(index);
            true
        })?;
        Ok(indices)
    }

    /// The descriptor at `index`, if any.
    pub fn try_get(&self, index: usize) -> Result<Option<&SubBlockDescriptor>, DirectoryError> {
        self.frozen()?;
        Ok(self.descriptors.get(index))
    }

    /// Some descriptor in channel `channel`, with its index.
    ///
    /// When no descriptor carries a channel at all, channel 0 matches every
    /// descriptor. Otherwise the channel value must match exactly.
    pub fn try_get_arbitrary_in_channel(
        &self,
        channel: i32,
    ) -> Result<Option<(usize, &SubBlockDescriptor)>, DirectoryError> {
        let frozen = self.frozen()?;

        let index = if frozen.any_channel {
            frozen.first_in_channel.get(&channel).copied()
        } else if channel == 0 && !self.descriptors.is_empty() {
            Some(0)
        } else {
            None
        };

        Ok(index.map(|i| (i, &self.descriptors[i])))
    }

    pub fn statistics(&self) -> Result<&SubBlockStatistics, DirectoryError> {
        Ok(&self.frozen()?.statistics)
    }

    pub fn pyramid_statistics(&self) -> Result<&PyramidStatistics, DirectoryError> {
        Ok(&self.frozen()?.pyramid_statistics)
    }

    /// Pyramid layer of the descriptor at `index`.
    pub fn layer_info(&self, index: usize) -> Result<Option<PyramidLayerInfo>, DirectoryError> {
        Ok(self.frozen()?.layer_infos.get(index).copied())
    }
}
