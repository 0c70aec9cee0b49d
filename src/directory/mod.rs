//! Sub-block directory: the in-memory catalog of a document's tiles.
//!
//! The directory is filled once when a document is opened and frozen with
//! `finalize`. Freezing computes aggregate statistics and classifies every
//! sub-block into a pyramid layer, so later queries are read-only.

mod catalog;
mod descriptor;
mod pyramid;
mod statistics;

pub use catalog::SubBlockDirectory;
pub use descriptor::{m_index_from_raw, SubBlockDescriptor};
pub use pyramid::{
    classify, classify_factor, PyramidLayerInfo, PyramidLayerStatistics, PyramidStatistics,
    NO_SCENE_KEY,
};
pub use statistics::{BoundingBoxes, SubBlockStatistics};
