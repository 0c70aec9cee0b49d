//! Tile accessor: composes a region of interest from sub-blocks.
//!
//! - [`plan`] selects the sub-blocks a query needs and culls the ones that
//!   would be painted over completely
//! - [`TileAccessor`] reads, decodes and paints the planned sub-blocks
//! - [`SubBlockCache`] keeps decoded sub-blocks across queries

mod cache;
mod compositor;
mod options;
pub mod plan;

pub use cache::{SubBlockCache, DEFAULT_SUB_BLOCK_CACHE_CAPACITY};
pub use compositor::TileAccessor;
pub use options::AccessorOptions;
pub use plan::{plan_composition, CompositionPlan, PlannedSubBlock};
