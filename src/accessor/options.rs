use std::collections::BTreeSet;
use std::sync::Arc;

use crate::codec::DecodeOptions;
use crate::pixel::Background;

use super::cache::SubBlockCache;

/// Per-query options for [`TileAccessor::get`](super::TileAccessor::get).
#[derive(Clone)]
pub struct AccessorOptions {
    /// Fill color for pixels not covered by any sub-block. `None` leaves
    /// them zero.
    pub background: Option<Background>,

    /// Paint in ascending M-index order instead of directory order.
    /// Sub-blocks without an M-index come first; ties keep directory order.
    pub sort_by_m: bool,

    /// Skip sub-blocks whose visible part is fully covered by sub-blocks
    /// painted later. Disabling this decodes every candidate.
    pub use_visibility_check_optimization: bool,

    /// Only use full-resolution (pyramid layer 0) sub-blocks.
    pub only_layer0: bool,

    /// Restrict to these scene indices. Sub-blocks without a scene are not
    /// excluded.
    pub scene_filter: Option<BTreeSet<i32>>,

    /// Cache for decoded sub-blocks, shared across queries.
    pub sub_block_cache: Option<Arc<SubBlockCache>>,

    /// Only consult the cache for compressed sub-blocks (uncompressed ones
    /// are cheap to read again).
    pub only_use_cache_for_compressed: bool,

    /// Discrepancy policy passed to the codecs.
    pub decode_options: DecodeOptions,
}

impl Default for AccessorOptions {
    fn default() -> Self {
        Self {
            background: None,
            sort_by_m: false,
            use_visibility_check_optimization: true,
            only_layer0: true,
            scene_filter: None,
            sub_block_cache: None,
            only_use_cache_for_compressed: true,
            decode_options: DecodeOptions::default(),
        }
    }
}

impl std::fmt::Debug for AccessorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorOptions")
            .field("background", &self.background)
            .field("sort_by_m", &self.sort_by_m)
            .field(
                "use_visibility_check_optimization",
                &self.use_visibility_check_optimization,
            )
            .field("only_layer0", &self.only_layer0)
            .field("scene_filter", &self.scene_filter)
            .field("sub_block_cache", &self.sub_block_cache.is_some())
            .field(
                "only_use_cache_for_compressed",
                &self.only_use_cache_for_compressed,
            )
            .field("decode_options", &self.decode_options)
            .finish()
    }
}

impl AccessorOptions {
    /// Whether a sub-block in `scene` passes the scene filter.
    pub fn accepts_scene(&self, scene: Option<i32>) -> bool {
        match (&self.scene_filter, scene) {
            (Some(filter), Some(s)) => filter.contains(&s),
            _ => true,
        }
    }
}
