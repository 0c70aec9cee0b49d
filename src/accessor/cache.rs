//! Cache of decoded sub-blocks.
//!
//! Decoding is the expensive part of compositing. Repeated queries over the
//! same area (panning, re-rendering with another background) hit the same
//! sub-blocks, so decoded bitmaps are kept in an LRU cache keyed by
//! sub-block index.
//!
//! # Size-Based Eviction
//!
//! The cache tracks the total size of cached bitmaps in bytes and evicts
//! least-recently-used entries when either the byte capacity or the entry
//! limit is exceeded.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::RwLock;

use crate::pixel::Bitmap;

/// Default cache capacity: 256MB
pub const DEFAULT_SUB_BLOCK_CACHE_CAPACITY: usize = 256 * 1024 * 1024;

/// Default maximum number of entries
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// LRU cache for decoded sub-block bitmaps with size-based capacity.
///
/// Entries are stored as `Arc<Bitmap>`, so a hit does not copy pixels.
///
/// # Thread Safety
///
/// The cache is thread-safe and can be shared across async tasks via `Arc`.
pub struct SubBlockCache {
    /// The underlying LRU cache
    cache: RwLock<LruCache<usize, Arc<Bitmap>>>,

    /// Maximum total size in bytes
    max_size: usize,

    /// Current total size in bytes
    current_size: RwLock<usize>,
}

impl SubBlockCache {
    /// Create a cache with default capacity (256MB).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SUB_BLOCK_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `max_size` bytes of pixels.
    pub fn with_capacity(max_size: usize) -> Self {
        Self::with_capacity_and_entries(max_size, DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache with a byte capacity and an entry limit.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum total size of cached bitmaps in bytes
    /// * `max_entries` - Maximum number of entries (at least 1)
    pub fn with_capacity_and_entries(max_size: usize, max_entries: usize) -> Self {
        let entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(entries)),
            max_size,
            current_size: RwLock::new(0),
        }
    }

    /// Get a decoded sub-block, marking it as recently used.
    pub async fn get(&self, index: usize) -> Option<Arc<Bitmap>> {
        let mut cache = self.cache.write().await;
        cache.get(&index).cloned()
    }

    /// Check for an entry without updating LRU order.
    pub async fn contains(&self, index: usize) -> bool {
        let cache = self.cache.read().await;
        cache.contains(&index)
    }

    /// Store a decoded sub-block.
    ///
    /// A bitmap larger than the whole capacity is not stored. Otherwise
    /// least-recently-used entries are evicted until the cache fits.
    pub async fn put(&self, index: usize, bitmap: Arc<Bitmap>) {
        let size = bitmap.byte_size();
        if size > self.max_size {
            return;
        }

        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        if let Some(old) = cache.peek(&index) {
            *current_size = current_size.saturating_sub(old.byte_size());
        }

        // push() hands back the entry evicted by the entry limit, if any
        if let Some((evicted_index, evicted)) = cache.push(index, bitmap) {
            if evicted_index != index {
                *current_size = current_size.saturating_sub(evicted.byte_size());
            }
        }
        *current_size += size;

        while *current_size > self.max_size {
            match cache.pop_lru() {
                Some((_, evicted)) => {
                    *current_size = current_size.saturating_sub(evicted.byte_size());
                }
                None => break,
            }
        }
    }

    /// Remove an entry, returning it if present.
    pub async fn remove(&self, index: usize) -> Option<Arc<Bitmap>> {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;

        let bitmap = cache.pop(&index)?;
        *current_size = current_size.saturating_sub(bitmap.byte_size());
        Some(bitmap)
    }

    /// Clear all entries.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        let mut current_size = self.current_size.write().await;
        cache.clear();
        *current_size = 0;
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Current total size of cached bitmaps in bytes.
    pub async fn size(&self) -> usize {
        *self.current_size.read().await
    }

    /// Maximum capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl Default for SubBlockCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
