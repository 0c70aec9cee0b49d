//! Integer rectangles and coverage regions.
//!
//! All rectangles live in the document's logical pixel coordinate system,
//! which may have negative origins. A rectangle is half-open:
//! it covers `x..x + w` and `y..y + h`.

use serde::Serialize;

/// An integer size (width, height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IntSize {
    pub w: u32,
    pub h: u32,
}

impl IntSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.w as u64 * self.h as u64
        }
    }

    /// The overlap of two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &IntRect) -> Option<IntRect> {
        let x0 = (self.x as i64).max(other.x as i64);
        let y0 = (self.y as i64).max(other.y as i64);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(IntRect {
            x: x0 as i32,
            y: y0 as i32,
            w: (x1 - x0) as i32,
            h: (y1 - y0) as i32,
        })
    }

    /// Whether the rectangles share at least one pixel.
    pub fn intersects(&self, other: &IntRect) -> bool {
        self.intersect(other).is_some()
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains_rect(&self, other: &IntRect) -> bool {
        other.x as i64 >= self.x as i64
            && other.y as i64 >= self.y as i64
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &IntRect) -> IntRect {
        let x0 = (self.x as i64).min(other.x as i64);
        let y0 = (self.y as i64).min(other.y as i64);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());

        IntRect {
            x: x0 as i32,
            y: y0 as i32,
            w: (x1 - x0) as i32,
            h: (y1 - y0) as i32,
        }
    }

    /// The parts of `self` not covered by `other`, as up to four disjoint
    /// rectangles (top band, bottom band, left and right slabs).
    pub fn subtract(&self, other: &IntRect) -> Vec<IntRect> {
        let Some(overlap) = self.intersect(other) else {
            return vec![*self];
        };

        let mut pieces = Vec::with_capacity(4);

        if overlap.y > self.y {
            pieces.push(IntRect::new(self.x, self.y, self.w, overlap.y - self.y));
        }
        if overlap.bottom() < self.bottom() {
            pieces.push(IntRect::new(
                self.x,
                overlap.bottom() as i32,
                self.w,
                (self.bottom() - overlap.bottom()) as i32,
            ));
        }
        if overlap.x > self.x {
            pieces.push(IntRect::new(self.x, overlap.y, overlap.x - self.x, overlap.h));
        }
        if overlap.right() < self.right() {
            pieces.push(IntRect::new(
                overlap.right() as i32,
                overlap.y,
                (self.right() - overlap.right()) as i32,
                overlap.h,
            ));
        }

        pieces
    }
}

impl std::fmt::Display for IntRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{}x{})", self.x, self.y, self.w, self.h)
    }
}

// =============================================================================
// Region
// =============================================================================

/// A set of pixels, kept as a list of pairwise disjoint rectangles.
///
/// Used by the compositor to track which part of the query rectangle is
/// already covered by sub-blocks painted later.
#[derive(Debug, Clone, Default)]
pub struct Region {
    rects: Vec<IntRect>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parts of `rect` not contained in the region.
    pub fn uncovered_parts(&self, rect: &IntRect) -> Vec<IntRect> {
        if rect.is_empty() {
            return Vec::new();
        }

        let mut remaining = vec![*rect];
        for covered in &self.rects {
            if remaining.is_empty() {
                break;
            }
            remaining = remaining
                .iter()
                .flat_map(|piece| piece.subtract(covered))
                .collect();
        }
        remaining
    }

    /// Whether every pixel of `rect` is in the region.
    pub fn covers(&self, rect: &IntRect) -> bool {
        self.uncovered_parts(rect).is_empty()
    }

    /// Add `rect` to the region. Only the not yet covered parts are stored,
    /// so the rectangles stay disjoint.
    pub fn add(&mut self, rect: &IntRect) {
        let parts = self.uncovered_parts(rect);
        self.rects.extend(parts);
    }

    /// Total number of pixels in the region.
    pub fn area(&self) -> u64 {
        self.rects.iter().map(IntRect::area).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
