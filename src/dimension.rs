//! Non-spatial dimensions of a CZI document.
//!
//! A [`DimCoordinate`] assigns integer values to a subset of the fixed
//! dimensions. Its string form lists each present dimension as a letter
//! followed by its value, e.g. `"C0T1S2"`.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::CoordinateParseError;

/// The non-spatial dimensions a sub-block can carry.
///
/// X, Y (placement) and M (tile index) are stored separately on the
/// descriptor and are not part of the coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dimension {
    Z,
    C,
    T,
    R,
    S,
    I,
    H,
    V,
    B,
}

impl Dimension {
    /// All dimensions in canonical order.
    pub const ALL: [Dimension; 9] = [
        Dimension::Z,
        Dimension::C,
        Dimension::T,
        Dimension::R,
        Dimension::S,
        Dimension::I,
        Dimension::H,
        Dimension::V,
        Dimension::B,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    /// The single-letter name used in coordinate strings and on disk.
    pub fn as_char(self) -> char {
        match self {
            Dimension::Z => 'Z',
            Dimension::C => 'C',
            Dimension::T => 'T',
            Dimension::R => 'R',
            Dimension::S => 'S',
            Dimension::I => 'I',
            Dimension::H => 'H',
            Dimension::V => 'V',
            Dimension::B => 'B',
        }
    }

    /// Parse a dimension letter. Case-insensitive.
    pub fn from_char(c: char) -> Option<Dimension> {
        match c.to_ascii_uppercase() {
            'Z' => Some(Dimension::Z),
            'C' => Some(Dimension::C),
            'T' => Some(Dimension::T),
            'R' => Some(Dimension::R),
            'S' => Some(Dimension::S),
            'I' => Some(Dimension::I),
            'H' => Some(Dimension::H),
            'V' => Some(Dimension::V),
            'B' => Some(Dimension::B),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// =============================================================================
// DimCoordinate
// =============================================================================

/// Values for a subset of the dimensions.
///
/// Equality and ordering compare the value per dimension; an absent
/// dimension orders before any present value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimCoordinate {
    values: [Option<i32>; Dimension::COUNT],
}

impl DimCoordinate {
    /// An empty coordinate (no dimension set).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, dim: Dimension, value: i32) -> Self {
        self.set(dim, value);
        self
    }

    pub fn set(&mut self, dim: Dimension, value: i32) {
        self.values[dim.slot()] = Some(value);
    }

    pub fn clear(&mut self, dim: Dimension) {
        self.values[dim.slot()] = None;
    }

    /// The value of `dim`, or `None` if the coordinate does not carry it.
    #[inline]
    pub fn get(&self, dim: Dimension) -> Option<i32> {
        self.values[dim.slot()]
    }

    #[inline]
    pub fn is_valid(&self, dim: Dimension) -> bool {
        self.get(dim).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Iterate over the present (dimension, value) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, i32)> + '_ {
        Dimension::ALL
            .iter()
            .filter_map(move |&d| self.get(d).map(|v| (d, v)))
    }

    /// Whether this coordinate satisfies `filter`.
    ///
    /// For every dimension present in `filter`, a coordinate carrying that
    /// dimension must hold the same value. Dimensions the coordinate does
    /// not carry are not constrained.
    pub fn matches(&self, filter: &DimCoordinate) -> bool {
        filter
            .iter()
            .all(|(dim, value)| self.get(dim).map_or(true, |v| v == value))
    }
}

impl fmt::Display for DimCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (dim, value) in self.iter() {
            write!(f, "{}{}", dim, value)?;
        }
        Ok(())
    }
}

impl FromStr for DimCoordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coord = DimCoordinate::new();
        let mut chars = s.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c.is_whitespace() {
                continue;
            }

            let dim = Dimension::from_char(c)
                .ok_or(CoordinateParseError::UnknownDimension { position: pos, found: c })?;
            if coord.is_valid(dim) {
                return Err(CoordinateParseError::DuplicateDimension(dim.as_char()));
            }

            let start = pos + c.len_utf8();
            let mut end = start;
            while let Some(&(i, d)) = chars.peek() {
                let sign = i == start && (d == '-' || d == '+');
                if d.is_ascii_digit() || sign {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let digits = &s[start..end];
            let value = digits
                .parse::<i32>()
                .map_err(|_| CoordinateParseError::InvalidValue(dim.as_char()))?;
            coord.set(dim, value);
        }

        Ok(coord)
    }
}

// =============================================================================
// DimBounds
// =============================================================================

/// Per-dimension `[start, start + size)` intervals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimBounds {
    intervals: [Option<(i32, i32)>; Dimension::COUNT],
}

impl DimBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, dim: Dimension, start: i32, size: i32) {
        self.intervals[dim.slot()] = Some((start, size));
    }

    /// The `(start, size)` interval for `dim`, if any descriptor carried it.
    pub fn try_get_interval(&self, dim: Dimension) -> Option<(i32, i32)> {
        self.intervals[dim.slot()]
    }

    pub fn is_valid(&self, dim: Dimension) -> bool {
        self.try_get_interval(dim).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, i32, i32)> + '_ {
        Dimension::ALL
            .iter()
            .filter_map(move |&d| self.try_get_interval(d).map(|(s, n)| (d, s, n)))
    }

    /// Widen the interval of `dim` so it includes `value`.
    pub(crate) fn include(&mut self, dim: Dimension, value: i32) {
        let slot = &mut self.intervals[dim.slot()];
        *slot = Some(match *slot {
            None => (value, 1),
            Some((start, size)) => {
                let lo = start.min(value);
                let hi = (start as i64 + size as i64 - 1).max(value as i64);
                (lo, (hi - lo as i64 + 1) as i32)
            }
        });
    }
}

#[derive(Serialize)]
struct Interval {
    start: i32,
    size: i32,
}

impl Serialize for DimBounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (dim, start, size) in self.iter() {
            map.serialize_entry(&dim.as_char(), &Interval { start, size })?;
        }
        map.end()
    }
}

impl fmt::Display for DimBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (dim, start, size) in self.iter() {
            write!(f, "{}{}:{}", dim, start, size)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
