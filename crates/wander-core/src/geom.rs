//! Map geometry: [`Pos`] and [`MapSize`].

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// An integer map coordinate. X grows right, Y grows down, `level` selects
/// the map depth-level (0 = surface).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub x: i32,
    pub y: i32,
    pub level: i32,
}

impl Pos {
    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32, level: i32) -> Self {
        Self { x, y, level }
    }

    /// Return a position shifted by (dx, dy) on the same level.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            level: self.level,
        }
    }

    /// Whether moving from `self` to `other` changes both axes, i.e. the
    /// step is diagonal. Level changes never count as diagonal.
    #[inline]
    pub const fn is_diagonal_to(self, other: Pos) -> bool {
        self.x != other.x && self.y != other.y
    }

    /// Squared 2D distance on the same level, for nearest-site picks.
    #[inline]
    pub const fn dist2d_sq(self, other: Pos) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// All eight same-level neighbours.
    #[inline]
    pub fn neighbors_8(self) -> [Pos; 8] {
        [
            self.shift(-1, 1),
            self.shift(0, 1),
            self.shift(1, 1),
            self.shift(-1, 0),
            self.shift(1, 0),
            self.shift(-1, -1),
            self.shift(0, -1),
            self.shift(1, -1),
        ]
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.level)
    }
}

impl Add for Pos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.level + rhs.level)
    }
}

impl Sub for Pos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.level - rhs.level)
    }
}

// ---------------------------------------------------------------------------
// MapSize
// ---------------------------------------------------------------------------

/// Bounds of a multi-level map: `width × height` tiles on each of `levels`
/// depth-levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSize {
    pub width: i32,
    pub height: i32,
    pub levels: i32,
}

impl MapSize {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32, levels: i32) -> Self {
        Self {
            width,
            height,
            levels,
        }
    }

    /// Whether `pos` lies inside the map.
    #[inline]
    pub const fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.x < self.width
            && pos.y >= 0
            && pos.y < self.height
            && pos.level >= 0
            && pos.level < self.levels
    }

    /// Total number of tiles across all levels.
    #[inline]
    pub const fn tile_count(&self) -> usize {
        (self.width * self.height * self.levels) as usize
    }

    /// Flat row-major index of an in-bounds position.
    #[inline]
    pub const fn index_of(&self, pos: Pos) -> usize {
        ((pos.level * self.height + pos.y) * self.width + pos.x) as usize
    }

    /// Inverse of [`MapSize::index_of`].
    #[inline]
    pub const fn pos_at(&self, idx: usize) -> Pos {
        let idx = idx as i32;
        let x = idx % self.width;
        let y = (idx / self.width) % self.height;
        let level = idx / (self.width * self.height);
        Pos::new(x, y, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let size = MapSize::new(12, 7, 2);
        for idx in 0..size.tile_count() {
            let pos = size.pos_at(idx);
            assert!(size.contains(pos));
            assert_eq!(size.index_of(pos), idx);
        }
    }

    #[test]
    fn contains_rejects_out_of_bounds() {
        let size = MapSize::new(4, 4, 1);
        assert!(size.contains(Pos::new(0, 0, 0)));
        assert!(size.contains(Pos::new(3, 3, 0)));
        assert!(!size.contains(Pos::new(4, 0, 0)));
        assert!(!size.contains(Pos::new(0, -1, 0)));
        assert!(!size.contains(Pos::new(0, 0, 1)));
    }

    #[test]
    fn diagonal_detection() {
        let a = Pos::new(3, 3, 0);
        assert!(a.is_diagonal_to(Pos::new(4, 4, 0)));
        assert!(!a.is_diagonal_to(Pos::new(4, 3, 0)));
        assert!(!a.is_diagonal_to(Pos::new(3, 2, 0)));
    }

    #[test]
    fn neighbors_are_adjacent() {
        let p = Pos::new(5, 5, 1);
        for n in p.neighbors_8() {
            assert_ne!(n, p);
            assert!((n.x - p.x).abs() <= 1 && (n.y - p.y).abs() <= 1);
            assert_eq!(n.level, p.level);
        }
    }
}
