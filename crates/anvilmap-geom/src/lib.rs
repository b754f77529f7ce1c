//! Grid dimensions, rotation and flat-offset math shared by the map crates.
#![forbid(unsafe_code)]

use core::ops::{Index, IndexMut};

pub const CHUNK_BLOCK_LENGTH: usize = 16;
pub const CHUNK_BLOCK_AREA: usize = CHUNK_BLOCK_LENGTH * CHUNK_BLOCK_LENGTH;
pub const MAX_CHUNK_BLOCK: usize = CHUNK_BLOCK_LENGTH - 1;

pub const SECTION_BLOCK_HEIGHT: usize = 16;
pub const SECTION_BLOCK_VOLUME: usize = CHUNK_BLOCK_AREA * SECTION_BLOCK_HEIGHT;
pub const SECTION_NIBBLE_LENGTH: usize = SECTION_BLOCK_VOLUME / 2;
pub const CHUNK_SECTION_HEIGHT: usize = 16;
pub const CHUNK_BLOCK_HEIGHT: usize = SECTION_BLOCK_HEIGHT * CHUNK_SECTION_HEIGHT;
pub const CHUNK_BLOCK_VOLUME: usize = CHUNK_BLOCK_AREA * CHUNK_BLOCK_HEIGHT;
pub const MAX_HEIGHT: usize = CHUNK_BLOCK_HEIGHT - 1;

pub const REGION_CHUNK_LENGTH: usize = 32;
pub const REGION_CHUNK_AREA: usize = REGION_CHUNK_LENGTH * REGION_CHUNK_LENGTH;
pub const MAX_REGION_CHUNK: usize = REGION_CHUNK_LENGTH - 1;
pub const REGION_BLOCK_LENGTH: usize = REGION_CHUNK_LENGTH * CHUNK_BLOCK_LENGTH;
pub const MAX_REGION_BLOCK: usize = REGION_BLOCK_LENGTH - 1;
pub const REGION_BLOCK_BITS: u32 = 9;
pub const CHUNK_BLOCK_BITS: u32 = 4;

pub const MAX_LIGHT: u8 = 15;

/// Pixel dimensions of the isometric projection.
///
/// A block sprite is `BLOCK_WIDTH` wide, with a `BLOCK_TOP_HEIGHT` top face above
/// `BLOCK_DEPTH` rows of side faces.
pub mod iso {
    use super::{CHUNK_BLOCK_HEIGHT, CHUNK_BLOCK_LENGTH, REGION_BLOCK_LENGTH, REGION_CHUNK_LENGTH};

    pub const BLOCK_WIDTH: usize = 4;
    pub const BLOCK_TOP_HEIGHT: usize = 1;
    pub const BLOCK_DEPTH: usize = 3;
    pub const BLOCK_HEIGHT: usize = BLOCK_TOP_HEIGHT + BLOCK_DEPTH;
    pub const BLOCK_AREA: usize = BLOCK_WIDTH * BLOCK_HEIGHT;
    pub const BLOCK_X_MARGIN: usize = BLOCK_WIDTH / 2;
    pub const BLOCK_Y_MARGIN: usize = BLOCK_TOP_HEIGHT;

    pub const CHUNK_WIDTH: usize = CHUNK_BLOCK_LENGTH * BLOCK_WIDTH;
    pub const CHUNK_TOP_HEIGHT: usize = (CHUNK_BLOCK_LENGTH * 2 - 1) * BLOCK_TOP_HEIGHT;
    pub const CHUNK_DEPTH: usize = BLOCK_DEPTH * CHUNK_BLOCK_HEIGHT;
    pub const CHUNK_X_MARGIN: usize = CHUNK_WIDTH / 2;
    pub const CHUNK_Y_MARGIN: usize = CHUNK_BLOCK_LENGTH * BLOCK_TOP_HEIGHT;

    pub const REGION_WIDTH: usize = CHUNK_WIDTH * REGION_CHUNK_LENGTH;
    pub const REGION_TOP_HEIGHT: usize = (REGION_BLOCK_LENGTH * 2 - 1) * BLOCK_TOP_HEIGHT;
    pub const REGION_X_MARGIN: usize = REGION_WIDTH / 2;
    pub const REGION_Y_MARGIN: usize = REGION_BLOCK_LENGTH * BLOCK_TOP_HEIGHT;
}

/// Clockwise quarter turns applied to the output frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    #[inline]
    pub fn from_quarter_turns(turns: u8) -> Rotation {
        Self::ALL[(turns % 4) as usize]
    }

    #[inline]
    pub fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// True for 90 and 270 degrees, where the x and z extents swap.
    #[inline]
    pub fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// Maps rotated grid coordinates onto the unrotated backing grid.
    /// `max` is the largest coordinate on either axis (length - 1).
    #[inline]
    pub fn to_absolute(self, x: usize, z: usize, max: usize) -> (usize, usize) {
        match self {
            Rotation::R0 => (x, z),
            Rotation::R90 => (z, max - x),
            Rotation::R180 => (max - x, max - z),
            Rotation::R270 => (max - z, x),
        }
    }

    /// Inverse of [`Rotation::to_absolute`].
    #[inline]
    pub fn to_rotated(self, x: usize, z: usize, max: usize) -> (usize, usize) {
        match self {
            Rotation::R0 => (x, z),
            Rotation::R90 => (max - z, x),
            Rotation::R180 => (max - x, max - z),
            Rotation::R270 => (z, max - x),
        }
    }
}

/// Row-major offset into a square `length`² grid of rotated coordinates.
#[inline]
pub fn grid_offset(x: usize, z: usize, length: usize, rotation: Rotation) -> usize {
    let (ax, az) = rotation.to_absolute(x, z, length - 1);
    az * length + ax
}

/// Offset of a block in a chunk's flat arrays, from rotated chunk-local x/z.
#[inline]
pub fn block_offset(y: usize, x: usize, z: usize, rotation: Rotation) -> usize {
    y * CHUNK_BLOCK_AREA + grid_offset(x, z, CHUNK_BLOCK_LENGTH, rotation)
}

/// Offset of a chunk in a region header, from rotated region-local x/z.
#[inline]
pub fn chunk_offset(x: usize, z: usize, rotation: Rotation) -> usize {
    grid_offset(x, z, REGION_CHUNK_LENGTH, rotation)
}

/// Horizontal neighbour direction, relative to the output frame (north is up).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// (dx, dz) step towards this side.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Side::North => (0, -1),
            Side::East => (1, 0),
            Side::South => (0, 1),
            Side::West => (-1, 0),
        }
    }
}

/// One value per [`Side`], stored in N, E, S, W order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sides<T>(pub [T; 4]);

impl<T> Sides<T> {
    #[inline]
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Sides([
            f(Side::North),
            f(Side::East),
            f(Side::South),
            f(Side::West),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Side> for Sides<T> {
    type Output = T;
    #[inline]
    fn index(&self, side: Side) -> &T {
        &self.0[side.index()]
    }
}

impl<T> IndexMut<Side> for Sides<T> {
    #[inline]
    fn index_mut(&mut self, side: Side) -> &mut T {
        &mut self.0[side.index()]
    }
}

/// Inclusive horizontal bounds. North is min z, east is max x, south is max z, west is min x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds<T> {
    pub min_x: T,
    pub max_x: T,
    pub min_z: T,
    pub max_z: T,
}

impl<T: Copy + PartialOrd> Bounds<T> {
    #[inline]
    pub const fn new(min_x: T, max_x: T, min_z: T, max_z: T) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Builds bounds from two corners in any order.
    pub fn from_corners(a: (T, T), b: (T, T)) -> Self {
        let (min_x, max_x) = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (min_z, max_z) = if a.1 <= b.1 { (a.1, b.1) } else { (b.1, a.1) };
        Self::new(min_x, max_x, min_z, max_z)
    }

    #[inline]
    pub fn contains(&self, x: T, z: T) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

impl Bounds<usize> {
    /// Bounds covering a whole `0..=max` square.
    #[inline]
    pub const fn full(max: usize) -> Self {
        Self {
            min_x: 0,
            max_x: max,
            min_z: 0,
            max_z: max,
        }
    }

    #[inline]
    pub fn is_full(&self, max: usize) -> bool {
        *self == Self::full(max)
    }
}

/// Inclusive vertical window in block units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct YRange {
    pub min: usize,
    pub max: usize,
}

impl Default for YRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl YRange {
    pub const FULL: YRange = YRange {
        min: 0,
        max: MAX_HEIGHT,
    };

    /// Clamps both ends into the world height and orders them.
    pub fn new(a: i64, b: i64) -> Self {
        let clamp = |v: i64| v.clamp(0, MAX_HEIGHT as i64) as usize;
        let (a, b) = (clamp(a), clamp(b));
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    #[inline]
    pub fn min_section(&self) -> usize {
        self.min / SECTION_BLOCK_HEIGHT
    }

    #[inline]
    pub fn max_section(&self) -> usize {
        self.max / SECTION_BLOCK_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dimensions() {
        assert_eq!(iso::BLOCK_AREA, 16);
        assert_eq!(iso::CHUNK_WIDTH, 64);
        assert_eq!(iso::CHUNK_TOP_HEIGHT, 31);
        assert_eq!(iso::CHUNK_DEPTH, 768);
        assert_eq!(iso::REGION_WIDTH, 2048);
        assert_eq!(iso::REGION_TOP_HEIGHT, 1023);
        assert_eq!(iso::REGION_X_MARGIN, 1024);
        assert_eq!(iso::REGION_Y_MARGIN, 512);
    }

    #[test]
    fn side_deltas_cancel_across() {
        for side in Side::ALL {
            let (dx, dz) = side.delta();
            let (ox, oz) = Side::ALL[(side.index() + 2) % 4].delta();
            assert_eq!((dx + ox, dz + oz), (0, 0));
        }
    }
}
