use std::fs;
use std::path::Path;

use anvilmap_geom::iso::BLOCK_AREA;

use crate::palette::PaletteError;

/// Paint index of a sprite pixel, also the index into a block's colour table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Paint {
    #[default]
    Blank = 0,
    Colour1 = 1,
    Hilight1 = 2,
    Shadow1 = 3,
    Colour2 = 4,
    Hilight2 = 5,
    Shadow2 = 6,
}

impl Paint {
    pub const COUNT: usize = 7;
    pub const ALL: [Paint; Paint::COUNT] = [
        Paint::Blank,
        Paint::Colour1,
        Paint::Hilight1,
        Paint::Shadow1,
        Paint::Colour2,
        Paint::Hilight2,
        Paint::Shadow2,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_digit(d: u8) -> Option<Paint> {
        Paint::ALL.get(d as usize).copied()
    }
}

/// Isometric sprite mask: one paint index per pixel, row-major, top face row first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pixels: [Paint; BLOCK_AREA],
    has: u8,
}

impl Default for Shape {
    fn default() -> Self {
        Shape::BLANK
    }
}

impl Shape {
    pub const BLANK: Shape = Shape {
        pixels: [Paint::Blank; BLOCK_AREA],
        has: 1,
    };

    pub fn from_pixels(pixels: [Paint; BLOCK_AREA]) -> Self {
        let has = pixels.iter().fold(0u8, |acc, p| acc | (1 << p.index()));
        Self { pixels, has }
    }

    /// Parses one line of digits `0`..=`6`.
    pub fn parse(line: &str) -> Option<Self> {
        let bytes = line.trim().as_bytes();
        if bytes.len() < BLOCK_AREA {
            return None;
        }
        let mut pixels = [Paint::Blank; BLOCK_AREA];
        for (px, b) in pixels.iter_mut().zip(bytes) {
            *px = Paint::from_digit(b.wrapping_sub(b'0'))?;
        }
        Some(Self::from_pixels(pixels))
    }

    #[inline]
    pub fn pixels(&self) -> &[Paint; BLOCK_AREA] {
        &self.pixels
    }

    #[inline]
    pub fn has(&self, paint: Paint) -> bool {
        self.has & (1 << paint.index()) != 0
    }

    /// A solid shape covers every pixel of the sprite.
    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.has(Paint::Blank)
    }
}

/// Shapes in file order; a block type refers to them by line number.
#[derive(Clone, Debug, Default)]
pub struct ShapeTable {
    shapes: Vec<Shape>,
}

impl ShapeTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PaletteError::io(path, e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, PaletteError> {
        let mut shapes = Vec::new();
        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let shape = Shape::parse(line).ok_or_else(|| {
                PaletteError::parse(
                    "shapes",
                    n + 1,
                    format!("expected {BLOCK_AREA} paint digits 0-6"),
                )
            })?;
            shapes.push(shape);
        }
        Ok(Self { shapes })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Unknown shape ids resolve to the blank shape.
    #[inline]
    pub fn get(&self, id: usize) -> Shape {
        self.shapes.get(id).copied().unwrap_or(Shape::BLANK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_solid() {
        let cube = Shape::parse("2233222333223333").unwrap();
        assert!(cube.is_solid());
        assert!(cube.has(Paint::Hilight1));
        assert!(cube.has(Paint::Shadow1));
        assert!(!cube.has(Paint::Colour1));
        assert!(!cube.has(Paint::Colour2));
    }

    #[test]
    fn blank_pixels_break_solidity() {
        let slab = Shape::parse("0000111122332233").unwrap();
        assert!(!slab.is_solid());
        assert!(slab.has(Paint::Blank));
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(Shape::parse("1111").is_none());
        assert!(Shape::parse("111111111111111x").is_none());
        assert!(Shape::parse("1111111111111117").is_none());
        assert!(ShapeTable::parse("1111111111111111\nbad\n").is_err());
    }

    #[test]
    fn out_of_range_shape_is_blank() {
        let table = ShapeTable::parse("1111111111111111\n\n").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get(0).is_solid());
        assert_eq!(table.get(9), Shape::BLANK);
    }
}
