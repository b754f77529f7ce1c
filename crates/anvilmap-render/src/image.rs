use std::path::Path;

use anvilmap_blocks::{PaintInto, Rgba, combine};
use ::image::{ImageBuffer, RgbaImage};

use crate::RenderError;

/// RGBA canvas the renderers draw into. Writes outside the canvas are dropped, so callers
/// can place sprites with signed origins that hang over the edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Rgba> {
        let i = self.index(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }

    #[inline]
    pub fn set(&mut self, x: i64, y: i64, colour: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&colour.to_array());
        }
    }

    /// Composites `colour` over the existing pixel.
    pub fn blend(&mut self, x: i64, y: i64, colour: Rgba) {
        let Some(mut below) = self.get(x, y) else {
            return;
        };
        let mut above = colour;
        combine(&mut above, &mut below, PaintInto::Bottom);
        self.set(x, y, below);
    }

    /// Copies `src` with its top-left corner at (`x`, `y`), clipping to this canvas.
    pub fn blit(&mut self, src: &Image, x: i64, y: i64) {
        let x0 = x.max(0);
        let x1 = (x + src.width as i64).min(self.width as i64);
        if x0 >= x1 {
            return;
        }
        let row_bytes = (x1 - x0) as usize * 4;
        for sy in 0..src.height as i64 {
            let Some(dst) = self.index(x0, y + sy) else {
                continue;
            };
            let start = (sy as usize * src.width as usize + (x0 - x) as usize) * 4;
            self.pixels[dst..dst + row_bytes].copy_from_slice(&src.pixels[start..start + row_bytes]);
        }
    }

    /// `width` x `height` window starting at (`x`, `y`); area past the canvas is transparent.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Image {
        let mut out = Image::new(width, height);
        out.blit(self, -(x as i64), -(y as i64));
        out
    }

    /// Halves both dimensions, rounding up. Each output pixel averages a 2x2 block, with
    /// pixels past the edge counted as transparent black.
    pub fn scale_half(&self) -> Image {
        let (w, h) = (self.width.div_ceil(2), self.height.div_ceil(2));
        let mut out = Image::new(w, h);
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                let mut sum = [0u32; 4];
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    if let Some(p) = self.get(x * 2 + dx, y * 2 + dy) {
                        for (s, c) in sum.iter_mut().zip(p.to_array()) {
                            *s += c as u32;
                        }
                    }
                }
                let [r, g, b, a] = sum.map(|s| (s / 4) as u8);
                out.set(x, y, Rgba::new(r, g, b, a));
            }
        }
        out
    }

    /// Encodes the canvas as PNG.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let buffer: RgbaImage = ImageBuffer::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or(RenderError::BufferSize {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            })?;
        buffer.save(path).map_err(|source| RenderError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}
