//! Block appearance tables: colours, isometric shapes, biome tints, and the palette that
//! resolves a stored (block id, data value) pair to how it is painted.
#![forbid(unsafe_code)]

pub mod biome;
pub mod colour;
pub mod palette;
pub mod shape;

pub use biome::{Biome, BiomeTable};
pub use colour::{PaintInto, Rgba, combine};
pub use palette::{BiomeTint, BlockPalette, BlockType, PaletteError};
pub use shape::{Paint, Shape, ShapeTable};
