//! Rasterises decoded chunks into orthographic or isometric map images, and stitches
//! chunks, regions and whole worlds together.
#![forbid(unsafe_code)]

pub mod image;
pub mod iso;
pub mod layout;
pub mod lookahead;
pub mod options;
pub mod ortho;
pub mod region;
pub mod shading;
pub mod tiles;
pub mod world;


pub use crate::image::Image;
pub use layout::{MapLayout, Projection};
pub use lookahead::{LookaheadSlot, LookaheadStats};
pub use options::RenderOptions;
pub use region::{render_chunk, render_region, render_tiny_region};
pub use shading::Shading;
pub use tiles::{write_tiles, zoom_levels};
pub use world::{create_world_map, render_world};

use std::io;
use std::path::PathBuf;

use anvilmap_blocks::PaletteError;
use anvilmap_world::WorldError;

#[derive(Debug)]
pub enum RenderError {
    World(WorldError),
    Palette(PaletteError),
    EmptyMap,
    /// Pixel storage that does not match the canvas dimensions.
    BufferSize {
        width: u32,
        height: u32,
        len: usize,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Encode {
        path: PathBuf,
        source: ::image::ImageError,
    },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::World(e) => write!(f, "{}", e),
            RenderError::Palette(e) => write!(f, "{}", e),
            RenderError::EmptyMap => write!(f, "nothing to draw inside the requested bounds"),
            RenderError::BufferSize { width, height, len } => write!(
                f,
                "{} bytes of pixels do not fill a {}x{} image",
                len, width, height
            ),
            RenderError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            RenderError::Encode { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::World(e) => Some(e),
            RenderError::Palette(e) => Some(e),
            RenderError::Io { source, .. } => Some(source),
            RenderError::Encode { source, .. } => Some(source),
            RenderError::EmptyMap | RenderError::BufferSize { .. } => None,
        }
    }
}

impl From<WorldError> for RenderError {
    fn from(e: WorldError) -> Self {
        RenderError::World(e)
    }
}

impl From<PaletteError> for RenderError {
    fn from(e: PaletteError) -> Self {
        RenderError::Palette(e)
    }
}
