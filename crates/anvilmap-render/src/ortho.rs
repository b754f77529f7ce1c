//! Top-down projection: one pixel per block column.

use anvilmap_blocks::{BlockPalette, Paint, Rgba, colour::over};
use anvilmap_chunk::{ChunkNeighbourhood, Layer};
use anvilmap_geom::{CHUNK_BLOCK_LENGTH, MAX_HEIGHT, Side, grid_offset};

use crate::{Image, RenderOptions};

#[inline]
fn is_drawn(palette: &BlockPalette, id: u8) -> bool {
    id != 0 && palette.is_known(id)
}

/// Colour seen looking down from block `y`: see-through blocks are layered over whatever
/// lies beneath them, down to the first opaque one.
pub(crate) fn column_colour(
    hood: &ChunkNeighbourhood<'_>,
    palette: &BlockPalette,
    y: usize,
    x: usize,
    z: usize,
    biome: Option<u8>,
) -> Rgba {
    let mut stack: Vec<Rgba> = Vec::new();
    for by in (0..=y).rev() {
        let off = hood.offset(by, x, z);
        let id = hood.chunk.id(off);
        if !is_drawn(palette, id) {
            continue;
        }
        let data = hood.chunk.get(Layer::Data, off);
        let colour = palette.block_type(id, data).colours_in(biome)[Paint::Colour1.index()];
        stack.push(colour);
        if colour.is_opaque() {
            break;
        }
    }

    let mut out = stack.pop().unwrap_or(Rgba::TRANSPARENT);
    while let Some(top) = stack.pop() {
        out = over(top, out);
    }
    out
}

/// Draws the topmost visible block of column (`x`, `z`) at pixel (`px`, `py`).
#[allow(clippy::too_many_arguments)]
pub fn render_column(
    img: &mut Image,
    px: i64,
    py: i64,
    hood: &ChunkNeighbourhood<'_>,
    x: usize,
    z: usize,
    palette: &BlockPalette,
    opts: &RenderOptions,
) {
    let biome = if opts.biomes {
        hood.chunk
            .biome(grid_offset(x, z, CHUNK_BLOCK_LENGTH, hood.rotation))
    } else {
        None
    };
    let shading = &opts.shading;

    for y in (opts.ylimits.min..=opts.ylimits.max).rev() {
        let id = hood.get(Layer::Ids, y, x, z);
        if !is_drawn(palette, id) {
            continue;
        }

        let mut colour = column_colour(hood, palette, y, x, z, biome);
        shading.height_shade(&mut colour, y);

        // contour lines: lit from the north-west
        let n = hood.neighbour_values(Layer::Ids, y, x, z);
        let light = n[Side::North] == 0 || n[Side::West] == 0;
        let dark = n[Side::South] == 0 || n[Side::East] == 0;
        if light && !dark {
            colour.adjust_brightness(shading.hilight);
        } else if dark && !light {
            colour.adjust_brightness(shading.shadow);
        }

        if opts.night {
            let level = if y < MAX_HEIGHT {
                hood.get(Layer::BlockLight, y + 1, x, z)
            } else {
                Layer::BlockLight.default_value()
            };
            shading.light_shade(&mut colour, level);
        }

        img.set(px, py, colour);
        return;
    }
}
