//! Isometric projection. Each block is a 4x4 sprite: one row of top face over three rows
//! of side faces, the left half facing the rotated south and the right half the east.

use anvilmap_blocks::{BlockPalette, Paint};
use anvilmap_chunk::{ChunkNeighbourhood, Layer};
use anvilmap_geom::iso::{BLOCK_DEPTH, BLOCK_TOP_HEIGHT, BLOCK_WIDTH, BLOCK_X_MARGIN};
use anvilmap_geom::{CHUNK_BLOCK_LENGTH, MAX_CHUNK_BLOCK, MAX_HEIGHT, MAX_LIGHT, Side, grid_offset};

use crate::{Image, RenderOptions};

/// Which sprite faces of a block are exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Faces {
    pub top: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    #[inline]
    pub fn any(self) -> bool {
        self.top || self.left || self.right
    }
}

/// Face visibility of block (`y`, `x`, `z`). A face is hidden by an occluding neighbour;
/// the top is also hidden under another block of the same type.
pub fn visible_faces(
    hood: &ChunkNeighbourhood<'_>,
    palette: &BlockPalette,
    y: usize,
    x: usize,
    z: usize,
) -> Faces {
    let rot = hood.rotation;
    let id = hood.get(Layer::Ids, y, x, z);
    let data = hood.get(Layer::Data, y, x, z);

    let top = if y < MAX_HEIGHT {
        let aid = hood.get(Layer::Ids, y + 1, x, z);
        let adata = hood.get(Layer::Data, y + 1, x, z);
        let same = aid == id && palette.subtype_index(aid, adata) == palette.subtype_index(id, data);
        !(same || palette.block_type(aid, adata).occludes(rot))
    } else {
        true
    };

    let ids = hood.neighbour_values(Layer::Ids, y, x, z);
    let data = hood.neighbour_values(Layer::Data, y, x, z);
    let exposed = |side: Side| !palette.block_type(ids[side], data[side]).occludes(rot);
    Faces {
        top,
        left: exposed(Side::South),
        right: exposed(Side::East),
    }
}

/// Draws every visible block of column (`x`, `z`), bottom up, for a chunk whose sprite
/// grid starts at (`cpx`, `cpy`).
#[allow(clippy::too_many_arguments)]
pub fn render_column(
    img: &mut Image,
    cpx: i64,
    cpy: i64,
    hood: &ChunkNeighbourhood<'_>,
    x: usize,
    z: usize,
    palette: &BlockPalette,
    opts: &RenderOptions,
) {
    let rot = hood.rotation;
    let biome = if opts.biomes {
        hood.chunk.biome(grid_offset(x, z, CHUNK_BLOCK_LENGTH, rot))
    } else {
        None
    };
    let light_layer = opts.light_layer();
    let shading = &opts.shading;
    let px = cpx + ((x + MAX_CHUNK_BLOCK - z) * BLOCK_X_MARGIN) as i64;

    for y in opts.ylimits.min..=opts.ylimits.max {
        let id = hood.get(Layer::Ids, y, x, z);
        if id == 0 || !palette.is_known(id) {
            continue;
        }
        let faces = visible_faces(hood, palette, y, x, z);
        if !faces.any() {
            continue;
        }

        let btype = palette.block_type(id, hood.get(Layer::Data, y, x, z));
        let shape = btype.shape(rot);
        let mut colours = *btype.colours_in(biome);
        for paint in &Paint::ALL[1..] {
            if shape.has(*paint) {
                shading.height_shade(&mut colours[paint.index()], y);
            }
        }

        let ids = hood.neighbour_values(Layer::Ids, y, x, z);
        let data = hood.neighbour_values(Layer::Data, y, x, z);
        let solid =
            |side: Side| palette.block_type(ids[side], data[side]).shape(rot).is_solid();
        let flat_left = solid(Side::South);
        let flat_right = solid(Side::East);

        if let Some(layer) = light_layer {
            let above = if y < MAX_HEIGHT {
                hood.get(layer, y + 1, x, z)
            } else {
                layer.default_value()
            };
            let side = hood.neighbour_values(layer, y, x, z);
            let mut shade = |paint: Paint, level: u8| {
                shading.light_shade(&mut colours[paint.index()], level)
            };
            // top colours also paint side rows, so they shade even under a hidden top
            if above < MAX_LIGHT {
                shade(Paint::Colour1, above);
                shade(Paint::Colour2, above);
            }
            if faces.left && !flat_left && side[Side::South] < MAX_LIGHT {
                shade(Paint::Hilight1, side[Side::South]);
                shade(Paint::Hilight2, side[Side::South]);
            }
            if faces.right && !flat_right && side[Side::East] < MAX_LIGHT {
                shade(Paint::Shadow1, side[Side::East]);
                shade(Paint::Shadow2, side[Side::East]);
            }
        }

        // flat against a solid neighbour, a side face takes the top colour
        if flat_left {
            colours[Paint::Hilight1.index()] = colours[Paint::Colour1.index()];
            colours[Paint::Hilight2.index()] = colours[Paint::Colour2.index()];
        }
        if flat_right {
            colours[Paint::Shadow1.index()] = colours[Paint::Colour1.index()];
            colours[Paint::Shadow2.index()] = colours[Paint::Colour2.index()];
        }

        let py = cpy + ((x + z) * BLOCK_TOP_HEIGHT + (MAX_HEIGHT - y) * BLOCK_DEPTH) as i64;
        for (i, paint) in shape.pixels().iter().enumerate() {
            if *paint == Paint::Blank {
                continue;
            }
            let (sx, sy) = (i % BLOCK_WIDTH, i / BLOCK_WIDTH);
            let draw = if sy < BLOCK_TOP_HEIGHT {
                faces.top
            } else if sx < BLOCK_X_MARGIN {
                faces.left
            } else {
                faces.right
            };
            if draw {
                img.blend(px + sx as i64, py + sy as i64, colours[paint.index()]);
            }
        }
    }
}
