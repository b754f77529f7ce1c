//! Sizing of the output image. Margins are the empty bands between the full grid of
//! region tiles and the outermost drawn pixels, and get cropped away.

use anvilmap_geom::iso::{
    CHUNK_DEPTH, REGION_TOP_HEIGHT, REGION_WIDTH, REGION_X_MARGIN, REGION_Y_MARGIN,
};
use anvilmap_geom::{
    Bounds, CHUNK_BLOCK_BITS, CHUNK_BLOCK_LENGTH, MAX_CHUNK_BLOCK, MAX_HEIGHT, MAX_REGION_BLOCK,
    REGION_BLOCK_LENGTH, REGION_CHUNK_LENGTH, Rotation, Side, Sides,
};
use anvilmap_world::{Region, World};

use crate::RenderOptions;

/// Iso block depth in pixels, for cropping to a Y window.
const BLOCK_DEPTH: u64 = anvilmap_geom::iso::BLOCK_DEPTH as u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    Tiny,
    Orthographic,
    Isometric,
}

impl Projection {
    pub fn of(opts: &RenderOptions) -> Projection {
        if opts.tiny {
            Projection::Tiny
        } else if opts.isometric {
            Projection::Isometric
        } else {
            Projection::Orthographic
        }
    }
}

/// Pixels between each side of a region's tile and its nearest drawn chunk, in the
/// rotated frame. Isometric margins are measured on the sprite grid.
pub fn region_margins(region: &Region, rotation: Rotation, isometric: bool) -> Sides<u64> {
    let mut margins = Sides::from_fn(|side: Side| match (isometric, side.index() % 2) {
        (true, 1) => REGION_WIDTH as u64,
        (true, _) => REGION_TOP_HEIGHT as u64,
        (false, _) => REGION_BLOCK_LENGTH as u64,
    });

    let blimits = region
        .limits()
        .copied()
        .unwrap_or(Bounds::full(MAX_REGION_BLOCK));
    let to_chunk = |v: usize| v >> CHUNK_BLOCK_BITS;

    for cz in to_chunk(blimits.min_z)..=to_chunk(blimits.max_z) {
        for cx in to_chunk(blimits.min_x)..=to_chunk(blimits.max_x) {
            if !region.chunk_exists(cx, cz, Rotation::R0) {
                continue;
            }
            let (bx, bz) = (cx * CHUNK_BLOCK_LENGTH, cz * CHUNK_BLOCK_LENGTH);
            let cm = Sides([
                blimits.min_z.max(bz),
                MAX_REGION_BLOCK - blimits.max_x.min(bx + MAX_CHUNK_BLOCK),
                MAX_REGION_BLOCK - blimits.max_z.min(bz + MAX_CHUNK_BLOCK),
                blimits.min_x.max(bx),
            ]);
            for side in Side::ALL {
                let i = side.index();
                let m = (i + rotation.quarter_turns() as usize) % 4;
                let margin = if isometric {
                    // a sprite edge is set back by the two absolute sides meeting at it
                    let wide = if m % 2 == 1 { 2 } else { 1 };
                    (cm.0[i] + cm.0[(i + 3) % 4]) * wide
                } else {
                    cm.0[i]
                };
                margins.0[m] = margins.0[m].min(margin as u64);
            }
        }
    }
    margins
}

/// Margins of the whole map: the least margin over every region, offset by where the
/// region sits in the full tile grid.
pub fn world_margins(world: &World, isometric: bool) -> Sides<u64> {
    let (w, l) = (world.width() as u64, world.length() as u64);
    let (rrxmax, rrzmax) = (w - 1, l - 1);
    let mut margins = if isometric {
        let wide = (w + l) * REGION_X_MARGIN as u64;
        let tall = (w + l) * REGION_Y_MARGIN as u64 - 1 + CHUNK_DEPTH as u64;
        Sides([tall, wide, tall, wide])
    } else {
        Sides([REGION_BLOCK_LENGTH as u64; 4])
    };

    for (rrx, rrz, region) in world.regions() {
        let (rrx, rrz) = (rrx as u64, rrz as u64);
        if !isometric && rrx > 0 && rrz > 0 && rrx < rrxmax && rrz < rrzmax {
            continue;
        }
        let rm = region_margins(region, world.rotation(), isometric);
        if isometric {
            let offsets = [
                (rrx + rrz) * REGION_Y_MARGIN as u64,
                (rrxmax - rrx + rrz) * REGION_X_MARGIN as u64,
                (rrxmax - rrx + rrzmax - rrz) * REGION_Y_MARGIN as u64,
                (rrx + rrzmax - rrz) * REGION_X_MARGIN as u64,
            ];
            for ((m, r), o) in margins.0.iter_mut().zip(rm.0).zip(offsets) {
                *m = (*m).min(r + o);
            }
        } else {
            let edges = [rrz == 0, rrx == rrxmax, rrz == rrzmax, rrx == 0];
            for ((m, r), edge) in margins.0.iter_mut().zip(rm.0).zip(edges) {
                if edge {
                    *m = (*m).min(r);
                }
            }
        }
    }
    margins
}

/// Final image size and the pixel origin of the region grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapLayout {
    pub projection: Projection,
    pub width: u32,
    pub height: u32,
    /// Cropped margins: top, right, bottom, left.
    pub margins: Sides<u64>,
    rrzmax: usize,
}

impl MapLayout {
    pub fn measure(world: &World, opts: &RenderOptions) -> MapLayout {
        let projection = Projection::of(opts);
        let (w, l) = (world.width() as u64, world.length() as u64);
        let mut margins = world_margins(world, projection == Projection::Isometric);

        let (width, height) = match projection {
            Projection::Tiny => {
                for m in margins.0.iter_mut() {
                    *m /= CHUNK_BLOCK_LENGTH as u64;
                }
                (w * REGION_CHUNK_LENGTH as u64, l * REGION_CHUNK_LENGTH as u64)
            }
            Projection::Isometric => {
                if !opts.ylimits.is_full() {
                    margins[Side::North] += (MAX_HEIGHT - opts.ylimits.max) as u64 * BLOCK_DEPTH;
                    margins[Side::South] += opts.ylimits.min as u64 * BLOCK_DEPTH;
                }
                (
                    (w + l) * REGION_X_MARGIN as u64,
                    (w + l) * REGION_Y_MARGIN as u64 - 1 + CHUNK_DEPTH as u64,
                )
            }
            Projection::Orthographic => {
                (w * REGION_BLOCK_LENGTH as u64, l * REGION_BLOCK_LENGTH as u64)
            }
        };

        let width = width.saturating_sub(margins[Side::East] + margins[Side::West]);
        let height = height.saturating_sub(margins[Side::North] + margins[Side::South]);
        MapLayout {
            projection,
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
            margins,
            rrzmax: world.length() - 1,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel origin of the region tile at grid cell (`rrx`, `rrz`).
    pub fn region_origin(&self, rrx: usize, rrz: usize) -> (i64, i64) {
        let wpx = -(self.margins[Side::West] as i64);
        let wpy = -(self.margins[Side::North] as i64);
        let (x, y) = match self.projection {
            Projection::Tiny => (rrx * REGION_CHUNK_LENGTH, rrz * REGION_CHUNK_LENGTH),
            Projection::Orthographic => (rrx * REGION_BLOCK_LENGTH, rrz * REGION_BLOCK_LENGTH),
            Projection::Isometric => (
                (rrx + self.rrzmax - rrz) * REGION_X_MARGIN,
                (rrx + rrz) * REGION_Y_MARGIN,
            ),
        };
        (x as i64 + wpx, y as i64 + wpy)
    }
}
