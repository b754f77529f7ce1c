use anvilmap_blocks::{BlockPalette, Rgba};
use anvilmap_chunk::{ChunkData, ChunkNeighbourhood};
use anvilmap_geom::iso::{CHUNK_X_MARGIN, CHUNK_Y_MARGIN};
use anvilmap_geom::{CHUNK_BLOCK_LENGTH, MAX_REGION_CHUNK, REGION_CHUNK_LENGTH, Side, Sides};
use anvilmap_world::{Region, RegionReader};

use crate::{Image, LookaheadSlot, LookaheadStats, RenderOptions, iso, ortho};

/// Draws one chunk whose pixel origin is (`cpx`, `cpy`).
pub fn render_chunk(
    img: &mut Image,
    cpx: i64,
    cpy: i64,
    hood: &ChunkNeighbourhood<'_>,
    palette: &BlockPalette,
    opts: &RenderOptions,
) {
    for z in 0..CHUNK_BLOCK_LENGTH {
        for x in 0..CHUNK_BLOCK_LENGTH {
            if opts.isometric {
                iso::render_column(img, cpx, cpy, hood, x, z, palette, opts);
            } else {
                ortho::render_column(img, cpx + x as i64, cpy + z as i64, hood, x, z, palette, opts);
            }
        }
    }
}

/// Pixel origin of the chunk at rotated (`rcx`, `rcz`) in a region drawn at (`rpx`, `rpy`).
pub fn chunk_origin(rpx: i64, rpy: i64, rcx: usize, rcz: usize, isometric: bool) -> (i64, i64) {
    if isometric {
        (
            rpx + ((rcx + MAX_REGION_CHUNK - rcz) * CHUNK_X_MARGIN) as i64,
            rpy + ((rcx + rcz) * CHUNK_Y_MARGIN) as i64,
        )
    } else {
        (
            rpx + (rcx * CHUNK_BLOCK_LENGTH) as i64,
            rpy + (rcz * CHUNK_BLOCK_LENGTH) as i64,
        )
    }
}

fn open_reader<'r>(region: &'r Region) -> Option<RegionReader<'r>> {
    match region.open() {
        Ok(reader) => Some(reader),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

/// Draws every chunk of `region` with its pixel origin at (`rpx`, `rpy`).
///
/// Chunks are visited row by row in the rotated frame. Along a row each chunk is decoded
/// once: the east neighbour becomes the next chunk and the chunk just drawn becomes the
/// next west neighbour. Edge lookups at the region border read from the neighbouring
/// regions.
pub fn render_region(
    img: &mut Image,
    rpx: i64,
    rpy: i64,
    region: &Region,
    neighbours: &Sides<Option<&Region>>,
    palette: &BlockPalette,
    opts: &RenderOptions,
) -> LookaheadStats {
    let Some(mut reader) = open_reader(region) else {
        return LookaheadStats::default();
    };
    let mut nreaders: Sides<Option<RegionReader<'_>>> =
        Sides::from_fn(|side| neighbours[side].and_then(open_reader));

    let rot = opts.rotation;
    let flags = opts.chunk_flags();
    let nflags = opts.neighbour_flags();
    let ylimits = opts.ylimits;
    let mut slot = LookaheadSlot::new();

    for rcz in 0..REGION_CHUNK_LENGTH {
        for rcx in 0..REGION_CHUNK_LENGTH {
            if !region.chunk_exists(rcx, rcz, rot) {
                slot.clear();
                continue;
            }
            let Some(chunk) = slot.take_current(rcx, rcz, || {
                reader.read_chunk(rcx, rcz, rot, flags, ylimits)
            }) else {
                slot.clear();
                continue;
            };

            let mut across = |side: Side, x: usize, z: usize| -> Option<ChunkData> {
                nreaders[side]
                    .as_mut()
                    .and_then(|r| r.read_chunk(x, z, rot, nflags, ylimits))
            };
            let north = if rcz > 0 {
                reader.read_chunk(rcx, rcz - 1, rot, flags, ylimits)
            } else {
                across(Side::North, rcx, MAX_REGION_CHUNK)
            };
            let south = if rcz < MAX_REGION_CHUNK {
                reader.read_chunk(rcx, rcz + 1, rot, flags, ylimits)
            } else {
                across(Side::South, rcx, 0)
            };
            let east = if rcx < MAX_REGION_CHUNK {
                slot.decode(|| reader.read_chunk(rcx + 1, rcz, rot, flags, ylimits))
            } else {
                across(Side::East, 0, rcz)
            };
            let west = if rcx > 0 {
                slot.take_west(rcx - 1, rcz, || {
                    reader.read_chunk(rcx - 1, rcz, rot, flags, ylimits)
                })
            } else {
                across(Side::West, MAX_REGION_CHUNK, rcz)
            };

            let hood = ChunkNeighbourhood::new(
                &chunk,
                Sides([north.as_ref(), east.as_ref(), south.as_ref(), west.as_ref()]),
                rot,
            );
            let (cpx, cpy) = chunk_origin(rpx, rpy, rcx, rcz, opts.isometric);
            render_chunk(img, cpx, cpy, &hood, palette, opts);

            let east = if rcx < MAX_REGION_CHUNK { east } else { None };
            slot.advance(rcx, rcz, chunk, east);
        }
        slot.clear();
    }

    let stats = slot.stats();
    log::debug!(
        "{}: {} chunks reused, {} decoded",
        region.path().display(),
        stats.hits,
        stats.misses
    );
    stats
}

/// Tiny mode: one white pixel per chunk that has a record.
pub fn render_tiny_region(img: &mut Image, rpx: i64, rpy: i64, region: &Region, opts: &RenderOptions) {
    for rcz in 0..REGION_CHUNK_LENGTH {
        for rcx in 0..REGION_CHUNK_LENGTH {
            if region.chunk_exists(rcx, rcz, opts.rotation) {
                img.set(rpx + rcx as i64, rpy + rcz as i64, Rgba::WHITE);
            }
        }
    }
}
