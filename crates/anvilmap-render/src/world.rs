use std::path::Path;
use std::time::Instant;

use anvilmap_blocks::BlockPalette;
use anvilmap_geom::REGION_BLOCK_LENGTH;
use anvilmap_world::World;
use rayon::prelude::*;

use crate::{
    Image, LookaheadStats, MapLayout, Projection, RenderError, RenderOptions, render_region,
    render_tiny_region,
};

/// Reads the world's region headers, sizes the map and draws it.
pub fn create_world_map(
    world_dir: &Path,
    palette: &BlockPalette,
    opts: &RenderOptions,
) -> Result<Image, RenderError> {
    let world = World::open(world_dir, opts.dimension, opts.rotation, opts.limits.as_ref())?;
    let layout = MapLayout::measure(&world, opts);
    if layout.is_empty() {
        return Err(RenderError::EmptyMap);
    }
    log::info!("Image dimensions: {} x {}", layout.width, layout.height);

    let mut img = Image::new(layout.width, layout.height);
    let start = Instant::now();
    render_world(&mut img, &layout, &world, palette, opts);
    log::info!("Total render time: {:.2?}", start.elapsed());
    Ok(img)
}

/// Draws every region of `world` into `img`, rows top to bottom and each row left to right.
pub fn render_world(
    img: &mut Image,
    layout: &MapLayout,
    world: &World,
    palette: &BlockPalette,
    opts: &RenderOptions,
) {
    let total = world.region_count();
    let mut stats = LookaheadStats::default();

    match layout.projection {
        Projection::Tiny => {
            for (rrx, rrz, region) in world.regions() {
                let (rpx, rpy) = layout.region_origin(rrx, rrz);
                render_tiny_region(img, rpx, rpy, region, opts);
            }
        }
        // orthographic tiles never overlap, so regions can be drawn apart and pasted in
        Projection::Orthographic if opts.parallel => {
            let cells: Vec<_> = world.regions().collect();
            let batch = rayon::current_num_threads().max(1) * 2;
            let mut done = 0;
            for cells in cells.chunks(batch) {
                let tiles: Vec<_> = cells
                    .par_iter()
                    .map(|&(rrx, rrz, region)| {
                        let size = REGION_BLOCK_LENGTH as u32;
                        let mut tile = Image::new(size, size);
                        let neighbours = world.neighbours(rrx, rrz);
                        let s = render_region(&mut tile, 0, 0, region, &neighbours, palette, opts);
                        (layout.region_origin(rrx, rrz), tile, s)
                    })
                    .collect();
                for ((rpx, rpy), tile, s) in tiles {
                    img.blit(&tile, rpx, rpy);
                    stats += s;
                    done += 1;
                }
                log::info!("Rendered {}/{} regions", done, total);
            }
        }
        _ => {
            for (i, (rrx, rrz, region)) in world.regions().enumerate() {
                log::info!(
                    "Rendering region {}/{} ({}, {})",
                    i + 1,
                    total,
                    region.x,
                    region.z
                );
                let (rpx, rpy) = layout.region_origin(rrx, rrz);
                let neighbours = world.neighbours(rrx, rrz);
                stats += render_region(img, rpx, rpy, region, &neighbours, palette, opts);
            }
        }
    }

    if layout.projection != Projection::Tiny {
        log::debug!("Chunk lookahead: {} hits, {} misses", stats.hits, stats.misses);
    }
}
