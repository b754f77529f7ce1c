//! Zoomable tile pyramid: `zoom{n}/{x}.{y}.png`, where level 0 is the most zoomed out.

use std::fs;
use std::path::Path;

use crate::{Image, RenderError};

/// Levels needed before the map's height fits in one tile.
pub fn zoom_levels(height: u32, tile_size: u32) -> u32 {
    if height <= tile_size || tile_size == 0 {
        return 0;
    }
    height.div_ceil(tile_size).next_power_of_two().trailing_zeros()
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError + '_ {
    move |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Slices `img` into `tile_size` squares for every zoom level, halving between levels.
/// Each level directory is emptied first. Returns the number of levels written.
pub fn write_tiles(img: &Image, dir: &Path, tile_size: u32) -> Result<u32, RenderError> {
    let levels = zoom_levels(img.height(), tile_size);
    let tile_size = tile_size.max(1);
    let mut level = img.clone();

    for zoom in (0..=levels).rev() {
        let zdir = dir.join(format!("zoom{zoom}"));
        if zdir.exists() {
            fs::remove_dir_all(&zdir).map_err(io_err(&zdir))?;
        }
        fs::create_dir_all(&zdir).map_err(io_err(&zdir))?;

        let (cols, rows) = (
            level.width().div_ceil(tile_size),
            level.height().div_ceil(tile_size),
        );
        for ty in 0..rows {
            for tx in 0..cols {
                let tile = level.crop(tx * tile_size, ty * tile_size, tile_size, tile_size);
                tile.save(&zdir.join(format!("{tx}.{ty}.png")))?;
            }
        }
        log::info!("Zoom level {}: {} x {} tiles", zoom, cols, rows);

        if zoom > 0 {
            level = level.scale_half();
        }
    }
    Ok(levels + 1)
}
