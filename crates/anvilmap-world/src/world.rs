use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use anvilmap_geom::{Bounds, MAX_REGION_BLOCK, REGION_BLOCK_BITS, Rotation, Side, Sides};

use crate::WorldError;
use crate::region::Region;

/// Which of a world's dimensions to read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

impl Dimension {
    /// Region directory relative to the world directory.
    pub fn region_dir(self) -> PathBuf {
        match self {
            Dimension::Overworld => PathBuf::from("region"),
            Dimension::Nether => Path::new("DIM-1").join("region"),
            Dimension::End => Path::new("DIM1").join("region"),
        }
    }
}

/// All regions of one dimension, laid out on the rotated output grid.
///
/// Grid coordinates (`rrx`, `rrz`) are relative to the top-left of the output; the grid is
/// sparse where region files are missing.
#[derive(Debug)]
pub struct World {
    rotation: Rotation,
    regions: Vec<Region>,
    grid: Vec<Option<usize>>,
    width: usize,
    length: usize,
}

impl World {
    /// Lists and reads the headers of every region inside `limits` (absolute block bounds).
    pub fn open(
        world_dir: &Path,
        dimension: Dimension,
        rotation: Rotation,
        limits: Option<&Bounds<i64>>,
    ) -> Result<World, WorldError> {
        let region_dir = world_dir.join(dimension.region_dir());
        if !region_dir.is_dir() {
            return Err(WorldError::MissingDirectory(region_dir));
        }

        // region bounds and block offsets within the edge regions
        let region_limits = limits.map(|l| {
            Bounds::new(
                (l.min_x >> REGION_BLOCK_BITS) as i32,
                (l.max_x >> REGION_BLOCK_BITS) as i32,
                (l.min_z >> REGION_BLOCK_BITS) as i32,
                (l.max_z >> REGION_BLOCK_BITS) as i32,
            )
        });
        let block_limits = limits.map(|l| {
            let m = MAX_REGION_BLOCK as i64;
            Bounds::new(
                (l.min_x & m) as usize,
                (l.max_x & m) as usize,
                (l.min_z & m) as usize,
                (l.max_z & m) as usize,
            )
        });

        let entries = fs::read_dir(&region_dir).map_err(|e| WorldError::io(&region_dir, e))?;
        let mut coords: Vec<(i32, i32)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| WorldError::io(&region_dir, e))?;
            let name = entry.file_name();
            let Some((rx, rz)) = name.to_str().and_then(Region::parse_file_name) else {
                continue;
            };
            if region_limits.is_some_and(|l| !l.contains(rx, rz)) {
                continue;
            }
            coords.push((rx, rz));
        }
        coords.sort_unstable();
        if coords.is_empty() {
            return Err(WorldError::NoRegions(region_dir));
        }

        let rxmin = coords.iter().map(|c| c.0).min().unwrap_or(0);
        let rxmax = coords.iter().map(|c| c.0).max().unwrap_or(0);
        let rzmin = coords.iter().map(|c| c.1).min().unwrap_or(0);
        let rzmax = coords.iter().map(|c| c.1).max().unwrap_or(0);
        let xsize = (rxmax - rxmin + 1) as usize;
        let zsize = (rzmax - rzmin + 1) as usize;
        let (width, length) = if rotation.swaps_axes() {
            (zsize, xsize)
        } else {
            (xsize, zsize)
        };

        let mut regions = Vec::with_capacity(coords.len());
        let mut grid = vec![None; width * length];
        for (rx, rz) in coords {
            let rlimits = match (&region_limits, &block_limits) {
                (Some(rl), Some(bl)) => Some(Bounds::new(
                    if rx == rl.min_x { bl.min_x } else { 0 },
                    if rx == rl.max_x { bl.max_x } else { MAX_REGION_BLOCK },
                    if rz == rl.min_z { bl.min_z } else { 0 },
                    if rz == rl.max_z { bl.max_z } else { MAX_REGION_BLOCK },
                )),
                _ => None,
            };
            let region = match Region::read(&region_dir, rx, rz, rlimits) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("skipping region ({}, {}): {}", rx, rz, e);
                    continue;
                }
            };

            let (dx, dz) = ((rx - rxmin) as usize, (rz - rzmin) as usize);
            let (mx, mz) = ((rxmax - rx) as usize, (rzmax - rz) as usize);
            let (rrx, rrz) = match rotation {
                Rotation::R0 => (dx, dz),
                Rotation::R90 => (mz, dx),
                Rotation::R180 => (mx, mz),
                Rotation::R270 => (dz, mx),
            };
            grid[rrz * width + rrx] = Some(regions.len());
            regions.push(region);
        }
        if regions.is_empty() {
            return Err(WorldError::NoRegions(region_dir));
        }

        log::info!(
            "Read {} regions from {} ({} x {} grid)",
            regions.len(),
            region_dir.display(),
            width,
            length
        );
        Ok(World {
            rotation,
            regions,
            grid,
            width,
            length,
        })
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Rotated grid size in regions along x.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rotated grid size in regions along z.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Region at rotated grid coordinates; off-grid or empty cells are `None`.
    pub fn region_at(&self, rrx: i64, rrz: i64) -> Option<&Region> {
        if rrx < 0 || rrz < 0 || rrx as usize >= self.width || rrz as usize >= self.length {
            return None;
        }
        self.grid[rrz as usize * self.width + rrx as usize].map(|i| &self.regions[i])
    }

    /// The four regions bordering a grid cell, in the rotated frame.
    pub fn neighbours(&self, rrx: usize, rrz: usize) -> Sides<Option<&Region>> {
        Sides::from_fn(|side: Side| {
            let (dx, dz) = side.delta();
            self.region_at(rrx as i64 + dx as i64, rrz as i64 + dz as i64)
        })
    }

    /// Populated cells in output raster order: rows top to bottom, each row left to right.
    pub fn regions(&self) -> impl Iterator<Item = (usize, usize, &Region)> + '_ {
        self.grid.iter().enumerate().filter_map(move |(i, slot)| {
            slot.map(|r| (i % self.width, i / self.width, &self.regions[r]))
        })
    }
}
