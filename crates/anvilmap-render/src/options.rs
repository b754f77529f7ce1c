use anvilmap_chunk::{ChunkFlags, Layer};
use anvilmap_geom::{Bounds, Rotation, YRange};
use anvilmap_world::Dimension;

use crate::Shading;

/// Everything that changes how a world is drawn.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub isometric: bool,
    pub night: bool,
    pub shadows: bool,
    pub biomes: bool,
    /// One pixel per chunk; overrides the projection.
    pub tiny: bool,
    pub rotation: Rotation,
    pub dimension: Dimension,
    /// Absolute block bounds to crop to.
    pub limits: Option<Bounds<i64>>,
    pub ylimits: YRange,
    pub shading: Shading,
    /// Render orthographic regions on the rayon pool.
    pub parallel: bool,
}

impl RenderOptions {
    /// Layers decoded for the chunk being drawn.
    pub fn chunk_flags(&self) -> ChunkFlags {
        ChunkFlags {
            ids: true,
            data: true,
            block_light: self.night,
            sky_light: self.isometric && !self.night && self.shadows,
            biomes: self.biomes,
        }
    }

    /// Layers decoded for chunks read from a neighbouring region, which only feed edge
    /// lookups.
    pub fn neighbour_flags(&self) -> ChunkFlags {
        ChunkFlags {
            ids: true,
            data: self.isometric,
            block_light: self.isometric && self.night,
            sky_light: self.isometric && self.shadows && !self.night,
            biomes: false,
        }
    }

    /// Layer that darkens isometric faces: block light at night, sky light for shadows.
    pub fn light_layer(&self) -> Option<Layer> {
        if self.night {
            Some(Layer::BlockLight)
        } else if self.shadows {
            Some(Layer::SkyLight)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_wins_over_shadows() {
        let opts = RenderOptions {
            isometric: true,
            night: true,
            shadows: true,
            ..Default::default()
        };
        assert_eq!(opts.light_layer(), Some(Layer::BlockLight));
        assert!(opts.chunk_flags().block_light);
        assert!(!opts.chunk_flags().sky_light);
        assert!(!opts.neighbour_flags().sky_light);
    }

    #[test]
    fn ortho_neighbours_only_need_ids() {
        let opts = RenderOptions {
            biomes: true,
            shadows: true,
            ..Default::default()
        };
        let n = opts.neighbour_flags();
        assert!(n.ids);
        assert!(!n.data && !n.block_light && !n.sky_light && !n.biomes);
        assert!(opts.chunk_flags().biomes);
        assert!(!opts.chunk_flags().sky_light);
    }
}
