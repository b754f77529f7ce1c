use std::path::PathBuf;

use anvilmap_geom::Rotation;
use anvilmap_render::RenderOptions;
use anvilmap_world::Dimension;
use clap::Parser;

use crate::config::{Config, ConfigError};
use crate::coords::{Corner, Crop};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render Minecraft Anvil worlds to PNG maps", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    /// World directory (the one holding `region/`)
    pub world: PathBuf,
    #[arg(short, long)]
    /// Output image; defaults to map.png unless --tiles is given
    pub output: Option<PathBuf>,
    #[arg(short = 'g', long)]
    /// Write a zoomable tile pyramid into this directory
    pub tiles: Option<PathBuf>,
    #[arg(short, long)]
    /// Isometric projection instead of top-down
    pub isometric: bool,
    #[arg(short = 'd', long, alias = "dark")]
    /// Light only by block light sources
    pub night: bool,
    #[arg(short, long)]
    /// Darken isometric faces by sky light
    pub shadows: bool,
    #[arg(short, long)]
    /// Tint grass and foliage by biome
    pub biomes: bool,
    #[arg(short, long)]
    /// One pixel per chunk
    pub tiny: bool,
    #[arg(short, long, conflicts_with = "end")]
    /// Render the nether
    pub nether: bool,
    #[arg(short, long)]
    /// Render the end
    pub end: bool,
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    /// Clockwise quarter turns
    pub rotate: u8,
    #[arg(short = 'F', long, allow_hyphen_values = true)]
    /// Crop corner: Y, X,Z or X,Y,Z
    pub from: Option<Corner>,
    #[arg(short = 'T', long, allow_hyphen_values = true)]
    /// Opposite crop corner, same form as --from
    pub to: Option<Corner>,
    #[arg(long)]
    /// Block colour table
    pub textures: Option<PathBuf>,
    #[arg(long)]
    /// Isometric shape table
    pub shapes: Option<PathBuf>,
    #[arg(long)]
    /// Biome colour table
    pub biome_table: Option<PathBuf>,
    #[arg(short, long)]
    /// TOML settings file
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    /// Debug logging
    pub verbose: bool,
}

impl Cli {
    pub fn dimension(&self) -> Dimension {
        if self.nether {
            Dimension::Nether
        } else if self.end {
            Dimension::End
        } else {
            Dimension::Overworld
        }
    }

    /// `map.png` when neither an image nor a tile directory was asked for.
    pub fn output(&self) -> Option<PathBuf> {
        match (&self.output, &self.tiles) {
            (None, None) => Some(PathBuf::from("map.png")),
            (out, _) => out.clone(),
        }
    }

    /// Applies command line paths over the config file's.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(p) = &self.textures {
            config.resources.textures = p.clone();
        }
        if let Some(p) = &self.shapes {
            config.resources.shapes = p.clone();
        }
        if let Some(p) = &self.biome_table {
            config.resources.biomes = p.clone();
        }
        config
    }

    pub fn render_options(&self, config: &Config) -> Result<RenderOptions, ConfigError> {
        let crop = Crop::from_corners(self.from, self.to)?;
        if let Some(line) = crop.describe() {
            log::info!("{}", line);
        }
        Ok(RenderOptions {
            isometric: self.isometric && !self.tiny,
            night: self.night,
            shadows: self.shadows,
            biomes: self.biomes,
            tiny: self.tiny,
            rotation: Rotation::from_quarter_turns(self.rotate),
            dimension: self.dimension(),
            limits: crop.limits,
            ylimits: crop.ylimits,
            shading: config.shading,
            parallel: config.output.parallel,
        })
    }
}
