use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anvilmap_render::Shading;
use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Coordinates(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            ConfigError::Parse { path, source } => {
                write!(f, "parse error in {}: {}", path.display(), source)
            }
            ConfigError::Coordinates(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Coordinates(_) => None,
        }
    }
}

/// Palette table locations.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resources {
    pub textures: PathBuf,
    pub shapes: PathBuf,
    pub biomes: PathBuf,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            textures: PathBuf::from("resources/textures.csv"),
            shapes: PathBuf::from("resources/shapes.csv"),
            biomes: PathBuf::from("resources/biomes.csv"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Output {
    /// Edge length of tile pyramid images.
    pub tile_size: u32,
    /// Draw orthographic regions on all cores.
    pub parallel: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            tile_size: 1024,
            parallel: true,
        }
    }
}

/// Optional TOML settings file; every key has a default.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub resources: Resources,
    pub shading: Shading,
    pub output: Output,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
