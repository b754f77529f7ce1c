//! On-disk world access: region headers, chunk records, and the rotated grid of regions
//! that makes up one dimension of a world.
#![forbid(unsafe_code)]

pub mod region;
pub mod world;

pub use region::{Region, RegionReader};
pub use world::{Dimension, World};

use std::io;
use std::path::PathBuf;

use anvilmap_chunk::ChunkError;

#[derive(Debug)]
pub enum WorldError {
    Io { path: PathBuf, source: io::Error },
    MissingDirectory(PathBuf),
    NoRegions(PathBuf),
    EmptyChunkRecord,
    /// A record whose length runs past the sectors the header gives it.
    OversizedChunkRecord { length: u32, capacity: u64 },
    Chunk(ChunkError),
}

impl WorldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        WorldError::Io {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            WorldError::MissingDirectory(p) => {
                write!(f, "region directory not found: {}", p.display())
            }
            WorldError::NoRegions(p) => write!(f, "no regions found in {}", p.display()),
            WorldError::EmptyChunkRecord => write!(f, "chunk record has zero length"),
            WorldError::OversizedChunkRecord { length, capacity } => write!(
                f,
                "chunk record length {} exceeds its {} allocated bytes",
                length, capacity
            ),
            WorldError::Chunk(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldError::Io { source, .. } => Some(source),
            WorldError::Chunk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ChunkError> for WorldError {
    fn from(e: ChunkError) -> Self {
        WorldError::Chunk(e)
    }
}
