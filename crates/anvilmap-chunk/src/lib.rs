//! Chunk decoding: the NBT tree read interface, flat per-chunk block arrays with cropping,
//! and neighbour-aware lookups across chunk edges.
#![forbid(unsafe_code)]

pub mod extract;
pub mod neighbours;
pub mod tree;

pub use extract::{ChunkData, ChunkFlags, Layer, extract_chunk};
pub use neighbours::ChunkNeighbourhood;
pub use tree::{ChunkError, Compression, Value, decode, decode_chunk, find_by_name};
