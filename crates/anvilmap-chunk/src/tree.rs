use std::io::{self, Read};

use flate2::read::{GzDecoder, ZlibDecoder};

use anvilmap_geom::{Bounds, YRange};

use crate::extract::{ChunkData, ChunkFlags, extract_chunk};

pub use fastnbt::Value;

#[derive(Debug)]
pub enum ChunkError {
    Io(io::Error),
    UnknownCompression(u8),
    Nbt(fastnbt::error::Error),
}

impl std::fmt::Display for ChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkError::Io(e) => write!(f, "chunk payload: {}", e),
            ChunkError::UnknownCompression(c) => write!(f, "unknown compression scheme {}", c),
            ChunkError::Nbt(e) => write!(f, "malformed chunk tree: {}", e),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Io(e) => Some(e),
            ChunkError::Nbt(e) => Some(e),
            ChunkError::UnknownCompression(_) => None,
        }
    }
}

impl From<io::Error> for ChunkError {
    fn from(e: io::Error) -> Self {
        ChunkError::Io(e)
    }
}

impl From<fastnbt::error::Error> for ChunkError {
    fn from(e: fastnbt::error::Error) -> Self {
        ChunkError::Nbt(e)
    }
}

/// Compression scheme byte of a region chunk record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Gzip = 1,
    Zlib = 2,
    None = 3,
}

impl Compression {
    pub fn from_byte(b: u8) -> Result<Self, ChunkError> {
        match b {
            1 => Ok(Compression::Gzip),
            2 => Ok(Compression::Zlib),
            3 => Ok(Compression::None),
            other => Err(ChunkError::UnknownCompression(other)),
        }
    }
}

/// Decompresses and parses a chunk payload into its tree.
pub fn decode(bytes: &[u8], compression: Compression) -> Result<Value, ChunkError> {
    let raw = match compression {
        Compression::Gzip => {
            let mut out = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut out)?;
            out
        }
        Compression::Zlib => {
            let mut out = Vec::new();
            ZlibDecoder::new(bytes).read_to_end(&mut out)?;
            out
        }
        Compression::None => bytes.to_vec(),
    };
    Ok(fastnbt::from_bytes(&raw)?)
}

/// Decodes a payload and extracts the layers named by `flags`.
pub fn decode_chunk(
    bytes: &[u8],
    compression: Compression,
    flags: ChunkFlags,
    limits: Option<&Bounds<usize>>,
    ylimits: YRange,
) -> Result<ChunkData, ChunkError> {
    let root = decode(bytes, compression)?;
    Ok(extract_chunk(&root, flags, limits, ylimits))
}

/// Depth-first search for the first field called `name`. Direct children of a compound
/// are checked before descending.
pub fn find_by_name<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    match node {
        Value::Compound(map) => map
            .get(name)
            .or_else(|| map.values().find_map(|v| find_by_name(v, name))),
        Value::List(items) => items.iter().find_map(|v| find_by_name(v, name)),
        _ => None,
    }
}

#[inline]
pub fn as_byte(node: &Value) -> Option<i8> {
    match node {
        Value::Byte(b) => Some(*b),
        _ => None,
    }
}

#[inline]
pub fn as_byte_array(node: &Value) -> Option<&[i8]> {
    match node {
        Value::ByteArray(a) => Some(&**a),
        _ => None,
    }
}

#[inline]
pub fn as_int_array(node: &Value) -> Option<&[i32]> {
    match node {
        Value::IntArray(a) => Some(&**a),
        _ => None,
    }
}

#[inline]
pub fn as_list(node: &Value) -> Option<&[Value]> {
    match node {
        Value::List(items) => Some(items.as_slice()),
        _ => None,
    }
}
