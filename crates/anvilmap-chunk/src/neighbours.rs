use anvilmap_geom::{CHUNK_BLOCK_LENGTH, Rotation, Side, Sides, block_offset};

use crate::extract::{ChunkData, Layer};

/// A chunk with its four edge neighbours, all addressed in rotated chunk-local coordinates.
///
/// A missing neighbour is off the edge of the rendered world; lookups into it return the
/// layer default.
#[derive(Clone, Copy, Debug)]
pub struct ChunkNeighbourhood<'a> {
    pub chunk: &'a ChunkData,
    pub neighbours: Sides<Option<&'a ChunkData>>,
    pub rotation: Rotation,
}

impl<'a> ChunkNeighbourhood<'a> {
    pub fn new(
        chunk: &'a ChunkData,
        neighbours: Sides<Option<&'a ChunkData>>,
        rotation: Rotation,
    ) -> Self {
        Self {
            chunk,
            neighbours,
            rotation,
        }
    }

    /// No neighbours: every edge lookup returns the default.
    pub fn alone(chunk: &'a ChunkData, rotation: Rotation) -> Self {
        Self::new(chunk, Sides::default(), rotation)
    }

    #[inline]
    pub fn offset(&self, y: usize, x: usize, z: usize) -> usize {
        block_offset(y, x, z, self.rotation)
    }

    #[inline]
    pub fn get(&self, layer: Layer, y: usize, x: usize, z: usize) -> u8 {
        self.chunk.get(layer, self.offset(y, x, z))
    }

    /// Value of the block one step towards `side`, crossing into the neighbour chunk at an edge.
    pub fn neighbour(&self, side: Side, layer: Layer, y: usize, x: usize, z: usize) -> u8 {
        let (dx, dz) = side.delta();
        let len = CHUNK_BLOCK_LENGTH as i32;
        let nx = x as i32 + dx;
        let nz = z as i32 + dz;
        if (0..len).contains(&nx) && (0..len).contains(&nz) {
            return self.get(layer, y, nx as usize, nz as usize);
        }
        let offset = self.offset(y, nx.rem_euclid(len) as usize, nz.rem_euclid(len) as usize);
        self.neighbours[side]
            .and_then(|c| c.value(layer, offset))
            .unwrap_or(layer.default_value())
    }

    pub fn neighbour_values(&self, layer: Layer, y: usize, x: usize, z: usize) -> Sides<u8> {
        Sides::from_fn(|side| self.neighbour(side, layer, y, x, z))
    }
}
