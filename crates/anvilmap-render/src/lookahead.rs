use anvilmap_chunk::ChunkData;

/// Reuse counters for a [`LookaheadSlot`]. `misses` counts chunks that had to be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookaheadStats {
    pub hits: usize,
    pub misses: usize,
}

impl std::ops::AddAssign for LookaheadStats {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.misses += rhs.misses;
    }
}

type Keyed = (usize, usize, ChunkData);

/// Decoded chunks carried along a row of a region.
///
/// After a chunk is drawn it is kept as the west neighbour of the next chunk, and its east
/// neighbour is kept as the next chunk to draw. Lookups are keyed by rotated chunk
/// coordinates, so a gap in the row can never hand back a stale chunk.
#[derive(Debug, Default)]
pub struct LookaheadSlot {
    west: Option<Keyed>,
    ahead: Option<Keyed>,
    stats: LookaheadStats,
}

impl LookaheadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a fresh decode, counting it when it produced a chunk.
    pub fn decode(&mut self, decode: impl FnOnce() -> Option<ChunkData>) -> Option<ChunkData> {
        let chunk = decode();
        if chunk.is_some() {
            self.stats.misses += 1;
        }
        chunk
    }

    /// The chunk to draw at (`rcx`, `rcz`): the carried east neighbour when it matches,
    /// otherwise `decode()`.
    pub fn take_current(
        &mut self,
        rcx: usize,
        rcz: usize,
        decode: impl FnOnce() -> Option<ChunkData>,
    ) -> Option<ChunkData> {
        let held = self.ahead.take();
        self.take_keyed(held, rcx, rcz, decode)
    }

    /// The west neighbour at (`rcx`, `rcz`): the chunk drawn last when it matches,
    /// otherwise `decode()`.
    pub fn take_west(
        &mut self,
        rcx: usize,
        rcz: usize,
        decode: impl FnOnce() -> Option<ChunkData>,
    ) -> Option<ChunkData> {
        let held = self.west.take();
        self.take_keyed(held, rcx, rcz, decode)
    }

    fn take_keyed(
        &mut self,
        held: Option<Keyed>,
        rcx: usize,
        rcz: usize,
        decode: impl FnOnce() -> Option<ChunkData>,
    ) -> Option<ChunkData> {
        match held {
            Some((x, z, chunk)) if (x, z) == (rcx, rcz) => {
                self.stats.hits += 1;
                Some(chunk)
            }
            _ => self.decode(decode),
        }
    }

    /// Carries the chunk just drawn at (`rcx`, `rcz`) and its east neighbour to the next
    /// step along the row.
    pub fn advance(&mut self, rcx: usize, rcz: usize, current: ChunkData, east: Option<ChunkData>) {
        self.west = Some((rcx, rcz, current));
        self.ahead = east.map(|chunk| (rcx + 1, rcz, chunk));
    }

    pub fn clear(&mut self) {
        self.west = None;
        self.ahead = None;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.west.is_none() && self.ahead.is_none()
    }

    #[inline]
    pub fn stats(&self) -> LookaheadStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvilmap_chunk::ChunkFlags;

    fn chunk() -> ChunkData {
        ChunkData::empty(ChunkFlags::default())
    }

    #[test]
    fn advance_carries_current_west_and_east_ahead() {
        let mut slot = LookaheadSlot::new();
        slot.advance(3, 0, chunk(), Some(chunk()));
        assert!(slot.take_current(4, 0, || None).is_some());
        assert!(slot.take_west(3, 0, || None).is_some());
        assert!(slot.is_empty());
        assert_eq!(slot.stats(), LookaheadStats { hits: 2, misses: 0 });
    }

    #[test]
    fn mismatched_keys_decode_fresh() {
        let mut slot = LookaheadSlot::new();
        slot.advance(2, 0, chunk(), Some(chunk()));
        let mut decoded = 0;
        slot.take_current(5, 0, || {
            decoded += 1;
            Some(chunk())
        });
        slot.take_west(4, 0, || {
            decoded += 1;
            None
        });
        assert_eq!(decoded, 2);
        assert!(slot.is_empty());
        // only the decode that produced a chunk is counted
        assert_eq!(slot.stats(), LookaheadStats { hits: 0, misses: 1 });
    }

    #[test]
    fn cleared_slot_misses() {
        let mut slot = LookaheadSlot::new();
        slot.advance(0, 0, chunk(), Some(chunk()));
        slot.clear();
        assert!(slot.take_current(1, 0, || Some(chunk())).is_some());
        assert_eq!(slot.stats().misses, 1);
    }
}
