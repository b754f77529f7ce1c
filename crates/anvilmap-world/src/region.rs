use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt};

use anvilmap_chunk::{ChunkData, ChunkFlags, Compression, decode_chunk};
use anvilmap_geom::{
    Bounds, CHUNK_BLOCK_BITS, MAX_CHUNK_BLOCK, MAX_REGION_BLOCK, REGION_CHUNK_AREA,
    REGION_CHUNK_LENGTH, Rotation, YRange, chunk_offset,
};

use crate::WorldError;

pub const SECTOR_BYTES: u64 = 4096;

/// Header of one region file: where each chunk's record starts.
///
/// Chunks outside the crop window are recorded as absent.
#[derive(Clone, Debug)]
pub struct Region {
    pub x: i32,
    pub z: i32,
    path: PathBuf,
    /// Raw header entries: sector index in the top three bytes, sector count in the low byte.
    entries: Vec<u32>,
    limits: Option<Bounds<usize>>,
}

impl Region {
    pub fn file_name(x: i32, z: i32) -> String {
        format!("r.{}.{}.mca", x, z)
    }

    /// Parses `r.<x>.<z>.mca`.
    pub fn parse_file_name(name: &str) -> Option<(i32, i32)> {
        let coords = name.strip_prefix("r.")?.strip_suffix(".mca")?;
        let (x, z) = coords.split_once('.')?;
        Some((x.parse().ok()?, z.parse().ok()?))
    }

    /// Reads the chunk offset table. `limits` crops in region-local block coordinates.
    pub fn read(
        dir: &Path,
        x: i32,
        z: i32,
        limits: Option<Bounds<usize>>,
    ) -> Result<Region, WorldError> {
        let path = dir.join(Self::file_name(x, z));
        let file = File::open(&path).map_err(|e| WorldError::io(&path, e))?;
        let mut reader = BufReader::new(file);

        let chunk_limits = limits.map(|l| chunk_bounds(&l));
        let mut entries = vec![0u32; REGION_CHUNK_AREA];
        for (i, slot) in entries.iter_mut().enumerate() {
            let entry = reader
                .read_u32::<BigEndian>()
                .map_err(|e| WorldError::io(&path, e))?;
            let (cx, cz) = (i % REGION_CHUNK_LENGTH, i / REGION_CHUNK_LENGTH);
            if chunk_limits.is_none_or(|l| l.contains(cx, cz)) && entry >> 8 != 0 {
                *slot = entry;
            }
        }

        Ok(Region {
            x,
            z,
            path,
            entries,
            limits,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Region-local block crop window, if the region touches the crop edge.
    #[inline]
    pub fn limits(&self) -> Option<&Bounds<usize>> {
        self.limits.as_ref()
    }

    /// Whether the chunk at rotated region-local coordinates has a record.
    #[inline]
    pub fn chunk_exists(&self, rcx: usize, rcz: usize, rotation: Rotation) -> bool {
        self.entries[chunk_offset(rcx, rcz, rotation)] != 0
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.entries.iter().filter(|&&e| e != 0).count()
    }

    /// Chunk-local crop window for the chunk at unrotated (cx, cz), or `None` when the
    /// chunk is not on an edge of the crop window.
    pub fn chunk_limits(&self, cx: usize, cz: usize) -> Option<Bounds<usize>> {
        let limits = self.limits.as_ref()?;
        let clim = chunk_bounds(limits);
        let mut out = Bounds::full(MAX_CHUNK_BLOCK);
        let mut edge = false;
        if cz == clim.min_z {
            out.min_z = limits.min_z & MAX_CHUNK_BLOCK;
            edge = true;
        }
        if cx == clim.max_x {
            out.max_x = limits.max_x & MAX_CHUNK_BLOCK;
            edge = true;
        }
        if cz == clim.max_z {
            out.max_z = limits.max_z & MAX_CHUNK_BLOCK;
            edge = true;
        }
        if cx == clim.min_x {
            out.min_x = limits.min_x & MAX_CHUNK_BLOCK;
            edge = true;
        }
        edge.then_some(out)
    }

    /// Opens the region file for a batch of chunk reads.
    pub fn open(&self) -> Result<RegionReader<'_>, WorldError> {
        let file = File::open(&self.path).map_err(|e| WorldError::io(&self.path, e))?;
        Ok(RegionReader {
            region: self,
            file: BufReader::new(file),
        })
    }
}

/// Region chunk range covered by region-local block limits.
fn chunk_bounds(limits: &Bounds<usize>) -> Bounds<usize> {
    Bounds::new(
        limits.min_x >> CHUNK_BLOCK_BITS,
        limits.max_x.min(MAX_REGION_BLOCK) >> CHUNK_BLOCK_BITS,
        limits.min_z >> CHUNK_BLOCK_BITS,
        limits.max_z.min(MAX_REGION_BLOCK) >> CHUNK_BLOCK_BITS,
    )
}

/// An open region file. Dropping it closes the file.
pub struct RegionReader<'r> {
    region: &'r Region,
    file: BufReader<File>,
}

impl<'r> RegionReader<'r> {
    /// Reads and decodes the chunk at rotated region-local coordinates.
    ///
    /// Absent chunks are `None`. Unreadable or corrupt chunks are logged and also `None`.
    pub fn read_chunk(
        &mut self,
        rcx: usize,
        rcz: usize,
        rotation: Rotation,
        flags: ChunkFlags,
        ylimits: YRange,
    ) -> Option<ChunkData> {
        let co = chunk_offset(rcx, rcz, rotation);
        let entry = self.region.entries[co];
        if entry == 0 {
            return None;
        }
        let (cx, cz) = (co % REGION_CHUNK_LENGTH, co / REGION_CHUNK_LENGTH);
        let limits = self.region.chunk_limits(cx, cz);
        match self.read_record(entry) {
            Ok((compression, payload)) => {
                match decode_chunk(&payload, compression, flags, limits.as_ref(), ylimits) {
                    Ok(chunk) => Some(chunk),
                    Err(e) => {
                        log::warn!("{} chunk ({}, {}): {}", self.region.path.display(), cx, cz, e);
                        None
                    }
                }
            }
            Err(e) => {
                log::warn!("{} chunk ({}, {}): {}", self.region.path.display(), cx, cz, e);
                None
            }
        }
    }

    fn read_record(&mut self, entry: u32) -> Result<(Compression, Vec<u8>), WorldError> {
        let path = &self.region.path;
        let (sector, sectors) = ((entry >> 8) as u64, (entry & 0xFF) as u64);
        self.file
            .seek(SeekFrom::Start(sector * SECTOR_BYTES))
            .map_err(|e| WorldError::io(path, e))?;
        let length = self
            .file
            .read_u32::<BigEndian>()
            .map_err(|e| WorldError::io(path, e))?;
        if length == 0 {
            return Err(WorldError::EmptyChunkRecord);
        }
        // the length field itself takes four bytes of the allocation
        let capacity = sectors * SECTOR_BYTES;
        if length as u64 + 4 > capacity {
            return Err(WorldError::OversizedChunkRecord { length, capacity });
        }
        let scheme = self.file.read_u8().map_err(|e| WorldError::io(path, e))?;
        let compression = Compression::from_byte(scheme)?;
        let mut payload = vec![0u8; length as usize - 1];
        self.file
            .read_exact(&mut payload)
            .map_err(|e| WorldError::io(path, e))?;
        Ok((compression, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_with_record(dir: &Path, sectors: u8, length: u32) -> Region {
        let mut header = vec![0u8; 8192];
        header[0..4].copy_from_slice(&((2u32 << 8) | sectors as u32).to_be_bytes());
        let mut body = vec![0u8; 4096];
        body[0..4].copy_from_slice(&length.to_be_bytes());
        body[4] = 3;
        std::fs::write(dir.join(Region::file_name(0, 0)), [header, body].concat()).unwrap();
        Region::read(dir, 0, 0, None).unwrap()
    }

    #[test]
    fn length_past_allocated_sectors_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let region = region_with_record(tmp.path(), 1, 0xFFFF_FF00);
        let mut reader = region.open().unwrap();
        let entry = region.entries[0];
        assert!(matches!(
            reader.read_record(entry),
            Err(WorldError::OversizedChunkRecord {
                length: 0xFFFF_FF00,
                capacity: 4096
            })
        ));
        assert!(
            reader
                .read_chunk(0, 0, Rotation::R0, ChunkFlags::ALL, YRange::FULL)
                .is_none()
        );
    }

    #[test]
    fn length_filling_its_sectors_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let region = region_with_record(tmp.path(), 1, 4092);
        let mut reader = region.open().unwrap();
        let (compression, payload) = reader.read_record(region.entries[0]).unwrap();
        assert_eq!(compression, Compression::None);
        assert_eq!(payload.len(), 4091);
    }
}
