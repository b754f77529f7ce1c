use anvilmap_geom::{
    Bounds, CHUNK_BLOCK_AREA, CHUNK_BLOCK_LENGTH, CHUNK_BLOCK_VOLUME, CHUNK_SECTION_HEIGHT,
    MAX_CHUNK_BLOCK, SECTION_BLOCK_HEIGHT, SECTION_BLOCK_VOLUME, SECTION_NIBBLE_LENGTH, YRange,
};

use crate::tree::{Value, as_byte, as_byte_array, as_int_array, as_list, find_by_name};

/// Per-block array stored in each chunk section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Ids = 0,
    Data = 1,
    BlockLight = 2,
    SkyLight = 3,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Ids, Layer::Data, Layer::BlockLight, Layer::SkyLight];

    #[inline]
    pub fn tag(self) -> &'static str {
        match self {
            Layer::Ids => "Blocks",
            Layer::Data => "Data",
            Layer::BlockLight => "BlockLight",
            Layer::SkyLight => "SkyLight",
        }
    }

    /// Value of blocks that were not extracted. Sky light defaults to fully lit.
    #[inline]
    pub fn default_value(self) -> u8 {
        match self {
            Layer::SkyLight => 255,
            _ => 0,
        }
    }

    #[inline]
    fn is_nibble(self) -> bool {
        self != Layer::Ids
    }

    #[inline]
    fn section_len(self) -> usize {
        if self.is_nibble() {
            SECTION_NIBBLE_LENGTH
        } else {
            SECTION_BLOCK_VOLUME
        }
    }
}

/// Which arrays to pull out of a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkFlags {
    pub ids: bool,
    pub data: bool,
    pub block_light: bool,
    pub sky_light: bool,
    pub biomes: bool,
}

impl ChunkFlags {
    pub const ALL: ChunkFlags = ChunkFlags {
        ids: true,
        data: true,
        block_light: true,
        sky_light: true,
        biomes: true,
    };

    #[inline]
    pub fn wants(self, layer: Layer) -> bool {
        match layer {
            Layer::Ids => self.ids,
            Layer::Data => self.data,
            Layer::BlockLight => self.block_light,
            Layer::SkyLight => self.sky_light,
        }
    }
}

/// Flat block arrays of one chunk, indexed `y * 256 + z * 16 + x` in the unrotated frame.
/// Layers that were not requested are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkData {
    layers: [Option<Vec<u8>>; 4],
    biomes: Option<Vec<u8>>,
}

impl ChunkData {
    /// Requested layers filled with their defaults. Biomes stay absent until read.
    pub fn empty(flags: ChunkFlags) -> Self {
        let mut chunk = ChunkData::default();
        for layer in Layer::ALL {
            if flags.wants(layer) {
                chunk.layers[layer as usize] = Some(vec![layer.default_value(); CHUNK_BLOCK_VOLUME]);
            }
        }
        chunk
    }

    #[inline]
    pub fn layer(&self, layer: Layer) -> Option<&[u8]> {
        self.layers[layer as usize].as_deref()
    }

    #[inline]
    pub fn layer_mut(&mut self, layer: Layer) -> Option<&mut [u8]> {
        self.layers[layer as usize].as_deref_mut()
    }

    /// Replaces a whole layer; `values` must hold a full chunk volume.
    pub fn set_layer(&mut self, layer: Layer, values: Vec<u8>) {
        debug_assert_eq!(values.len(), CHUNK_BLOCK_VOLUME);
        self.layers[layer as usize] = Some(values);
    }

    #[inline]
    pub fn value(&self, layer: Layer, offset: usize) -> Option<u8> {
        self.layer(layer).and_then(|l| l.get(offset).copied())
    }

    /// Value at `offset`, or the layer default when the layer is absent.
    #[inline]
    pub fn get(&self, layer: Layer, offset: usize) -> u8 {
        self.value(layer, offset).unwrap_or(layer.default_value())
    }

    #[inline]
    pub fn id(&self, offset: usize) -> u8 {
        self.get(Layer::Ids, offset)
    }

    #[inline]
    pub fn biomes(&self) -> Option<&[u8]> {
        self.biomes.as_deref()
    }

    /// Biome id of the column at `column` (`z * 16 + x`).
    #[inline]
    pub fn biome(&self, column: usize) -> Option<u8> {
        self.biomes.as_ref().and_then(|b| b.get(column).copied())
    }
}

#[inline]
fn nibble(bytes: &[i8], index: usize) -> u8 {
    let b = bytes[index / 2] as u8;
    if index % 2 == 0 { b & 0x0F } else { b >> 4 }
}

/// Copies one section array into the chunk layer, inside the crop window.
fn copy_section(
    out: &mut [u8],
    bytes: &[i8],
    nibbles: bool,
    section_y: usize,
    ys: (usize, usize),
    limits: &Bounds<usize>,
) {
    let base = section_y * SECTION_BLOCK_VOLUME;
    let whole = ys == (0, SECTION_BLOCK_HEIGHT - 1) && limits.is_full(MAX_CHUNK_BLOCK);

    if whole {
        let out = &mut out[base..base + SECTION_BLOCK_VOLUME];
        if nibbles {
            for (i, o) in out.iter_mut().enumerate() {
                *o = nibble(bytes, i);
            }
        } else {
            for (o, b) in out.iter_mut().zip(bytes) {
                *o = *b as u8;
            }
        }
        return;
    }

    for y in ys.0..=ys.1 {
        for z in limits.min_z..=limits.max_z {
            let row = y * CHUNK_BLOCK_AREA + z * CHUNK_BLOCK_LENGTH;
            let (from, to) = (row + limits.min_x, row + limits.max_x);
            if nibbles {
                for i in from..=to {
                    out[base + i] = nibble(bytes, i);
                }
            } else {
                for (o, b) in out[base + from..=base + to].iter_mut().zip(&bytes[from..=to]) {
                    *o = *b as u8;
                }
            }
        }
    }
}

fn read_biomes(root: &Value) -> Option<Vec<u8>> {
    let node = find_by_name(root, "Biomes")?;
    if let Some(bytes) = as_byte_array(node).filter(|b| b.len() == CHUNK_BLOCK_AREA) {
        return Some(bytes.iter().map(|&b| b as u8).collect());
    }
    if let Some(ints) = as_int_array(node).filter(|b| b.len() == CHUNK_BLOCK_AREA) {
        return Some(ints.iter().map(|&b| b as u8).collect());
    }
    log::warn!("chunk biomes are not a 256-entry byte or int array; ignored");
    None
}

/// Pulls the layers named by `flags` out of a decoded chunk tree.
///
/// `limits` crops x/z in chunk-local block coordinates; `ylimits` crops height. Blocks
/// outside either window keep their layer default. Malformed sections are logged and skipped.
pub fn extract_chunk(
    root: &Value,
    flags: ChunkFlags,
    limits: Option<&Bounds<usize>>,
    ylimits: YRange,
) -> ChunkData {
    let mut chunk = ChunkData::empty(flags);
    if flags.biomes {
        chunk.biomes = read_biomes(root);
    }

    let Some(sections) = find_by_name(root, "Sections").and_then(as_list) else {
        log::warn!("chunk has no Sections list");
        return chunk;
    };
    let limits = limits.copied().unwrap_or(Bounds::full(MAX_CHUNK_BLOCK));
    let (min_section, max_section) = (ylimits.min_section(), ylimits.max_section());

    for section in sections {
        let Some(sy) = find_by_name(section, "Y").and_then(as_byte) else {
            log::warn!("chunk section without a Y byte; skipped");
            continue;
        };
        if sy < 0 || sy as usize >= CHUNK_SECTION_HEIGHT {
            log::warn!("chunk section Y {} outside the world; skipped", sy);
            continue;
        }
        let sy = sy as usize;
        if sy < min_section || sy > max_section {
            continue;
        }
        let ys = (
            if sy == min_section { ylimits.min % SECTION_BLOCK_HEIGHT } else { 0 },
            if sy == max_section {
                ylimits.max % SECTION_BLOCK_HEIGHT
            } else {
                SECTION_BLOCK_HEIGHT - 1
            },
        );

        for layer in Layer::ALL {
            let Some(out) = chunk.layers[layer as usize].as_deref_mut() else {
                continue;
            };
            let Some(bytes) = find_by_name(section, layer.tag()).and_then(as_byte_array) else {
                log::warn!("section {}: {} missing or not a byte array", sy, layer.tag());
                continue;
            };
            if bytes.len() != layer.section_len() {
                log::warn!(
                    "section {}: {} has {} bytes, expected {}",
                    sy,
                    layer.tag(),
                    bytes.len(),
                    layer.section_len()
                );
                continue;
            }
            copy_section(out, bytes, layer.is_nibble(), sy, ys, &limits);
        }
    }
    chunk
}
