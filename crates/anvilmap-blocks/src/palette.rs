use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anvilmap_geom::Rotation;

use crate::biome::{Biome, BiomeTable};
use crate::colour::{PaintInto, Rgba, combine};
use crate::shape::{Paint, Shape, ShapeTable};

pub const HILIGHT_AMOUNT: f64 = 0.125;
pub const SHADOW_AMOUNT: f64 = -0.125;
pub const BLOCK_SUBTYPES: usize = 16;

const TEXTURE_COLUMNS: usize = 16;

#[derive(Debug)]
pub enum PaletteError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        table: &'static str,
        line: usize,
        message: String,
    },
}

impl PaletteError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        PaletteError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(table: &'static str, line: usize, message: String) -> Self {
        PaletteError::Parse {
            table,
            line,
            message,
        }
    }
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            PaletteError::Parse {
                table,
                line,
                message,
            } => write!(f, "{} table line {}: {}", table, line, message),
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::Io { source, .. } => Some(source),
            PaletteError::Parse { .. } => None,
        }
    }
}

/// Reads `N` byte-sized integer cells; empty cells are 0.
pub(crate) fn parse_fields<const N: usize>(
    table: &'static str,
    line: usize,
    cells: &[&str],
) -> Result<[u8; N], PaletteError> {
    let mut out = [0u8; N];
    for (i, (slot, cell)) in out.iter_mut().zip(cells).enumerate() {
        if cell.is_empty() {
            continue;
        }
        *slot = cell
            .parse::<u8>()
            .map_err(|e| PaletteError::parse(table, line, format!("cell {:?} ({}): {e}", cell, i)))?;
    }
    Ok(out)
}

/// Which biome colour, if any, recolours a block colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BiomeTint {
    #[default]
    None,
    Foliage,
    Grass,
}

impl BiomeTint {
    #[inline]
    pub fn from_flag(flag: u8) -> BiomeTint {
        match flag {
            1 => BiomeTint::Foliage,
            2 => BiomeTint::Grass,
            _ => BiomeTint::None,
        }
    }

    fn colour(self, biome: &Biome) -> Option<Rgba> {
        match self {
            BiomeTint::None => None,
            BiomeTint::Foliage => Some(biome.foliage),
            BiomeTint::Grass => Some(biome.grass),
        }
    }
}

pub type PaintTable = [Rgba; Paint::COUNT];

/// Appearance of one (block id, subtype) pair.
#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: u8,
    pub subtype: u8,
    colours: PaintTable,
    biome_colours: Vec<Option<PaintTable>>,
    shapes: [Shape; 4],
    tints: [BiomeTint; 2],
    is_opaque: bool,
}

static EMPTY_BLOCK: BlockType = BlockType::EMPTY;

fn with_hilight_and_shadow(table: &mut PaintTable, base: Paint) {
    let i = base.index();
    table[i + 1] = table[i];
    table[i + 2] = table[i];
    table[i + 1].adjust_brightness(HILIGHT_AMOUNT);
    table[i + 2].adjust_brightness(SHADOW_AMOUNT);
}

fn paint_table(colour1: Rgba, colour2: Rgba) -> PaintTable {
    let mut table = [Rgba::TRANSPARENT; Paint::COUNT];
    table[Paint::Colour1.index()] = colour1;
    table[Paint::Colour2.index()] = colour2;
    with_hilight_and_shadow(&mut table, Paint::Colour1);
    with_hilight_and_shadow(&mut table, Paint::Colour2);
    table
}

/// Hue and saturation of the tint with the value of the block colour, laid over the block
/// colour with the tint's alpha.
fn mix_biome_colour(block: Rgba, tint: Rgba) -> Rgba {
    let (h, s, _) = tint.to_hsv();
    let (_, _, v) = block.to_hsv();
    let mut tinted = Rgba::from_hsv(h, s, v, tint.a);
    let mut out = block;
    combine(&mut tinted, &mut out, PaintInto::Bottom);
    out
}

impl BlockType {
    pub const EMPTY: BlockType = BlockType {
        id: 0,
        subtype: 0,
        colours: [Rgba::TRANSPARENT; Paint::COUNT],
        biome_colours: Vec::new(),
        shapes: [Shape::BLANK; 4],
        tints: [BiomeTint::None; 2],
        is_opaque: false,
    };

    pub fn new(
        id: u8,
        subtype: u8,
        colour1: Rgba,
        colour2: Rgba,
        shapes: [Shape; 4],
        tints: [BiomeTint; 2],
    ) -> Self {
        Self {
            id,
            subtype,
            colours: paint_table(colour1, colour2),
            biome_colours: Vec::new(),
            shapes,
            tints,
            is_opaque: colour1.a == 255 && (colour2.a == 255 || colour2.a == 0),
        }
    }

    /// Precomputes tinted colour tables for every biome in `biomes`.
    fn apply_biomes(&mut self, biomes: &BiomeTable) {
        if !self.is_tinted() {
            return;
        }
        self.biome_colours = vec![None; biomes.len()];
        for (id, biome) in biomes.iter() {
            let mut table = self.colours;
            for (tint, base) in self.tints.iter().zip([Paint::Colour1, Paint::Colour2]) {
                if let Some(tint) = tint.colour(biome) {
                    table[base.index()] = mix_biome_colour(self.colours[base.index()], tint);
                    with_hilight_and_shadow(&mut table, base);
                }
            }
            self.biome_colours[id as usize] = Some(table);
        }
    }

    #[inline]
    pub fn colours(&self) -> &PaintTable {
        &self.colours
    }

    /// Colour table for a column in `biome`, falling back to the untinted table.
    #[inline]
    pub fn colours_in(&self, biome: Option<u8>) -> &PaintTable {
        biome
            .and_then(|b| self.biome_colours.get(b as usize))
            .and_then(Option::as_ref)
            .unwrap_or(&self.colours)
    }

    #[inline]
    pub fn colour(&self, paint: Paint) -> Rgba {
        self.colours[paint.index()]
    }

    #[inline]
    pub fn shape(&self, rotation: Rotation) -> &Shape {
        &self.shapes[rotation.quarter_turns() as usize]
    }

    /// Both colours fully opaque, or a fully opaque colour 1 and no colour 2.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.is_opaque
    }

    /// Solid-shaped and opaque: hides whatever is behind it.
    #[inline]
    pub fn occludes(&self, rotation: Rotation) -> bool {
        self.is_opaque && self.shape(rotation).is_solid()
    }

    #[inline]
    pub fn is_tinted(&self) -> bool {
        self.tints.iter().any(|t| *t != BiomeTint::None)
    }
}

#[derive(Clone, Debug)]
struct BlockId {
    mask: u8,
    subtypes: Vec<Option<BlockType>>,
}

impl Default for BlockId {
    fn default() -> Self {
        Self {
            mask: 0,
            subtypes: vec![None; BLOCK_SUBTYPES],
        }
    }
}

/// Lookup from stored (block id, data value) to [`BlockType`].
#[derive(Clone, Debug, Default)]
pub struct BlockPalette {
    ids: Vec<BlockId>,
}

impl BlockPalette {
    pub fn load(
        textures: impl AsRef<Path>,
        shapes: Option<&Path>,
        biomes: Option<&Path>,
    ) -> Result<Self, PaletteError> {
        let textures = textures.as_ref();
        let text = fs::read_to_string(textures).map_err(|e| PaletteError::io(textures, e))?;
        let shapes = shapes.map(ShapeTable::load).transpose()?;
        let biomes = biomes.map(BiomeTable::load).transpose()?;
        let palette = Self::parse(&text, shapes.as_ref(), biomes.as_ref())?;
        log::debug!(
            "Loaded {} block ids from {}",
            palette.ids.len(),
            textures.display()
        );
        Ok(palette)
    }

    /// Rows are `id,mask,subtype,r1,g1,b1,a1,r2,g2,b2,a2,shapeN,shapeE,shapeS,shapeW,biome1[,biome2]`.
    ///
    /// The mask is taken from the subtype 0 row. A zero east/south/west shape falls back
    /// to the north shape.
    pub fn parse(
        textures: &str,
        shapes: Option<&ShapeTable>,
        biomes: Option<&BiomeTable>,
    ) -> Result<Self, PaletteError> {
        let mut ids: Vec<BlockId> = Vec::new();
        for (n, line) in textures.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() < TEXTURE_COLUMNS {
                return Err(PaletteError::parse(
                    "textures",
                    n + 1,
                    format!("expected {TEXTURE_COLUMNS} columns, found {}", cells.len()),
                ));
            }
            let row = parse_fields::<17>("textures", n + 1, &cells)?;
            let (id, mask, subtype) = (row[0], row[1], row[2]);
            if subtype as usize >= BLOCK_SUBTYPES {
                return Err(PaletteError::parse(
                    "textures",
                    n + 1,
                    format!("subtype {subtype} out of range"),
                ));
            }

            let shape_ids = [row[11], row[12], row[13], row[14]];
            let shape = |s: u8| {
                let s = if s == 0 { shape_ids[0] } else { s };
                shapes.map_or(Shape::BLANK, |t| t.get(s as usize))
            };
            let mut btype = BlockType::new(
                id,
                subtype,
                Rgba::new(row[3], row[4], row[5], row[6]),
                Rgba::new(row[7], row[8], row[9], row[10]),
                [
                    shape(shape_ids[0]),
                    shape(shape_ids[1]),
                    shape(shape_ids[2]),
                    shape(shape_ids[3]),
                ],
                [BiomeTint::from_flag(row[15]), BiomeTint::from_flag(row[16])],
            );
            if let Some(biomes) = biomes {
                btype.apply_biomes(biomes);
            }

            if ids.len() <= id as usize {
                ids.resize_with(id as usize + 1, BlockId::default);
            }
            let entry = &mut ids[id as usize];
            if subtype == 0 {
                entry.mask = mask;
            }
            entry.subtypes[subtype as usize] = Some(btype);
        }
        Ok(Self { ids })
    }

    /// Ids above the highest id in the table are unknown and never drawn.
    #[inline]
    pub fn is_known(&self, id: u8) -> bool {
        (id as usize) < self.ids.len()
    }

    /// Data value reduced by the id's subtype mask.
    #[inline]
    pub fn subtype_index(&self, id: u8, data: u8) -> u8 {
        match self.ids.get(id as usize) {
            Some(b) if b.mask > 0 => data % b.mask,
            _ => 0,
        }
    }

    /// Unknown ids and unlisted subtypes resolve to an empty, transparent type.
    #[inline]
    pub fn block_type(&self, id: u8, data: u8) -> &BlockType {
        let sub = self.subtype_index(id, data) as usize;
        self.ids
            .get(id as usize)
            .and_then(|b| b.subtypes.get(sub))
            .and_then(Option::as_ref)
            .unwrap_or(&EMPTY_BLOCK)
    }
}
