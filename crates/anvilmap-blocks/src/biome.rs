use std::fs;
use std::path::Path;

use crate::colour::Rgba;
use crate::palette::{PaletteError, parse_fields};

/// Tint colours of one biome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Biome {
    pub temperature: f32,
    pub rainfall: f32,
    pub foliage: Rgba,
    pub grass: Rgba,
}

/// Biomes indexed by id; ids without a row are `None`.
#[derive(Clone, Debug, Default)]
pub struct BiomeTable {
    biomes: Vec<Option<Biome>>,
}

const BIOME_COLUMNS: usize = 11;

impl BiomeTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PaletteError::io(path, e))?;
        Self::parse(&text)
    }

    /// Rows are `id,temperature,rainfall,fr,fg,fb,fa,gr,gg,gb,ga`.
    pub fn parse(text: &str) -> Result<Self, PaletteError> {
        let mut biomes: Vec<Option<Biome>> = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() < BIOME_COLUMNS {
                return Err(PaletteError::parse(
                    "biomes",
                    n + 1,
                    format!("expected {BIOME_COLUMNS} columns, found {}", cells.len()),
                ));
            }
            let float = |i: usize| -> Result<f32, PaletteError> {
                if cells[i].is_empty() {
                    return Ok(0.0);
                }
                cells[i].parse::<f32>().map_err(|e| {
                    PaletteError::parse("biomes", n + 1, format!("column {}: {e}", i + 1))
                })
            };
            let id = parse_fields::<1>("biomes", n + 1, &cells[0..1])?[0] as usize;
            let foliage = parse_fields::<4>("biomes", n + 1, &cells[3..7])?;
            let grass = parse_fields::<4>("biomes", n + 1, &cells[7..11])?;
            let biome = Biome {
                temperature: float(1)?,
                rainfall: float(2)?,
                foliage: Rgba::new(foliage[0], foliage[1], foliage[2], foliage[3]),
                grass: Rgba::new(grass[0], grass[1], grass[2], grass[3]),
            };
            if biomes.len() <= id {
                biomes.resize(id + 1, None);
            }
            biomes[id] = Some(biome);
        }
        Ok(Self { biomes })
    }

    /// One past the highest biome id.
    #[inline]
    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Biome)> {
        self.biomes
            .iter()
            .enumerate()
            .filter_map(|(id, b)| b.as_ref().map(|b| (id as u8, b)))
    }
}
