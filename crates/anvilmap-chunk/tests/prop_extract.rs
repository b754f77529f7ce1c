use std::collections::HashMap;
use std::io::Write;

use anvilmap_chunk::{ChunkData, ChunkFlags, Compression, Layer, Value, decode_chunk, extract_chunk};
use anvilmap_geom::{Bounds, CHUNK_BLOCK_VOLUME, MAX_CHUNK_BLOCK, YRange};
use fastnbt::{ByteArray, IntArray};
use flate2::Compression as Level;
use flate2::write::{GzEncoder, ZlibEncoder};
use proptest::prelude::*;

fn compound(entries: Vec<(&str, Value)>) -> Value {
    Value::Compound(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    )
}

/// Deterministic filler so large sections don't need huge strategies.
fn fill(seed: u64, len: usize) -> Vec<i8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as i8
        })
        .collect()
}

fn section(y: i8, seed: u64) -> Value {
    compound(vec![
        ("Y", Value::Byte(y)),
        ("Blocks", Value::ByteArray(ByteArray::new(fill(seed, 4096)))),
        ("Data", Value::ByteArray(ByteArray::new(fill(seed ^ 0x11, 2048)))),
        ("BlockLight", Value::ByteArray(ByteArray::new(fill(seed ^ 0x22, 2048)))),
        ("SkyLight", Value::ByteArray(ByteArray::new(fill(seed ^ 0x33, 2048)))),
    ])
}

fn chunk_root(sections: Vec<Value>, biomes: Option<Value>) -> Value {
    let mut level = vec![
        ("xPos", Value::Int(0)),
        ("zPos", Value::Int(0)),
        ("Sections", Value::List(sections)),
    ];
    if let Some(b) = biomes {
        level.push(("Biomes", b));
    }
    compound(vec![("Level", compound(level))])
}

fn sectioned_root(seed: u64, ys: &[i8]) -> Value {
    chunk_root(
        ys.iter().map(|&y| section(y, seed.wrapping_add(y as u64))).collect(),
        Some(Value::ByteArray(ByteArray::new(fill(seed, 256)))),
    )
}

fn crop_window() -> impl Strategy<Value = (Bounds<usize>, YRange)> {
    (
        0usize..=MAX_CHUNK_BLOCK,
        0usize..=MAX_CHUNK_BLOCK,
        0usize..=MAX_CHUNK_BLOCK,
        0usize..=MAX_CHUNK_BLOCK,
        0i64..=255,
        0i64..=255,
    )
        .prop_map(|(x0, x1, z0, z1, y0, y1)| {
            (Bounds::from_corners((x0, z0), (x1, z1)), YRange::new(y0, y1))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // a crop window equal to the full chunk is byte-identical to no crop at all
    #[test]
    fn full_crop_equals_no_crop(seed in any::<u64>()) {
        let root = sectioned_root(seed, &[0, 1, 4, 15]);
        let plain = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);
        let cropped = extract_chunk(
            &root,
            ChunkFlags::ALL,
            Some(&Bounds::full(MAX_CHUNK_BLOCK)),
            YRange::FULL,
        );
        prop_assert_eq!(plain, cropped);
    }

    // blocks inside the window match the uncropped arrays, blocks outside keep defaults
    #[test]
    fn crop_keeps_inside_and_defaults_outside(seed in any::<u64>(), (limits, ylimits) in crop_window()) {
        let root = sectioned_root(seed, &[0, 3, 7, 8, 15]);
        let plain = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);
        let cropped = extract_chunk(&root, ChunkFlags::ALL, Some(&limits), ylimits);
        for layer in Layer::ALL {
            let full = plain.layer(layer).unwrap();
            let part = cropped.layer(layer).unwrap();
            for i in 0..CHUNK_BLOCK_VOLUME {
                let (y, z, x) = (i / 256, (i / 16) % 16, i % 16);
                if (ylimits.min..=ylimits.max).contains(&y) && limits.contains(x, z) {
                    prop_assert_eq!(part[i], full[i]);
                } else {
                    prop_assert_eq!(part[i], layer.default_value());
                }
            }
        }
        prop_assert_eq!(plain.biomes(), cropped.biomes());
    }

    // nibble layers never exceed 15 and pair up low/high halves
    #[test]
    fn nibbles_expand_per_block(seed in any::<u64>()) {
        let root = sectioned_root(seed, &[2]);
        let chunk = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);
        let raw = fill(seed.wrapping_add(2) ^ 0x11, 2048);
        let data = chunk.layer(Layer::Data).unwrap();
        for i in 0..4096 {
            let b = raw[i / 2] as u8;
            let expect = if i % 2 == 0 { b & 0x0F } else { b >> 4 };
            prop_assert_eq!(data[2 * 4096 + i], expect);
        }
    }
}

#[test]
fn missing_sections_keep_layer_defaults() {
    let root = sectioned_root(7, &[1]);
    let chunk = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);
    assert_eq!(chunk.get(Layer::Ids, 0), 0);
    assert_eq!(chunk.get(Layer::SkyLight, 0), 255);
    assert_eq!(chunk.get(Layer::SkyLight, 5 * 4096), 255);
    assert_eq!(chunk.get(Layer::BlockLight, 200 * 256), 0);
}

#[test]
fn unrequested_layers_are_absent() {
    let root = sectioned_root(7, &[0]);
    let flags = ChunkFlags {
        ids: true,
        ..ChunkFlags::default()
    };
    let chunk = extract_chunk(&root, flags, None, YRange::FULL);
    assert!(chunk.layer(Layer::Ids).is_some());
    assert!(chunk.layer(Layer::Data).is_none());
    assert!(chunk.biomes().is_none());
    // absent layers still answer with their defaults
    assert_eq!(chunk.get(Layer::SkyLight, 10), 255);
}

#[test]
fn malformed_sections_are_skipped() {
    let short = compound(vec![
        ("Y", Value::Byte(0)),
        ("Blocks", Value::ByteArray(ByteArray::new(vec![1; 100]))),
        ("Data", Value::Int(3)),
    ]);
    let out_of_range = section(16, 3);
    let negative = section(-1, 3);
    let no_y = compound(vec![("Blocks", Value::ByteArray(ByteArray::new(vec![1; 4096])))]);
    let good = section(1, 9);
    let root = chunk_root(vec![short, out_of_range, negative, no_y, good], None);

    let chunk = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);
    let ids = chunk.layer(Layer::Ids).unwrap();
    assert!(ids[..4096].iter().all(|&b| b == 0));
    let expect: Vec<u8> = fill(9, 4096).iter().map(|&b| b as u8).collect();
    assert_eq!(&ids[4096..8192], &expect[..]);
    assert!(ids[8192..].iter().all(|&b| b == 0));
}

#[test]
fn int_array_biomes_are_accepted() {
    let root = chunk_root(
        vec![section(0, 1)],
        Some(Value::IntArray(IntArray::new((0..256).collect()))),
    );
    let chunk = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);
    assert_eq!(chunk.biome(17), Some(17));

    let bad = chunk_root(vec![], Some(Value::ByteArray(ByteArray::new(vec![0; 10]))));
    assert!(extract_chunk(&bad, ChunkFlags::ALL, None, YRange::FULL).biomes().is_none());
}

#[test]
fn decodes_every_compression_scheme() {
    let root = sectioned_root(5, &[0]);
    let raw = fastnbt::to_bytes(&root).unwrap();
    let expect = extract_chunk(&root, ChunkFlags::ALL, None, YRange::FULL);

    let mut zlib = ZlibEncoder::new(Vec::new(), Level::default());
    zlib.write_all(&raw).unwrap();
    let zlib = zlib.finish().unwrap();

    let mut gzip = GzEncoder::new(Vec::new(), Level::default());
    gzip.write_all(&raw).unwrap();
    let gzip = gzip.finish().unwrap();

    for (bytes, scheme) in [
        (zlib, Compression::Zlib),
        (gzip, Compression::Gzip),
        (raw.clone(), Compression::None),
    ] {
        let chunk: ChunkData =
            decode_chunk(&bytes, scheme, ChunkFlags::ALL, None, YRange::FULL).unwrap();
        assert_eq!(chunk, expect);
    }

    assert!(decode_chunk(&raw[..10], Compression::None, ChunkFlags::ALL, None, YRange::FULL).is_err());
}
