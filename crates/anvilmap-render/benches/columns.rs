use criterion::{Criterion, black_box, criterion_group, criterion_main};

use anvilmap_blocks::{BlockPalette, ShapeTable};
use anvilmap_chunk::{ChunkData, ChunkFlags, ChunkNeighbourhood, Layer};
use anvilmap_geom::{CHUNK_BLOCK_VOLUME, Rotation, block_offset};
use anvilmap_render::{Image, RenderOptions, render_chunk};

const SHAPES: &str = "\
0000000000000000
1111223322332233
0000111122332233
";

const TEXTURES: &str = "\
0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0
1,0,0,120,120,120,255,,,,,1,,,,0
2,0,0,134,96,67,255,,,,,1,,,,0
3,0,0,40,60,200,128,,,,,1,,,,0
4,0,0,90,140,60,255,,,,,2,,,,0
";

fn palette() -> BlockPalette {
    let shapes = ShapeTable::parse(SHAPES).unwrap();
    BlockPalette::parse(TEXTURES, Some(&shapes), None).unwrap()
}

/// Rolling terrain: stone, a dirt crust, water in the hollows and slabs on the peaks.
fn terrain_chunk() -> ChunkData {
    let mut ids = vec![0u8; CHUNK_BLOCK_VOLUME];
    let mut light = vec![0u8; CHUNK_BLOCK_VOLUME];
    for z in 0..16 {
        for x in 0..16 {
            let height = 60 + ((x * 7 + z * 13) % 11);
            for y in 0..=height {
                let id = if y + 3 < height { 1 } else { 2 };
                ids[block_offset(y, x, z, Rotation::R0)] = id;
            }
            for y in height + 1..64 {
                ids[block_offset(y, x, z, Rotation::R0)] = 3;
            }
            if height > 68 {
                ids[block_offset(height + 1, x, z, Rotation::R0)] = 4;
            }
            light[block_offset(height + 1, x, z, Rotation::R0)] = ((x + z) % 16) as u8;
        }
    }
    let mut chunk = ChunkData::empty(ChunkFlags::ALL);
    chunk.set_layer(Layer::Ids, ids);
    chunk.set_layer(Layer::BlockLight, light);
    chunk
}

fn bench_render_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_chunk");
    let palette = palette();
    let chunk = terrain_chunk();
    let hood = ChunkNeighbourhood::alone(&chunk, Rotation::R0);

    let ortho = RenderOptions::default();
    group.bench_function("ortho", |b| {
        b.iter(|| {
            let mut img = Image::new(16, 16);
            render_chunk(&mut img, 0, 0, &hood, &palette, &ortho);
            black_box(img);
        })
    });

    let iso = RenderOptions {
        isometric: true,
        ..Default::default()
    };
    group.bench_function("iso", |b| {
        b.iter(|| {
            let mut img = Image::new(64, 800);
            render_chunk(&mut img, 0, 0, &hood, &palette, &iso);
            black_box(img);
        })
    });

    let night = RenderOptions {
        isometric: true,
        night: true,
        ..Default::default()
    };
    group.bench_function("iso_night", |b| {
        b.iter(|| {
            let mut img = Image::new(64, 800);
            render_chunk(&mut img, 0, 0, &hood, &palette, &night);
            black_box(img);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_render_chunk);
criterion_main!(benches);
