use anvilmap_blocks::{BiomeTable, BlockPalette, Paint, Rgba, ShapeTable};
use anvilmap_geom::Rotation;

const SHAPES: &str = "\
0000000000000000
1111222322232223
0000000011111111
0110233223322332
";

const TEXTURES: &str = "\
# id,mask,sub,r1,g1,b1,a1,r2,g2,b2,a2,sN,sE,sS,sW,biome1,biome2
0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0
1,0,0,128,128,128,255,,,,,1,,,,0
2,0,0,100,160,60,255,120,90,60,255,1,,,,2,0
8,2,0,40,60,200,128,,,,,1,,,,0
8,2,1,40,60,200,200,,,,,2,3,0,0,0
";

const BIOMES: &str = "\
1,0.8,0.4,119,171,47,255,145,189,89,255
";

fn palette() -> BlockPalette {
    let shapes = ShapeTable::parse(SHAPES).unwrap();
    BlockPalette::parse(TEXTURES, Some(&shapes), None).unwrap()
}

#[test]
fn known_ids_stop_at_the_highest_row() {
    let p = palette();
    assert!(p.is_known(8));
    assert!(!p.is_known(9));
    assert!(!p.is_known(255));
}

#[test]
fn unknown_ids_and_subtypes_are_empty() {
    let p = palette();
    let t = p.block_type(200, 0);
    assert!(!t.is_opaque());
    assert!(!t.shape(Rotation::R0).is_solid());
    assert_eq!(t.colour(Paint::Colour1), Rgba::TRANSPARENT);
    // id 5 sits below the highest id but has no rows
    assert_eq!(p.block_type(5, 3).colour(Paint::Colour1), Rgba::TRANSPARENT);
}

#[test]
fn data_values_reduce_by_mask() {
    let p = palette();
    assert_eq!(p.subtype_index(8, 0), 0);
    assert_eq!(p.subtype_index(8, 7), 1);
    assert_eq!(p.subtype_index(8, 10), 0);
    // mask 0 is a single subtype
    assert_eq!(p.subtype_index(1, 9), 0);
    assert_eq!(p.block_type(8, 3).subtype, 1);
    assert_eq!(p.block_type(8, 3).colour(Paint::Colour1).a, 200);
}

#[test]
fn opacity_follows_both_alphas() {
    let p = palette();
    // colour 2 absent
    assert!(p.block_type(1, 0).is_opaque());
    // both opaque
    assert!(p.block_type(2, 0).is_opaque());
    // translucent water
    assert!(!p.block_type(8, 0).is_opaque());
}

#[test]
fn hilight_and_shadow_are_derived() {
    let p = palette();
    let stone = p.block_type(1, 0);
    assert_eq!(stone.colour(Paint::Colour1), Rgba::new(128, 128, 128, 255));
    assert_eq!(stone.colour(Paint::Hilight1), Rgba::new(143, 143, 143, 255));
    assert_eq!(stone.colour(Paint::Shadow1), Rgba::new(112, 112, 112, 255));
    assert_eq!(stone.colour(Paint::Colour2), Rgba::TRANSPARENT);
}

#[test]
fn zero_shape_columns_fall_back_to_north() {
    let p = palette();
    let stone = p.block_type(1, 0);
    for rot in Rotation::ALL {
        assert!(stone.shape(rot).is_solid());
    }
    let water = p.block_type(8, 1);
    assert!(!water.shape(Rotation::R0).is_solid());
    assert!(water.shape(Rotation::R90).has(Paint::Shadow1));
    assert_eq!(water.shape(Rotation::R180), water.shape(Rotation::R0));
    assert_eq!(water.shape(Rotation::R270), water.shape(Rotation::R0));
}

#[test]
fn biome_tint_applies_to_flagged_colours_only() {
    let shapes = ShapeTable::parse(SHAPES).unwrap();
    let biomes = BiomeTable::parse(BIOMES).unwrap();
    let p = BlockPalette::parse(TEXTURES, Some(&shapes), Some(&biomes)).unwrap();

    let grass = p.block_type(2, 0);
    assert!(grass.is_tinted());
    let base = grass.colours_in(None);
    let tinted = grass.colours_in(Some(1));
    assert_ne!(tinted[Paint::Colour1.index()], base[Paint::Colour1.index()]);
    assert_eq!(tinted[Paint::Colour2.index()], base[Paint::Colour2.index()]);

    // the tint takes the grass hue but keeps the block's value
    let (h, _, v) = tinted[Paint::Colour1.index()].to_hsv();
    let (grass_h, _, _) = Rgba::new(145, 189, 89, 255).to_hsv();
    let (_, _, block_v) = Rgba::new(100, 160, 60, 255).to_hsv();
    assert!((h - grass_h).abs() < 2.0);
    assert!((v - block_v).abs() < 0.01);

    // biomes missing from the table use the plain colours
    assert_eq!(grass.colours_in(Some(40)), base);
    assert_eq!(p.block_type(1, 0).colours_in(Some(1)), p.block_type(1, 0).colours());
}

#[test]
fn rows_without_shapes_parse_for_flat_maps() {
    let p = BlockPalette::parse(TEXTURES, None, None).unwrap();
    assert!(!p.block_type(1, 0).shape(Rotation::R0).is_solid());
    assert!(p.block_type(1, 0).is_opaque());
}

#[test]
fn malformed_rows_are_rejected() {
    assert!(BlockPalette::parse("1,0,0,1,2,3\n", None, None).is_err());
    assert!(BlockPalette::parse("1,0,0,999,0,0,255,,,,,1,,,,0\n", None, None).is_err());
    assert!(BlockPalette::parse("1,0,16,1,1,1,255,,,,,1,,,,0\n", None, None).is_err());
}
