use anvilmap_blocks::Rgba;
use anvilmap_render::{Image, zoom_levels};
use proptest::prelude::*;

fn opaque() -> impl Strategy<Value = Rgba> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgba::new(r, g, b, 255))
}

proptest! {
    // the smallest level count whose doubled tiles cover the height
    #[test]
    fn zoom_levels_cover_height(height in 1u32..100_000, tile in 1u32..4096) {
        let levels = zoom_levels(height, tile);
        prop_assert!((tile as u64) << levels >= height as u64);
        if levels > 0 {
            prop_assert!(((tile as u64) << (levels - 1)) < height as u64);
        }
    }

    #[test]
    fn scale_half_rounds_up(w in 1u32..64, h in 1u32..64) {
        let half = Image::new(w, h).scale_half();
        prop_assert_eq!(half.width(), w.div_ceil(2));
        prop_assert_eq!(half.height(), h.div_ceil(2));
    }

    // a uniform opaque block of 2x2 survives halving exactly
    #[test]
    fn scale_half_keeps_uniform_colour(c in opaque(), w in 1u32..16, h in 1u32..16) {
        let mut img = Image::new(w * 2, h * 2);
        for y in 0..(h * 2) as i64 {
            for x in 0..(w * 2) as i64 {
                img.set(x, y, c);
            }
        }
        let half = img.scale_half();
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                prop_assert_eq!(half.get(x, y), Some(c));
            }
        }
    }

    #[test]
    fn crop_matches_source(
        c in opaque(),
        px in 0i64..20, py in 0i64..20,
        x in 0u32..24, y in 0u32..24, w in 1u32..10, h in 1u32..10,
    ) {
        let mut img = Image::new(20, 20);
        img.set(px, py, c);
        let tile = img.crop(x, y, w, h);
        prop_assert_eq!((tile.width(), tile.height()), (w, h));
        for ty in 0..h as i64 {
            for tx in 0..w as i64 {
                let expected = img.get(tx + x as i64, ty + y as i64).unwrap_or(Rgba::TRANSPARENT);
                prop_assert_eq!(tile.get(tx, ty), Some(expected));
            }
        }
    }

    #[test]
    fn blending_opaque_replaces(below in opaque(), above in opaque()) {
        let mut img = Image::new(1, 1);
        img.set(0, 0, below);
        img.blend(0, 0, above);
        prop_assert_eq!(img.get(0, 0), Some(above));
    }
}
