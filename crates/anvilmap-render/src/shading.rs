use anvilmap_blocks::Rgba;
use anvilmap_geom::{MAX_HEIGHT, MAX_LIGHT};
use serde::{Deserialize, Serialize};

/// Brightness tuning shared by both projections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shading {
    /// Brightening for north/west-facing contour edges in orthographic maps.
    pub hilight: f64,
    /// Darkening for south/east-facing contour edges.
    pub shadow: f64,
    /// Fraction of the world height below which blocks are darkened.
    pub height_threshold: f64,
    /// Darkening at y = 0, falling off linearly to the threshold.
    pub height_amount: f64,
    /// Brightness of a completely unlit block at night.
    pub night_ambience: f64,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            hilight: 0.125,
            shadow: -0.125,
            height_threshold: 0.3,
            height_amount: 0.7,
            night_ambience: 0.2,
        }
    }
}

impl Shading {
    /// Darkens blocks below the height threshold; the lower, the darker.
    pub fn height_shade(&self, colour: &mut Rgba, y: usize) {
        let threshold = self.height_threshold * MAX_HEIGHT as f64;
        let y = y as f64;
        if y < threshold {
            colour.adjust_brightness((threshold - y) / threshold * -self.height_amount);
        }
    }

    /// Scales brightness by light level, from the night ambience at 0 up to full at 15.
    pub fn light_shade(&self, colour: &mut Rgba, light: u8) {
        if light >= MAX_LIGHT {
            return;
        }
        colour.set_brightness(light as f64 / MAX_LIGHT as f64, self.night_ambience);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_shade_stops_at_threshold() {
        let s = Shading::default();
        let base = Rgba::new(100, 150, 200, 255);

        // threshold is 76.5; 76 is the last shaded layer
        let mut c = base;
        s.height_shade(&mut c, 77);
        assert_eq!(c, base);
        let mut c = base;
        s.height_shade(&mut c, 76);
        assert!(c.r < base.r);

        let mut c = base;
        s.height_shade(&mut c, 0);
        assert_eq!(c, Rgba::new(30, 45, 60, 255));
    }

    #[test]
    fn unlit_is_ambience_and_full_light_is_untouched() {
        let s = Shading::default();
        let base = Rgba::new(100, 150, 200, 255);
        let mut c = base;
        s.light_shade(&mut c, 15);
        assert_eq!(c, base);
        s.light_shade(&mut c, 0);
        assert_eq!(c, Rgba::new(20, 30, 40, 255));
    }
}
