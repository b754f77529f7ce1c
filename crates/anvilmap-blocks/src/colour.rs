/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Which operand of [`combine`] receives the composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintInto {
    Top,
    Bottom,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    fn map_rgb(&mut self, f: impl Fn(u8) -> u8) {
        self.r = f(self.r);
        self.g = f(self.g);
        self.b = f(self.b);
    }

    /// Moves each channel toward 255 (positive `amount`) or 0 (negative `amount`) in
    /// proportion to its remaining headroom.
    pub fn adjust_brightness(&mut self, amount: f64) {
        if self.is_transparent() {
            return;
        }
        self.map_rgb(|c| {
            let room = if amount < 0.0 { c } else { 255 - c };
            (c as f64 + room as f64 * amount) as u8
        });
    }

    /// Darkens to `ambience`, then adds back `brightness` (0..=1) of the remaining range.
    pub fn set_brightness(&mut self, brightness: f64, ambience: f64) {
        if self.is_transparent() {
            return;
        }
        let factor = ambience + (1.0 - ambience) * brightness;
        self.map_rgb(|c| (c as f64 * factor) as u8);
    }

    /// Hue in degrees, saturation and value in 0..=1.
    pub fn to_hsv(self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let range = max - min;
        if max == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let s = range / max;
        if s == 0.0 {
            return (0.0, 0.0, max);
        }
        let mut h = if r == max {
            (g - b) / range
        } else if g == max {
            (b - r) / range + 2.0
        } else {
            (r - g) / range + 4.0
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }
        (h, s, max)
    }

    pub fn from_hsv(h: f64, s: f64, v: f64, a: u8) -> Rgba {
        let (r, g, b) = if s == 0.0 {
            (v, v, v)
        } else {
            let h = h / 60.0;
            let i = h.floor();
            let f = h - i;
            let p = v * (1.0 - s);
            let q = v * (1.0 - s * f);
            let t = v * (1.0 - s * (1.0 - f));
            match i as u8 {
                0 => (v, t, p),
                1 => (q, v, p),
                2 => (p, v, t),
                3 => (p, q, v),
                4 => (t, p, v),
                _ => (v, p, q),
            }
        };
        Rgba::new(
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
            a,
        )
    }
}

/// "Over" compositing of `top` onto `bottom`, written into the operand chosen by `into`.
///
/// Integer truncation happens on the composite alpha before the channels are divided by it.
pub fn combine(top: &mut Rgba, bottom: &mut Rgba, into: PaintInto) {
    if top.a == 255 || bottom.a == 0 {
        if into == PaintInto::Bottom && top.a > 0 {
            *bottom = *top;
        }
        return;
    }
    if top.a == 0 {
        if into == PaintInto::Top && bottom.a > 0 {
            *top = *bottom;
        }
        return;
    }

    // single precision, truncated at every step
    let bmod = (255 - top.a) as f32 / 255.0;
    let alpha = (top.a as f32 + bottom.a as f32 * bmod) as u8;
    let mix = |t: u8, b: u8| {
        let t = (t as u32 * top.a as u32) as f32;
        let b = (b as u32 * bottom.a as u32) as f32;
        ((t + b * bmod) / alpha as f32) as u8
    };
    let out = Rgba::new(
        mix(top.r, bottom.r),
        mix(top.g, bottom.g),
        mix(top.b, bottom.b),
        alpha,
    );
    match into {
        PaintInto::Top => *top = out,
        PaintInto::Bottom => *bottom = out,
    }
}

/// `top` over `bottom`, returned by value.
#[inline]
pub fn over(top: Rgba, bottom: Rgba) -> Rgba {
    let (mut top, mut bottom) = (top, bottom);
    combine(&mut top, &mut bottom, PaintInto::Bottom);
    bottom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_alpha_over_opaque() {
        let out = over(Rgba::new(255, 0, 0, 128), Rgba::new(0, 0, 255, 255));
        assert_eq!(out.a, 255);
        assert_eq!(out.r, 128);
        assert_eq!(out.b, 127);
    }

    #[test]
    fn over_truncates_in_single_precision() {
        // double precision would give 127 here
        let out = over(Rgba::new(30, 30, 30, 108), Rgba::new(200, 200, 200, 255));
        assert_eq!(out, Rgba::new(128, 128, 128, 255));
        let out = over(Rgba::new(5, 5, 5, 100), Rgba::new(255, 255, 255, 100));
        assert_eq!(out, Rgba::new(100, 100, 100, 160));
    }

    #[test]
    fn paint_into_top_keeps_bottom() {
        let mut top = Rgba::new(10, 20, 30, 100);
        let mut bottom = Rgba::new(200, 200, 200, 255);
        let before = bottom;
        combine(&mut top, &mut bottom, PaintInto::Top);
        assert_eq!(bottom, before);
        assert_eq!(top.a, 255);
    }

    #[test]
    fn brightness_skips_transparent() {
        let mut c = Rgba::new(100, 100, 100, 0);
        c.adjust_brightness(0.5);
        c.set_brightness(0.0, 0.2);
        assert_eq!(c, Rgba::new(100, 100, 100, 0));
    }

    #[test]
    fn adjust_brightness_uses_headroom() {
        let mut c = Rgba::new(100, 200, 0, 255);
        c.adjust_brightness(0.125);
        assert_eq!(c, Rgba::new(119, 206, 31, 255));
        let mut d = Rgba::new(100, 200, 0, 255);
        d.adjust_brightness(-0.125);
        assert_eq!(d, Rgba::new(87, 175, 0, 255));
    }

    #[test]
    fn grey_hsv_round_trip() {
        let grey = Rgba::new(128, 128, 128, 255);
        let (h, s, v) = grey.to_hsv();
        assert_eq!((h, s), (0.0, 0.0));
        assert_eq!(Rgba::from_hsv(h, s, v, 255), grey);
    }
}
