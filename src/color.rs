// ============================================================================
// spark-panel - Colour
// HSV ↔ RGB conversion for the colour wheel and static colour mode
// ============================================================================

/// A colour in hue (degrees), saturation and value (percent), rounded to
/// whole numbers.
///
/// Hue is not range-checked on construction; conversion back to RGB wraps it
/// into `[0, 360)` first, so `360` and `0` give the same colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    pub h: i32,
    pub s: i32,
    pub v: i32,
}

impl Hsv {
    pub fn new(h: i32, s: i32, v: i32) -> Self {
        Self { h, s, v }
    }

    /// Convert from 0–255 channels.
    ///
    /// ```
    /// use spark_panel::color::Hsv;
    ///
    /// assert_eq!(Hsv::from_rgb(0, 255, 0), Hsv::new(120, 100, 100));
    /// ```
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = f64::from(r) / 255.0;
        let g = f64::from(g) / 255.0;
        let b = f64::from(b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let mut h = 0.0;
        if delta != 0.0 {
            if max == r {
                h = 60.0 * (((g - b) / delta) % 6.0);
            } else if max == g {
                h = 60.0 * ((b - r) / delta + 2.0);
            } else {
                h = 60.0 * ((r - g) / delta + 4.0);
            }
        }
        if h < 0.0 {
            h += 360.0;
        }

        let s = if max == 0.0 { 0.0 } else { delta / max };

        Self {
            h: h.round() as i32,
            s: (s * 100.0).round() as i32,
            v: (max * 100.0).round() as i32,
        }
    }

    /// Convert to 0–255 channels.
    pub fn to_rgb(&self) -> [u8; 3] {
        let h = f64::from(self.h.rem_euclid(360)) / 360.0;
        hsv_to_rgb(h, f64::from(self.s) / 100.0, f64::from(self.v) / 100.0)
    }

    /// [`to_rgb`](Self::to_rgb) with a fully opaque alpha channel appended.
    pub fn to_rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, 0xFF]
    }
}

/// Convert normalised hue, saturation and value (each in `[0, 1]`) to 0–255
/// channels.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [channel(r), channel(g), channel(b)]
}

fn channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

// =============================================================================
// RGB
// =============================================================================

/// A colour as 0–255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let packed = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::from_u32(packed))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// The packed `0xRRGGBB` value the device expects.
    pub fn to_u32(&self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    pub fn to_hsv(&self) -> Hsv {
        Hsv::from_rgb(self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Hsv> for Rgb {
    fn from(hsv: Hsv) -> Self {
        Self::from(hsv.to_rgb())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((255, 0, 0), Hsv::new(0, 100, 100))]
    #[case((0, 255, 0), Hsv::new(120, 100, 100))]
    #[case((0, 0, 255), Hsv::new(240, 100, 100))]
    #[case((255, 0, 255), Hsv::new(300, 100, 100))]
    #[case((0, 0, 0), Hsv::new(0, 0, 0))]
    #[case((255, 255, 255), Hsv::new(0, 0, 100))]
    fn rgb_to_hsv(#[case] rgb: (u8, u8, u8), #[case] expected: Hsv) {
        assert_eq!(Hsv::from_rgb(rgb.0, rgb.1, rgb.2), expected);
    }

    #[rstest]
    #[case([255, 0, 0])]
    #[case([0, 255, 0])]
    #[case([0, 0, 255])]
    #[case([255, 255, 0])]
    #[case([0, 0, 0])]
    #[case([255, 255, 255])]
    fn primary_round_trip(#[case] rgb: [u8; 3]) {
        assert_eq!(Hsv::from_rgb(rgb[0], rgb[1], rgb[2]).to_rgb(), rgb);
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(Hsv::new(360, 100, 100).to_rgb(), Hsv::new(0, 100, 100).to_rgb());
        assert_eq!(Hsv::new(-120, 100, 100).to_rgb(), [0, 0, 255]);
        assert_eq!(Hsv::new(720, 0, 50).to_rgb(), Hsv::new(0, 0, 50).to_rgb());
    }

    #[test]
    fn rgba_is_opaque() {
        assert_eq!(Hsv::new(0, 100, 100).to_rgba(), [255, 0, 0, 0xFF]);
    }

    #[test]
    fn normalised_conversion() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(0.5, 1.0, 1.0), [0, 255, 255]);
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.5), [128, 128, 128]);
    }

    #[test]
    fn hex_and_packed() {
        let orange = Rgb::from_hex("#ff8000").expect("hex");
        assert_eq!(orange, Rgb::new(255, 128, 0));
        assert_eq!(orange.to_u32(), 0xFF8000);
        assert_eq!(orange.to_hex(), "#ff8000");
        assert_eq!(Rgb::from_u32(0xFF8000), orange);
        assert_eq!(Rgb::from_hex("00FF00"), Some(Rgb::new(0, 255, 0)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn rgb_from_hsv() {
        assert_eq!(Rgb::from(Hsv::new(240, 100, 100)), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::new(0, 0, 255).to_hsv(), Hsv::new(240, 100, 100));
    }
}
