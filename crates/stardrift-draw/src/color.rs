use thiserror::Error;

#[derive(Clone, Copy, Eq, PartialEq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color: unrecognized style `{0}`")]
    UnknownStyle(String),
    #[error("color: invalid component `{0}`")]
    InvalidComponent(String),
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const TRANSPARENT: Self = Self::from_rgba(0x00000000);
    pub const WHITE: Self = Self::from_rgb(0xFFFFFF);
    pub const BLACK: Self = Self::from_rgb(0x000000);

    pub const RED: Self = Self::from_rgb(0xFF0000);
    pub const GREEN: Self = Self::from_rgb(0x00FF00);
    pub const BLUE: Self = Self::from_rgb(0x0000FF);

    pub const DARK_GRAY: Self = Self::from_rgb(0x606060);
    pub const GRAY: Self = Self::from_rgb(0xA0A0A0);
    pub const LIGHT_GRAY: Self = Self::from_rgb(0xDCDCDC);

    #[inline]
    pub const fn r(&self) -> u8 {
        self.r
    }

    #[inline]
    pub const fn g(&self) -> u8 {
        self.g
    }

    #[inline]
    pub const fn b(&self) -> u8 {
        self.b
    }

    #[inline]
    pub const fn a(&self) -> u8 {
        self.a
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    // Without alpha use 0xRRGGBB
    #[inline]
    pub const fn from_rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: ((hex) & 0xff) as u8,
            a: 255,
        }
    }

    #[inline]
    pub const fn from_rgba(rgba: u32) -> Self {
        Self {
            r: ((rgba >> 24) & 0xff) as u8,
            g: ((rgba >> 16) & 0xff) as u8,
            b: ((rgba >> 8) & 0xff) as u8,
            a: (rgba & 0xff) as u8,
        }
    }

    /// `#rrggbb`, the form a color control shows.
    pub fn to_style(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)` with `a` in `[0, 1]`.
    pub fn from_style(style: &str) -> Result<Self, ColorParseError> {
        let style = style.trim();

        if let Some(hex) = style.strip_prefix('#') {
            return Self::from_hex_style(hex, style);
        }

        let lower = style.to_ascii_lowercase();
        let (body, has_alpha) = if let Some(body) = lower.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = lower.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(ColorParseError::UnknownStyle(style.to_string()));
        };

        let body = body
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::UnknownStyle(style.to_string()))?;

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ColorParseError::UnknownStyle(style.to_string()));
        }

        let channel = |part: &str| -> Result<u8, ColorParseError> {
            Ok(parse_component(part)?.round().clamp(0.0, 255.0) as u8)
        };

        let a = if has_alpha {
            (parse_component(parts[3])?.clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            255
        };

        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }

    fn from_hex_style(hex: &str, style: &str) -> Result<Self, ColorParseError> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidComponent(hex.to_string()));
        }

        let value = u32::from_str_radix(hex, 16)
            .map_err(|_| ColorParseError::InvalidComponent(hex.to_string()))?;

        match hex.len() {
            3 => {
                let expand = |v: u32| ((v & 0xf) * 0x11) as u8;
                Ok(Self {
                    r: expand(value >> 8),
                    g: expand(value >> 4),
                    b: expand(value),
                    a: 255,
                })
            }
            6 => Ok(Self::from_rgb(value)),
            _ => Err(ColorParseError::UnknownStyle(style.to_string())),
        }
    }
}

fn parse_component(part: &str) -> Result<f32, ColorParseError> {
    part.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ColorParseError::InvalidComponent(part.to_string()))
}

impl From<u32> for Color {
    fn from(color: u32) -> Self {
        Self::from_rgba(color)
    }
}

impl From<[u8; 4]> for Color {
    fn from(color: [u8; 4]) -> Self {
        Self {
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
        }
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        ((color.r as u32) << 24)
            | ((color.g as u32) << 16)
            | ((color.b as u32) << 8)
            | color.a as u32
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "color({:#010x})", u32::from(*self))
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }

    /// The fully saturated, full value color of this hue.
    pub fn pure_hue(&self) -> Color {
        Hsv::new(self.h, 1.0, 1.0).into()
    }
}

impl From<Color> for Hsv {
    fn from(color: Color) -> Self {
        let r = color.r as f32 / 255.0;
        let g = color.g as f32 / 255.0;
        let b = color.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv::new(h, s, max)
    }
}

impl From<Hsv> for Color {
    fn from(hsv: Hsv) -> Self {
        let c = hsv.v * hsv.s;
        let h = hsv.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let m = hsv.v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Color {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
            a: 255,
        }
    }
}

#[derive(PartialEq, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let r = (color.r as f32) / 255.0;
        let g = (color.g as f32) / 255.0;
        let b = (color.b as f32) / 255.0;
        let a = (color.a as f32) / 255.0;
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [f32; 4] {
    fn from(rgba: Rgba) -> Self {
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Rgba {
    pub const TRANSPARENT: Self = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    pub const WHITE: Self = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn from_rgb(hex: u32) -> Rgba {
        Color::from_rgb(hex).into()
    }

    /// Decodes an sRGB color into linear space, alpha untouched.
    pub fn from_srgb(color: Color) -> Self {
        let encoded = Rgba::from(color);
        Self {
            r: srgb_to_linear(encoded.r),
            g: srgb_to_linear(encoded.g),
            b: srgb_to_linear(encoded.b),
            a: encoded.a,
        }
    }

    pub fn scale_rgb(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }
}

impl std::fmt::Debug for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        let r = (color.r as f64) / 255.0;
        let g = (color.g as f64) / 255.0;
        let b = (color.b as f64) / 255.0;
        let a = (color.a as f64) / 255.0;
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_roundtrips_through_hex() {
        let sphere = Color::from_rgb(0x0BCEE9);
        assert_eq!(sphere.to_style(), "#0bcee9");
        assert_eq!(Color::from_style("#0bcee9"), Ok(sphere));
        assert_eq!(Color::from_style("#0BCEE9"), Ok(sphere));
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(Color::from_style("#fff"), Ok(Color::WHITE));
        assert_eq!(Color::from_style("#f00"), Ok(Color::RED));
    }

    #[test]
    fn parses_functional_styles() {
        assert_eq!(
            Color::from_style("rgb(11, 206, 233)"),
            Ok(Color::from_rgb(0x0BCEE9))
        );
        assert_eq!(
            Color::from_style("rgba(255,0,0,0.5)"),
            Ok(Color::from_rgba(0xFF000080))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::from_style("teal").is_err());
        assert!(Color::from_style("#12345").is_err());
        assert!(Color::from_style("rgb(1,2)").is_err());
        assert!(Color::from_style("rgb(a,b,c)").is_err());
        assert!(Color::from_style("#zzzzzz").is_err());
        assert!(Color::from_style("#+ff").is_err());
        assert!(Color::from_style("#-12345").is_err());
        assert!(Color::from_style("rgb(nan, inf, 1)").is_err());
        assert!(Color::from_style("rgba(1, 2, 3, NaN)").is_err());
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(Color::from(Hsv::new(0.0, 1.0, 1.0)), Color::RED);
        assert_eq!(Color::from(Hsv::new(120.0, 1.0, 1.0)), Color::GREEN);
        assert_eq!(Color::from(Hsv::new(240.0, 1.0, 1.0)), Color::BLUE);
        assert_eq!(Color::from(Hsv::new(77.0, 0.0, 1.0)), Color::WHITE);
        assert_eq!(Color::from(Hsv::new(77.0, 1.0, 0.0)), Color::BLACK);
    }

    #[test]
    fn hsv_roundtrip_is_stable() {
        let sphere = Color::from_rgb(0x0BCEE9);
        let hsv = Hsv::from(sphere);
        assert!((hsv.h - 187.3).abs() < 0.1);
        assert_eq!(Color::from(hsv), sphere);
    }

    #[test]
    fn hue_wraps() {
        assert_eq!(Hsv::new(370.0, 0.5, 0.5).h, 10.0);
        assert_eq!(Hsv::new(-30.0, 0.5, 0.5).h, 330.0);
        assert_eq!(Hsv::new(30.0, 2.0, -1.0).s, 1.0);
    }

    #[test]
    fn srgb_decoding() {
        let linear = Rgba::from_srgb(Color::WHITE);
        assert_eq!(linear, Rgba::WHITE);

        let mid = Rgba::from_srgb(Color::from_rgb(0x808080));
        assert!((mid.r - 0.2158).abs() < 0.001);
        assert_eq!(mid.a, 1.0);
    }
}
