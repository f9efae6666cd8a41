//! RGB values, CSS color parsing and the bits of color math the renderers
//! need: alpha blending, HSL and complementary colors.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color_names;
use crate::error::{Error, Result};
use crate::palette;

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A 24-bit color plus an alpha channel, 0 is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A color given directly as an xterm palette id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xterm(pub u8);

/// A color for the style wrappers: true color to be quantized, or a
/// palette id emitted as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Rgb(Rgb),
    Xterm(u8),
}

impl Color {
    /// The palette id to emit.
    pub fn xterm(self) -> u8 {
        match self {
            Color::Rgb(rgb) => palette::rgb_to_xterm(rgb),
            Color::Xterm(id) => id,
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Color::Rgb(rgb) => rgb,
            Color::Xterm(id) => palette::xterm_to_rgb(id),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(rgb: (u8, u8, u8)) -> Self {
        Color::Rgb(rgb.into())
    }
}

impl From<Xterm> for Color {
    fn from(color: Xterm) -> Self {
        Color::Xterm(color.0)
    }
}

/// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared euclidean distance between two colors in RGB space.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let d = |a: u8, b: u8| {
            let d = i32::from(a) - i32::from(b);
            (d * d) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let (r, g, b) = (unit(self.r), unit(self.g), unit(self.b));
        let min = r.min(g).min(b);
        let max = r.max(g).max(b);
        let l = (max + min) / 2.0;
        if min == max {
            return Hsl { h: 0.0, s: 0.0, l };
        }
        let d = max - min;
        let s = if l < 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let (dr, dg, db) = ((max - r) / d, (max - g) / d, (max - b) / d);
        let h = if r == max {
            db - dg
        } else if g == max {
            2.0 + dr - db
        } else {
            4.0 + dg - dr
        };
        Hsl { h: (h * 60.0).rem_euclid(360.0), s, l }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let Hsl { h, s, l } = hsl;
        if s == 0.0 {
            return Rgb::new(channel(l), channel(l), channel(l));
        }
        let n2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let n1 = 2.0 * l - n2;
        let h = h / 60.0;
        Rgb::new(
            channel(hue_to_rgb(n1, n2, h + 2.0)),
            channel(hue_to_rgb(n1, n2, h)),
            channel(hue_to_rgb(n1, n2, h - 2.0)),
        )
    }
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

impl From<Xterm> for Rgb {
    fn from(color: Xterm) -> Self {
        palette::xterm_to_rgb(color.0)
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Rgba::new(rgb.r, rgb.g, rgb.b, 255)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba::new(r, g, b, a)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

fn unit(c: u8) -> f64 {
    f64::from(c) / 255.0
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

fn hue_to_rgb(n1: f64, n2: f64, h: f64) -> f64 {
    let h = h.rem_euclid(6.0);
    if h < 1.0 {
        n1 + (n2 - n1) * h
    } else if h < 3.0 {
        n2
    } else if h < 4.0 {
        n1 + (n2 - n1) * (4.0 - h)
    } else {
        n1
    }
}

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?([0-9a-f]{3}|[0-9a-f]{6})$").unwrap()
});

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").unwrap()
});

/// Parses a color the way you'd write it in HTML/CSS.
///
/// Accepts named colors (`"lemonchiffon"`), `#rgb`, `#rrggbb` (the `#` is
/// optional) and `rgb(r, g, b)`. Case and surrounding whitespace are
/// ignored. The error carries the original input.
pub fn parse_color(input: &str) -> Result<Rgb> {
    let err = || Error::ColorParse(input.to_string());
    let color = input.trim().to_lowercase();
    if let Some(rgb) = color_names::lookup(&color) {
        return Ok(rgb);
    }
    if let Some(caps) = HEX_COLOR.captures(&color) {
        let digits = &caps[1];
        let hex = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        return if digits.len() == 3 {
            let doubled: Vec<String> = digits.chars().map(|c| format!("{c}{c}")).collect();
            Ok(Rgb::new(hex(&doubled[0])?, hex(&doubled[1])?, hex(&doubled[2])?))
        } else {
            Ok(Rgb::new(hex(&digits[0..2])?, hex(&digits[2..4])?, hex(&digits[4..6])?))
        };
    }
    if let Some(caps) = RGB_FUNCTION.captures(&color) {
        let dec = |s: &str| s.parse::<u8>().map_err(|_| err());
        return Ok(Rgb::new(dec(&caps[1])?, dec(&caps[2])?, dec(&caps[3])?));
    }
    Err(err())
}

/// Solidifies a translucent color by painting it over an opaque one.
///
/// Plain "source over": `fg * a + bg * (1 - a)` for each channel.
pub fn alpha_blend(fg: Rgba, bg: Rgb) -> Rgb {
    let a = u32::from(fg.a);
    let mix = |f: u8, b: u8| ((u32::from(f) * a + u32::from(b) * (255 - a) + 127) / 255) as u8;
    Rgb::new(mix(fg.r, bg.r), mix(fg.g, bg.g), mix(fg.b, bg.b))
}

// Itten's RYB wheel, and the matching hues on the RGB wheel, every 15°.
const RYB_WHEEL: [f64; 25] = [
    0.0, 26.0, 52.0, 83.0, 120.0, 130.0, 141.0, 151.0, 162.0, 177.0, 190.0, 204.0, 218.0,
    232.0, 246.0, 261.0, 275.0, 288.0, 303.0, 317.0, 330.0, 338.0, 345.0, 352.0, 360.0,
];
const RGB_WHEEL: [f64; 25] = [
    0.0, 8.0, 17.0, 26.0, 34.0, 41.0, 48.0, 54.0, 60.0, 81.0, 103.0, 123.0, 138.0, 155.0,
    171.0, 187.0, 204.0, 219.0, 234.0, 251.0, 267.0, 282.0, 298.0, 329.0, 360.0,
];

fn map_wheel(hue: f64, to: &[f64; 25]) -> f64 {
    let hue = hue.rem_euclid(360.0);
    let i = ((hue / 15.0) as usize).min(23);
    let d = hue - 15.0 * i as f64;
    to[i] + (to[i + 1] - to[i]) * d / 15.0
}

/// The color opposite `rgb` on the artist's (RYB) color wheel.
pub fn complement(rgb: Rgb) -> Rgb {
    let hsl = rgb.to_hsl();
    let ryb = map_wheel(hsl.h, &RYB_WHEEL);
    let h = map_wheel((ryb + 180.0).rem_euclid(360.0), &RGB_WHEEL);
    Rgb::from_hsl(Hsl { h, ..hsl })
}
