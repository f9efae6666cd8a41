//! Large text drawn with a TrueType font, printed like an image.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontRef, Glyph, GlyphId, PxScale, ScaleFont};
use image::{Rgba as ImgRgba, RgbaImage};

use crate::color::{parse_color, Rgba};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::raster::ImageArt;

/// Checked in order for fonts given by name.
const FONT_DIRS: [&str; 5] = [
    "/usr/share/fonts/truetype",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/OTF",
    "/usr/share/fonts",
    "/Library/Fonts",
];

const SHADOW: Rgba = Rgba::new(150, 150, 150, 150);

#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    /// A path to a font file, or a font name like `DejaVuSans-Bold`.
    pub font: String,
    /// Font size in pixels.
    pub size: f32,
    /// Any color [parse_color] understands.
    pub color: String,
    pub shadow: bool,
    /// Slant in pixels; the top of the text leans right.
    pub skew: Option<u32>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font: "DejaVuSans-Bold".to_string(),
            size: 23.0,
            color: "#0099ff".to_string(),
            shadow: false,
            skew: None,
        }
    }
}

/// Rasterizes `text` and prepares it for printing like any other image.
pub fn render(text: &str, opts: &TextOptions, config: &RenderConfig) -> Result<ImageArt> {
    let path = resolve_font(&opts.font)?;
    config.log.log(format!("Using font: {}", path.display()));
    let data = fs::read(&path)?;
    let font = FontRef::try_from_slice(&data)
        .map_err(|_| Error::Font(path.display().to_string()))?;
    let color = parse_color(&opts.color)?;
    let img = rasterize(&font, text, opts.size, color.into(), opts.shadow, opts.skew.unwrap_or(0));
    config.log.log(format!("Rasterized {:?} to {}x{}", text, img.width(), img.height()));
    Ok(ImageArt::from_rgba(img, config))
}

/// Finds a font file. Names are looked up as `name.ttf` or `name.otf`
/// in the usual font directories and the directories directly below them.
pub fn resolve_font(name: &str) -> Result<PathBuf> {
    let given = Path::new(name);
    if given.is_file() {
        return Ok(given.to_path_buf());
    }
    let dirs = font_dirs();
    let nested = dirs.iter().flat_map(|dir| subdirs(dir));
    dirs.iter()
        .cloned()
        .chain(nested)
        .find_map(|dir| font_in(&dir, name))
        .ok_or_else(|| Error::FontNotFound(name.to_string()))
}

/// Names of the fonts [resolve_font] can find, sorted.
pub fn list_fonts() -> Vec<String> {
    let dirs = font_dirs();
    let mut names: Vec<String> = dirs
        .iter()
        .cloned()
        .chain(dirs.iter().flat_map(|dir| subdirs(dir)))
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flat_map(|entries| entries.flatten())
        .filter_map(|entry| {
            let path = entry.path();
            match path.extension()?.to_str()? {
                "ttf" | "otf" => Some(path.file_stem()?.to_string_lossy().into_owned()),
                _ => None,
            }
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = FONT_DIRS.iter().map(PathBuf::from).collect();
    if let Some(home) = env::var_os("HOME") {
        dirs.push(Path::new(&home).join(".fonts"));
        dirs.push(Path::new(&home).join(".local/share/fonts"));
    }
    dirs
}

fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else { return Vec::new() };
    entries.flatten().map(|e| e.path()).filter(|p| p.is_dir()).collect()
}

fn font_in(dir: &Path, name: &str) -> Option<PathBuf> {
    ["ttf", "otf"]
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|p| p.is_file())
}

/// Draws `text` on a transparent canvas `3 + skew` pixels larger than the
/// text in each direction.
pub fn rasterize<F: Font>(
    font: &F,
    text: &str,
    size: f32,
    color: Rgba,
    shadow: bool,
    skew: u32,
) -> RgbaImage {
    let scale = PxScale::from(size);
    let (glyphs, w, h) = layout(font, scale, text);
    let mut canvas = RgbaImage::new(w + 3 + skew, h + 3 + skew);
    let left = skew as f32;
    if shadow {
        draw_glyphs(&mut canvas, font, &glyphs, 2.0 + left, 2.0, SHADOW);
    }
    draw_glyphs(&mut canvas, font, &glyphs, 1.0 + left, 1.0, color);
    if skew > 0 {
        shear(&canvas, skew)
    } else {
        canvas
    }
}

/// Positions glyphs on one baseline, returning them with the text extent.
fn layout<F: Font>(font: &F, scale: PxScale, text: &str) -> (Vec<Glyph>, u32, u32) {
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::new();
    let mut caret = 0.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars().filter(|c| !c.is_control()) {
        let id = font.glyph_id(c);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, scaled.ascent())));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    let width = caret.ceil().max(0.0) as u32;
    let height = (scaled.ascent() - scaled.descent()).ceil().max(0.0) as u32;
    (glyphs, width, height)
}

fn draw_glyphs<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    glyphs: &[Glyph],
    dx: f32,
    dy: f32,
    color: Rgba,
) {
    let (w, h) = canvas.dimensions();
    for glyph in glyphs {
        let mut glyph = glyph.clone();
        glyph.position.x += dx;
        glyph.position.y += dy;
        let Some(outlined) = font.outline_glyph(glyph) else { continue };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, coverage| {
            let px = bounds.min.x as i64 + i64::from(x);
            let py = bounds.min.y as i64 + i64::from(y);
            if (0..i64::from(w)).contains(&px) && (0..i64::from(h)).contains(&py) {
                blend_over(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
            }
        });
    }
}

/// Paints `src` with the given coverage over `dst`, both straight alpha.
fn blend_over(dst: &mut ImgRgba<u8>, src: Rgba, coverage: f32) {
    let sa = f32::from(src.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let [dr, dg, db, da] = dst.0;
    let da = f32::from(da) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| {
        ((f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a).round() as u8
    };
    dst.0 = [mix(src.r, dr), mix(src.g, dg), mix(src.b, db), (out_a * 255.0).round() as u8];
}

/// Slants the canvas: the output pixel at `(x, y)` comes from
/// `(x + 0.1 * skew * y - skew, y)`, nearest neighbour.
fn shear(src: &RgbaImage, skew: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let skew = skew as f32;
    RgbaImage::from_fn(w, h, |x, y| {
        let sx = (x as f32 + 0.5 + 0.1 * skew * (y as f32 + 0.5) - skew).floor();
        if sx >= 0.0 && sx < w as f32 {
            *src.get_pixel(sx as u32, y)
        } else {
            ImgRgba([0, 0, 0, 0])
        }
    })
}
