//! Printing bitmaps to the terminal.
//!
//! A terminal cell is treated as one pixel wide and two pixels tall, so
//! images are squashed vertically by half when they're resized. Pixels
//! are quantized to the xterm palette; translucent ones are first
//! flattened onto the terminal background, fully transparent ones become
//! uncolored blanks.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::color::{alpha_blend, Rgb, Rgba};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::palette::rgb_to_xterm;
use crate::reduce::{printable, DebugReducer, Pixel, Reducer};

/// A bitmap sized for the terminal, ready to print.
#[derive(Debug, Clone)]
pub struct ImageArt {
    img: RgbaImage,
    term_bg: Rgb,
}

impl ImageArt {
    /// Decodes the image at `path` and fits it to the configured width.
    pub fn open(path: impl AsRef<Path>, config: &RenderConfig) -> Result<Self> {
        let path = path.as_ref();
        config.log.log(format!("Loading image: {}", path.display()));
        let img = image::open(path)?.to_rgba8();
        Ok(Self::from_rgba(img, config))
    }

    /// Wraps an already decoded bitmap, resizing it the same way.
    pub fn from_rgba(img: RgbaImage, config: &RenderConfig) -> Self {
        let (iw, ih) = img.dimensions();
        let img = if iw == 0 || ih == 0 {
            img
        } else {
            let width = config.columns_for(iw).max(1);
            let height = ((u64::from(ih) * u64::from(width) / u64::from(iw)) / 2).max(1) as u32;
            config.log.log(format!("Resizing {iw}x{ih} to {width}x{height}"));
            if (width, height) == (iw, ih) {
                img
            } else {
                imageops::resize(&img, width, height, FilterType::Nearest)
            }
        };
        Self { img, term_bg: config.term_bg }
    }

    /// Size after resizing: columns by terminal rows.
    pub fn size(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    pub fn pixels(&self) -> PixelStream<'_> {
        pixel_stream(&self.img, self.term_bg)
    }

    /// The printable lines, blank rows dropped, ending with an empty line.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        printable(Reducer::new(self.pixels()))
    }

    /// Like [ImageArt::lines] but showing where escapes would go.
    pub fn debug_lines(&self) -> impl Iterator<Item = String> + '_ {
        printable(DebugReducer::new(self.pixels()))
    }
}

impl Display for ImageArt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// Classifies pixels, remembering the quantization of every color seen.
#[derive(Debug)]
struct Quantizer {
    term_bg: Rgb,
    cache: HashMap<Rgb, u8>,
}

impl Quantizer {
    fn new(term_bg: Rgb) -> Self {
        Self { term_bg, cache: HashMap::new() }
    }

    fn pixel(&mut self, rgba: Rgba) -> Pixel {
        let rgb = match rgba.a {
            0 => return Pixel::Transparent,
            255 => rgba.rgb(),
            _ => alpha_blend(rgba, self.term_bg),
        };
        Pixel::Color(*self.cache.entry(rgb).or_insert_with(|| rgb_to_xterm(rgb)))
    }
}

/// Left-to-right, top-to-bottom pixels of a bitmap, each row followed by
/// [Pixel::EndOfLine].
#[derive(Debug)]
pub struct PixelStream<'a> {
    img: &'a RgbaImage,
    x: u32,
    y: u32,
    quantizer: Quantizer,
}

pub fn pixel_stream(img: &RgbaImage, term_bg: Rgb) -> PixelStream<'_> {
    PixelStream { img, x: 0, y: 0, quantizer: Quantizer::new(term_bg) }
}

impl Iterator for PixelStream<'_> {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        if self.y >= self.img.height() {
            return None;
        }
        if self.x == self.img.width() {
            self.x = 0;
            self.y += 1;
            return Some(Pixel::EndOfLine);
        }
        let rgba = Rgba::from(self.img.get_pixel(self.x, self.y).0);
        self.x += 1;
        Some(self.quantizer.pixel(rgba))
    }
}
