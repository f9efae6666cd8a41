//! Render settings that used to be global terminal state.

use terminal_size::{terminal_size, Width};

use crate::color::Rgb;
use crate::debug_log::DebugLog;

/// Width assumed when stdout isn't a terminal.
pub const FALLBACK_WIDTH: u32 = 80;

/// Settings shared by the image and text renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Output width in columns; `None` fits the image to the terminal.
    pub width: Option<u32>,
    /// The terminal's background, used to flatten translucent pixels.
    pub term_bg: Rgb,
    pub log: DebugLog,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { width: None, term_bg: Rgb::BLACK, log: DebugLog::disabled() }
    }
}

impl RenderConfig {
    /// Columns to render an image `image_width` pixels wide into.
    ///
    /// An explicit width wins; otherwise the image keeps its own width
    /// unless the terminal is narrower.
    pub fn columns_for(&self, image_width: u32) -> u32 {
        match self.width {
            Some(w) => w,
            None => image_width.min(terminal_width()),
        }
    }
}

/// Width of the terminal attached to stdout.
pub fn terminal_width() -> u32 {
    match terminal_size() {
        Some((Width(w), _)) if w > 0 => u32::from(w),
        _ => FALLBACK_WIDTH,
    }
}
