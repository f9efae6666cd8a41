//! `fabterm` makes terminal output fabulous.
//!
//! - [style] composes nested ANSI styles into the shortest escape sequence
//!   that renders them.
//! - [palette] maps 24-bit colors onto the 256 xterm colors and back.
//! - [raster] and [text] print images and big TrueType text as rows of
//!   colored spaces, using [reduce] to keep the escapes to a minimum.

pub mod color;
pub mod color_names;
pub mod config;
pub mod debug_log;
pub mod error;
pub mod palette;
pub mod raster;
pub mod reduce;
pub mod style;
pub mod text;

pub use color::{parse_color, Color, Rgb, Rgba, Xterm};
pub use config::RenderConfig;
pub use debug_log::DebugLog;
pub use error::{Error, Result};
pub use palette::{rgb_to_xterm, try_xterm_to_rgb, xterm_to_rgb};
pub use raster::ImageArt;
pub use reduce::{DebugReducer, Pixel, Reducer};
pub use text::TextOptions;
