//! Error type shared by the library and the `fabterm` binary.

use std::io;

/// Everything that can go wrong while building styles or rendering art.
///
/// Composition and reduction never fail; bad input is rejected where it
/// enters the crate (style codes, color strings, files and fonts).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SGR code {0} does not belong to any style group")]
    InvalidStyleCode(u16),

    #[error("xterm color index {0} is outside 0..=255")]
    PaletteIndexOutOfRange(u32),

    #[error("Can't parse color: {0:?}")]
    ColorParse(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid font data in {0}")]
    Font(String),

    #[error("Can't find font {0:?}, try passing an absolute path")]
    FontNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::FontNotFound(_) => io::Error::new(io::ErrorKind::NotFound, err.to_string()),
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}
