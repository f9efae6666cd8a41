//! Turns a stream of per-pixel xterm colors into lines of colored spaces.
//!
//! Every pixel is one space. Runs of the same color share one background
//! escape, transparent pixels cost no escape at all, and trailing
//! transparency at the end of a row isn't printed.

use std::iter::{self, Peekable};

/// One pixel of a bitmap after quantization, or the end of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {
    Color(u8),
    Transparent,
    EndOfLine,
}

const PAD: char = ' ';
const RESET_BG: &str = "\x1b[49m";

/// A maximal run of equal pixels. End-of-line markers never merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    pixel: Pixel,
    len: usize,
}

struct Runs<I: Iterator<Item = Pixel>> {
    pixels: Peekable<I>,
}

impl<I: Iterator<Item = Pixel>> Iterator for Runs<I> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let pixel = self.pixels.next()?;
        let mut len = 1;
        if pixel != Pixel::EndOfLine {
            while self.pixels.next_if_eq(&pixel).is_some() {
                len += 1;
            }
        }
        Some(Run { pixel, len })
    }
}

fn runs<I: IntoIterator<Item = Pixel>>(pixels: I) -> Runs<I::IntoIter> {
    Runs { pixels: pixels.into_iter().peekable() }
}

/// Yields one string per row of the pixel stream.
///
/// A row that ends without [Pixel::EndOfLine] is never emitted.
pub struct Reducer<I: Iterator<Item = Pixel>> {
    runs: Runs<I>,
    need_reset: bool,
}

impl<I: Iterator<Item = Pixel>> Reducer<I> {
    pub fn new<P: IntoIterator<Item = Pixel, IntoIter = I>>(pixels: P) -> Self {
        Self { runs: runs(pixels), need_reset: false }
    }
}

impl<I: Iterator<Item = Pixel>> Iterator for Reducer<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = String::new();
        // Byte length of the padding of a trailing transparent run.
        let mut trailing_pad = 0;
        loop {
            let Run { pixel, len } = self.runs.next()?;
            match pixel {
                Pixel::Transparent => {
                    if self.need_reset {
                        line.push_str(RESET_BG);
                        self.need_reset = false;
                    }
                    line.extend(iter::repeat(PAD).take(len));
                    trailing_pad = len * PAD.len_utf8();
                }
                Pixel::Color(id) => {
                    self.need_reset = true;
                    line.push_str(&format!("\x1b[48;5;{id}m"));
                    line.extend(iter::repeat(PAD).take(len));
                    trailing_pad = 0;
                }
                Pixel::EndOfLine => {
                    if self.need_reset {
                        line.push_str(RESET_BG);
                        self.need_reset = false;
                    } else {
                        line.truncate(line.len() - trailing_pad);
                    }
                    return Some(line);
                }
            }
        }
    }
}

/// Visualizes what [Reducer] does: `<` where a background starts, `>`
/// where it's reset, `T` where a transparent run starts.
pub struct DebugReducer<I: Iterator<Item = Pixel>> {
    runs: Runs<I>,
    need_reset: bool,
}

impl<I: Iterator<Item = Pixel>> DebugReducer<I> {
    pub fn new<P: IntoIterator<Item = Pixel, IntoIter = I>>(pixels: P) -> Self {
        Self { runs: runs(pixels), need_reset: false }
    }

    fn mark_reset(&mut self, line: &mut String) {
        if self.need_reset {
            line.pop();
            line.push('>');
            self.need_reset = false;
        }
    }
}

impl<I: Iterator<Item = Pixel>> Iterator for DebugReducer<I> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut line = String::new();
        loop {
            let Run { pixel, len } = self.runs.next()?;
            match pixel {
                Pixel::Transparent => {
                    self.mark_reset(&mut line);
                    line.push('T');
                    line.extend(iter::repeat(PAD).take(len - 1));
                }
                Pixel::Color(_) => {
                    self.need_reset = true;
                    line.push('<');
                    line.extend(iter::repeat(PAD).take(len - 1));
                }
                Pixel::EndOfLine => {
                    self.mark_reset(&mut line);
                    return Some(line.trim_end_matches([PAD, 'T']).to_string());
                }
            }
        }
    }
}

/// Drops rows that came out blank and ends the output with an empty line.
pub fn printable<L: IntoIterator<Item = String>>(lines: L) -> impl Iterator<Item = String> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .chain(iter::once(String::new()))
}
