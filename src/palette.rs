//! The xterm 256-color palette and quantization of 24-bit colors into it.
//!
//! Indices `0..16` are the basic ANSI colors with their historical xterm
//! values, `16..232` a 6x6x6 color cube and `232..256` a grayscale ramp.
//! The whole table is computed at compile time.

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Channel values used by each axis of the color cube.
pub const CUBE_STEPS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

/// xterm's default values for the 16 basic colors.
pub const BASIC16: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // 0  Black
    Rgb::new(205, 0, 0),     // 1  Red
    Rgb::new(0, 205, 0),     // 2  Green
    Rgb::new(205, 205, 0),   // 3  Yellow
    Rgb::new(0, 0, 238),     // 4  Blue
    Rgb::new(205, 0, 205),   // 5  Magenta
    Rgb::new(0, 205, 205),   // 6  Cyan
    Rgb::new(229, 229, 229), // 7  White
    Rgb::new(127, 127, 127), // 8  Bright Black
    Rgb::new(255, 0, 0),     // 9  Bright Red
    Rgb::new(0, 255, 0),     // 10 Bright Green
    Rgb::new(255, 255, 0),   // 11 Bright Yellow
    Rgb::new(92, 92, 255),   // 12 Bright Blue
    Rgb::new(255, 0, 255),   // 13 Bright Magenta
    Rgb::new(0, 255, 255),   // 14 Bright Cyan
    Rgb::new(255, 255, 255), // 15 Bright White
];

/// Cube entry for true black, the answer for every near-black color.
pub const CUBE_BLACK: u8 = 16;

/// Colors with every channel below this skip the search.
const NEAR_BLACK: u8 = 5;

/// RGB value of every xterm color, indexed by color id.
pub static COLOR_TABLE: [Rgb; 256] = build_table();

const fn entry(id: u8) -> Rgb {
    match id {
        0..=15 => BASIC16[id as usize],
        16..=231 => {
            let i = (id - 16) as usize;
            Rgb::new(CUBE_STEPS[(i / 36) % 6], CUBE_STEPS[(i / 6) % 6], CUBE_STEPS[i % 6])
        }
        _ => {
            let c = 8 + (id - 232) * 10;
            Rgb::new(c, c, c)
        }
    }
}

const fn build_table() -> [Rgb; 256] {
    let mut table = [Rgb::new(0, 0, 0); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = entry(i as u8);
        i += 1;
    }
    table
}

/// Converts an xterm color id to its RGB value.
pub fn xterm_to_rgb(id: u8) -> Rgb {
    COLOR_TABLE[id as usize]
}

/// Like [xterm_to_rgb] for ids that come from wider integers.
pub fn try_xterm_to_rgb(id: u32) -> Result<Rgb> {
    u8::try_from(id)
        .map(xterm_to_rgb)
        .map_err(|_| Error::PaletteIndexOutOfRange(id))
}

/// Quantizes a color to the nearest xterm color id.
///
/// Brute-force nearest neighbour over the whole table using squared
/// euclidean distance in RGB space. On a tie the lowest id wins.
pub fn rgb_to_xterm(rgb: Rgb) -> u8 {
    if rgb.r < NEAR_BLACK && rgb.g < NEAR_BLACK && rgb.b < NEAR_BLACK {
        return CUBE_BLACK;
    }
    let mut best_match = 0;
    let mut smallest_distance = u32::MAX;
    for (id, candidate) in COLOR_TABLE.iter().enumerate() {
        let d = candidate.distance_sq(rgb);
        if d < smallest_distance {
            smallest_distance = d;
            best_match = id;
        }
    }
    best_match as u8
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(0, Rgb::new(0, 0, 0))]
    #[test_case(4, Rgb::new(0, 0, 238))]
    #[test_case(16, Rgb::new(0, 0, 0))]
    #[test_case(42, Rgb::new(0, 215, 135))]
    #[test_case(99, Rgb::new(135, 95, 255))]
    #[test_case(231, Rgb::new(255, 255, 255))]
    #[test_case(232, Rgb::new(8, 8, 8))]
    #[test_case(255, Rgb::new(238, 238, 238))]
    fn test_xterm_to_rgb(id: u8, expected: Rgb) {
        assert_eq!(xterm_to_rgb(id), expected);
    }

    #[test]
    fn test_try_xterm_to_rgb_out_of_range() {
        assert!(matches!(try_xterm_to_rgb(256), Err(Error::PaletteIndexOutOfRange(256))));
        assert_eq!(try_xterm_to_rgb(255).ok(), Some(Rgb::new(238, 238, 238)));
    }

    #[test_case(Rgb::new(123, 70, 255), 99)]
    #[test_case(Rgb::new(123, 70, 225), 98)]
    #[test_case(Rgb::new(255, 0, 0), 9; "exact basic color beats the cube")]
    #[test_case(Rgb::new(255, 153, 0), 208)]
    #[test_case(Rgb::new(0, 153, 0), 28)]
    #[test_case(Rgb::new(204, 0, 153), 162)]
    #[test_case(Rgb::new(250, 184, 42), 214)]
    #[test_case(Rgb::new(82, 82, 82), 239)]
    #[test_case(Rgb::new(4, 4, 4), 16; "near black short circuit")]
    #[test_case(Rgb::new(0, 0, 0), 16)]
    fn test_rgb_to_xterm(rgb: Rgb, expected: u8) {
        assert_eq!(rgb_to_xterm(rgb), expected);
    }

    #[test]
    fn test_quantization_is_nearest_neighbour() {
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(15) {
                for b in (0..=255u8).step_by(51) {
                    let rgb = Rgb::new(r, g, b);
                    let chosen = xterm_to_rgb(rgb_to_xterm(rgb)).distance_sq(rgb);
                    let best = COLOR_TABLE.iter().map(|c| c.distance_sq(rgb)).min();
                    assert_eq!(Some(chosen), best, "{rgb:?}");
                }
            }
        }
    }

    #[test]
    fn test_every_palette_color_round_trips_to_an_equal_color() {
        for id in 0..=255u8 {
            let rgb = xterm_to_rgb(id);
            assert_eq!(xterm_to_rgb(rgb_to_xterm(rgb)), rgb);
        }
    }
}
