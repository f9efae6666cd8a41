//! Composable ANSI text styles.
//!
//! Every wrapper takes its children (strings and other nodes) and returns
//! a [StyleNode]. Rendering the node with `to_string()` gives the minimal
//! escape sequence for the whole tree:
//!
//! ```
//! use fabterm::children;
//! use fabterm::style::{blue, bold, green};
//!
//! let node = bold(children![blue(children!["before ", green(["hi"]), " after"])]);
//! assert_eq!(node.to_string(), "\x1b[1;34mbefore \x1b[32mhi\x1b[34m after\x1b[0m");
//! ```

pub mod code;
pub mod compose;
pub mod node;

pub use code::{Basic, CodeSet, Group, StyleCode};
pub use node::{Child, Style, StyleNode};

use crate::color::{self, Color};
use crate::error::Result;
use crate::palette::rgb_to_xterm;

fn wrap<I, C, const N: usize>(codes: [StyleCode; N], children: I) -> StyleNode
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    StyleNode::new(CodeSet::from(codes), children)
}

macro_rules! wrappers {
    ($($(#[$meta:meta])* $name:ident => $($code:expr),+;)*) => {
        $(
            $(#[$meta])*
            pub fn $name<I, C>(children: I) -> StyleNode
            where
                I: IntoIterator<Item = C>,
                C: Into<Child>,
            {
                wrap([$($code),+], children)
            }
        )*
    };
}

wrappers! {
    /// Bold or bright text, `1`.
    bold => StyleCode::BOLD;
    /// Faint text, `2`. Shares a group with bold.
    dim => StyleCode::DIM;
    italic => StyleCode::ITALIC;
    underline => StyleCode::UNDERLINE;
    /// Double underline, `21`.
    underline2 => StyleCode::UNDERLINE2;
    blink => StyleCode::BLINK;
    /// Swaps foreground and background, `7`.
    flip => StyleCode::FLIP;
    strike => StyleCode::STRIKE;

    black => StyleCode::fg_basic(Basic::Black);
    red => StyleCode::fg_basic(Basic::Red);
    green => StyleCode::fg_basic(Basic::Green);
    yellow => StyleCode::fg_basic(Basic::Yellow);
    blue => StyleCode::fg_basic(Basic::Blue);
    magenta => StyleCode::fg_basic(Basic::Magenta);
    cyan => StyleCode::fg_basic(Basic::Cyan);
    white => StyleCode::fg_basic(Basic::White);

    black_bg => StyleCode::bg_basic(Basic::Black);
    red_bg => StyleCode::bg_basic(Basic::Red);
    green_bg => StyleCode::bg_basic(Basic::Green);
    yellow_bg => StyleCode::bg_basic(Basic::Yellow);
    blue_bg => StyleCode::bg_basic(Basic::Blue);
    magenta_bg => StyleCode::bg_basic(Basic::Magenta);
    cyan_bg => StyleCode::bg_basic(Basic::Cyan);
    white_bg => StyleCode::bg_basic(Basic::White);

    /// Bold and inverted, the color becomes the background.
    highlight_black => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Black);
    highlight_red => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Red);
    highlight_green => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Green);
    highlight_yellow => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Yellow);
    highlight_blue => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Blue);
    highlight_magenta => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Magenta);
    highlight_cyan => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::Cyan);
    highlight_white => StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg_basic(Basic::White);
}

/// No styling at all. Handy for gluing strings and styled nodes together.
pub fn plain<I, C>(children: I) -> StyleNode
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    StyleNode::new(CodeSet::new(), children)
}

/// Foreground from the 256-color palette. RGB colors use the nearest
/// entry, [Xterm](crate::Xterm) ids are used as given.
pub fn fg<I, C>(color: impl Into<Color>, children: I) -> StyleNode
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    wrap([StyleCode::fg256(color.into().xterm())], children)
}

/// Background from the 256-color palette, picked like [fg] does.
pub fn bg<I, C>(color: impl Into<Color>, children: I) -> StyleNode
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    wrap([StyleCode::bg256(color.into().xterm())], children)
}

/// [fg] with the color written as in CSS, e.g. `"#0099ff"` or `"navy"`.
pub fn fg_str<I, C>(color: &str, children: I) -> Result<StyleNode>
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    Ok(fg(color::parse_color(color)?, children))
}

/// [bg] with the color written as in CSS.
pub fn bg_str<I, C>(color: &str, children: I) -> Result<StyleNode>
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    Ok(bg(color::parse_color(color)?, children))
}

/// Bold, inverted text in a 256-color foreground.
pub fn highlight<I, C>(color: impl Into<Color>, children: I) -> StyleNode
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    let id = color.into().xterm();
    wrap([StyleCode::BOLD, StyleCode::FLIP, StyleCode::fg256(id)], children)
}

/// Bold text on `color`, written in the complementary color.
pub fn complement<I, C>(color: impl Into<Color>, children: I) -> StyleNode
where
    I: IntoIterator<Item = C>,
    C: Into<Child>,
{
    let color = color.into();
    let fg_id = rgb_to_xterm(color::complement(color.rgb()));
    let bg_id = color.xterm();
    wrap([StyleCode::BOLD, StyleCode::fg256(fg_id), StyleCode::bg256(bg_id)], children)
}
