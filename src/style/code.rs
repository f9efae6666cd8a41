//! SGR codes tagged with the group they belong to.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};

/// A family of mutually exclusive SGR codes.
///
/// Within one scope only a single code per group is active; a newer code
/// replaces the older one, the way `31` replaces `34` on a real terminal.
/// The declaration order is the order codes are written in an escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    /// `0`, resets everything. It sits in a group of its own.
    Reset,
    /// Bold and dim, both turned off by `22`.
    Bold,
    Italic,
    /// Single and double underline, both turned off by `24`.
    Underline,
    Blink,
    Inverse,
    Strike,
    Foreground,
    Background,
}

impl Group {
    /// The code that turns this group back to the terminal default.
    pub const fn off(self) -> StyleCode {
        let n = match self {
            Group::Reset => 0,
            Group::Bold => 22,
            Group::Italic => 23,
            Group::Underline => 24,
            Group::Blink => 25,
            Group::Inverse => 27,
            Group::Strike => 29,
            Group::Foreground => 39,
            Group::Background => 49,
        };
        StyleCode { group: self, kind: Kind::Sgr(n) }
    }

    pub const fn is_color(self) -> bool {
        matches!(self, Group::Foreground | Group::Background)
    }

    fn of_sgr(n: u8) -> Option<Group> {
        Some(match n {
            0 => Group::Reset,
            1 | 2 | 22 => Group::Bold,
            3 | 23 => Group::Italic,
            4 | 21 | 24 => Group::Underline,
            5 | 25 => Group::Blink,
            7 | 27 => Group::Inverse,
            9 | 29 => Group::Strike,
            30..=37 | 39 | 90..=97 => Group::Foreground,
            40..=47 | 49 | 100..=107 => Group::Background,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Sgr(u8),
    Xterm(u8),
}

/// One SGR attribute: a plain numeric code or a 256-color pair.
///
/// Codes can only be built through the constructors below, so every code
/// has a known group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleCode {
    group: Group,
    kind: Kind,
}

impl StyleCode {
    pub const RESET: StyleCode = Group::Reset.off();
    pub const BOLD: StyleCode = StyleCode::sgr(Group::Bold, 1);
    pub const DIM: StyleCode = StyleCode::sgr(Group::Bold, 2);
    pub const ITALIC: StyleCode = StyleCode::sgr(Group::Italic, 3);
    pub const UNDERLINE: StyleCode = StyleCode::sgr(Group::Underline, 4);
    pub const UNDERLINE2: StyleCode = StyleCode::sgr(Group::Underline, 21);
    pub const BLINK: StyleCode = StyleCode::sgr(Group::Blink, 5);
    pub const FLIP: StyleCode = StyleCode::sgr(Group::Inverse, 7);
    pub const STRIKE: StyleCode = StyleCode::sgr(Group::Strike, 9);

    const fn sgr(group: Group, n: u8) -> StyleCode {
        StyleCode { group, kind: Kind::Sgr(n) }
    }

    /// Builds a code from a raw SGR number.
    ///
    /// Extended color introducers (`38`, `48`) are rejected here, use
    /// [StyleCode::fg256] and [StyleCode::bg256] instead.
    pub fn from_sgr(n: u16) -> Result<StyleCode> {
        u8::try_from(n)
            .ok()
            .and_then(|b| Group::of_sgr(b).map(|group| StyleCode::sgr(group, b)))
            .ok_or(Error::InvalidStyleCode(n))
    }

    /// Basic foreground color `30 + color`.
    pub const fn fg_basic(color: Basic) -> StyleCode {
        StyleCode::sgr(Group::Foreground, 30 + color as u8)
    }

    /// Basic background color `40 + color`.
    pub const fn bg_basic(color: Basic) -> StyleCode {
        StyleCode::sgr(Group::Background, 40 + color as u8)
    }

    /// 256-color foreground, written as `38;5;N`.
    pub const fn fg256(id: u8) -> StyleCode {
        StyleCode { group: Group::Foreground, kind: Kind::Xterm(id) }
    }

    /// 256-color background, written as `48;5;N`.
    pub const fn bg256(id: u8) -> StyleCode {
        StyleCode { group: Group::Background, kind: Kind::Xterm(id) }
    }

    pub const fn group(self) -> Group {
        self.group
    }
}

impl Display for StyleCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.kind, self.group) {
            (Kind::Sgr(n), _) => write!(f, "{n}"),
            (Kind::Xterm(id), Group::Background) => write!(f, "48;5;{id}"),
            (Kind::Xterm(id), _) => write!(f, "38;5;{id}"),
        }
    }
}

/// The eight basic ANSI colors, in SGR order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basic {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

/// A code-set: at most one [StyleCode] per [Group].
///
/// This is both the set of codes a node introduces and the state that
/// is active at some point of a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSet(BTreeMap<Group, StyleCode>);

impl CodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `code`, replacing whatever its group held before.
    pub fn insert(&mut self, code: StyleCode) {
        self.0.insert(code.group(), code);
    }

    pub fn get(&self, group: Group) -> Option<StyleCode> {
        self.0.get(&group).copied()
    }

    pub fn contains(&self, code: StyleCode) -> bool {
        self.get(code.group()) == Some(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = StyleCode> + '_ {
        self.0.values().copied()
    }

    /// Codes of `self` that `active` doesn't already have, compared by
    /// group and value.
    pub fn without(&self, active: &CodeSet) -> CodeSet {
        self.iter().filter(|code| !active.contains(*code)).collect()
    }

    /// `base` with every code of `self` laid on top of it.
    pub fn over(&self, base: &CodeSet) -> CodeSet {
        let mut merged = base.clone();
        merged.extend(self.iter());
        merged
    }
}

impl Extend<StyleCode> for CodeSet {
    fn extend<T: IntoIterator<Item = StyleCode>>(&mut self, iter: T) {
        for code in iter {
            self.insert(code);
        }
    }
}

impl FromIterator<StyleCode> for CodeSet {
    fn from_iter<T: IntoIterator<Item = StyleCode>>(iter: T) -> Self {
        let mut set = CodeSet::new();
        set.extend(iter);
        set
    }
}

impl<const N: usize> From<[StyleCode; N]> for CodeSet {
    fn from(codes: [StyleCode; N]) -> Self {
        codes.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a CodeSet {
    type Item = StyleCode;
    type IntoIter = std::iter::Copied<btree_map::Values<'a, Group, StyleCode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values().copied()
    }
}

/// Codes joined with `;`, ready to go between `ESC[` and `m`.
impl Display for CodeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, code) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{code}")?;
        }
        Ok(())
    }
}
