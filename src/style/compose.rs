//! Turns a style tree into the shortest escape sequence that draws it.
//!
//! Rendering runs in three stages, each a lazy iterator over the previous:
//!
//! 1. [assemble] walks the tree and yields code-sets and text in output
//!    order. A node only emits the codes its ancestors haven't set, and on
//!    the way out emits codes that put the ancestors' state back.
//! 2. [optimize] merges runs of adjacent code-sets and adjacent text.
//! 3. [compile] writes each code-set as `ESC[...m`.
//!
//! Closing a scope is where the care goes. Toggles such as bold have a
//! dedicated off code. Colors only have "back to default" (`39`, `49`),
//! so when an enclosing scope had its own color that color is emitted
//! again instead. The outermost scope always closes with `0`.

use std::borrow::Cow;

use super::code::{CodeSet, Group, StyleCode};
use super::node::{Child, StyleNode};

/// One element of the flat rendering of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Codes(CodeSet),
    Text(Cow<'a, str>),
}

struct Frame<'a> {
    node: &'a StyleNode,
    next_child: usize,
    /// What this node emitted on entry. Empty means nothing to undo.
    opened: CodeSet,
    /// State visible to the children.
    active: CodeSet,
}

/// Iterator returned by [assemble].
pub struct Assemble<'a> {
    stack: Vec<Frame<'a>>,
    root: Option<&'a StyleNode>,
    /// State of the scope the root is nested in. `None` means the root is
    /// the outermost scope and closes with `0`.
    outer: Option<CodeSet>,
}

/// Flattens `node` into code-sets and text, without any merging.
///
/// Nodes without children produce nothing at all, not even their codes.
pub fn assemble(node: &StyleNode) -> Assemble<'_> {
    Assemble { stack: Vec::new(), root: Some(node), outer: None }
}

/// Like [assemble], for a node rendered inside a scope where `outer` is
/// already active. Codes `outer` already has aren't emitted again, and the
/// node closes by restoring `outer` rather than with `0`.
pub fn assemble_within<'a>(node: &'a StyleNode, outer: &CodeSet) -> Assemble<'a> {
    Assemble { stack: Vec::new(), root: Some(node), outer: Some(outer.clone()) }
}

impl<'a> Assemble<'a> {
    fn enter(&mut self, node: &'a StyleNode) -> Option<Token<'a>> {
        if node.children().is_empty() {
            return None;
        }
        let parent = self.stack.last().map(|frame| &frame.active).or(self.outer.as_ref());
        let (opened, active) = match parent {
            Some(parent) => (node.codes().without(parent), node.codes().over(parent)),
            None => (node.codes().clone(), node.codes().clone()),
        };
        let token = (!opened.is_empty()).then(|| Token::Codes(opened.clone()));
        self.stack.push(Frame { node, next_child: 0, opened, active });
        token
    }

    /// Codes that undo `frame`, given the state of its parent.
    fn close(frame: &Frame<'_>, parent: Option<&CodeSet>) -> Option<CodeSet> {
        if frame.opened.is_empty() {
            return None;
        }
        let Some(parent) = parent else {
            return Some(CodeSet::from([StyleCode::RESET]));
        };
        let undo = frame
            .opened
            .groups()
            .map(|group| match parent.get(group) {
                Some(code) if group.is_color() => code,
                _ => group.off(),
            })
            .collect();
        Some(undo)
    }
}

impl<'a> Iterator for Assemble<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(root) = self.root.take() {
            if let Some(token) = self.enter(root) {
                return Some(token);
            }
        }
        loop {
            let frame = self.stack.last_mut()?;
            let node: &'a StyleNode = frame.node;
            match node.children().get(frame.next_child) {
                Some(child) => {
                    frame.next_child += 1;
                    match child {
                        Child::Text(text) => return Some(Token::Text(Cow::Borrowed(text))),
                        Child::Node(child) => {
                            if let Some(token) = self.enter(child) {
                                return Some(token);
                            }
                        }
                    }
                }
                None => {
                    let frame = self.stack.pop()?;
                    let parent = self.stack.last().map(|f| &f.active).or(self.outer.as_ref());
                    if let Some(undo) = Self::close(&frame, parent) {
                        return Some(Token::Codes(undo));
                    }
                }
            }
        }
    }
}

/// Iterator returned by [optimize].
pub struct Optimize<I: Iterator> {
    inner: std::iter::Peekable<I>,
}

/// Merges each run of adjacent code-sets into one, and each run of
/// adjacent text into one string.
///
/// Within a merged set later codes replace earlier ones of the same
/// group. A set that contains `0` collapses to just `0`.
pub fn optimize<'a, I>(tokens: I) -> Optimize<I::IntoIter>
where
    I: IntoIterator<Item = Token<'a>>,
{
    Optimize { inner: tokens.into_iter().peekable() }
}

impl<'a, I: Iterator<Item = Token<'a>>> Iterator for Optimize<I> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        match self.inner.next()? {
            Token::Codes(mut codes) => {
                while let Some(Token::Codes(more)) = self.inner.peek() {
                    codes.extend(more.iter());
                    self.inner.next();
                }
                if codes.get(Group::Reset).is_some() {
                    codes = CodeSet::from([StyleCode::RESET]);
                }
                Some(Token::Codes(codes))
            }
            Token::Text(mut text) => {
                while let Some(Token::Text(more)) = self.inner.peek() {
                    text.to_mut().push_str(more);
                    self.inner.next();
                }
                Some(Token::Text(text))
            }
        }
    }
}

/// Writes code-sets as escape sequences, text passes through untouched.
pub fn compile<'a, I>(tokens: I) -> impl Iterator<Item = Cow<'a, str>>
where
    I: IntoIterator<Item = Token<'a>>,
{
    tokens.into_iter().map(|token| match token {
        Token::Codes(codes) => Cow::Owned(format!("\x1b[{codes}m")),
        Token::Text(text) => text,
    })
}

/// Assembles, optimizes and compiles `node` into one string.
pub fn render(node: &StyleNode) -> String {
    compile(optimize(assemble(node))).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::children;
    use crate::style::code::Basic;
    use crate::style::*;

    fn codes<const N: usize>(codes: [StyleCode; N]) -> Token<'static> {
        Token::Codes(CodeSet::from(codes))
    }

    fn text(s: &'static str) -> Token<'static> {
        Token::Text(Cow::Borrowed(s))
    }

    const BLUE: StyleCode = StyleCode::fg_basic(Basic::Blue);
    const GREEN: StyleCode = StyleCode::fg_basic(Basic::Green);

    #[test]
    fn test_empty_node_assembles_to_nothing() {
        assert_eq!(assemble(&bold(children![])).count(), 0);
        assert_eq!(bold(children![]).to_string(), "");
        assert_eq!(blue(children!["a", bold(children![]), "b"]).to_string(), "\x1b[34mab\x1b[0m");
    }

    #[test]
    fn test_assemble_raw_tokens() {
        let node = bold(children![blue(children!["before ", bold(children![green(["hi"])]), " after"])]);
        let tokens: Vec<_> = assemble(&node).collect();
        assert_eq!(
            tokens,
            vec![
                codes([StyleCode::BOLD]),
                codes([BLUE]),
                text("before "),
                codes([GREEN]),
                text("hi"),
                codes([BLUE]),
                text(" after"),
                codes([Group::Foreground.off()]),
                codes([StyleCode::RESET]),
            ]
        );
    }

    #[test]
    fn test_optimize_merges_runs() {
        let tokens = vec![
            codes([StyleCode::BOLD]),
            codes([BLUE]),
            codes([GREEN]),
            text("hi "),
            text("there"),
            codes([StyleCode::UNDERLINE]),
        ];
        let optimized: Vec<_> = optimize(tokens).collect();
        assert_eq!(
            optimized,
            vec![
                codes([StyleCode::BOLD, GREEN]),
                Token::Text(Cow::Owned("hi there".to_string())),
                codes([StyleCode::UNDERLINE]),
            ]
        );
    }

    #[test]
    fn test_optimize_reset_swallows_its_run() {
        let tokens = vec![codes([Group::Bold.off(), BLUE]), codes([StyleCode::RESET])];
        let optimized: Vec<_> = optimize(tokens).collect();
        assert_eq!(optimized, vec![codes([StyleCode::RESET])]);
    }

    #[test]
    fn test_compile() {
        let tokens = vec![codes([StyleCode::BOLD, BLUE]), text("x"), codes([StyleCode::RESET])];
        assert_eq!(compile(tokens).collect::<String>(), "\x1b[1;34mx\x1b[0m");
    }

    #[test]
    fn test_magenta() {
        assert_eq!(magenta(["yo yo yo"]).to_string(), "\x1b[35myo yo yo\x1b[0m");
    }

    #[test]
    fn test_nested() {
        assert_eq!(bold(children![blue(["hi"])]).to_string(), "\x1b[1;34mhi\x1b[0m");
    }

    #[test]
    fn test_same_codes_collapse() {
        let node = blue(children![blue(children![blue(["hi"])])]);
        assert_eq!(node.to_string(), "\x1b[34mhi\x1b[0m");
        assert_eq!(node.to_string(), blue(["hi"]).to_string());
    }

    #[test]
    fn test_parent_state_removal() {
        let node = bold(children![blue(children!["before ", bold(["hi"]), " after"])]);
        assert_eq!(node.to_string(), "\x1b[1;34mbefore hi after\x1b[0m");
    }

    #[test]
    fn test_inner_color_restores_outer_color() {
        let node = bold(children![blue(children!["before ", bold(children![green(["hi"])]), " after"])]);
        assert_eq!(node.to_string(), "\x1b[1;34mbefore \x1b[32mhi\x1b[34m after\x1b[0m");
    }

    #[test]
    fn test_background_without_parent_background_resets() {
        let node =
            bold(children![blue(children!["before ", bold(children![green_bg(["hi"])]), " after"])]);
        assert_eq!(node.to_string(), "\x1b[1;34mbefore \x1b[42mhi\x1b[49m after\x1b[0m");
    }

    #[test]
    fn test_toggles_close_with_off_codes() {
        let node = blue(children![
            bold(["omg"]),
            " yep ",
            red(children!["ha", underline(["h"]), "a"]),
        ]);
        assert_eq!(
            node.to_string(),
            "\x1b[1;34momg\x1b[22m yep \x1b[31mha\x1b[4mh\x1b[24ma\x1b[0m"
        );
    }

    #[test]
    fn test_root_always_closes_with_reset() {
        let node = [StyleCode::BOLD, StyleCode::UNDERLINE, StyleCode::STRIKE]
            .into_iter()
            .collect::<Style>()
            .apply(["x"]);
        assert_eq!(node.to_string(), "\x1b[1;4;9mx\x1b[0m");
    }

    #[test]
    fn test_plain_root_closes_children_with_off_codes() {
        let node = plain(children!["hello ", bold(["world"])]);
        assert_eq!(node.to_string(), "hello \x1b[1mworld\x1b[22m");
    }

    #[test]
    fn test_nested_backgrounds_restore() {
        let node = blue_bg(children!["a", red_bg(["b"]), "c"]);
        assert_eq!(node.to_string(), "\x1b[44ma\x1b[41mb\x1b[44mc\x1b[0m");
    }

    #[test]
    fn test_256_color() {
        assert_eq!(fg((123, 70, 255), ["hello"]).to_string(), "\x1b[38;5;99mhello\x1b[0m");
    }

    #[test]
    fn test_assemble_within_enclosing_state() {
        let outer = CodeSet::from([StyleCode::BOLD, BLUE]);
        let node = bold(children![green(["hi"]), " there"]);
        let tokens: Vec<_> = assemble_within(&node, &outer).collect();
        assert_eq!(tokens, vec![codes([GREEN]), text("hi"), codes([BLUE]), text(" there")]);

        let node = underline(["x"]);
        let tokens: Vec<_> = assemble_within(&node, &outer).collect();
        assert_eq!(
            tokens,
            vec![codes([StyleCode::UNDERLINE]), text("x"), codes([Group::Underline.off()])]
        );
    }

    #[test]
    fn test_assemble_within_nothing_is_not_the_root() {
        let node = red(["x"]);
        let tokens: Vec<_> = assemble_within(&node, &CodeSet::new()).collect();
        let red_code = StyleCode::fg_basic(Basic::Red);
        assert_eq!(tokens, vec![codes([red_code]), text("x"), codes([Group::Foreground.off()])]);
    }

    #[test]
    fn test_custom_style() {
        let lawl = Style::new().with(bold).with(blue).with(|c| bg((123, 70, 225), c));
        assert_eq!(lawl.apply(["hello"]).to_string(), "\x1b[1;34;48;5;98mhello\x1b[0m");
    }

    #[test]
    fn test_style_later_wrapper_wins_its_group() {
        let style = Style::new().with(red).with(underline).with(green);
        assert_eq!(style.apply(["x"]).to_string(), "\x1b[4;32mx\x1b[0m");

        let same: Style =
            [StyleCode::UNDERLINE, StyleCode::fg_basic(Basic::Green)].into_iter().collect();
        assert_eq!(same, style);
    }

    #[test]
    fn test_rainbow_backgrounds() {
        let rainbow = ["#f00", "#f90", "#ff0", "#090", "#00f", "#c09"];
        let pairs = ["XT", "ER", "MI", "NA", "L2", "56"];
        let kids: Vec<Child> = rainbow
            .iter()
            .zip(pairs)
            .map(|(color, pair)| bg_str(color, [pair]).map(Child::from))
            .collect::<crate::Result<_>>()
            .unwrap();
        let node = fg((0, 0, 0), kids);
        assert_eq!(
            node.to_string(),
            "\x1b[38;5;16;48;5;9mXT\x1b[48;5;208mER\x1b[48;5;11mMI\x1b[48;5;28mNA\
             \x1b[48;5;21mL2\x1b[48;5;162m56\x1b[0m"
        );
    }
}
