//! The style tree: nodes carrying codes, wrapped around text.

use std::fmt::{self, Display, Formatter};
use std::ops::Add;

use unicode_width::UnicodeWidthStr;

use super::code::{CodeSet, StyleCode};
use super::compose;

/// A styled value. Holds the codes it introduces and its children.
///
/// Trees are built once with the wrapper functions in [crate::style] and
/// then rendered; nothing mutates them afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleNode {
    codes: CodeSet,
    children: Vec<Child>,
}

/// Either a nested node or a literal piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(StyleNode),
    Text(String),
}

impl StyleNode {
    pub fn new<I, C>(codes: CodeSet, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        Self { codes, children: children.into_iter().map(Into::into).collect() }
    }

    pub fn codes(&self) -> &CodeSet {
        &self.codes
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Number of terminal columns the text takes up, escapes excluded.
    pub fn width(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.width(),
                Child::Text(text) => text.width(),
            })
            .sum()
    }

    /// Like `str::join`: `items` separated by copies of `self`.
    pub fn join<I>(&self, items: I) -> StyleNode
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        let mut children = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                children.push(Child::Node(self.clone()));
            }
            children.push(item.into());
        }
        StyleNode { codes: CodeSet::new(), children }
    }

    /// The rendered escape string; same as `to_string()`.
    pub fn render(&self) -> String {
        compose::render(self)
    }
}

impl Display for StyleNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for piece in compose::compile(compose::optimize(compose::assemble(self))) {
            f.write_str(&piece)?;
        }
        Ok(())
    }
}

impl From<StyleNode> for Child {
    fn from(node: StyleNode) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Child::Text(text.clone())
    }
}

/// Concatenation, the result is a code-less node holding both sides.
impl<T: Into<Child>> Add<T> for StyleNode {
    type Output = StyleNode;

    fn add(self, rhs: T) -> StyleNode {
        StyleNode { codes: CodeSet::new(), children: vec![Child::Node(self), rhs.into()] }
    }
}

/// A reusable combination of codes, e.g. "bold blue on grey".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    codes: CodeSet,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the codes of a wrapper such as [bold](crate::style::bold).
    pub fn with<F>(mut self, wrapper: F) -> Self
    where
        F: FnOnce(Vec<Child>) -> StyleNode,
    {
        self.codes.extend(wrapper(Vec::new()).codes().iter());
        self
    }

    pub fn code(mut self, code: StyleCode) -> Self {
        self.codes.insert(code);
        self
    }

    pub fn codes(&self) -> &CodeSet {
        &self.codes
    }

    pub fn apply<I, C>(&self, children: I) -> StyleNode
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        StyleNode::new(self.codes.clone(), children)
    }
}

impl FromIterator<StyleCode> for Style {
    fn from_iter<T: IntoIterator<Item = StyleCode>>(iter: T) -> Self {
        Self { codes: iter.into_iter().collect() }
    }
}

/// Builds a `Vec<Child>` from a mix of strings and nodes.
///
/// ```
/// use fabterm::{children, style::{blue, bold}};
///
/// let text = blue(children!["before ", bold(["hi"]), " after"]);
/// assert_eq!(text.width(), 15);
/// ```
#[macro_export]
macro_rules! children {
    ($($child:expr),* $(,)?) => {{
        let children: ::std::vec::Vec<$crate::style::Child> =
            ::std::vec![$($crate::style::Child::from($child)),*];
        children
    }};
}
