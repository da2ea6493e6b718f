/*! Syntax tree produced by the pattern parser.

The syntax tree is a generic labelled tree that mirrors the grammar
derivation of a pattern. Interior nodes are labelled with the grammar
[`Rule`] that produced them, and leaves hold literal text copied (or, for
quantifiers, synthesized) from the pattern.

For instance, the pattern `a*` produces the following tree:

```text
<Disjunction>
└── <Term>
    └── <Factor>
        ├── <Atom>
        │   └── <Literal>
        │       └── "a"
        └── <Quantifier>
            ├── "0"
            └── "-1"
```
*/

use std::fmt::{Display, Formatter};
use std::mem;

use crate::ast::dfs::{DFSEvent, DFSIter};
use crate::Span;

#[cfg(feature = "ascii-tree")]
mod ascii_tree;
pub mod dfs;

/// Grammar rules that label the interior nodes of a syntax tree.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Rule {
    /// One or more terms separated by `|`.
    Disjunction,
    /// A sequence of factors.
    Term,
    /// An assertion, or an atom with an optional quantifier.
    Factor,
    /// A zero-width assertion: `^`, `$`, `\b` or `\B`.
    Assertion,
    /// Repetition bounds. Always has two leaves: lower and upper bound,
    /// where an upper bound of `-1` means unbounded.
    Quantifier,
    /// A literal, `.`, an escape, a class or a parenthesized disjunction.
    Atom,
    /// A Perl class escape: `\d`, `\D`, `\s`, `\S`, `\w` or `\W`.
    Perl,
    /// A control escape: `\f`, `\n`, `\r`, `\t` or `\v`.
    Control,
    /// A hexadecimal escape `\x{...}`. The leaf holds the hex digits.
    HexSeq,
    /// A Unicode property escape `\p{..}` or `\P{..}`. The leaf holds the
    /// property name, prefixed with `^` for `\P`.
    UniSeq,
    /// A character class `[...]`. If the first child is a `^` leaf the
    /// class is negated.
    Class,
    /// A range `lo-hi` inside a character class.
    ClassRange,
    /// A single literal character.
    Literal,
}

impl Rule {
    /// Returns the name of the rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Disjunction => "Disjunction",
            Rule::Term => "Term",
            Rule::Factor => "Factor",
            Rule::Assertion => "Assertion",
            Rule::Quantifier => "Quantifier",
            Rule::Atom => "Atom",
            Rule::Perl => "Perl",
            Rule::Control => "Control",
            Rule::HexSeq => "HexSeq",
            Rule::UniSeq => "UniSeq",
            Rule::Class => "Class",
            Rule::ClassRange => "ClassRange",
            Rule::Literal => "Literal",
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The label of a [`Node`].
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Label {
    /// Interior node produced by a grammar rule.
    Rule(Rule),
    /// Leaf holding literal text.
    Text(String),
}

/// A node in the syntax tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    label: Label,
    span: Span,
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn rule(rule: Rule, span: Span, children: Vec<Node>) -> Self {
        Self { label: Label::Rule(rule), span, children }
    }

    pub(crate) fn leaf<T: Into<String>>(text: T, span: Span) -> Self {
        Self { label: Label::Text(text.into()), span, children: Vec::new() }
    }

    /// Returns the node's label.
    #[inline]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the grammar rule that produced this node, or `None` if
    /// the node is a text leaf.
    #[inline]
    pub fn as_rule(&self) -> Option<Rule> {
        match self.label {
            Label::Rule(rule) => Some(rule),
            Label::Text(_) => None,
        }
    }

    /// Returns the text held by this node, or `None` if the node is not
    /// a text leaf.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.label {
            Label::Text(text) => Some(text.as_str()),
            Label::Rule(_) => None,
        }
    }

    /// Returns the text of the node's first child, if that child is a
    /// text leaf.
    ///
    /// Nodes like [`Rule::Literal`], [`Rule::Perl`] or [`Rule::Control`]
    /// have a single text leaf as their only child.
    pub fn leaf_text(&self) -> Option<&str> {
        self.children.first().and_then(|child| child.as_text())
    }

    /// Location of the node inside the pattern.
    #[inline]
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Children of this node, in order.
    #[inline]
    pub fn children(&self) -> &[Node] {
        self.children.as_slice()
    }

    /// Returns true if the node doesn't have children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Renders the tree as an S-expression, like `(Term (Factor ...) ...)`.
/// Text leaves are rendered as quoted strings.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for event in DFSIter::new(self) {
            match event {
                DFSEvent::Enter(node) => {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    match &node.label {
                        Label::Text(text) => write!(f, "{:?}", text)?,
                        Label::Rule(rule) => write!(f, "({}", rule)?,
                    }
                }
                DFSEvent::Leave(node) => {
                    if let Label::Rule(_) = node.label {
                        f.write_str(")")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Term and disjunction chains are as deep as the pattern is long, the
/// default recursive drop could overflow the stack with long patterns.
impl Drop for Node {
    fn drop(&mut self) {
        if self.children.iter().all(|child| child.children.is_empty()) {
            return;
        }
        let mut stack = mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
