/*! Parses rex regular expression patterns and produces a syntax tree.

The parser is a hand-written recursive-descent parser for the following
grammar, with one character of lookahead and no backtracking:

```text
Disjunction := Term ('|' Disjunction)?
Term        := Factor (Term)?
Factor      := Assertion | Atom Quantifier?
Assertion   := '^' | '$' | '\b' | '\B'
Quantifier  := '*' | '+' | '?' | '{' Digits (',' Digits?)? '}'
Atom        := Literal | '.' | '\' AtomEscape | Class | '(' Disjunction ')'
AtomEscape  := ControlEscape | PerlClassEscape | '\x{' HexDigits '}'
             | '\p{..}' | '\P{..}' | EscapedMetaCharacter
Class       := '[' '^'? ClassRange* ']'
ClassRange  := ClassAtom ('-' ClassAtom)?
```

The resulting [`ast::Node`] tree mirrors the grammar derivation: every
interior node is labelled with the [`ast::Rule`] that produced it, while
leaves hold the literal text taken from the pattern. The tree is consumed
by the `rex` crate, which compiles it into an executable expression.

# Example

```
use rex_parser::Parser;
use rex_parser::ast::Rule;

let root = Parser::new().parse("ab|c").unwrap();
assert_eq!(root.as_rule(), Some(Rule::Disjunction));
assert_eq!(root.children().len(), 2);
```
 */

#![deny(missing_docs)]

use std::fmt::{Display, Formatter};
use std::ops::Range;

pub use parser::Error;
pub use parser::ErrorKind;
pub use parser::Parser;
pub use parser::DEFAULT_MAX_NESTING;

pub mod ast;

mod parser;

/// Starting and ending positions of some element inside the pattern.
///
/// Positions are byte offsets, the ending one is exclusive.
#[derive(Default, Clone, Debug, Hash, Eq, PartialEq)]
pub struct Span(pub Range<usize>);

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{}]", self.start(), self.end())
    }
}

impl Span {
    /// Offset within the pattern (in bytes) were the span starts.
    #[inline]
    pub fn start(&self) -> usize {
        self.0.start
    }

    /// Offset within the pattern (in bytes) where the span ends.
    #[inline]
    pub fn end(&self) -> usize {
        self.0.end
    }

    /// Returns the span as a range of byte offsets.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.0.clone()
    }

    /// Returns a new [`Span`] that combines this span with `other`.
    ///
    /// The resulting span goes from `self.start()` to `other.end()`.
    pub fn combine(&self, other: &Self) -> Self {
        Self(self.0.start..other.0.end)
    }
}
