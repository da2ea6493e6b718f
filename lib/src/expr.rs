/*! Compiled regular expressions.

The compiler turns the syntax tree produced by the parser into a tree of
[`Expr`], which is what the matcher executes. The tree is immutable once
built, so a single compiled expression can be shared by any number of
threads.
*/

use std::fmt::{Display, Formatter};
use std::slice;

use itertools::Itertools;

use crate::ranges::RangeSet;

/// A set of code points matched by a literal or a character class.
///
/// Besides the set itself, it keeps the closure of the set under simple
/// case folding, which is used for case-insensitive matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CharSet {
    exact: RangeSet,
    folded: RangeSet,
}

impl CharSet {
    pub fn new(exact: RangeSet) -> Self {
        let folded = exact.case_fold_simple();
        Self { exact, folded }
    }

    /// Returns `true` if `c` belongs to the set.
    #[inline]
    pub fn matches(&self, c: char, case_insensitive: bool) -> bool {
        if case_insensitive {
            self.folded.contains(c as u32)
        } else {
            self.exact.contains(c as u32)
        }
    }

    #[inline]
    pub fn ranges(&self) -> &RangeSet {
        &self.exact
    }
}

/// A node in a compiled regular expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Expr {
    /// A single code point.
    Literal(CharSet),
    /// Any code point in a set.
    CharClass(CharSet),
    /// Between `min` and `max` repetitions of `sub`. `max` is `None` for
    /// unbounded repetitions.
    Repeat { min: u32, max: Option<u32>, sub: Box<Expr> },
    /// A sequence of expressions. Never contains another `Concat`.
    Concat(Vec<Expr>),
    /// A list of alternatives, tried in order. Never contains another
    /// `Alternate`.
    Alternate(Vec<Expr>),
    /// Start of text, or position right after a line feed.
    LineStart,
    /// End of text, or position right before a line feed.
    LineEnd,
    WordBoundary,
    NotWordBoundary,
    /// Successful end of a match.
    Accept,
}

impl Expr {
    pub fn literal(c: char) -> Self {
        Expr::Literal(CharSet::new(RangeSet::literal(c as u32)))
    }

    /// Creates a character class. The set must be clean.
    pub fn class(set: RangeSet) -> Self {
        debug_assert!(set.is_clean());
        Expr::CharClass(CharSet::new(set))
    }

    /// Concatenates `operands` in order, flattening any operand that is
    /// itself a concatenation.
    pub fn concat(operands: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(operands.len());
        for operand in operands {
            match operand {
                Expr::Concat(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.pop().unwrap_or(Expr::Concat(Vec::new()))
        } else {
            Expr::Concat(flat)
        }
    }

    /// Creates an alternation from `branches`, flattening any branch that
    /// is itself an alternation.
    pub fn alternate(branches: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(branches.len());
        for branch in branches {
            match branch {
                Expr::Alternate(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.pop().unwrap_or(Expr::Alternate(Vec::new()))
        } else {
            Expr::Alternate(flat)
        }
    }

    /// Wraps the expression into a top-level [`Expr::Concat`] that ends
    /// with [`Expr::Accept`].
    pub fn terminate(self) -> Self {
        let mut operands = match self {
            Expr::Concat(operands) => operands,
            other => vec![other],
        };
        operands.push(Expr::Accept);
        Expr::Concat(operands)
    }

    /// Returns the sequence of expressions that must match one after the
    /// other for this expression to match. For [`Expr::Concat`] these are
    /// its operands, any other expression is a sequence of one.
    #[inline]
    pub fn operands(&self) -> &[Expr] {
        match self {
            Expr::Concat(operands) => operands.as_slice(),
            other => slice::from_ref(other),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(set) => match set.ranges().ranges() {
                [r] if r.lo == r.hi => match char::from_u32(r.lo) {
                    Some(c) => write!(f, "Literal({:?})", c),
                    None => write!(f, "Literal({:#x})", r.lo),
                },
                _ => write!(f, "Literal{}", set.ranges()),
            },
            Expr::CharClass(set) => write!(f, "Class{}", set.ranges()),
            Expr::Repeat { min, max: Some(max), sub } => {
                write!(f, "Repeat({}, {}, {})", min, max, sub)
            }
            Expr::Repeat { min, max: None, sub } => {
                write!(f, "Repeat({}, -1, {})", min, sub)
            }
            Expr::Concat(operands) => {
                write!(f, "Concat({})", operands.iter().join(", "))
            }
            Expr::Alternate(branches) => {
                write!(f, "Alternate({})", branches.iter().join(", "))
            }
            Expr::LineStart => write!(f, "LineStart"),
            Expr::LineEnd => write!(f, "LineEnd"),
            Expr::WordBoundary => write!(f, "WordBoundary"),
            Expr::NotWordBoundary => write!(f, "NotWordBoundary"),
            Expr::Accept => write!(f, "Accept"),
        }
    }
}
