/*! Translates syntax trees into compiled expressions.

The compiler walks the syntax tree produced by [`rex_parser::Parser`] and
builds the equivalent [`Expr`]. The tree is walked with an explicit stack
of pending steps instead of recursion, so neither long chains of
`Disjunction` and `Term` nodes nor deeply nested groups can exhaust the
call stack.
*/

use rex_parser::ast::{Node, Rule};
use rex_parser::{Error, ErrorKind};

use crate::classes::{any_class, perl_class, unicode_class};
use crate::expr::Expr;
use crate::ranges::RangeSet;


/// A pending step in the walk over the syntax tree.
enum Step<'n> {
    Enter(&'n Node),
    Exit(Exit<'n>),
}

/// Combines the results of a node's children once they are compiled.
#[derive(Clone, Copy)]
enum Exit<'n> {
    Alternate { node: &'n Node, count: usize },
    Concat { node: &'n Node, count: usize },
    Repeat { node: &'n Node, min: u32, max: Option<u32> },
}

/// Compiles syntax trees for a given pattern.
pub(crate) struct Compiler<'src> {
    pattern: &'src str,
}

impl<'src> Compiler<'src> {
    /// Creates a compiler for the syntax tree of `pattern`. The pattern
    /// is only used for reporting errors.
    pub fn new(pattern: &'src str) -> Self {
        Self { pattern }
    }

    /// Compiles the syntax tree rooted at `root`.
    ///
    /// The result is always a [`Expr::Concat`] whose last operand is
    /// [`Expr::Accept`].
    pub fn compile(&self, root: &Node) -> Result<Expr, Error> {
        let mut steps = vec![Step::Enter(root)];
        let mut results: Vec<Expr> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(node) => {
                    if let Some(expr) = self.enter(node, &mut steps)? {
                        results.push(expr);
                    }
                }
                Step::Exit(exit) => {
                    let (node, count) = match exit {
                        Exit::Alternate { node, count }
                        | Exit::Concat { node, count } => (node, count),
                        Exit::Repeat { node, .. } => (node, 1),
                    };
                    let first = results
                        .len()
                        .checked_sub(count)
                        .ok_or_else(|| {
                            self.error(ErrorKind::UnexpectedSymbol, node)
                        })?;
                    let mut operands = results.split_off(first);
                    results.push(match exit {
                        Exit::Alternate { .. } => Expr::alternate(operands),
                        Exit::Concat { .. } => Expr::concat(operands),
                        Exit::Repeat { min, max, .. } => Expr::Repeat {
                            min,
                            max,
                            sub: Box::new(operands.pop().ok_or_else(|| {
                                self.error(ErrorKind::UnexpectedSymbol, node)
                            })?),
                        },
                    });
                }
            }
        }

        match (results.pop(), results.is_empty()) {
            (Some(expr), true) => Ok(expr.terminate()),
            _ => Err(self.error(ErrorKind::UnexpectedSymbol, root)),
        }
    }

    /// Visits `node` for the first time.
    ///
    /// Nodes that are compiled into a single expression without looking
    /// at other nodes return that expression. The rest schedule their
    /// children in `steps`, followed by the step that combines the
    /// results, and return `None`.
    fn enter<'n>(
        &self,
        node: &'n Node,
        steps: &mut Vec<Step<'n>>,
    ) -> Result<Option<Expr>, Error> {
        let expr = match node.as_rule() {
            Some(Rule::Disjunction) => {
                let branches = self.chain(node, Rule::Disjunction)?;
                steps.push(Step::Exit(Exit::Alternate {
                    node,
                    count: branches.len(),
                }));
                steps.extend(branches.into_iter().rev().map(Step::Enter));
                return Ok(None);
            }
            Some(Rule::Term) => {
                let operands = self.chain(node, Rule::Term)?;
                steps.push(Step::Exit(Exit::Concat {
                    node,
                    count: operands.len(),
                }));
                steps.extend(operands.into_iter().rev().map(Step::Enter));
                return Ok(None);
            }
            Some(Rule::Factor) => match node.children() {
                [operand] => {
                    steps.push(Step::Enter(operand));
                    return Ok(None);
                }
                [atom, quantifier]
                    if quantifier.as_rule() == Some(Rule::Quantifier) =>
                {
                    let (min, max) = self.repeat_bounds(quantifier)?;
                    steps.push(Step::Exit(Exit::Repeat { node, min, max }));
                    steps.push(Step::Enter(atom));
                    return Ok(None);
                }
                _ => return Err(self.error(ErrorKind::UnexpectedSymbol, node)),
            },
            Some(Rule::Atom) => match node.children() {
                [child] if child.as_text() == Some(".") => {
                    Expr::class(any_class().clone())
                }
                [child] if !child.is_leaf() => {
                    steps.push(Step::Enter(child));
                    return Ok(None);
                }
                _ => return Err(self.error(ErrorKind::UnexpectedSymbol, node)),
            },
            Some(Rule::Assertion) => self.assertion(node)?,
            Some(Rule::Literal | Rule::Control | Rule::HexSeq) => {
                Expr::literal(self.code_point(node)?)
            }
            Some(Rule::Perl | Rule::UniSeq) => {
                Expr::class(self.shorthand_class(node)?)
            }
            Some(Rule::Class) => self.class(node)?,
            _ => return Err(self.error(ErrorKind::UnexpectedSymbol, node)),
        };
        Ok(Some(expr))
    }

    /// Collects the operands of a right-leaning chain of `rule` nodes.
    ///
    /// Each node in the chain has the operand as its first child and,
    /// optionally, the rest of the chain as its second child.
    fn chain<'n>(
        &self,
        mut node: &'n Node,
        rule: Rule,
    ) -> Result<Vec<&'n Node>, Error> {
        let mut operands = Vec::new();
        loop {
            match node.children() {
                [operand] => {
                    operands.push(operand);
                    return Ok(operands);
                }
                [operand, tail] if tail.as_rule() == Some(rule) => {
                    operands.push(operand);
                    node = tail;
                }
                _ => return Err(self.error(ErrorKind::UnexpectedSymbol, node)),
            }
        }
    }

    /// Returns the bounds in a quantifier node. An upper bound of `-1` is
    /// returned as `None`.
    fn repeat_bounds(&self, node: &Node) -> Result<(u32, Option<u32>), Error> {
        let invalid = || self.error(ErrorKind::InvalidRepeatSize, node);

        let (lower, upper) = match node.children() {
            [lower, upper] => (lower.as_text(), upper.as_text()),
            _ => return Err(invalid()),
        };

        let min = lower
            .and_then(|lower| lower.parse::<u32>().ok())
            .ok_or_else(invalid)?;

        let max = match upper {
            Some("-1") => None,
            Some(upper) => {
                Some(upper.parse::<u32>().map_err(|_| invalid())?)
            }
            None => return Err(invalid()),
        };

        if matches!(max, Some(max) if max < min) {
            return Err(invalid());
        }

        Ok((min, max))
    }

    fn assertion(&self, node: &Node) -> Result<Expr, Error> {
        match node.leaf_text() {
            Some("^") => Ok(Expr::LineStart),
            Some("$") => Ok(Expr::LineEnd),
            Some("b") => Ok(Expr::WordBoundary),
            Some("B") => Ok(Expr::NotWordBoundary),
            _ => Err(self.error(ErrorKind::InvalidAssertion, node)),
        }
    }

    /// Returns the code point denoted by a `Literal`, `Control` or
    /// `HexSeq` node.
    fn code_point(&self, node: &Node) -> Result<char, Error> {
        let text = node.leaf_text();
        match node.as_rule() {
            Some(Rule::Literal) => {
                let mut chars = text.unwrap_or_default().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(self.error(ErrorKind::UnexpectedSymbol, node)),
                }
            }
            Some(Rule::Control) => match text {
                Some("t") => Ok('\t'),
                Some("n") => Ok('\n'),
                Some("v") => Ok('\x0b'),
                Some("f") => Ok('\x0c'),
                Some("r") => Ok('\r'),
                _ => Err(self.error(ErrorKind::InvalidEscapeSequence, node)),
            },
            Some(Rule::HexSeq) => text
                .and_then(|digits| u32::from_str_radix(digits, 16).ok())
                .and_then(char::from_u32)
                .ok_or_else(|| {
                    self.error(ErrorKind::InvalidEscapeSequence, node)
                }),
            _ => Err(self.error(ErrorKind::UnexpectedSymbol, node)),
        }
    }

    /// Returns the class denoted by a `Perl` or `UniSeq` node.
    fn shorthand_class(&self, node: &Node) -> Result<RangeSet, Error> {
        let text = node.leaf_text().unwrap_or_default();
        let class = match node.as_rule() {
            Some(Rule::Perl) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(name), None) => perl_class(name).cloned(),
                    _ => None,
                }
            }
            Some(Rule::UniSeq) => unicode_class(text),
            _ => None,
        };
        class.ok_or_else(|| self.error(ErrorKind::InvalidCharacterClass, node))
    }

    fn class(&self, node: &Node) -> Result<Expr, Error> {
        let (negated, members) = match node.children() {
            [first, rest @ ..] if first.as_text() == Some("^") => (true, rest),
            members => (false, members),
        };

        if members.is_empty() {
            return Err(self.error(ErrorKind::InvalidCharacterClass, node));
        }

        let mut set = RangeSet::new();

        for member in members {
            match member.as_rule() {
                Some(Rule::Literal | Rule::Control | Rule::HexSeq) => {
                    set.append_literal(self.code_point(member)? as u32);
                }
                Some(Rule::Perl | Rule::UniSeq) => {
                    set.append_class(&self.shorthand_class(member)?);
                }
                Some(Rule::ClassRange) => {
                    let (lo, hi) = match member.children() {
                        [lo, hi] => (lo, hi),
                        _ => {
                            return Err(self
                                .error(ErrorKind::UnexpectedSymbol, member))
                        }
                    };
                    if [lo, hi].iter().any(|endpoint| {
                        matches!(
                            endpoint.as_rule(),
                            Some(Rule::Perl | Rule::UniSeq)
                        )
                    }) {
                        return Err(self.error(
                            ErrorKind::RangeWithShorthandEscape,
                            member,
                        ));
                    }
                    let lo = self.code_point(lo)? as u32;
                    let hi = self.code_point(hi)? as u32;
                    set.append_range(lo, hi).map_err(|_| {
                        self.error(ErrorKind::InvalidClassRange, member)
                    })?;
                }
                _ => {
                    return Err(
                        self.error(ErrorKind::InvalidCharacterClass, member)
                    )
                }
            }
        }

        set.clean();

        if negated {
            set = set.negate();
        }

        Ok(Expr::class(set))
    }

    fn error(&self, kind: ErrorKind, node: &Node) -> Error {
        Error::new(kind, self.pattern, node.span().clone())
    }
}
