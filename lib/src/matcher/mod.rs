/*! Executes compiled expressions against text.

The matcher is one-pass: every expression consumes as much as it can and
the decision is never revisited. Repetitions are greedy, and the first
alternative that matches is the one that is taken, even if choosing it
makes the rest of the pattern fail. This means that `a*a` never matches,
as the repetition consumes every `a`.

The matcher never modifies the expression, all the state for a match
attempt lives in [`Matcher`] and in the call stack.
*/

use crate::classes::word_class;
use crate::expr::Expr;


/// Matches compiled expressions against some text.
pub(crate) struct Matcher<'t> {
    text: &'t str,
    case_insensitive: bool,
}

impl<'t> Matcher<'t> {
    pub fn new(text: &'t str, case_insensitive: bool) -> Self {
        Self { text, case_insensitive }
    }

    #[inline]
    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Tries to match `expr` starting exactly at byte offset `start`.
    ///
    /// `expr` must be a compiled expression ending with [`Expr::Accept`].
    /// Returns the offset where the match ends.
    pub fn attempt_match(&self, expr: &Expr, start: usize) -> Option<usize> {
        self.sub_match(expr.operands(), start, false)
    }

    /// Matches the expressions in `operands` one after the other,
    /// starting at `start`.
    ///
    /// Reaching [`Expr::Accept`] ends the match successfully. Reaching
    /// the end of `operands` does so only if `accept_at_end` is true.
    fn sub_match(
        &self,
        operands: &[Expr],
        start: usize,
        accept_at_end: bool,
    ) -> Option<usize> {
        let mut pos = start;

        for operand in operands {
            match operand {
                Expr::Accept => return Some(pos),
                Expr::Literal(set) | Expr::CharClass(set) => {
                    let c = self.char_at(pos)?;
                    if !set.matches(c, self.case_insensitive) {
                        return None;
                    }
                    pos += c.len_utf8();
                }
                Expr::Repeat { min, max, sub } => {
                    pos = self.repeat(*min, *max, sub, pos)?;
                }
                Expr::Concat(operands) => {
                    pos = self.sub_match(operands, pos, true)?;
                }
                Expr::Alternate(branches) => {
                    pos = branches.iter().find_map(|branch| {
                        self.sub_match(branch.operands(), pos, true)
                    })?;
                }
                Expr::LineStart => {
                    if !(pos == 0 || self.char_before(pos) == Some('\n')) {
                        return None;
                    }
                }
                Expr::LineEnd => {
                    if !matches!(self.char_at(pos), None | Some('\n')) {
                        return None;
                    }
                }
                Expr::WordBoundary => {
                    if !self.is_word_boundary(pos) {
                        return None;
                    }
                }
                Expr::NotWordBoundary => {
                    if self.is_word_boundary(pos) {
                        return None;
                    }
                }
            }
        }

        if accept_at_end {
            Some(pos)
        } else {
            None
        }
    }

    /// Matches `sub` greedily as many times as possible, but no more than
    /// `max`, and succeeds if it matched at least `min` times.
    ///
    /// An iteration that matches the empty string ends the loop, and
    /// counts as enough iterations to satisfy `min`. Unbounded repeats
    /// are capped at the number of bytes left in the text from `start`,
    /// so in that case `min` is only satisfied if the text is long enough.
    fn repeat(
        &self,
        min: u32,
        max: Option<u32>,
        sub: &Expr,
        start: usize,
    ) -> Option<usize> {
        let mut count: u32 = 0;
        let mut pos = start;

        while max.map_or(true, |max| count < max) {
            match self.sub_match(sub.operands(), pos, true) {
                Some(end) if end == pos => {
                    let needed = count.saturating_add(1).max(min);
                    count = match max {
                        Some(max) => needed.min(max),
                        None => needed.min(self.remaining(start)),
                    };
                    break;
                }
                Some(end) => {
                    count = count.saturating_add(1);
                    pos = end;
                }
                None => break,
            }
        }

        if count >= min {
            Some(pos)
        } else {
            None
        }
    }

    /// Number of bytes from `start` to the end of the text, saturated to
    /// `u32::MAX`.
    #[inline]
    fn remaining(&self, start: usize) -> u32 {
        u32::try_from(self.text.len().saturating_sub(start))
            .unwrap_or(u32::MAX)
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..)?.chars().next()
    }

    #[inline]
    fn char_before(&self, pos: usize) -> Option<char> {
        self.text.get(..pos)?.chars().next_back()
    }

    fn is_word_boundary(&self, pos: usize) -> bool {
        let is_word =
            |c: Option<char>| c.is_some_and(|c| word_class().contains(c as u32));
        is_word(self.char_before(pos)) != is_word(self.char_at(pos))
    }
}
