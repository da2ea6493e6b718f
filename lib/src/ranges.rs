/*! Sets of Unicode code points represented as sorted lists of ranges.

A [`RangeSet`] is a list of inclusive `[lo, hi]` code point ranges. Sets
built incrementally with [`RangeSet::append_range`] may contain unsorted
or overlapping ranges until [`RangeSet::clean`] is called. Once clean, the
ranges are sorted by their lower bound, don't overlap, and no two ranges
are adjacent.
*/

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};
use thiserror::Error;

/// Largest Unicode code point.
pub(crate) const MAX_CODE_POINT: u32 = 0x10FFFF;

const SURROGATE_LO: u32 = 0xD800;
const SURROGATE_HI: u32 = 0xDFFF;

/// An inclusive range of code points.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub(crate) struct CodePointRange {
    pub lo: u32,
    pub hi: u32,
}

impl CodePointRange {
    #[inline]
    fn contains(&self, c: u32) -> bool {
        self.lo <= c && c <= self.hi
    }
}

/// Error returned when the upper end of a range is lower than the lower
/// end.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
#[error("invalid range {lo:#x}-{hi:#x}")]
pub(crate) struct InvalidRange {
    pub lo: u32,
    pub hi: u32,
}

/// A set of code points.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub(crate) struct RangeSet {
    ranges: Vec<CodePointRange>,
}

impl RangeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Creates a set containing a single code point.
    pub fn literal(c: u32) -> Self {
        Self { ranges: vec![CodePointRange { lo: c, hi: c }] }
    }

    /// Returns the ranges in the set.
    #[inline]
    pub fn ranges(&self) -> &[CodePointRange] {
        self.ranges.as_slice()
    }

    /// Appends the range `[lo, hi]` to the set.
    ///
    /// If the new range overlaps or is adjacent to any of the last two
    /// ranges in the set, it is merged with that range instead of being
    /// appended. This keeps the set compact when ranges are added in
    /// ascending order, but doesn't guarantee that the set is clean.
    pub fn append_range(&mut self, lo: u32, hi: u32) -> Result<(), InvalidRange> {
        if hi < lo {
            return Err(InvalidRange { lo, hi });
        }
        self.merge_or_push(lo, hi);
        Ok(())
    }

    /// Appends a single code point to the set.
    pub fn append_literal(&mut self, c: u32) {
        self.merge_or_push(c, c);
    }

    /// Appends all the ranges in `other` to the set.
    pub fn append_class(&mut self, other: &RangeSet) {
        for r in other.ranges() {
            self.merge_or_push(r.lo, r.hi);
        }
    }

    fn merge_or_push(&mut self, lo: u32, hi: u32) {
        let tail = self.ranges.len().saturating_sub(2);
        for r in self.ranges[tail..].iter_mut().rev() {
            if lo <= r.hi.saturating_add(1) && r.lo <= hi.saturating_add(1) {
                r.lo = r.lo.min(lo);
                r.hi = r.hi.max(hi);
                return;
            }
        }
        self.ranges.push(CodePointRange { lo, hi });
    }

    /// Sorts the ranges and merges the ones that overlap or are adjacent.
    pub fn clean(&mut self) {
        if self.ranges.len() < 2 {
            return;
        }

        self.ranges
            .sort_unstable_by(|a, b| a.lo.cmp(&b.lo).then(b.hi.cmp(&a.hi)));

        let mut merged: Vec<CodePointRange> =
            Vec::with_capacity(self.ranges.len());

        for r in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if r.lo <= last.hi.saturating_add(1) => {
                    last.hi = last.hi.max(r.hi);
                }
                _ => merged.push(r),
            }
        }

        self.ranges = merged;
    }

    /// Returns `true` if ranges are sorted, non-overlapping and
    /// non-adjacent.
    pub fn is_clean(&self) -> bool {
        self.ranges.iter().all(|r| r.lo <= r.hi)
            && self
                .ranges
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.hi.saturating_add(1) < b.lo)
    }

    /// Returns the complement of this set within `[0, 0x10FFFF]`.
    ///
    /// The set must be clean.
    pub fn negate(&self) -> RangeSet {
        debug_assert!(self.is_clean());

        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0;

        for r in self.ranges() {
            if r.lo > next {
                ranges.push(CodePointRange { lo: next, hi: r.lo - 1 });
            }
            next = r.hi.saturating_add(1);
        }

        if next <= MAX_CODE_POINT {
            ranges.push(CodePointRange { lo: next, hi: MAX_CODE_POINT });
        }

        RangeSet { ranges }
    }

    /// Returns `true` if the set contains the code point `c`.
    ///
    /// Sets with more than one range must be clean.
    pub fn contains(&self, c: u32) -> bool {
        match self.ranges.as_slice() {
            [] => false,
            [r] if r.lo == r.hi => r.lo == c,
            [r] => r.contains(c),
            ranges if ranges.len() <= 4 => {
                for r in ranges {
                    if c < r.lo {
                        return false;
                    }
                    if c <= r.hi {
                        return true;
                    }
                }
                false
            }
            ranges => ranges
                .binary_search_by(|r| {
                    if r.hi < c {
                        Ordering::Less
                    } else if r.lo > c {
                        Ordering::Greater
                    } else {
                        Ordering::Equal
                    }
                })
                .is_ok(),
        }
    }

    /// Returns a clean set with every code point in this set plus all the
    /// code points that are equivalent to them under Unicode simple case
    /// folding.
    ///
    /// Surrogates are not scalar values and can't appear in the text
    /// being matched, so they are left out of the result.
    pub fn case_fold_simple(&self) -> RangeSet {
        let mut class =
            ClassUnicode::new(self.ranges().iter().flat_map(scalar_ranges));
        class.case_fold_simple();
        RangeSet::from(&class)
    }
}

impl From<&ClassUnicode> for RangeSet {
    fn from(class: &ClassUnicode) -> Self {
        // Ranges in a `ClassUnicode` are canonical, so the set is clean.
        // A range may span the surrogate block if it contains both
        // U+D7FF and U+E000.
        Self {
            ranges: class
                .iter()
                .map(|r| CodePointRange {
                    lo: r.start() as u32,
                    hi: r.end() as u32,
                })
                .collect(),
        }
    }
}

impl Display for RangeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.ranges
                .iter()
                .map(|r| if r.lo == r.hi {
                    format!("{:#x}", r.lo)
                } else {
                    format!("{:#x}-{:#x}", r.lo, r.hi)
                })
                .join(", ")
        )
    }
}

/// Splits a range of code points into the ranges of Unicode scalar values
/// it contains, dropping surrogates and anything above `0x10FFFF`.
fn scalar_ranges(r: &CodePointRange) -> impl Iterator<Item = ClassUnicodeRange> {
    let hi = r.hi.min(MAX_CODE_POINT);
    let below = (r.lo < SURROGATE_LO).then(|| (r.lo, hi.min(SURROGATE_LO - 1)));
    let above = (hi > SURROGATE_HI).then(|| (r.lo.max(SURROGATE_HI + 1), hi));

    below.into_iter().chain(above).filter_map(|(lo, hi)| {
        match (char::from_u32(lo), char::from_u32(hi)) {
            (Some(lo), Some(hi)) if lo <= hi => {
                Some(ClassUnicodeRange::new(lo, hi))
            }
            _ => None,
        }
    })
}
