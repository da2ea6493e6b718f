use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;
use std::ops::Range;
use std::str::FromStr;

#[cfg(feature = "logging")]
use log::*;
#[cfg(feature = "logging")]
use std::time::Instant;

use rex_parser::{Error, Parser, DEFAULT_MAX_NESTING};

use crate::compiler::Compiler;
use crate::expr::Expr;
use crate::matcher::Matcher;

/// Compiles a regular expression with the default settings.
///
/// This is equivalent to [`Regex::new`].
///
/// ```
/// let re = rex::compile(r"\d+").unwrap();
/// assert!(re.is_match("123", false));
/// ```
pub fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern)
}

/// A compiled regular expression.
///
/// A `Regex` is immutable, it can be shared between threads and queried
/// concurrently. Whether the matching is case-insensitive or not is
/// decided on each query.
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: String,
    expr: Expr,
}

impl Regex {
    /// Compiles a regular expression with the default settings.
    ///
    /// Use [`RegexBuilder`] for changing the settings.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        RegexBuilder::new(pattern).build()
    }

    /// Returns the pattern this regular expression was compiled from.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns `true` if the regular expression matches at the start of
    /// `text`.
    ///
    /// The match doesn't need to cover the whole text, `ab` matches
    /// `abc`. Use `$` for requiring the match to reach the end of the
    /// text.
    ///
    /// ```
    /// let re = rex::compile("ab").unwrap();
    /// assert!(re.is_match("abc", false));
    /// assert!(re.is_match("ABC", true));
    /// assert!(!re.is_match("cab", false));
    /// ```
    pub fn is_match(&self, text: &str, case_insensitive: bool) -> bool {
        self.find(text, case_insensitive).is_some()
    }

    /// Returns the match that starts at the beginning of `text`, if any.
    ///
    /// Only offset 0 is tried. Use [`Regex::find_all`] for finding
    /// matches anywhere in the text.
    ///
    /// ```
    /// let re = rex::compile("a+").unwrap();
    /// let m = re.find("aaab", false).unwrap();
    /// assert_eq!(m.range(), 0..3);
    /// assert_eq!(m.as_str(), "aaa");
    /// assert!(re.find("baaa", false).is_none());
    /// ```
    pub fn find<'t>(
        &self,
        text: &'t str,
        case_insensitive: bool,
    ) -> Option<Match<'t>> {
        Matcher::new(text, case_insensitive)
            .attempt_match(&self.expr, 0)
            .map(|end| Match::new(text, 0, end))
    }

    /// Returns an iterator over the matches in `text`.
    ///
    /// A match is attempted at every code point boundary, from left to
    /// right. After a match the search continues where the match ended,
    /// or one code point further if the match was empty. The iterator
    /// produces at most `limit` matches, or at most `text.len() + 1` if
    /// `limit` is `None`.
    ///
    /// ```
    /// let re = rex::compile(r"\d+").unwrap();
    /// let matches: Vec<_> = re
    ///     .find_all("a1 22 333", None, false)
    ///     .map(|m| m.as_str())
    ///     .collect();
    /// assert_eq!(matches, vec!["1", "22", "333"]);
    /// ```
    pub fn find_all<'r, 't>(
        &'r self,
        text: &'t str,
        limit: Option<usize>,
        case_insensitive: bool,
    ) -> Matches<'r, 't> {
        Matches {
            regex: self,
            matcher: Matcher::new(text, case_insensitive),
            pos: 0,
            remaining: limit.unwrap_or(text.len() + 1),
        }
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Regex::new(pattern)
    }
}

/// Builds a [`Regex`] with non-default settings.
///
/// ```
/// let re = rex::RegexBuilder::new("((a))").max_nesting(2).build();
/// assert!(re.is_ok());
///
/// let re = rex::RegexBuilder::new("((a))").max_nesting(1).build();
/// assert!(re.is_err());
/// ```
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    max_nesting: usize,
}

impl RegexBuilder {
    /// Creates a builder for `pattern` with the default settings.
    pub fn new(pattern: &str) -> Self {
        Self { pattern: pattern.to_owned(), max_nesting: DEFAULT_MAX_NESTING }
    }

    /// Maximum nesting level for groups in the pattern. Patterns with
    /// groups nested more deeply fail to compile with
    /// [`crate::ErrorKind::NestingTooDeep`].
    ///
    /// The default is [`DEFAULT_MAX_NESTING`].
    pub fn max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Compiles the pattern.
    pub fn build(&self) -> Result<Regex, Error> {
        #[cfg(feature = "logging")]
        let start = Instant::now();

        let root =
            Parser::new().max_nesting(self.max_nesting).parse(&self.pattern)?;

        let expr = Compiler::new(&self.pattern).compile(&root)?;

        #[cfg(feature = "logging")]
        debug!(
            "Compiled regexp `{}` in {:?}",
            self.pattern,
            Instant::elapsed(&start)
        );

        Ok(Regex { pattern: self.pattern.clone(), expr })
    }
}

/// A match found in some text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Match<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    #[inline]
    fn new(text: &'t str, start: usize, end: usize) -> Self {
        Self { text, start, end }
    }

    /// Byte offset where the match starts.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset where the match ends, exclusive.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Range of bytes covered by the match.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` if the match is the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Length of the match in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// The matched text.
    #[inline]
    pub fn as_str(&self) -> &'t str {
        &self.text[self.range()]
    }
}

/// Iterator over the matches of a [`Regex`] in some text.
///
/// Returned by [`Regex::find_all`].
pub struct Matches<'r, 't> {
    regex: &'r Regex,
    matcher: Matcher<'t>,
    pos: usize,
    remaining: usize,
}

impl<'t> Matches<'_, 't> {
    /// Returns the offset of the code point that follows the one at `pos`,
    /// or an offset past the end of the text if `pos` is at the end.
    fn next_boundary(&self, pos: usize) -> usize {
        let text = self.matcher.text();
        match text.get(pos..).and_then(|tail| tail.chars().next()) {
            Some(c) => pos + c.len_utf8(),
            None => text.len() + 1,
        }
    }
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.matcher.text();

        while self.remaining > 0 && self.pos <= text.len() {
            let start = self.pos;
            match self.matcher.attempt_match(&self.regex.expr, start) {
                Some(end) => {
                    self.remaining -= 1;
                    self.pos = if end > start {
                        end
                    } else {
                        self.next_boundary(start)
                    };

                    #[cfg(feature = "logging")]
                    trace!(
                        "Regexp `{}` matched at {}..{}",
                        self.regex.as_str(),
                        start,
                        end
                    );

                    return Some(Match::new(text, start, end));
                }
                None => self.pos = self.next_boundary(start),
            }
        }

        None
    }
}

impl FusedIterator for Matches<'_, '_> {}
