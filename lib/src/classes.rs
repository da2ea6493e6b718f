/*! Predefined character classes.

Perl classes (`\d`, `\s`, `\w` and their negations), the class matched by
`.`, and Unicode general categories (`\p{..}`) are all Unicode-aware. Their
tables come from [`regex_syntax`].
*/

use lazy_static::lazy_static;
use regex_syntax::hir::{Class, HirKind, Literal};

use crate::ranges::RangeSet;

struct PerlClasses {
    digit: RangeSet,
    not_digit: RangeSet,
    space: RangeSet,
    not_space: RangeSet,
    word: RangeSet,
    not_word: RangeSet,
    any: RangeSet,
}

impl PerlClasses {
    fn new() -> Self {
        let digit = class_from_pattern(r"\d").unwrap_or_default();
        let space = class_from_pattern(r"\s").unwrap_or_default();
        let word = class_from_pattern(r"\w").unwrap_or_default();
        let any = RangeSet::literal('\n' as u32).negate();

        Self {
            not_digit: digit.negate(),
            not_space: space.negate(),
            not_word: word.negate(),
            digit,
            space,
            word,
            any,
        }
    }
}

lazy_static! {
    static ref PERL_CLASSES: PerlClasses = PerlClasses::new();
}

/// Returns the class for a Perl class escape, identified by the character
/// that follows the backslash.
pub(crate) fn perl_class(name: char) -> Option<&'static RangeSet> {
    let classes = &*PERL_CLASSES;
    match name {
        'd' => Some(&classes.digit),
        'D' => Some(&classes.not_digit),
        's' => Some(&classes.space),
        'S' => Some(&classes.not_space),
        'w' => Some(&classes.word),
        'W' => Some(&classes.not_word),
        _ => None,
    }
}

/// Class of word characters, used by word boundary assertions.
#[inline]
pub(crate) fn word_class() -> &'static RangeSet {
    &PERL_CLASSES.word
}

/// Class matched by `.`: any code point except line feed.
#[inline]
pub(crate) fn any_class() -> &'static RangeSet {
    &PERL_CLASSES.any
}

/// Returns the class for the Unicode general category `name`, like `L` or
/// `Lu`. Returns `None` if the category doesn't exist.
///
/// A name prefixed with `^` returns the negated class.
pub(crate) fn unicode_class(name: &str) -> Option<RangeSet> {
    let (negated, name) = match name.strip_prefix('^') {
        Some(name) => (true, name),
        None => (false, name),
    };

    let mut chars = name.chars();

    // Only general categories are accepted: an uppercase letter optionally
    // followed by a lowercase one. This rejects scripts and other
    // properties that `regex_syntax` knows about.
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase())
        && name.len() <= 2;

    if !valid {
        return None;
    }

    let class = class_from_pattern(&format!(r"\p{{{}}}", name))?;

    if negated {
        Some(class.negate())
    } else {
        Some(class)
    }
}

/// Compiles `pattern` with `regex_syntax` and returns the class it
/// matches, provided that it is a single Unicode class.
fn class_from_pattern(pattern: &str) -> Option<RangeSet> {
    let hir = regex_syntax::parse(pattern).ok()?;
    match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => Some(RangeSet::from(class)),
        // Classes with a single code point are turned into literals.
        HirKind::Literal(Literal(bytes)) => {
            let mut chars = std::str::from_utf8(bytes).ok()?.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(RangeSet::literal(c as u32)),
                _ => None,
            }
        }
        _ => None,
    }
}
