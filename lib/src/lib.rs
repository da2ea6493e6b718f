/*! A small regular expression engine for Unicode text.

Patterns are compiled into a [`Regex`], which can then be matched against
text. The engine is one-pass: repetitions are greedy and never give back
what they consumed, and the first alternative that matches is final. A
match attempt never revisits a choice, so there is no exponential blowup.
However, [`Regex::find_all`] runs an attempt at every offset that doesn't
fall inside a previous match, so scanning a text can take time quadratic
in its length.

Supported syntax:

| Syntax                    | Meaning                                      |
|---------------------------|----------------------------------------------|
| `a`, `\.`, `\t`           | Literal characters and escapes               |
| `\x{263A}`                | Code point given in hexadecimal              |
| `.`                       | Any character except line feed               |
| `[a-z]`, `[^a-z]`         | Character classes                            |
| `\d \D \s \S \w \W`       | Perl classes (Unicode-aware)                 |
| `\p{Lu}`, `\P{L}`         | Unicode general categories                   |
| `*`, `+`, `?`, `{n,m}`    | Greedy repetitions                           |
| `ab`, `a\|b`, `(ab)`      | Concatenation, alternation and grouping      |
| `^`, `$`                  | Start and end of line                        |
| `\b`, `\B`                | Word boundary and not word boundary          |

Case-insensitive matching is chosen on each query, so the same [`Regex`]
can be used both ways.

# Example

```rust
let re = rex::compile(r"\bfoo\b").unwrap();

let matches: Vec<_> = re
    .find_all("a foo b FOO", None, true)
    .map(|m| m.range())
    .collect();

assert_eq!(matches, vec![2..5, 8..11]);
```
*/

#![deny(missing_docs)]

pub use rex_parser::Error;
pub use rex_parser::ErrorKind;
pub use rex_parser::Span;
pub use rex_parser::DEFAULT_MAX_NESTING;

pub use regex::compile;
pub use regex::Match;
pub use regex::Matches;
pub use regex::Regex;
pub use regex::RegexBuilder;

mod classes;
mod compiler;
mod expr;
mod matcher;
mod ranges;
mod regex;
