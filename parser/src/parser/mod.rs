use crate::ast::{Node, Rule};
use crate::Span;

#[doc(inline)]
pub use crate::parser::errors::*;

mod errors;

#[cfg(test)]
mod tests;

/// Default value for [`Parser::max_nesting`].
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Characters that can't appear unescaped as a literal atom.
const META_CHARS: &[char] = &[
    '^', '$', '\\', '.', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|',
];

/// Characters that produce a literal when preceded by a backslash.
const ESCAPABLE_CHARS: &[char] = &[
    '^', '$', '\\', '.', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|',
    '-', '/',
];

/// Receives a pattern and produces its syntax tree.
///
/// The parser itself only holds settings, the cursor state lives in a
/// per-call structure, so a single [`Parser`] can be used for parsing
/// any number of patterns, even from multiple threads.
#[derive(Clone, Debug)]
pub struct Parser {
    max_nesting: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self { max_nesting: DEFAULT_MAX_NESTING }
    }

    /// Maximum nesting level for groups, like in `((a))`.
    ///
    /// The parser and the matcher recurse once per nesting level, this
    /// limit keeps pathological patterns from exhausting the stack.
    /// Patterns exceeding the limit produce [`ErrorKind::NestingTooDeep`].
    /// The default value is [`DEFAULT_MAX_NESTING`].
    pub fn max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parses `pattern` and returns the root of its syntax tree, which is
    /// always a [`Rule::Disjunction`] node.
    pub fn parse(&self, pattern: &str) -> Result<Node, Error> {
        if pattern.is_empty() {
            return Err(Error::new(
                ErrorKind::EmptyPattern,
                pattern,
                Span(0..0),
            ));
        }

        let mut state = ParserState::new(pattern, self.max_nesting);
        let root = state.disjunction()?;

        // The disjunction stops at `)`, `]` or `}`, anything remaining at
        // this point is unbalanced.
        if state.peek().is_some() {
            return Err(state.error_at_cursor(ErrorKind::UnexpectedSymbol));
        }

        Ok(root)
    }
}

/// Cursor state for a single call to [`Parser::parse`].
struct ParserState<'src> {
    pattern: &'src str,
    pos: usize,
    depth: usize,
    max_nesting: usize,
}

impl<'src> ParserState<'src> {
    fn new(pattern: &'src str, max_nesting: usize) -> Self {
        Self { pattern, pos: 0, depth: 0, max_nesting }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.pattern[self.pos..].chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.pattern[self.pos..].chars().nth(n)
    }

    /// Consumes the next character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes the next character if it is `expected`, fails with
    /// `kind` otherwise.
    fn expect(&mut self, expected: char, kind: ErrorKind) -> Result<(), Error> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            _ => Err(self.error_at_cursor(kind)),
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }

    #[inline]
    fn span_from(&self, start: usize) -> Span {
        Span(start..self.pos)
    }

    fn error(&self, kind: ErrorKind, span: Span) -> Error {
        Error::new(kind, self.pattern, span)
    }

    /// Creates an error pointing to the character under the cursor, or
    /// to the end of the pattern.
    fn error_at_cursor(&self, kind: ErrorKind) -> Error {
        let len = self.peek().map_or(0, char::len_utf8);
        self.error(kind, Span(self.pos..self.pos + len))
    }

    /// ```text
    /// Disjunction := Term ('|' Disjunction)?
    /// ```
    fn disjunction(&mut self) -> Result<Node, Error> {
        let first = self.term()?;
        let mut rest = Vec::new();
        while self.peek() == Some('|') {
            self.bump();
            rest.push(self.term()?);
        }
        Ok(fold_right(Rule::Disjunction, first, rest))
    }

    /// ```text
    /// Term := Factor (Term)?
    /// ```
    fn term(&mut self) -> Result<Node, Error> {
        let first = self.factor()?;
        let mut rest = Vec::new();
        while !matches!(self.peek(), None | Some('|' | ')' | ']' | '}')) {
            rest.push(self.factor()?);
        }
        Ok(fold_right(Rule::Term, first, rest))
    }

    /// ```text
    /// Factor := Assertion | Atom Quantifier?
    /// ```
    fn factor(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        let children = match (self.peek(), self.peek_nth(1)) {
            (Some('^' | '$'), _) => vec![self.assertion()?],
            (Some('\\'), Some('b' | 'B')) => vec![self.assertion()?],
            _ => {
                let atom = self.atom()?;
                if is_quantifier_start(self.peek()) {
                    vec![atom, self.quantifier()?]
                } else {
                    vec![atom]
                }
            }
        };

        // Neither assertions nor quantified atoms can be quantified.
        if is_quantifier_start(self.peek()) {
            return Err(self.error_at_cursor(ErrorKind::InvalidRepeatOperator));
        }

        Ok(Node::rule(Rule::Factor, self.span_from(start), children))
    }

    /// ```text
    /// Assertion := '^' | '$' | '\b' | '\B'
    /// ```
    ///
    /// The leaf holds the assertion character without the backslash.
    fn assertion(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        if self.peek() == Some('\\') {
            self.bump();
        }
        let leaf_start = self.pos;
        match self.bump() {
            Some(c @ ('^' | '$' | 'b' | 'B')) => {
                let leaf = Node::leaf(c, self.span_from(leaf_start));
                Ok(Node::rule(
                    Rule::Assertion,
                    self.span_from(start),
                    vec![leaf],
                ))
            }
            _ => Err(self.error(
                ErrorKind::InvalidAssertion,
                self.span_from(start),
            )),
        }
    }

    /// ```text
    /// Quantifier := '*' | '+' | '?' | '{' Digits (',' Digits?)? '}'
    /// ```
    ///
    /// The resulting node always has two leaves, the lower and the upper
    /// bound. An upper bound of `-1` means there's no limit.
    fn quantifier(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        let (lower, upper) = match self.bump() {
            Some('*') => ("0".to_owned(), "-1".to_owned()),
            Some('+') => ("1".to_owned(), "-1".to_owned()),
            Some('?') => ("0".to_owned(), "1".to_owned()),
            Some('{') => {
                self.skip_spaces();
                let lower = self.decimal_digits()?;
                self.skip_spaces();
                let upper = if self.peek() == Some(',') {
                    self.bump();
                    self.skip_spaces();
                    if self.peek() == Some('}') {
                        "-1".to_owned()
                    } else {
                        self.decimal_digits()?
                    }
                } else {
                    lower.clone()
                };
                self.skip_spaces();
                self.expect('}', ErrorKind::UnexpectedSymbol)?;
                (lower, upper)
            }
            _ => {
                return Err(self.error(
                    ErrorKind::InvalidRepeatOperator,
                    self.span_from(start),
                ))
            }
        };

        let span = self.span_from(start);

        if let (Ok(lower), Ok(upper)) =
            (lower.parse::<u32>(), upper.parse::<i64>())
        {
            if upper != -1 && upper < lower as i64 {
                return Err(self.error(ErrorKind::InvalidRepeatSize, span));
            }
        }

        Ok(Node::rule(
            Rule::Quantifier,
            span.clone(),
            vec![Node::leaf(lower, span.clone()), Node::leaf(upper, span)],
        ))
    }

    /// Reads one or more decimal digits. The value must fit in a `u32`.
    fn decimal_digits(&mut self) -> Result<String, Error> {
        let start = self.pos;
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
        }
        let digits = &self.pattern[start..self.pos];
        if digits.is_empty() {
            return Err(self.error_at_cursor(ErrorKind::InvalidRepeatSize));
        }
        if digits.parse::<u32>().is_err() {
            return Err(self.error(
                ErrorKind::InvalidRepeatSize,
                self.span_from(start),
            ));
        }
        Ok(digits.to_owned())
    }

    /// ```text
    /// Atom := Literal | '.' | '\' AtomEscape | Class | '(' Disjunction ')'
    /// ```
    fn atom(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        let child = match self.peek() {
            Some('.') => {
                self.bump();
                Node::leaf(".", self.span_from(start))
            }
            Some('\\') => {
                self.bump();
                self.atom_escape(start)?
            }
            Some('[') => self.character_class()?,
            Some('(') => {
                if self.depth >= self.max_nesting {
                    return Err(
                        self.error_at_cursor(ErrorKind::NestingTooDeep)
                    );
                }
                self.bump();
                self.depth += 1;
                let disjunction = self.disjunction()?;
                self.depth -= 1;
                self.expect(')', ErrorKind::UnexpectedSymbol)?;
                disjunction
            }
            // A quantifier at this point has nothing to repeat.
            Some('*' | '+' | '?' | '{') => {
                return Err(
                    self.error_at_cursor(ErrorKind::InvalidRepeatOperator)
                );
            }
            _ => self.literal_except(META_CHARS, ErrorKind::UnexpectedSymbol)?,
        };
        Ok(Node::rule(Rule::Atom, self.span_from(start), vec![child]))
    }

    /// Parses whatever follows a backslash. `start` is the position of
    /// the backslash itself.
    ///
    /// ```text
    /// AtomEscape := ControlEscape | PerlClassEscape | '\x{' HexDigits '}'
    ///             | '\p{..}' | '\P{..}' | EscapedMetaCharacter
    /// ```
    fn atom_escape(&mut self, start: usize) -> Result<Node, Error> {
        let leaf_start = self.pos;
        let rule = match self.peek() {
            Some('f' | 'n' | 'r' | 't' | 'v') => Rule::Control,
            Some('d' | 'D' | 's' | 'S' | 'w' | 'W') => Rule::Perl,
            Some('x') => {
                self.bump();
                return self.hex_sequence(start);
            }
            Some('p' | 'P') => return self.unicode_sequence(start),
            Some(c) if ESCAPABLE_CHARS.contains(&c) => Rule::Literal,
            other => {
                let end = self.pos + other.map_or(0, char::len_utf8);
                return Err(
                    self.error(ErrorKind::InvalidEscapeSequence, Span(start..end))
                );
            }
        };
        // The match above guarantees that there's a character to consume.
        let c = self.bump().unwrap_or_default();
        let leaf = Node::leaf(c, self.span_from(leaf_start));
        Ok(Node::rule(rule, self.span_from(start), vec![leaf]))
    }

    /// Parses `{HexDigits}` after `\x`. The digits must encode a Unicode
    /// scalar value.
    fn hex_sequence(&mut self, start: usize) -> Result<Node, Error> {
        self.expect('{', ErrorKind::InvalidEscapeSequence)?;
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
            self.bump();
        }
        let digits = &self.pattern[digits_start..self.pos];
        let digits_span = self.span_from(digits_start);
        self.expect('}', ErrorKind::InvalidEscapeSequence)?;

        if u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .is_none()
        {
            return Err(self.error(
                ErrorKind::InvalidEscapeSequence,
                self.span_from(start),
            ));
        }

        Ok(Node::rule(
            Rule::HexSeq,
            self.span_from(start),
            vec![Node::leaf(digits, digits_span)],
        ))
    }

    /// Parses `p{Name}` or `P{Name}`, where the name is an uppercase letter
    /// optionally followed by a lowercase one, like `L` or `Lu`. The leaf
    /// is prefixed with `^` for `\P`.
    fn unicode_sequence(&mut self, start: usize) -> Result<Node, Error> {
        let mut name = match self.bump() {
            Some('P') => "^".to_owned(),
            _ => String::new(),
        };
        self.expect('{', ErrorKind::InvalidCharacterClass)?;
        let name_start = self.pos;
        if let Some(c @ 'A'..='Z') = self.peek() {
            self.bump();
            name.push(c);
            if let Some(c @ 'a'..='z') = self.peek() {
                self.bump();
                name.push(c);
            }
        }
        let name_span = self.span_from(name_start);
        if name_span.range().is_empty() {
            return Err(self.error_at_cursor(ErrorKind::InvalidCharacterClass));
        }
        self.expect('}', ErrorKind::InvalidCharacterClass)?;
        Ok(Node::rule(
            Rule::UniSeq,
            self.span_from(start),
            vec![Node::leaf(name, name_span)],
        ))
    }

    /// ```text
    /// Class := '[' '^'? ClassRange* ']'
    /// ```
    ///
    /// Single class atoms are added directly as children of the class,
    /// only actual ranges produce a [`Rule::ClassRange`] node.
    fn character_class(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        self.bump();

        let mut children = Vec::new();

        if self.peek() == Some('^') {
            let caret_start = self.pos;
            self.bump();
            children.push(Node::leaf("^", self.span_from(caret_start)));
        }

        let negated = !children.is_empty();

        loop {
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                None => {
                    return Err(self.error(
                        ErrorKind::InvalidCharacterClass,
                        self.span_from(start),
                    ))
                }
                _ => children.push(self.class_range()?),
            }
        }

        let span = self.span_from(start);

        // Empty classes like `[]` and `[^]` are not allowed.
        if children.len() == negated as usize {
            return Err(self.error(ErrorKind::InvalidCharacterClass, span));
        }

        Ok(Node::rule(Rule::Class, span, children))
    }

    /// ```text
    /// ClassRange := ClassAtom ('-' ClassAtom)?
    /// ```
    fn class_range(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        let lo = self.class_atom()?;

        if self.peek() != Some('-') {
            return Ok(lo);
        }

        self.bump();
        let hi = self.class_atom()?;

        if is_shorthand(&lo) || is_shorthand(&hi) {
            return Err(self.error(
                ErrorKind::RangeWithShorthandEscape,
                self.span_from(start),
            ));
        }

        Ok(Node::rule(Rule::ClassRange, self.span_from(start), vec![lo, hi]))
    }

    fn class_atom(&mut self) -> Result<Node, Error> {
        let start = self.pos;
        if self.peek() == Some('\\') {
            self.bump();
            self.atom_escape(start)
        } else {
            self.literal_except(&['\\', ']', '-'], ErrorKind::InvalidCharacterClass)
        }
    }

    /// Consumes a single character as a [`Rule::Literal`] node, unless it
    /// is one of `excluded` or the pattern ended, in which case fails with
    /// `kind`.
    fn literal_except(
        &mut self,
        excluded: &[char],
        kind: ErrorKind,
    ) -> Result<Node, Error> {
        let start = self.pos;
        match self.peek() {
            Some(c) if !excluded.contains(&c) => {
                self.bump();
                let span = self.span_from(start);
                Ok(Node::rule(
                    Rule::Literal,
                    span.clone(),
                    vec![Node::leaf(c, span)],
                ))
            }
            _ => Err(self.error_at_cursor(kind)),
        }
    }
}

#[inline]
fn is_quantifier_start(c: Option<char>) -> bool {
    matches!(c, Some('*' | '+' | '?' | '{'))
}

/// Returns true if the node is a shorthand class like `\d` or `\p{L}`,
/// which can't be used as a class range endpoint.
#[inline]
fn is_shorthand(node: &Node) -> bool {
    matches!(node.as_rule(), Some(Rule::Perl | Rule::UniSeq))
}

/// Builds the right-nested chain `(rule first (rule r1 (rule r2 ...)))`
/// without recursion.
fn fold_right(rule: Rule, first: Node, mut rest: Vec<Node>) -> Node {
    let mut tail = match rest.pop() {
        Some(last) => Node::rule(rule, last.span().clone(), vec![last]),
        None => return Node::rule(rule, first.span().clone(), vec![first]),
    };
    while let Some(node) = rest.pop() {
        let span = node.span().combine(tail.span());
        tail = Node::rule(rule, span, vec![node, tail]);
    }
    let span = first.span().combine(tail.span());
    Node::rule(rule, span, vec![first, tail])
}
