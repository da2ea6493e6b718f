use pretty_assertions::assert_eq;

use crate::ast::dfs::{DFSEvent, DFSIter};
use crate::ast::Rule;
use crate::{ErrorKind, Parser, Span};

macro_rules! assert_tree {
    ($pattern:expr, $expected:expr) => {{
        let root = Parser::new().parse($pattern).unwrap();
        assert_eq!(root.to_string(), $expected, "pattern: `{}`", $pattern);
    }};
}

macro_rules! assert_error {
    ($pattern:expr, $kind:expr) => {{
        let err = Parser::new().parse($pattern).unwrap_err();
        assert_eq!(err.kind(), $kind, "pattern: `{}`", $pattern);
        assert_eq!(err.pattern(), $pattern);
    }};
    ($pattern:expr, $kind:expr, $span:expr) => {{
        let err = Parser::new().parse($pattern).unwrap_err();
        assert_eq!(err.kind(), $kind, "pattern: `{}`", $pattern);
        assert_eq!(err.span(), &$span, "pattern: `{}`", $pattern);
    }};
}

#[test]
fn literals() {
    assert_tree!("a", r#"(Disjunction (Term (Factor (Atom (Literal "a")))))"#);
    assert_tree!(
        "ñ∑",
        r#"(Disjunction (Term (Factor (Atom (Literal "ñ"))) (Term (Factor (Atom (Literal "∑"))))))"#
    );
    assert_tree!(".", r#"(Disjunction (Term (Factor (Atom "."))))"#);
    assert_tree!(
        r"\.\*\\",
        r#"(Disjunction (Term (Factor (Atom (Literal "."))) (Term (Factor (Atom (Literal "*"))) (Term (Factor (Atom (Literal "\\")))))))"#
    );
}

#[test]
fn disjunctions() {
    assert_tree!(
        "ab|c",
        r#"(Disjunction (Term (Factor (Atom (Literal "a"))) (Term (Factor (Atom (Literal "b"))))) (Disjunction (Term (Factor (Atom (Literal "c"))))))"#
    );
    assert_tree!(
        "(a|b)",
        r#"(Disjunction (Term (Factor (Atom (Disjunction (Term (Factor (Atom (Literal "a")))) (Disjunction (Term (Factor (Atom (Literal "b"))))))))))"#
    );
}

#[test]
fn quantifiers() {
    assert_tree!(
        "a*",
        r#"(Disjunction (Term (Factor (Atom (Literal "a")) (Quantifier "0" "-1"))))"#
    );
    assert_tree!(
        "a+",
        r#"(Disjunction (Term (Factor (Atom (Literal "a")) (Quantifier "1" "-1"))))"#
    );
    assert_tree!(
        "a?",
        r#"(Disjunction (Term (Factor (Atom (Literal "a")) (Quantifier "0" "1"))))"#
    );
    assert_tree!(
        "a{3}",
        r#"(Disjunction (Term (Factor (Atom (Literal "a")) (Quantifier "3" "3"))))"#
    );
    assert_tree!(
        "a{2,}",
        r#"(Disjunction (Term (Factor (Atom (Literal "a")) (Quantifier "2" "-1"))))"#
    );
    assert_tree!(
        "a{ 2 , 4 }",
        r#"(Disjunction (Term (Factor (Atom (Literal "a")) (Quantifier "2" "4"))))"#
    );
}

#[test]
fn assertions() {
    assert_tree!(
        r"^\bx\B$",
        r#"(Disjunction (Term (Factor (Assertion "^")) (Term (Factor (Assertion "b")) (Term (Factor (Atom (Literal "x"))) (Term (Factor (Assertion "B")) (Term (Factor (Assertion "$"))))))))"#
    );
}

#[test]
fn escapes() {
    assert_tree!(r"\t", r#"(Disjunction (Term (Factor (Atom (Control "t")))))"#);
    assert_tree!(r"\W", r#"(Disjunction (Term (Factor (Atom (Perl "W")))))"#);
    assert_tree!(
        r"\x{1F600}",
        r#"(Disjunction (Term (Factor (Atom (HexSeq "1F600")))))"#
    );
    assert_tree!(r"\p{L}", r#"(Disjunction (Term (Factor (Atom (UniSeq "L")))))"#);
    assert_tree!(
        r"\P{Lu}",
        r#"(Disjunction (Term (Factor (Atom (UniSeq "^Lu")))))"#
    );
}

#[test]
fn classes() {
    assert_tree!(
        "[abc]",
        r#"(Disjunction (Term (Factor (Atom (Class (Literal "a") (Literal "b") (Literal "c"))))))"#
    );
    assert_tree!(
        r"[^a-z\d]",
        r#"(Disjunction (Term (Factor (Atom (Class "^" (ClassRange (Literal "a") (Literal "z")) (Perl "d"))))))"#
    );
    assert_tree!(
        r"[\x{41}-\x{5A}\-]",
        r#"(Disjunction (Term (Factor (Atom (Class (ClassRange (HexSeq "41") (HexSeq "5A")) (Literal "-"))))))"#
    );
    // `^` is only special as the first element of the class.
    assert_tree!(
        "[a^]",
        r#"(Disjunction (Term (Factor (Atom (Class (Literal "a") (Literal "^"))))))"#
    );
}

#[test]
fn spans() {
    let root = Parser::new().parse("ab|cd").unwrap();
    assert_eq!(root.span(), &Span(0..5));
    assert_eq!(root.as_rule(), Some(Rule::Disjunction));

    let term = &root.children()[0];
    assert_eq!(term.as_rule(), Some(Rule::Term));
    assert_eq!(term.span(), &Span(0..2));

    let tail = &root.children()[1];
    assert_eq!(tail.span(), &Span(3..5));

    let root = Parser::new().parse(r"\x{263A}").unwrap();
    let atom = &root.children()[0].children()[0].children()[0];
    assert_eq!(atom.span(), &Span(0..8));
    assert_eq!(atom.children()[0].leaf_text(), Some("263A"));
}

#[test]
fn errors() {
    assert_error!("", ErrorKind::EmptyPattern);
    assert_error!("a{3,1}", ErrorKind::InvalidRepeatSize, Span(1..6));
    assert_error!("a{x}", ErrorKind::InvalidRepeatSize, Span(2..3));
    assert_error!("a{,3}", ErrorKind::InvalidRepeatSize);
    assert_error!("a{99999999999}", ErrorKind::InvalidRepeatSize);
    assert_error!("a{2", ErrorKind::UnexpectedSymbol);
    assert_error!(r"[\d-z]", ErrorKind::RangeWithShorthandEscape, Span(1..5));
    assert_error!(r"[a-\p{L}]", ErrorKind::RangeWithShorthandEscape);
    assert_error!("a)", ErrorKind::UnexpectedSymbol, Span(1..2));
    assert_error!("a]", ErrorKind::UnexpectedSymbol);
    assert_error!("(a", ErrorKind::UnexpectedSymbol, Span(2..2));
    assert_error!("()", ErrorKind::UnexpectedSymbol);
    assert_error!("a|", ErrorKind::UnexpectedSymbol);
    assert_error!("|a", ErrorKind::UnexpectedSymbol);
    assert_error!("*a", ErrorKind::InvalidRepeatOperator, Span(0..1));
    assert_error!("a**", ErrorKind::InvalidRepeatOperator, Span(2..3));
    assert_error!("a{2}{3}", ErrorKind::InvalidRepeatOperator);
    assert_error!("^*", ErrorKind::InvalidRepeatOperator);
    assert_error!("[]", ErrorKind::InvalidCharacterClass);
    assert_error!("[^]", ErrorKind::InvalidCharacterClass);
    assert_error!("[abc", ErrorKind::InvalidCharacterClass, Span(0..4));
    assert_error!("[a-]", ErrorKind::InvalidCharacterClass);
    assert_error!("[-a]", ErrorKind::InvalidCharacterClass);
    assert_error!(r"\p{}", ErrorKind::InvalidCharacterClass);
    assert_error!(r"\p{Greek}", ErrorKind::InvalidCharacterClass);
    assert_error!(r"\q", ErrorKind::InvalidEscapeSequence, Span(0..2));
    assert_error!(r"a\", ErrorKind::InvalidEscapeSequence, Span(1..2));
    assert_error!(r"\x{}", ErrorKind::InvalidEscapeSequence);
    assert_error!(r"\x41", ErrorKind::InvalidEscapeSequence);
    assert_error!(r"\x{110000}", ErrorKind::InvalidEscapeSequence);
    assert_error!(r"\x{D800}", ErrorKind::InvalidEscapeSequence);
    assert_error!(r"[\b]", ErrorKind::InvalidEscapeSequence);
}

#[test]
fn error_messages() {
    let err = Parser::new().parse("").unwrap_err();
    assert_eq!(err.to_string(), "error parsing regexp: regex pattern is empty: ``");

    let err = Parser::new().parse("a{3,1}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "error parsing regexp: invalid repeat count: `a{3,1}`"
    );
}

#[test]
fn nesting() {
    assert!(Parser::new().max_nesting(2).parse("((a))").is_ok());
    assert_error!(
        &format!("{}a{}", "(".repeat(1000), ")".repeat(1000)),
        ErrorKind::NestingTooDeep
    );

    let err = Parser::new().max_nesting(1).parse("((a))").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    assert_eq!(err.span(), &Span(1..2));
}

#[test]
fn long_patterns() {
    // Neither parsing nor dropping these trees should overflow the stack.
    let pattern = "a".repeat(200_000);
    let root = Parser::new().parse(&pattern).unwrap();
    assert_eq!(root.span(), &Span(0..200_000));
    drop(root);

    let pattern = format!("{}b", "a|".repeat(100_000));
    let root = Parser::new().parse(&pattern).unwrap();
    assert_eq!(root.children().len(), 2);
}

#[test]
fn long_patterns_display() {
    let n = 50_000;
    let root = Parser::new().parse(&"a".repeat(n)).unwrap();

    let expected = format!(
        r#"(Disjunction {}(Term (Factor (Atom (Literal "a")))){})"#,
        r#"(Term (Factor (Atom (Literal "a"))) "#.repeat(n - 1),
        ")".repeat(n - 1),
    );

    let output = root.to_string();
    assert_eq!(output.len(), expected.len());
    assert!(output == expected);
}

#[test]
fn dfs() {
    let root = Parser::new().parse("a|b*").unwrap();

    let mut depth = 0;
    let mut entered = Vec::new();

    for event in DFSIter::new(&root) {
        match event {
            DFSEvent::Enter(node) => {
                depth += 1;
                if let Some(rule) = node.as_rule() {
                    entered.push(rule);
                }
            }
            DFSEvent::Leave(_) => depth -= 1,
        }
    }

    assert_eq!(depth, 0);
    assert_eq!(
        entered,
        vec![
            Rule::Disjunction,
            Rule::Term,
            Rule::Factor,
            Rule::Atom,
            Rule::Literal,
            Rule::Disjunction,
            Rule::Term,
            Rule::Factor,
            Rule::Atom,
            Rule::Literal,
            Rule::Quantifier,
        ]
    );

    // Pruning at each factor skips atoms and quantifiers, but factors are
    // still left.
    let mut iter = DFSIter::new(&root);
    let mut entered = Vec::new();
    let mut left = 0;

    while let Some(event) = iter.next() {
        match event {
            DFSEvent::Enter(node) => {
                entered.extend(node.as_rule());
                if node.as_rule() == Some(Rule::Factor) {
                    iter.prune();
                }
            }
            DFSEvent::Leave(node) => {
                if node.as_rule() == Some(Rule::Factor) {
                    left += 1;
                }
            }
        }
    }

    assert_eq!(
        entered,
        vec![
            Rule::Disjunction,
            Rule::Term,
            Rule::Factor,
            Rule::Disjunction,
            Rule::Term,
            Rule::Factor,
        ]
    );
    assert_eq!(left, 2);
}

#[cfg(feature = "ascii-tree")]
#[test]
fn ascii_tree() {
    let root = Parser::new().parse("a*").unwrap();
    let output = root.ascii_tree_string();
    assert!(output.contains("<Disjunction>"));
    assert!(output.contains("<Quantifier>"));
    assert!(output.contains("\"-1\""));
}

#[cfg(feature = "ascii-tree")]
#[test]
fn ascii_tree_long_chain() {
    use ::ascii_tree::Tree;

    // The tree is built without recursion, one `<Term>` per literal.
    let n = 1_000;
    let root = Parser::new().parse(&"a".repeat(n)).unwrap();

    let mut terms = 0;
    let mut tree = &root.ascii_tree();

    loop {
        match tree {
            Tree::Node(label, children) if label == "<Disjunction>" => {
                tree = &children[0];
            }
            Tree::Node(label, children) if label == "<Term>" => {
                terms += 1;
                match children.as_slice() {
                    [_, next] => tree = next,
                    _ => break,
                }
            }
            _ => panic!("unexpected tree node"),
        }
    }

    assert_eq!(terms, n);

    let output = Parser::new().parse("ab|c").unwrap().ascii_tree_string();
    assert_eq!(output.matches("<Term>").count(), 3);
    assert_eq!(output.matches("<Literal>").count(), 3);
}
