//! Lexer/parser snapshot tests, using `expect-test`.

use crate::{parse, Lexer};
use expect_test::expect;

fn lex_kinds(source: &str) -> String {
    Lexer::new(source)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| format!("{:?}", t.token))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn lexes_arithmetic() {
    expect![[r#"
        Int(2)
        StarStar
        Int(10)
        Eof"#]]
    .assert_eq(&lex_kinds("2 ** 10"));
}

#[test]
fn lexes_keywords_and_identifiers() {
    expect![[r#"
        Let
        Ident("x")
        Assign
        Int(10)
        Eof"#]]
    .assert_eq(&lex_kinds("let x = 10"));
}

#[test]
fn lexes_string_escapes() {
    expect![[r#"
        Str("a\nb")
        Eof"#]]
    .assert_eq(&lex_kinds(r#""a\nb""#));
}

#[test]
fn unterminated_string_is_a_lex_error() {
    let err = Lexer::new("\"abc").tokenize().unwrap_err();
    assert!(matches!(err, kira_errors::KiraError::Lex(kira_errors::LexError::UnterminatedString { .. })));
}

#[test]
fn an_out_of_range_integer_literal_is_a_lex_error_not_a_panic() {
    let err = Lexer::new("99999999999999999999").tokenize().unwrap_err();
    assert!(matches!(err, kira_errors::KiraError::Lex(kira_errors::LexError::IntOutOfRange { .. })));
}

#[test]
fn parses_fib() {
    let program = parse("fn fib(n) { if n <= 1 { return n } fib(n-1) + fib(n-2) } fib(10)").unwrap();
    assert_eq!(program.stmts.len(), 2);
}

#[test]
fn power_is_right_associative() {
    // 2 ** 3 ** 2 should parse as 2 ** (3 ** 2), not (2 ** 3) ** 2.
    let program = parse("2 ** 3 ** 2").unwrap();
    let kira_ast::Stmt::ExprStmt(kira_ast::Expr::Infix { op, rhs, .. }) = &program.stmts[0] else {
        panic!("expected an infix expression statement");
    };
    assert_eq!(*op, kira_ast::BinaryOp::Pow);
    assert!(matches!(**rhs, kira_ast::Expr::Infix { op: kira_ast::BinaryOp::Pow, .. }));
}

#[test]
fn assignment_requires_an_lvalue() {
    let err = parse("1 = 2").unwrap_err();
    assert!(matches!(err, kira_errors::KiraError::Parse(kira_errors::ParseError::InvalidAssignmentTarget { .. })));
}

#[test]
fn not_binds_looser_than_equality() {
    // `not a == b` parses as `not (a == b)`.
    let program = parse("not a == b").unwrap();
    let kira_ast::Stmt::ExprStmt(kira_ast::Expr::Prefix { op, rhs, .. }) = &program.stmts[0] else {
        panic!("expected a prefix expression statement");
    };
    assert_eq!(*op, kira_ast::UnaryOp::Not);
    assert!(matches!(**rhs, kira_ast::Expr::Infix { op: kira_ast::BinaryOp::Eq, .. }));
}

#[test]
fn else_if_chains_parse_as_nested_if() {
    let program = parse("if a { 1 } else if b { 2 } else { 3 }").unwrap();
    let kira_ast::Stmt::ExprStmt(kira_ast::Expr::If { else_block, .. }) = &program.stmts[0] else {
        panic!("expected an if expression statement");
    };
    assert!(matches!(else_block.as_deref(), Some(kira_ast::Expr::If { .. })));
}
