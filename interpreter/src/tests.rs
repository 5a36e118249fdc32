//! Concrete-scenario tests straight out of the testable-properties list
//!.

use crate::{new_root_env, run_program, Io};
use kira_ast::Value;
use std::io::Cursor;

fn run(source: &str) -> kira_errors::Result<Value> {
    let program = kira_parser::parse(source)?;
    let env = new_root_env();
    let mut stdin = Cursor::new(Vec::new());
    let mut stdout = Vec::new();
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };
    run_program(&program, &env, &mut io)
}

#[test]
fn arithmetic() {
    let v = run("let x = 10; let y = 20; x + y").unwrap();
    assert_eq!(v.to_string(), "30");
}

#[test]
fn recursive_fibonacci() {
    let v = run("fn fib(n) { if n <= 1 { return n } fib(n-1) + fib(n-2) } fib(10)").unwrap();
    assert_eq!(v.to_string(), "55");
}

#[test]
fn closures_capture_by_reference_to_their_own_frame() {
    let v = run(
        "fn make_adder(n) { fn(x) { x + n } } let add5 = make_adder(5); add5(10)",
    )
    .unwrap();
    assert_eq!(v.to_string(), "15");
}

#[test]
fn closures_do_not_share_across_separate_calls() {
    let v = run(
        "let mk = fn(n){ fn(){n} }; let f = mk(7); let g = mk(9); f() == 7 and g() == 9",
    )
    .unwrap();
    assert_eq!(v.to_string(), "true");
}

#[test]
fn sorted_does_not_mutate_its_argument() {
    let v = run("let a = [3,1,2]; let s = sorted(a); str(s) + \"|\" + str(a)").unwrap();
    assert_eq!(v.to_string(), "[1, 2, 3]|[3, 1, 2]");
}

#[test]
fn dict_preserves_insertion_order() {
    let v = run(r#"let d = {"a":1}; d["b"] = 2; keys(d)"#).unwrap();
    assert_eq!(v.to_string(), r#"["a", "b"]"#);
}

#[test]
fn arrays_alias_on_assignment() {
    let v = run("let a = [1,2]; let b = a; b[0] = 9; a[0]").unwrap();
    assert_eq!(v.to_string(), "9");
}

#[test]
fn short_circuit_and_or_skip_the_erroring_side() {
    let v = run(r#"false and (1/0)"#).unwrap();
    assert_eq!(v.to_string(), "false");
    let v = run(r#"true or (1/0)"#).unwrap();
    assert_eq!(v.to_string(), "true");
}

#[test]
fn const_assignment_is_an_error() {
    let err = run("const x = 1; x = 2").unwrap_err();
    assert!(matches!(err, kira_errors::KiraError::Runtime(kira_errors::RuntimeError::ConstAssignment { .. })));
}

#[test]
fn numeric_tower_scenarios() {
    assert_eq!(run("2 ** 10").unwrap().to_string(), "1024");
    assert_eq!(run("15 / 4").unwrap().to_string(), "3.75");
    assert_eq!(run("17 % 5").unwrap().to_string(), "2");
}

#[test]
fn truthiness_of_empty_containers() {
    assert_eq!(run("if [] { 1 } else { 2 }").unwrap().to_string(), "2");
    assert_eq!(run("if {} { 1 } else { 2 }").unwrap().to_string(), "2");
}

#[test]
fn unbound_name_is_a_name_error() {
    let err = run("missing_name").unwrap_err();
    assert!(matches!(err, kira_errors::KiraError::Runtime(kira_errors::RuntimeError::UnboundName { .. })));
}

#[test]
fn negative_array_indices_are_rejected() {
    let err = run("let a = [1,2,3]; a[-1]").unwrap_err();
    assert!(matches!(err, kira_errors::KiraError::Runtime(kira_errors::RuntimeError::IndexOutOfRange { .. })));
}
