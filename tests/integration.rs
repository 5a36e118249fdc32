//! End-to-end harness: each `tests/fixtures/<name>.kira` is run to
//! completion against a fresh root environment, and its captured stdout
//! is compared byte-for-byte against the matching `<name>.stdout`. Mirrors
//! how upstream's `leo/tests/integration.rs` drives whole programs
//! through the public API rather than a subprocess.

use kira::{new_root_env, run_with_io};
use kira_ast::Io;
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn run_fixture(name: &str) -> (String, String) {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let source = fs::read_to_string(dir.join(format!("{name}.kira")))
        .unwrap_or_else(|e| panic!("reading {name}.kira: {e}"));
    let expected = fs::read_to_string(dir.join(format!("{name}.stdout")))
        .unwrap_or_else(|e| panic!("reading {name}.stdout: {e}"));

    let env = new_root_env();
    let mut stdout = Vec::new();
    let mut stdin = Cursor::new(Vec::new());
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };

    run_with_io(&source, &env, &mut io)
        .unwrap_or_else(|e| panic!("{name}.kira failed to run: {e:?}"));

    (String::from_utf8(stdout).expect("stdout is valid utf-8"), expected)
}

macro_rules! fixture_test {
    ($name:ident) => {
        #[test]
        fn $name() {
            let (actual, expected) = run_fixture(stringify!($name));
            assert_eq!(actual, expected, concat!(stringify!($name), ".kira produced unexpected stdout"));
        }
    };
}

fixture_test!(fibonacci);
fixture_test!(closures);
fixture_test!(collections);
fixture_test!(strings);

#[test]
fn a_parse_error_reports_its_kind() {
    let env = new_root_env();
    let mut stdout = Vec::new();
    let mut stdin = Cursor::new(Vec::new());
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };

    let err = run_with_io("let = 1", &env, &mut io).unwrap_err();
    assert_eq!(err.kind(), "ParseError");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn a_runtime_error_reports_its_kind() {
    let env = new_root_env();
    let mut stdout = Vec::new();
    let mut stdin = Cursor::new(Vec::new());
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };

    let err = run_with_io("1 / 0", &env, &mut io).unwrap_err();
    assert_eq!(err.kind(), "ZeroDivisionError");
}
