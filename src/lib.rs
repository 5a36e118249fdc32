//! Shared driver logic behind every CLI surface: the REPL, the
//! file runner, and `-e` expression mode all parse + evaluate through the
//! same two functions here, the way upstream's root `leo` package splits
//! `leo/lib.rs` (driver logic, reusable by `leo/tests/integration.rs`) from
//! `leo/cli/main.rs` (argument parsing only).

pub mod logging;
pub mod repl;

use is_terminal::IsTerminal as _;
use kira_errors::{Diagnostic, KiraError, Result};
use std::path::Path;

pub use kira_ast::{Env, Io, Value};
pub use kira_interpreter::new_root_env;

/// Lexes, parses, and evaluates `source` against `env`, threading `io`
/// through to the `print`/`println`/`input` builtins. The single entry
/// point every driver (REPL, file runner, `-e`, and the integration test
/// harness) funnels through.
pub fn run_with_io(source: &str, env: &Env, io: &mut Io<'_>) -> Result<Value> {
    let program = kira_parser::parse(source)?;
    kira_interpreter::run_program(&program, env, io)
}

/// Renders a [`KiraError`] as `file:line:col: <kind>: message` to stderr
///, colorized when `color` is set.
pub fn report_error(file: &str, error: &KiraError, color: bool) {
    eprintln!("{}", Diagnostic { file, error, color });
}

/// `kira <path>`: executes a file in a fresh environment. Exit 0
/// on success, 1 on runtime error, 2 on parse/lex error; a missing or
/// unreadable file also exits 2, matching the "fails before evaluation
/// starts" family of outcomes.
pub fn run_file(path: &Path) -> i32 {
    let color = std::io::stderr().is_terminal();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("{}: {error}", path.display());
            return 2;
        }
    };
    let env = new_root_env();
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };
    match run_with_io(&source, &env, &mut io) {
        Ok(_) => 0,
        Err(error) => {
            report_error(&path.display().to_string(), &error, color);
            error.exit_code()
        }
    }
}

/// `kira -e <source>`: evaluates a one-off program and echoes its
/// final value, the same echo form the REPL uses, unless that value is
/// `Null`.
pub fn run_eval(source: &str) -> i32 {
    let color = std::io::stderr().is_terminal();
    let env = new_root_env();
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };
    match run_with_io(source, &env, &mut io) {
        Ok(value) => {
            if !matches!(value, Value::Null) {
                println!("{}", value.echo_form());
            }
            0
        }
        Err(error) => {
            report_error("<eval>", &error, color);
            error.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_file_reports_missing_file_as_exit_code_two() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("does-not-exist.kira");
        assert_eq!(run_file(&missing), 2);
    }

    #[test]
    fn run_file_executes_a_real_program() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("program.kira");
        std::fs::write(&path, "let x = 1 + 2; println(x)").expect("write fixture");
        assert_eq!(run_file(&path), 0);
    }

    #[test]
    fn run_file_exits_one_on_runtime_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("program.kira");
        std::fs::write(&path, "1 / 0").expect("write fixture");
        assert_eq!(run_file(&path), 1);
    }

    #[test]
    fn run_file_exits_two_on_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("program.kira");
        std::fs::write(&path, "let = 1").expect("write fixture");
        assert_eq!(run_file(&path), 2);
    }
}
