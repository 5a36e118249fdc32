//! The interactive shell: `kira> ` prompt, `...  ` continuation
//! prompt while a statement is incomplete, persistent top-level bindings
//! across inputs, Ctrl-D to exit with code 0.

use crate::{report_error, run_with_io};
use colored::Colorize as _;
use dialoguer::BasicHistory;
use dialoguer::Input;
use is_terminal::IsTerminal as _;
use kira_ast::{Io, Value};
use kira_parser::{Lexer, Token};

const PROMPT: &str = "kira> ";
const CONTINUATION_PROMPT: &str = "...  ";

/// Runs the REPL to completion, returning the process exit code (always 0 —
/// `Ctrl-D` is a normal exit, not a failure).
pub fn run() -> i32 {
    let color = std::io::stderr().is_terminal();
    if std::io::stdout().is_terminal() {
        println!("{} — Ctrl-D to exit", "kira".bold());
    }
    let env = crate::new_root_env();
    let mut history = BasicHistory::new();
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
        let line = match Input::<String>::new().with_prompt(prompt).history_with(&mut history).interact_text() {
            Ok(line) => line,
            Err(_) => return 0, // Ctrl-D / EOF
        };

        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(&line);

        if is_incomplete(&buffer) {
            continue;
        }

        let source = std::mem::take(&mut buffer);
        run_one(&source, &env, color);
    }
}

/// Evaluates one complete chunk of input and echoes its value,
/// leaving `env` intact afterwards — including after an error, so the
/// session's bindings survive a mistake.
fn run_one(source: &str, env: &kira_ast::Env, color: bool) {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut io = Io { stdout: &mut stdout, stdin: &mut stdin };
    match run_with_io(source, env, &mut io) {
        Ok(Value::Null) => {}
        Ok(value) => println!("{}", value.echo_form()),
        Err(error) => report_error("<stdin>", &error, color),
    }
}

/// Whether `source` ends mid-construct: unbalanced `()`/`{}`/`[]`, an
/// unterminated string, or a trailing binary/logical operator that still
/// expects a right-hand side.
fn is_incomplete(source: &str) -> bool {
    let tokens = match Lexer::new(source).tokenize() {
        Ok(tokens) => tokens,
        Err(kira_errors::KiraError::Lex(kira_errors::LexError::UnterminatedString { .. })) => return true,
        Err(_) => return false,
    };

    let mut depth = 0i32;
    for spanned in &tokens {
        match spanned.token {
            Token::LParen | Token::LBrace | Token::LBracket => depth += 1,
            Token::RParen | Token::RBrace | Token::RBracket => depth -= 1,
            _ => {}
        }
    }
    if depth > 0 {
        return true;
    }

    let last = tokens.iter().rev().map(|t| &t.token).find(|t| **t != Token::Eof);
    matches!(
        last,
        Some(
            Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::StarStar
                | Token::Assign
                | Token::Eq
                | Token::Neq
                | Token::Lt
                | Token::Lte
                | Token::Gt
                | Token::Gte
                | Token::And
                | Token::Or
                | Token::Not
                | Token::Comma
                | Token::Colon
        )
    )
}

#[cfg(test)]
mod tests {
    use super::is_incomplete;

    #[test]
    fn unbalanced_brace_is_incomplete() {
        assert!(is_incomplete("fn f(n) {"));
    }

    #[test]
    fn trailing_operator_is_incomplete() {
        assert!(is_incomplete("1 +"));
        assert!(is_incomplete("a and"));
    }

    #[test]
    fn a_complete_statement_is_not_incomplete() {
        assert!(!is_incomplete("1 + 2"));
        assert!(!is_incomplete("fn f(n) { n }"));
    }

    #[test]
    fn unterminated_string_is_incomplete() {
        assert!(is_incomplete("\"abc"));
    }
}
