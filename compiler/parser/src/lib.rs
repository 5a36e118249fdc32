//! Lexer and Pratt parser for the Kira programming language.

pub mod lexer;
pub mod parser;
pub mod token;

#[cfg(test)]
mod tests;

pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{SpannedToken, Token};

use kira_ast::Program;
use kira_errors::Result;

/// Lexes then parses a full source string into a [`Program`], the single
/// entry point the REPL, file runner, and `-e` mode all share.
pub fn parse(source: &str) -> Result<Program> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}
