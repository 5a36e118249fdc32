//! Converts a source string into a sequence of [`SpannedToken`]s, grounded
//! on the upstream `tokenizer/lexer.rs`'s greedy longest-match style:
//! `single`/`followed_by`/`three_cases` there become the
//! `one`/`maybe`/`one_of_two` helpers below, closures that try the
//! longest operator spelling before falling back to the shortest.

use crate::token::{SpannedToken, Token};
use kira_errors::{LexError, Result};
use kira_span::Span;

pub struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    _source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { chars: source.chars().collect(), pos: 0, line: 1, column: 1, _source: source }
    }

    /// Scans the whole input, ending in exactly one `Eof` token. The lexer
    /// is not restartable after an error.
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let span = self.span();
            if self.at_end() {
                tokens.push(SpannedToken { token: Token::Eof, span });
                return Ok(tokens);
            }
            let token = self.eat_one()?;
            tokens.push(SpannedToken { token, span });
        }
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// Longest-match against one, two, or three candidate spellings,
    /// shortest listed last. Mirrors the upstream `three_cases` closure.
    fn one_of(&mut self, candidates: &[(&str, Token)]) -> Option<Token> {
        for (spelling, token) in candidates {
            let chars: Vec<char> = spelling.chars().collect();
            if (0..chars.len()).all(|i| self.peek_at(i) == Some(chars[i])) {
                for _ in 0..chars.len() {
                    self.bump();
                }
                return Some(token.clone());
            }
        }
        None
    }

    fn eat_one(&mut self) -> Result<Token> {
        let span = self.span();
        let c = self.peek().expect("not at end");

        if c.is_ascii_digit() {
            return self.eat_number(span);
        }
        if c == '"' {
            return self.eat_string(span);
        }
        if c == '_' || c.is_ascii_alphabetic() {
            return Ok(self.eat_ident());
        }

        let operator = self.one_of(&[
            ("**", Token::StarStar),
            ("==", Token::Eq),
            ("!=", Token::Neq),
            ("<=", Token::Lte),
            (">=", Token::Gte),
            ("+", Token::Plus),
            ("-", Token::Minus),
            ("*", Token::Star),
            ("/", Token::Slash),
            ("%", Token::Percent),
            ("=", Token::Assign),
            ("<", Token::Lt),
            (">", Token::Gt),
            ("(", Token::LParen),
            (")", Token::RParen),
            ("{", Token::LBrace),
            ("}", Token::RBrace),
            ("[", Token::LBracket),
            ("]", Token::RBracket),
            (",", Token::Comma),
            (":", Token::Colon),
            (";", Token::Semicolon),
        ]);
        if let Some(token) = operator {
            return Ok(token);
        }

        self.bump();
        Err(LexError::UnknownChar { found: c, span }.into())
    }

    /// Numeric syntax is validated by construction (only digits and at most
    /// one `.` are consumed), but an all-digit lexeme can still overflow
    /// `i64` — that case surfaces as a `LexError`, not a panic.
    fn eat_number(&mut self, span: Span) -> Result<Token> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            Ok(Token::Float(lexeme.parse().expect("lexer validated float syntax")))
        } else {
            lexeme
                .parse()
                .map(Token::Int)
                .map_err(|_| LexError::IntOutOfRange { lexeme, span }.into())
        }
    }

    fn eat_string(&mut self, span: Span) -> Result<Token> {
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { span }.into()),
                Some('"') => {
                    self.bump();
                    return Ok(Token::Str(s));
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some('r') => s.push('\r'),
                        Some('\\') => s.push('\\'),
                        Some('"') => s.push('"'),
                        Some(other) => s.push(other),
                        None => return Err(LexError::UnterminatedString { span }.into()),
                    }
                    self.bump();
                }
                Some(c) => {
                    s.push(c);
                    self.bump();
                }
            }
        }
    }

    fn eat_ident(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c == '_' || c.is_ascii_alphanumeric()) {
            self.bump();
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        Token::keyword_for(&lexeme).unwrap_or(Token::Ident(lexeme))
    }
}
