//! The Pratt expression parser and recursive-descent statement grammar,
//! grounded on the upstream `ParserContext`'s cursor idiom
//! (`peek`/`advance`/`expect`) but replacing its per-level
//! `parse_bin_expr`/`eat_bin_op` chain with a genuine null-denotation /
//! left-denotation binding-power loop.

use crate::token::{SpannedToken, Token};
use kira_ast::{AssignTarget, BinaryOp, Block, Expr, FnDecl, Param, Program, Stmt, UnaryOp};
use kira_errors::{ParseError, Result};
use kira_span::Span;
use std::rc::Rc;

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

/// Binding powers for the Pratt loop. Multiplying each spec precedence
/// level by 10 leaves room to bump the right-hand side by one for
/// left-associative operators without colliding with the next level.
mod bp {
    pub const ASSIGN: u32 = 10;
    pub const OR: u32 = 20;
    pub const AND: u32 = 30;
    pub const NOT_PREFIX: u32 = 41;
    pub const EQUALITY: u32 = 50;
    pub const COMPARISON: u32 = 60;
    pub const ADDITIVE: u32 = 70;
    pub const MULTIPLICATIVE: u32 = 80;
    pub const POWER: u32 = 90;
    pub const UNARY_PREFIX: u32 = 101;
    pub const POSTFIX: u32 = 110;
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> Result<Program> {
        let mut stmts = Vec::new();
        while !self.check(&Token::Eof) {
            stmts.push(self.parse_statement()?);
        }
        Ok(Program { stmts })
    }

    // --- cursor primitives -------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn advance(&mut self) -> SpannedToken {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<SpannedToken> {
        if self.peek() == expected {
            Ok(self.advance())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.peek().to_string(),
                span: self.peek_span(),
            }
            .into())
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span)> {
        let span = self.peek_span();
        match self.peek().clone() {
            Token::Ident(name) => {
                self.advance();
                Ok((name, span))
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: other.to_string(),
                span,
            }
            .into()),
        }
    }

    /// Accepts and discards a trailing `;`, per spec: terminators are
    /// optional and semicolons, if present, are ignored.
    fn skip_semicolon(&mut self) {
        if self.check(&Token::Semicolon) {
            self.advance();
        }
    }

    // --- statements ---------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Stmt> {
        let stmt = match self.peek() {
            Token::Let => self.parse_let()?,
            Token::Const => self.parse_const()?,
            Token::Fn => Stmt::FnDecl(Rc::new(self.parse_fn_decl()?)),
            Token::Return => self.parse_return()?,
            Token::While => self.parse_while()?,
            Token::For => self.parse_for()?,
            _ => Stmt::ExprStmt(self.parse_expression(0)?),
        };
        self.skip_semicolon();
        Ok(stmt)
    }

    fn parse_let(&mut self) -> Result<Stmt> {
        let span = self.peek_span();
        self.advance();
        let (name, _) = self.expect_ident()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expression(0)?;
        Ok(Stmt::Let { name, value, span })
    }

    fn parse_const(&mut self) -> Result<Stmt> {
        let span = self.peek_span();
        self.advance();
        let (name, _) = self.expect_ident()?;
        self.expect(&Token::Assign)?;
        let value = self.parse_expression(0)?;
        Ok(Stmt::Const { name, value, span })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let (name, span) = self.expect_ident()?;
                params.push(Param { name, span });
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;
        Ok(params)
    }

    fn parse_fn_decl(&mut self) -> Result<FnDecl> {
        let span = self.peek_span();
        self.advance(); // 'fn'
        let (name, _) = self.expect_ident()?;
        let params = self.parse_params()?;
        let body = Rc::new(self.parse_block()?);
        Ok(FnDecl { name, params, body, span })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        let span = self.peek_span();
        self.advance();
        let value = if self.starts_expression() { Some(self.parse_expression(0)?) } else { None };
        Ok(Stmt::Return { value, span })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let span = self.peek_span();
        self.advance();
        let cond = self.parse_expression(0)?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body, span })
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        let span = self.peek_span();
        self.advance();
        let (name, _) = self.expect_ident()?;
        self.expect(&Token::In)?;
        let iterable = self.parse_expression(0)?;
        let body = self.parse_block()?;
        Ok(Stmt::For { name, iterable, body, span })
    }

    fn parse_block(&mut self) -> Result<Block> {
        let span = self.peek_span();
        self.expect(&Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.check(&Token::Eof) {
                return Err(ParseError::UnterminatedConstruct { construct: "block".to_string(), span }.into());
            }
            stmts.push(self.parse_statement()?);
        }
        self.expect(&Token::RBrace)?;
        Ok(Block { stmts, span })
    }

    /// Whether the current token can begin an expression, used only to
    /// decide if a bare `return` has a trailing value.
    fn starts_expression(&self) -> bool {
        !matches!(self.peek(), Token::RBrace | Token::Eof | Token::Semicolon)
    }

    // --- expressions: Pratt loop ---------------------------------------------

    fn parse_expression(&mut self, min_bp: u32) -> Result<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let span = self.peek_span();
            match self.peek() {
                Token::Assign if bp::ASSIGN >= min_bp => {
                    self.advance();
                    let target = Self::to_assign_target(lhs, span)?;
                    let value = Box::new(self.parse_expression(bp::ASSIGN)?);
                    lhs = Expr::Assign { target, value, span };
                }
                Token::Or if bp::OR >= min_bp => {
                    self.advance();
                    let rhs = self.parse_expression(bp::OR + 1)?;
                    lhs = Expr::Infix { op: BinaryOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
                }
                Token::And if bp::AND >= min_bp => {
                    self.advance();
                    let rhs = self.parse_expression(bp::AND + 1)?;
                    lhs = Expr::Infix { op: BinaryOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
                }
                Token::Eq if bp::EQUALITY >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Eq, bp::EQUALITY, span)?;
                }
                Token::Neq if bp::EQUALITY >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Neq, bp::EQUALITY, span)?;
                }
                Token::Lt if bp::COMPARISON >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Lt, bp::COMPARISON, span)?;
                }
                Token::Lte if bp::COMPARISON >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Lte, bp::COMPARISON, span)?;
                }
                Token::Gt if bp::COMPARISON >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Gt, bp::COMPARISON, span)?;
                }
                Token::Gte if bp::COMPARISON >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Gte, bp::COMPARISON, span)?;
                }
                Token::Plus if bp::ADDITIVE >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Add, bp::ADDITIVE, span)?;
                }
                Token::Minus if bp::ADDITIVE >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Sub, bp::ADDITIVE, span)?;
                }
                Token::Star if bp::MULTIPLICATIVE >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Mul, bp::MULTIPLICATIVE, span)?;
                }
                Token::Slash if bp::MULTIPLICATIVE >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Div, bp::MULTIPLICATIVE, span)?;
                }
                Token::Percent if bp::MULTIPLICATIVE >= min_bp => {
                    lhs = self.parse_infix(lhs, BinaryOp::Mod, bp::MULTIPLICATIVE, span)?;
                }
                Token::StarStar if bp::POWER >= min_bp => {
                    self.advance();
                    // right-associative: recurse at the same binding power.
                    let rhs = self.parse_expression(bp::POWER)?;
                    lhs = Expr::Infix { op: BinaryOp::Pow, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
                }
                Token::LParen if bp::POSTFIX >= min_bp => {
                    let args = self.parse_call_args()?;
                    lhs = Expr::Call { callee: Box::new(lhs), args, span };
                }
                Token::LBracket if bp::POSTFIX >= min_bp => {
                    self.advance();
                    let key = Box::new(self.parse_expression(0)?);
                    self.expect(&Token::RBracket)?;
                    lhs = Expr::Index { target: Box::new(lhs), key, span };
                }
                _ => break,
            }
        }

        Ok(lhs)
    }

    /// Parses a left-associative infix operator: consumes it, recurses at
    /// `level + 1` so a following operator of equal precedence is instead
    /// picked up by the outer loop, producing left-nested trees.
    fn parse_infix(&mut self, lhs: Expr, op: BinaryOp, level: u32, span: Span) -> Result<Expr> {
        self.advance();
        let rhs = self.parse_expression(level + 1)?;
        Ok(Expr::Infix { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span })
    }

    fn to_assign_target(expr: Expr, span: Span) -> Result<AssignTarget> {
        match expr {
            Expr::Ident(name, _) => Ok(AssignTarget::Ident(name)),
            Expr::Index { target, key, .. } => Ok(AssignTarget::Index { target, key }),
            _ => Err(ParseError::InvalidAssignmentTarget { span }.into()),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                args.push(self.parse_expression(0)?);
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    /// Null-denotation: literals, prefix operators, grouping, and the
    /// keyword-led atoms (`if`, `fn`).
    fn parse_prefix(&mut self) -> Result<Expr> {
        let span = self.peek_span();
        match self.peek().clone() {
            Token::Int(n) => {
                self.advance();
                Ok(Expr::IntLit(n, span))
            }
            Token::Float(n) => {
                self.advance();
                Ok(Expr::FloatLit(n, span))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expr::StrLit(s.into(), span))
            }
            Token::True => {
                self.advance();
                Ok(Expr::BoolLit(true, span))
            }
            Token::False => {
                self.advance();
                Ok(Expr::BoolLit(false, span))
            }
            Token::Null => {
                self.advance();
                Ok(Expr::NullLit(span))
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(name, span))
            }
            Token::Not => {
                self.advance();
                let rhs = Box::new(self.parse_expression(bp::NOT_PREFIX)?);
                Ok(Expr::Prefix { op: UnaryOp::Not, rhs, span })
            }
            Token::Minus => {
                self.advance();
                let rhs = Box::new(self.parse_expression(bp::UNARY_PREFIX)?);
                Ok(Expr::Prefix { op: UnaryOp::Neg, rhs, span })
            }
            Token::Plus => {
                self.advance();
                let rhs = Box::new(self.parse_expression(bp::UNARY_PREFIX)?);
                Ok(Expr::Prefix { op: UnaryOp::Plus, rhs, span })
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression(0)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => self.parse_array_lit(span),
            Token::LBrace => self.parse_dict_lit(span),
            Token::If => self.parse_if_expr(span),
            Token::Fn => self.parse_fn_lit(span),
            other => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: other.to_string(),
                span,
            }
            .into()),
        }
    }

    fn parse_array_lit(&mut self, span: Span) -> Result<Expr> {
        self.advance(); // '['
        let mut elems = Vec::new();
        if !self.check(&Token::RBracket) {
            loop {
                elems.push(self.parse_expression(0)?);
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(Expr::ArrayLit(elems, span))
    }

    fn parse_dict_lit(&mut self, span: Span) -> Result<Expr> {
        self.advance(); // '{'
        let mut pairs = Vec::new();
        if !self.check(&Token::RBrace) {
            loop {
                let key = self.parse_expression(bp::ASSIGN + 1)?;
                self.expect(&Token::Colon)?;
                let value = self.parse_expression(0)?;
                pairs.push((key, value));
                if self.check(&Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(Expr::DictLit(pairs, span))
    }

    fn parse_if_expr(&mut self, span: Span) -> Result<Expr> {
        self.advance(); // 'if'
        let cond = Box::new(self.parse_expression(0)?);
        let then_block = self.parse_block()?;
        let else_block = if self.check(&Token::Else) {
            self.advance();
            if self.check(&Token::If) {
                let inner_span = self.peek_span();
                Some(Box::new(self.parse_if_expr(inner_span)?))
            } else {
                let block = self.parse_block()?;
                Some(Box::new(Expr::Block(block)))
            }
        } else {
            None
        };
        Ok(Expr::If { cond, then_block, else_block, span })
    }

    fn parse_fn_lit(&mut self, span: Span) -> Result<Expr> {
        self.advance(); // 'fn'
        let params = self.parse_params()?;
        let body = Rc::new(self.parse_block()?);
        Ok(Expr::FnLit { params, body, span })
    }
}
