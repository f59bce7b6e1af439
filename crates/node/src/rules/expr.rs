// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The condition grammar's lexer, parser, and AST.
//!
//! Pinned per spec.md §9's REDESIGN FLAG ("an implementer must pin a
//! grammar... document it as a contract rather than reusing any host
//! language's eval"):
//!
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr ( "||" and_expr )*
//! and_expr   := not_expr ( "&&" not_expr )*
//! not_expr   := "!" not_expr | comparison
//! comparison := additive ( cmp_op additive )?
//! cmp_op     := "==" | "!=" | ">=" | "<=" | ">" | "<"
//! additive   := multiplicative ( ("+" | "-") multiplicative )*
//! multiplicative := unary ( ("*" | "/") unary )*
//! unary      := "-" unary | primary
//! primary    := number | string | "true" | "false"
//!             | ident "(" ( expr ( "," expr )* )? ")"   // function call
//!             | ident                                   // context lookup
//!             | "(" expr ")"
//! ```
//!
//! Hand-rolled recursive descent, matching the teacher's own build-your-own
//! parser idiom for its shell lexer/parser rather than pulling in a grammar
//! crate for an intentionally small language.

use std::fmt;

use crate::error::{NodeError, NodeResult};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Ident(String),
    Call(String, Vec<Expr>),
    Unary(&'static str, Box<Expr>),
    Binary(&'static str, Box<Expr>, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn tokenize(mut self) -> NodeResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(&c) = self.chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '(' => {
                    self.chars.next();
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.chars.next();
                    tokens.push(Token::RParen);
                }
                ',' => {
                    self.chars.next();
                    tokens.push(Token::Comma);
                }
                '\'' | '"' => {
                    tokens.push(Token::Str(self.read_string(c)?));
                }
                c if c.is_ascii_digit() => tokens.push(Token::Number(self.read_number())),
                c if c.is_alphabetic() || c == '_' => {
                    tokens.push(Token::Ident(self.read_ident()))
                }
                '&' | '|' | '=' | '!' | '>' | '<' | '+' | '-' | '*' | '/' => {
                    tokens.push(self.read_operator()?)
                }
                other => {
                    return Err(NodeError::Condition(format!(
                        "unexpected character {other:?} in condition"
                    )))
                }
            }
        }
        Ok(tokens)
    }

    fn read_string(&mut self, quote: char) -> NodeResult<String> {
        self.chars.next();
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(s),
                Some(c) => s.push(c),
                None => return Err(NodeError::Condition("unterminated string literal".into())),
            }
        }
    }

    fn read_number(&mut self) -> f64 {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s.parse().unwrap_or(0.0)
    }

    fn read_ident(&mut self) -> String {
        let mut s = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }

    fn read_operator(&mut self) -> NodeResult<Token> {
        let first = self.chars.next().expect("peeked");
        let second = self.chars.peek().copied();
        let op = match (first, second) {
            ('&', Some('&')) => {
                self.chars.next();
                "&&"
            }
            ('|', Some('|')) => {
                self.chars.next();
                "||"
            }
            ('=', Some('=')) => {
                self.chars.next();
                "=="
            }
            ('!', Some('=')) => {
                self.chars.next();
                "!="
            }
            ('>', Some('=')) => {
                self.chars.next();
                ">="
            }
            ('<', Some('=')) => {
                self.chars.next();
                "<="
            }
            ('>', _) => ">",
            ('<', _) => "<",
            ('!', _) => "!",
            ('+', _) => "+",
            ('-', _) => "-",
            ('*', _) => "*",
            ('/', _) => "/",
            (c, _) => {
                return Err(NodeError::Condition(format!(
                    "unsupported operator starting with {c:?}"
                )))
            }
        };
        Ok(Token::Op(op))
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn expect_op(&mut self, op: &'static str) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_expr(&mut self) -> NodeResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> NodeResult<Expr> {
        let mut left = self.parse_and()?;
        while self.expect_op("||") {
            let right = self.parse_and()?;
            left = Expr::Binary("||", Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> NodeResult<Expr> {
        let mut left = self.parse_not()?;
        while self.expect_op("&&") {
            let right = self.parse_not()?;
            left = Expr::Binary("&&", Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> NodeResult<Expr> {
        if self.expect_op("!") {
            return Ok(Expr::Unary("!", Box::new(self.parse_not()?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> NodeResult<Expr> {
        let left = self.parse_additive()?;
        for op in ["==", "!=", ">=", "<=", ">", "<"] {
            if self.expect_op(op) {
                let right = self.parse_additive()?;
                return Ok(Expr::Binary(op, Box::new(left), Box::new(right)));
            }
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> NodeResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            if self.expect_op("+") {
                let right = self.parse_multiplicative()?;
                left = Expr::Binary("+", Box::new(left), Box::new(right));
            } else if self.expect_op("-") {
                let right = self.parse_multiplicative()?;
                left = Expr::Binary("-", Box::new(left), Box::new(right));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> NodeResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            if self.expect_op("*") {
                let right = self.parse_unary()?;
                left = Expr::Binary("*", Box::new(left), Box::new(right));
            } else if self.expect_op("/") {
                let right = self.parse_unary()?;
                left = Expr::Binary("/", Box::new(left), Box::new(right));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> NodeResult<Expr> {
        if self.expect_op("-") {
            return Ok(Expr::Unary("-", Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> NodeResult<Expr> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Ident(name)) => {
                if name == "true" {
                    return Ok(Expr::Bool(true));
                }
                if name == "false" {
                    return Ok(Expr::Bool(false));
                }
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let mut args = Vec::new();
                    if self.peek() != Some(&Token::RParen) {
                        args.push(self.parse_expr()?);
                        while self.peek() == Some(&Token::Comma) {
                            self.pos += 1;
                            args.push(self.parse_expr()?);
                        }
                    }
                    if self.advance() != Some(Token::RParen) {
                        return Err(NodeError::Condition(format!(
                            "missing closing ')' in call to {name}"
                        )));
                    }
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                if self.advance() != Some(Token::RParen) {
                    return Err(NodeError::Condition("missing closing ')'".into()));
                }
                Ok(inner)
            }
            other => Err(NodeError::Condition(format!(
                "unexpected token in condition: {other:?}"
            ))),
        }
    }
}

/// Parse a condition string into an [`Expr`] tree.
pub fn parse(condition: &str) -> NodeResult<Expr> {
    let tokens = Lexer::new(condition).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(NodeError::Condition(format!(
            "trailing tokens after condition {condition:?}"
        )));
    }
    Ok(expr)
}

#[cfg(test)]
#[path = "expr_tests.rs"]
mod tests;
