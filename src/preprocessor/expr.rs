//! Preprocessor expression parsing and evaluation
//!
//! Handles `#if` conditions such as:
//! - GDEXTENSION_API_STRICT
//! - !defined(__cplusplus)
//! - defined(_WIN32) || (PLATFORM_X && 1)

use super::symbols::SymbolTable;

/// Preprocessor expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreprocessorExpr {
    /// Symbol reference, true when defined with a true value
    Symbol(String),
    /// Integer literal, reduced to non-zero
    Constant(bool),
    Not(Box<PreprocessorExpr>),
    Or(Box<PreprocessorExpr>, Box<PreprocessorExpr>),
    And(Box<PreprocessorExpr>, Box<PreprocessorExpr>),
    /// `defined(X)` / `defined X`
    Defined(String),
}

impl PreprocessorExpr {
    /// Evaluate the expression with a symbol table
    pub fn eval(&self, symbols: &SymbolTable) -> bool {
        match self {
            PreprocessorExpr::Symbol(name) => symbols.get(name).as_bool(),
            PreprocessorExpr::Constant(val) => *val,
            PreprocessorExpr::Not(expr) => !expr.eval(symbols),
            PreprocessorExpr::Or(left, right) => left.eval(symbols) || right.eval(symbols),
            PreprocessorExpr::And(left, right) => left.eval(symbols) && right.eval(symbols),
            PreprocessorExpr::Defined(name) => symbols.is_defined(name),
        }
    }

    /// `#ifdef NAME`
    pub fn defined(name: &str) -> Self {
        PreprocessorExpr::Defined(name.to_string())
    }

    /// `#ifndef NAME`
    pub fn not_defined(name: &str) -> Self {
        PreprocessorExpr::Not(Box::new(Self::defined(name)))
    }
}

/// Parser for the text following `#if` or `#elif`
pub struct ExprParser {
    tokens: Vec<String>,
    position: usize,
}

impl ExprParser {
    pub fn new(expression: &str) -> Self {
        Self {
            tokens: Self::tokenize(expression),
            position: 0,
        }
    }

    /// Tokenize an expression string
    fn tokenize(s: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            let operator = match ch {
                c if c.is_whitespace() => None,
                '(' | ')' | '!' => Some(ch.to_string()),
                '|' if chars.peek() == Some(&'|') => {
                    chars.next();
                    Some("||".to_string())
                }
                '&' if chars.peek() == Some(&'&') => {
                    chars.next();
                    Some("&&".to_string())
                }
                _ => {
                    current.push(ch);
                    continue;
                }
            };

            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.extend(operator);
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }

    /// Parse the whole expression; trailing tokens are an error
    pub fn parse(&mut self) -> Result<PreprocessorExpr, String> {
        if self.tokens.is_empty() {
            return Err("missing expression".to_string());
        }
        let expr = self.parse_or()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(format!("unexpected '{}'", token)),
        }
    }

    fn parse_or(&mut self) -> Result<PreprocessorExpr, String> {
        let mut left = self.parse_and()?;

        while self.peek() == Some("||") {
            self.advance();
            let right = self.parse_and()?;
            left = PreprocessorExpr::Or(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<PreprocessorExpr, String> {
        let mut left = self.parse_unary()?;

        while self.peek() == Some("&&") {
            self.advance();
            let right = self.parse_unary()?;
            left = PreprocessorExpr::And(Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<PreprocessorExpr, String> {
        if self.peek() == Some("!") {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(PreprocessorExpr::Not(Box::new(expr)));
        }

        self.parse_primary()
    }

    /// Symbol, integer, defined(), or parenthesized expression
    fn parse_primary(&mut self) -> Result<PreprocessorExpr, String> {
        match self.peek() {
            Some("(") => {
                self.advance();
                let expr = self.parse_or()?;
                if self.peek() != Some(")") {
                    return Err("expected ')'".to_string());
                }
                self.advance();
                Ok(expr)
            }
            Some("defined") => {
                self.advance();
                let parenthesized = self.peek() == Some("(");
                if parenthesized {
                    self.advance();
                }
                let name = self.expect_symbol("defined")?;
                if parenthesized {
                    if self.peek() != Some(")") {
                        return Err("expected ')' after defined(".to_string());
                    }
                    self.advance();
                }
                Ok(PreprocessorExpr::Defined(name))
            }
            Some(token) if token.starts_with(|c: char| c.is_ascii_digit()) => {
                let literal = token.trim_end_matches(['u', 'U', 'l', 'L']);
                let value: i64 = literal
                    .parse()
                    .map_err(|_| format!("invalid integer '{}'", token))?;
                self.advance();
                Ok(PreprocessorExpr::Constant(value != 0))
            }
            Some(_) => {
                let name = self.expect_symbol("expression")?;
                Ok(PreprocessorExpr::Symbol(name))
            }
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn expect_symbol(&mut self, context: &str) -> Result<String, String> {
        match self.advance() {
            Some(name) if is_identifier(&name) => Ok(name),
            Some(other) => Err(format!("expected symbol in {}, found '{}'", context, other)),
            None => Err(format!("expected symbol in {}", context)),
        }
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.position).map(|s| s.as_str())
    }

    fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse the condition text of an `#if`/`#elif` directive
pub fn parse_condition(expression: &str) -> Result<PreprocessorExpr, String> {
    ExprParser::new(expression).parse()
}
