/// Ordered-rule lexer: at each position the rules are tried in declaration
/// order and the first one that matches wins.

use super::tokens::{Keyword, Position, Symbol, Token, TokenKind};
use crate::error::LexError;

/// How a rule recognises its token at the current position
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Literal word, only at an identifier boundary
    Word(&'static str),
    Char(char),
    Identifier,
    Int,
    Comment,
    Whitespace,
}

impl Matcher {
    /// Byte length of the match at the start of `rest`
    fn match_len(&self, rest: &str) -> Option<usize> {
        match *self {
            Matcher::Word(word) => {
                if !rest.starts_with(word) {
                    return None;
                }
                match rest[word.len()..].chars().next() {
                    Some(c) if is_ident_continue(c) => None,
                    _ => Some(word.len()),
                }
            }
            Matcher::Char(c) => rest.starts_with(c).then(|| c.len_utf8()),
            Matcher::Identifier => match rest.chars().next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => Some(
                    rest.find(|c: char| !is_ident_continue(c))
                        .unwrap_or(rest.len()),
                ),
                _ => None,
            },
            Matcher::Int => {
                let sign = usize::from(rest.starts_with(['+', '-']));
                let digits = rest[sign..]
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len() - sign);
                (digits > 0).then_some(sign + digits)
            }
            Matcher::Comment => {
                if rest.starts_with("//") {
                    Some(rest.find('\n').unwrap_or(rest.len()))
                } else if rest.starts_with("/*") {
                    rest[2..].find("*/").map(|end| end + 4)
                } else {
                    None
                }
            }
            Matcher::Whitespace => {
                let len = rest
                    .find(|c: char| !c.is_whitespace())
                    .unwrap_or(rest.len());
                (len > 0).then_some(len)
            }
        }
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Keywords come before the identifier rule, otherwise they would lex as identifiers.
const RULES: &[(TokenKind, Matcher)] = &[
    (TokenKind::Keyword(Keyword::Typedef), Matcher::Word("typedef")),
    (TokenKind::Keyword(Keyword::Enum), Matcher::Word("enum")),
    (TokenKind::Keyword(Keyword::Struct), Matcher::Word("struct")),
    (TokenKind::Symbol(Symbol::LeftBrace), Matcher::Char('{')),
    (TokenKind::Symbol(Symbol::RightBrace), Matcher::Char('}')),
    (TokenKind::Symbol(Symbol::Semicolon), Matcher::Char(';')),
    (TokenKind::Symbol(Symbol::Comma), Matcher::Char(',')),
    (TokenKind::Symbol(Symbol::Quote), Matcher::Char('"')),
    (TokenKind::Symbol(Symbol::LeftParen), Matcher::Char('(')),
    (TokenKind::Symbol(Symbol::RightParen), Matcher::Char(')')),
    (TokenKind::Symbol(Symbol::Star), Matcher::Char('*')),
    (TokenKind::Symbol(Symbol::Equals), Matcher::Char('=')),
    (TokenKind::Keyword(Keyword::Const), Matcher::Word("const")),
    (TokenKind::Identifier, Matcher::Identifier),
    (TokenKind::Int, Matcher::Int),
    (TokenKind::Comment, Matcher::Comment),
    (TokenKind::Whitespace, Matcher::Whitespace),
];

pub struct SimpleLexer {
    input: String,
    position: Position,
}

impl SimpleLexer {
    pub fn new(input: String) -> Self {
        Self {
            input,
            position: Position::start(),
        }
    }

    /// Tokenize the whole input. Whitespace is dropped; comments are kept
    /// for the parser, which decides where they are significant.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.position.offset < self.input.len() {
            let token = self.next_token()?;
            if token.kind != TokenKind::Whitespace {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let rest = &self.input[self.position.offset..];

        for (kind, matcher) in RULES {
            if let Some(len) = matcher.match_len(rest) {
                let token = Token {
                    kind: *kind,
                    lexeme: rest[..len].to_string(),
                    position: self.position,
                };
                self.position = self.position.advanced_by(&token.lexeme);
                return Ok(token);
            }
        }

        Err(LexError {
            position: self.position,
            found: rest.chars().next().unwrap_or('\0'),
        })
    }
}
