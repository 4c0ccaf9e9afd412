/// Token types in the interface header
use serde::{Deserialize, Serialize};

/// Location of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the input
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance past `text`, tracking newlines
    pub fn advanced_by(mut self, text: &str) -> Self {
        for ch in text.chars() {
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

/// Kinds of token produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A reserved word (typedef, enum, struct, const)
    Keyword(Keyword),
    /// An identifier (type name, declaration name, enum constant)
    Identifier,
    /// Punctuation
    Symbol(Symbol),
    /// An optionally signed decimal integer literal
    Int,
    /// A line or block comment
    Comment,
    /// Spaces, tabs and newlines (never handed to the parser)
    Whitespace,
}

impl TokenKind {
    /// Human readable name used in "expected ..." diagnostics
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(k) => format!("'{}'", k),
            TokenKind::Identifier => "identifier".to_string(),
            TokenKind::Symbol(s) => format!("'{}'", s),
            TokenKind::Int => "integer".to_string(),
            TokenKind::Comment => "comment".to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
        }
    }
}

/// Header keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Typedef,
    Enum,
    Struct,
    Const,
}

impl Keyword {
    /// Get the string representation of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Typedef => "typedef",
            Keyword::Enum => "enum",
            Keyword::Struct => "struct",
            Keyword::Const => "const",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Symbols and punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LeftBrace,  // {
    RightBrace, // }
    Semicolon,  // ;
    Comma,      // ,
    Quote,      // "
    LeftParen,  // (
    RightParen, // )
    Star,       // *
    Equals,     // =
}

impl Symbol {
    pub fn as_char(&self) -> char {
        match self {
            Symbol::LeftBrace => '{',
            Symbol::RightBrace => '}',
            Symbol::Semicolon => ';',
            Symbol::Comma => ',',
            Symbol::Quote => '"',
            Symbol::LeftParen => '(',
            Symbol::RightParen => ')',
            Symbol::Star => '*',
            Symbol::Equals => '=',
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
