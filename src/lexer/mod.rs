//! Lexical analysis for the flattened header text

pub mod simple;
pub mod tokens;

pub use simple::SimpleLexer;
pub use tokens::{Keyword, Position, Symbol, Token, TokenKind};
