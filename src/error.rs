//! Unified error types for gdext-header using thiserror

use std::path::PathBuf;

use thiserror::Error;

use crate::lexer::tokens::Position;

/// Top-level error type for header processing
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("preprocessor error: {0}")]
    Preprocessor(#[from] PreprocessorError),

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error preprocessing {}: {source}", path.display())]
    Preprocessing {
        path: PathBuf,
        #[source]
        source: PreprocessorError,
    },

    /// Lex or syntax error in a header loaded from disk
    #[error("error parsing {}: {source}", path.display())]
    Parsing {
        path: PathBuf,
        #[source]
        source: Box<HeaderError>,
    },

    #[error("error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// No lexer rule matched at a position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unexpected character {found:?} at {position}")]
pub struct LexError {
    pub position: Position,
    pub found: char,
}

/// Token sequence matched no grammar alternative
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Position of the offending token, `None` at end of input
    pub position: Option<Position>,
    /// Description of the offending token
    pub found: String,
    /// Tokens that would have been accepted, in first-seen order
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Merge the expectations of another error raised at the same place
    pub fn merge(&mut self, other: &SyntaxError) {
        for expected in &other.expected {
            if !self.expected.contains(expected) {
                self.expected.push(expected.clone());
            }
        }
    }

    /// Ordering key: end of input sorts after every real position
    pub(crate) fn depth(&self) -> usize {
        self.position.map_or(usize::MAX, |p| p.offset)
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(f, "at {}: ", position)?,
            None => write!(f, "at end of input: ")?,
        }
        match self.expected.as_slice() {
            [] => write!(f, "unexpected {}", self.found),
            [only] => write!(f, "expected {}, found {}", only, self.found),
            many => write!(f, "expected one of {}, found {}", many.join(", "), self.found),
        }
    }
}

/// Conditional-compilation errors, carrying 1-based source lines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessorError {
    #[error("line {line}: #endif without matching #if")]
    UnbalancedEndif { line: usize },

    #[error("line {line}: #{directive} without matching #if")]
    UnbalancedElse { directive: String, line: usize },

    #[error("line {line}: #{directive} after #else")]
    BranchAfterElse { directive: String, line: usize },

    #[error("line {line}: unclosed #{directive} at end of file")]
    UnclosedBlock { directive: String, line: usize },

    #[error("line {line}: expected symbol after #{directive}")]
    MissingSymbol { directive: String, line: usize },

    #[error("line {line}: invalid expression: {message}")]
    InvalidExpression { line: usize, message: String },
}
