//! Preprocessor for the interface header
//!
//! Handles conditional compilation directives like #if, #ifdef, #ifndef,
//! #elif, #else, #endif, plus object-like #define/#undef guards.
//! This is a simplified preprocessor: no includes, no macro expansion.

pub mod directives;
pub mod expr;
pub mod symbols;

pub use directives::{Conditional, Node, PreprocessorFile};
pub use expr::{ExprParser, PreprocessorExpr};
pub use symbols::{SymbolTable, SymbolValue};

use crate::error::PreprocessorError;

/// Configuration for preprocessor evaluation
#[derive(Debug, Clone, Default)]
pub struct PreprocessorConfig {
    /// Predefined symbols and their values
    pub symbols: SymbolTable,
    /// Replace dropped lines with empty ones so line numbers survive
    pub preserve_lines: bool,
}

impl PreprocessorConfig {
    /// Nothing defined
    pub fn new() -> Self {
        Self::default()
    }

    /// Every flag defined as true
    pub fn with_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: flags.into_iter().collect(),
            preserve_lines: false,
        }
    }

    /// Define a symbol with a boolean value
    pub fn define(&mut self, name: &str, value: bool) -> &mut Self {
        self.symbols.define(name, value.into());
        self
    }

    /// Define a symbol with an explicit value, as `-D NAME=0` does
    pub fn define_value(&mut self, name: &str, value: SymbolValue) -> &mut Self {
        self.symbols.define(name, value);
        self
    }

    /// Undefine a symbol
    pub fn undefine(&mut self, name: &str) -> &mut Self {
        self.symbols.undefine(name);
        self
    }

    pub fn preserve_lines(&mut self, preserve: bool) -> &mut Self {
        self.preserve_lines = preserve;
        self
    }
}

/// Parse and flatten header text in one step
pub fn preprocess(text: &str, config: &PreprocessorConfig) -> Result<String, PreprocessorError> {
    Ok(PreprocessorFile::parse(text)?.eval(config))
}
