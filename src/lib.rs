//! Parser for the GDExtension interface header
//!
//! Reduces the header's conditional compilation for a chosen set of defines,
//! parses the typedef subset of C it is written in, and exposes the result as
//! an order-preserving AST for binding generators.
//!
//! ```no_run
//! use gdext_header::{load_header, PreprocessorConfig};
//!
//! let header = load_header("gdextension_interface.h", &PreprocessorConfig::new())?;
//! for function in header.collect_functions() {
//!     println!("{}", function);
//! }
//! # Ok::<(), gdext_header::HeaderError>(())
//! ```

pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod preprocessor;
pub mod query;
pub mod render;

use std::path::Path;

use log::debug;

// Re-export main types
pub use error::*;
pub use lexer::simple::SimpleLexer;
pub use parser::ast::*;
pub use parser::Parser;
pub use preprocessor::{PreprocessorConfig, PreprocessorFile, SymbolTable, SymbolValue};

/// Lex and parse text that is already free of preprocessor directives
pub fn parse_c_string(text: &str) -> Result<HeaderFile, HeaderError> {
    let tokens = SimpleLexer::new(text.to_string()).tokenize()?;
    debug!("lexed {} tokens", tokens.len());
    Ok(Parser::new(tokens).parse()?)
}

/// Preprocess raw header text for `config`, then parse it
pub fn parse_header(text: &str, config: &PreprocessorConfig) -> Result<HeaderFile, HeaderError> {
    let flat = preprocessor::preprocess(text, config)?;
    parse_c_string(&flat)
}

/// Parse a single type such as `const char *` or `void (*cb)(int)`
pub fn parse_type(text: &str) -> Result<Type, HeaderError> {
    let tokens = SimpleLexer::new(text.to_string()).tokenize()?;
    Ok(Parser::new(tokens).parse_standalone_type()?)
}

/// Read a header from disk and run the full pipeline on it
pub fn load_header(path: impl AsRef<Path>, config: &PreprocessorConfig) -> Result<HeaderFile, HeaderError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| HeaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", text.len(), path.display());
    let flat = preprocessor::preprocess(&text, config).map_err(|source| HeaderError::Preprocessing {
        path: path.to_path_buf(),
        source,
    })?;
    parse_c_string(&flat).map_err(|source| HeaderError::Parsing {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}
