//! Artifacts produced from a parsed header
//!
//! Everything is rendered to a string first and written in one step, so a
//! failed run never leaves a truncated file behind.

use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::HeaderError;
use crate::parser::ast::*;

/// Pretty-printed JSON of the whole AST
pub fn to_json(header: &HeaderFile) -> Result<String, HeaderError> {
    let mut json = serde_json::to_string_pretty(header)?;
    json.push('\n');
    Ok(json)
}

/// Read back a dump produced by `to_json`
pub fn from_json(json: &str) -> Result<HeaderFile, HeaderError> {
    Ok(serde_json::from_str(json)?)
}

/// Canonical C declarations, one per top-level expression. Comments are
/// skipped and only the first typedef of each function name is listed.
pub fn signatures(header: &HeaderFile) -> String {
    let functions = header.collect_functions();
    let mut output = String::new();

    for expr in &header.exprs {
        match expr {
            Expr::Comment(_) => {}
            Expr::Enum(decl) => write_enum(&mut output, decl),
            Expr::Alias(decl) => {
                output.push_str(&format!("typedef {};\n", decl.ty.declaration(&decl.name)));
            }
            Expr::Function(decl) => {
                if functions.iter().any(|f| std::ptr::eq(*f, decl)) {
                    output.push_str(&format!("typedef {};\n", decl.declaration()));
                }
            }
            Expr::Struct(decl) => write_struct(&mut output, decl),
        }
    }

    output
}

fn write_enum(output: &mut String, decl: &EnumDecl) {
    output.push_str("typedef enum {\n");
    for value in &decl.values {
        output.push_str("    ");
        output.push_str(&value.name);
        match &value.value {
            Some(EnumInitializer::Int(n)) => output.push_str(&format!(" = {}", n)),
            Some(EnumInitializer::ConstRef(name)) => output.push_str(&format!(" = {}", name)),
            None => {}
        }
        output.push_str(",\n");
    }
    match &decl.name {
        Some(name) => output.push_str(&format!("}} {};\n", name)),
        None => output.push_str("};\n"),
    }
}

fn write_struct(output: &mut String, decl: &StructDecl) {
    output.push_str("typedef struct {\n");
    for field in &decl.fields {
        match field {
            StructField::Variable(variable) => {
                output.push_str(&format!("    {};\n", variable.ty.declaration(&variable.name)));
            }
            StructField::Function(method) => {
                output.push_str(&format!("    {};\n", method.function.declaration()));
            }
        }
    }
    output.push_str(&format!("}} {};\n", decl.name));
}

/// Write `contents` to `path` through a temp file in the same directory,
/// replacing any existing file only once everything is on disk
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), HeaderError> {
    let write_error = |source| HeaderError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
