//! Canonical C spelling of types
//!
//! The strings produced here are what emitters paste into generated code,
//! so they must not change between runs: `const char *`,
//! `void (*GDExtensionInterfacePrintError)(const char *, int32_t)`.

use std::fmt;

use crate::parser::ast::{Argument, FunctionType, PrimitiveType, Type};

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            f.write_str("const ")?;
        }
        f.write_str(&self.name)?;
        if self.is_pointer {
            f.write_str(" *")?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionType {
    /// Argument names are left out; only their types are part of the signature
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (*{})(", self.return_type, self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg.ty)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(ty) => fmt::Display::fmt(ty, f),
            Type::Function(function) => fmt::Display::fmt(function.as_ref(), f),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declaration())
    }
}

impl PrimitiveType {
    /// `name` declared with this type; the `*` binds to the name
    pub fn declaration(&self, name: &str) -> String {
        if self.is_pointer {
            format!("{}{}", self, name)
        } else {
            format!("{} {}", self, name)
        }
    }
}

impl Argument {
    /// Parameter with its name, e.g. `const void *p_data` or `int p_len`
    pub fn declaration(&self) -> String {
        match (&self.ty, &self.name) {
            (ty, None) => ty.to_string(),
            (Type::Primitive(ty), Some(name)) => ty.declaration(name),
            (ty, Some(name)) => format!("{} {}", ty, name),
        }
    }
}

impl FunctionType {
    /// Like the `Display` form, but with parameter names kept
    pub fn declaration(&self) -> String {
        let arguments: Vec<String> = self.arguments.iter().map(Argument::declaration).collect();
        format!(
            "{} (*{})({})",
            self.return_type,
            self.name,
            arguments.join(", ")
        )
    }
}
