//! Order-preserving views over a parsed header
//!
//! Generators rely on three guarantees: declaration order is kept, there is
//! at most one function typedef per name, and nothing here mutates the tree.

use std::collections::HashSet;

use crate::parser::ast::*;

impl HeaderFile {
    pub fn collect_enums(&self) -> Vec<&EnumDecl> {
        self.exprs
            .iter()
            .filter_map(|e| match e {
                Expr::Enum(decl) => Some(decl),
                _ => None,
            })
            .collect()
    }

    pub fn collect_aliases(&self) -> Vec<&AliasDecl> {
        self.exprs
            .iter()
            .filter_map(|e| match e {
                Expr::Alias(decl) => Some(decl),
                _ => None,
            })
            .collect()
    }

    /// Function typedefs, first occurrence of each name only.
    /// The GDExtension header declares at least one of them twice.
    pub fn collect_functions(&self) -> Vec<&FunctionDecl> {
        let mut seen = HashSet::new();
        self.all_functions()
            .filter(|&decl| seen.insert(decl.name.as_str()))
            .collect()
    }

    /// Later declarations dropped by `collect_functions`
    pub fn duplicate_functions(&self) -> Vec<&FunctionDecl> {
        let mut seen = HashSet::new();
        self.all_functions()
            .filter(|&decl| !seen.insert(decl.name.as_str()))
            .collect()
    }

    pub fn collect_structs(&self) -> Vec<&StructDecl> {
        self.exprs
            .iter()
            .filter_map(|e| match e {
                Expr::Struct(decl) => Some(decl),
                _ => None,
            })
            .collect()
    }

    pub fn collect_comments(&self) -> Vec<&str> {
        self.exprs
            .iter()
            .filter_map(|e| match e {
                Expr::Comment(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumDecl> {
        self.collect_enums()
            .into_iter()
            .find(|decl| decl.name.as_deref() == Some(name))
    }

    pub fn find_alias(&self, name: &str) -> Option<&AliasDecl> {
        self.collect_aliases().into_iter().find(|decl| decl.name == name)
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionDecl> {
        self.all_functions().find(|decl| decl.name == name)
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDecl> {
        self.collect_structs().into_iter().find(|decl| decl.name == name)
    }

    fn all_functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.exprs.iter().filter_map(|e| match e {
            Expr::Function(decl) => Some(decl),
            _ => None,
        })
    }
}

impl StructDecl {
    /// Function-pointer members ("methods"), in declaration order
    pub fn collect_functions(&self) -> Vec<&StructFunction> {
        self.fields
            .iter()
            .filter_map(|f| match f {
                StructField::Function(function) => Some(function),
                StructField::Variable(_) => None,
            })
            .collect()
    }

    pub fn collect_variables(&self) -> Vec<&StructVariable> {
        self.fields
            .iter()
            .filter_map(|f| match f {
                StructField::Variable(variable) => Some(variable),
                StructField::Function(_) => None,
            })
            .collect()
    }
}

impl StructField {
    pub fn name(&self) -> &str {
        match self {
            StructField::Variable(variable) => &variable.name,
            StructField::Function(function) => &function.function.name,
        }
    }
}

impl Expr {
    /// Declared name; comments and anonymous enums have none
    pub fn name(&self) -> Option<&str> {
        match self {
            Expr::Comment(_) => None,
            Expr::Enum(decl) => decl.name.as_deref(),
            Expr::Alias(decl) => Some(&decl.name),
            Expr::Function(decl) => Some(&decl.name),
            Expr::Struct(decl) => Some(&decl.name),
        }
    }
}
