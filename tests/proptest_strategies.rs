//! Proptest strategies for generating header declarations
//!
//! Strategies build AST values; tests render them back to C through the
//! crate's own `Display` impls and feed the text to the parser.

#![allow(dead_code)]

use gdext_header::*;
use proptest::prelude::*;

// ════════════════════════════════════════════════════════════
// Basic Strategies
// ════════════════════════════════════════════════════════════

const KEYWORDS: &[&str] = &["typedef", "enum", "struct", "const"];

/// Generate valid identifiers (C-style, never a keyword)
pub fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,20}".prop_filter("keywords are not identifiers", |s| {
        !KEYWORDS.contains(&s.as_str())
    })
}

/// Generate enum constant names
pub fn constant_name() -> impl Strategy<Value = String> {
    "GDEXTENSION_[A-Z][A-Z0-9_]{0,15}".prop_map(|s| s.to_string())
}

/// Generate type names seen in the interface header
pub fn builtin_type_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("void".to_string()),
        Just("char".to_string()),
        Just("int32_t".to_string()),
        Just("uint32_t".to_string()),
        Just("size_t".to_string()),
        Just("GDExtensionBool".to_string()),
        Just("GDExtensionInt".to_string()),
        Just("GDExtensionVariantPtr".to_string()),
    ]
}

pub fn type_name() -> impl Strategy<Value = String> {
    prop_oneof![builtin_type_name(), identifier()]
}

pub fn primitive_type() -> impl Strategy<Value = PrimitiveType> {
    (any::<bool>(), type_name(), any::<bool>()).prop_map(|(is_const, name, is_pointer)| {
        PrimitiveType {
            is_const,
            name,
            is_pointer,
        }
    })
}

// ════════════════════════════════════════════════════════════
// Composite Strategies
// ════════════════════════════════════════════════════════════

/// Primitive-typed argument, optionally named
pub fn argument() -> impl Strategy<Value = Argument> {
    (primitive_type(), prop::option::of(identifier().prop_map(|s| format!("p_{}", s))))
        .prop_map(|(ty, name)| Argument {
            ty: Type::Primitive(ty),
            name,
        })
}

/// Function pointer with `min_args..5` primitive arguments
pub fn function_type(min_args: usize) -> impl Strategy<Value = FunctionType> {
    (
        primitive_type(),
        identifier(),
        prop::collection::vec(argument(), min_args..5),
    )
        .prop_map(|(return_type, name, arguments)| FunctionType {
            return_type,
            name,
            arguments,
        })
}

/// Distinct constant names in random order
pub fn enum_constants() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(constant_name(), 1..10)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

pub fn enum_decl() -> impl Strategy<Value = EnumDecl> {
    (
        prop::option::of(identifier()),
        enum_constants(),
        prop::collection::vec(prop::option::of(-1000i64..1000), 10),
    )
        .prop_map(|(name, constants, initializers)| EnumDecl {
            name,
            values: constants
                .into_iter()
                .zip(initializers)
                .map(|(name, value)| EnumValue {
                    name,
                    value: value.map(EnumInitializer::Int),
                    comment: None,
                })
                .collect(),
        })
}

pub fn struct_field() -> impl Strategy<Value = StructField> {
    prop_oneof![
        (primitive_type(), identifier())
            .prop_map(|(ty, name)| StructField::Variable(StructVariable { ty, name })),
        function_type(1).prop_map(|function| StructField::Function(StructFunction {
            function,
            comment: None,
        })),
    ]
}

pub fn struct_decl() -> impl Strategy<Value = StructDecl> {
    (identifier(), prop::collection::vec(struct_field(), 0..6))
        .prop_map(|(name, fields)| StructDecl { name, fields })
}

/// Any top-level declaration (comments excluded)
pub fn expr() -> impl Strategy<Value = Expr> {
    prop_oneof![
        enum_decl().prop_map(Expr::Enum),
        (primitive_type(), identifier()).prop_map(|(ty, name)| Expr::Alias(AliasDecl { ty, name })),
        function_type(0).prop_map(Expr::Function),
        struct_decl().prop_map(Expr::Struct),
    ]
}

// ════════════════════════════════════════════════════════════
// Rendering
// ════════════════════════════════════════════════════════════

/// C source for one top-level declaration
pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Comment(text) => text.clone(),
        Expr::Enum(decl) => {
            let values: Vec<String> = decl
                .values
                .iter()
                .map(|v| match &v.value {
                    Some(EnumInitializer::Int(n)) => format!("{} = {}", v.name, n),
                    Some(EnumInitializer::ConstRef(c)) => format!("{} = {}", v.name, c),
                    None => v.name.clone(),
                })
                .collect();
            format!(
                "typedef enum {{ {} }} {};",
                values.join(", "),
                decl.name.as_deref().unwrap_or("")
            )
        }
        Expr::Alias(decl) => format!("typedef {};", decl.ty.declaration(&decl.name)),
        Expr::Function(decl) => format!("typedef {};", decl.declaration()),
        Expr::Struct(decl) => {
            let mut output = String::from("typedef struct {\n");
            for field in &decl.fields {
                match field {
                    StructField::Variable(v) => output.push_str(&format!("\t{};\n", v.ty.declaration(&v.name))),
                    StructField::Function(f) => {
                        output.push_str(&format!("\t{};\n", f.function.declaration()))
                    }
                }
            }
            output.push_str(&format!("}} {};", decl.name));
            output
        }
    }
}

/// Complete header text, one declaration per line
pub fn render_header(exprs: &[Expr]) -> String {
    exprs.iter().map(|e| render_expr(e) + "\n").collect()
}
