/// Abstract Syntax Tree for the interface header
use serde::{Deserialize, Serialize};

/// A whole header: top-level expressions in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFile {
    pub exprs: Vec<Expr>,
}

/// Top-level expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Comment(String),
    Enum(EnumDecl),
    Alias(AliasDecl),
    Function(FunctionDecl),
    Struct(StructDecl),
}

/// typedef enum { ... } Name;
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: Option<EnumInitializer>,
    /// Trailing comment on the same line
    pub comment: Option<String>,
}

/// Right-hand side of `NAME = ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumInitializer {
    Int(i64),
    ConstRef(String),
}

/// typedef Type Name;
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDecl {
    pub ty: PrimitiveType,
    pub name: String,
}

/// typedef Ret (*Name)(Args...);
pub type FunctionDecl = FunctionType;

/// typedef struct { ... } Name;
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<StructField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructField {
    Variable(StructVariable),
    Function(StructFunction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructVariable {
    pub ty: PrimitiveType,
    pub name: String,
}

/// Function-pointer member of a struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructFunction {
    pub function: FunctionType,
    pub comment: Option<String>,
}

/// Function pointer: `Ret (*Name)(Args...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionType {
    pub return_type: PrimitiveType,
    pub name: String,
    pub arguments: Vec<Argument>,
}

/// `const? Name *?`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveType {
    pub is_const: bool,
    pub name: String,
    pub is_pointer: bool,
}

impl PrimitiveType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            is_const: false,
            name: name.into(),
            is_pointer: false,
        }
    }

    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Primitive(PrimitiveType),
    Function(Box<FunctionType>),
}

/// Function parameter; the name is optional as in C prototypes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub ty: Type,
    pub name: Option<String>,
}
