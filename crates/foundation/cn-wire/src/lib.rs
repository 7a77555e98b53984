//! Versioned wire schema consumed by downstream tools
//!
//! This crate is the sole contract between the front-end and its consumers
//! (indexers, linters, bytecode verifiers). One message type exists per AST
//! node kind and per IR record kind. Cross-references between nodes are
//! always numeric IDs, never embedded objects, so the schema stays acyclic
//! and diff-friendly; an unset reference serializes as an explicit `null`,
//! distinguishable from a reference to declaration `0`.
//!
//! Compatibility rule: new optional fields may be added in minor releases,
//! existing field names are never repurposed.

pub mod ast;
pub mod ir;

use serde::{Deserialize, Serialize};

/// Schema version carried alongside exported record sets
pub const SCHEMA_VERSION: u32 = 1;

/// Node kind discriminant shared by AST and IR messages
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    SourceUnit,
    PragmaDirective,
    ContractDefinition,
    StructDefinition,
    EnumDefinition,
    EnumValue,
    FunctionDefinition,
    Parameter,
    VariableDeclaration,
    OverrideSpecifier,
    Block,
    ExpressionStatement,
    ReturnStatement,
    VariableDeclarationStatement,
    IfStatement,
    Identifier,
    Literal,
    BinaryOperation,
    UnaryOperation,
    FunctionCall,
    MemberAccess,
    IndexAccess,
    TupleExpression,
    PayableConversion,
    ElementaryTypeName,
    UserDefinedTypeName,
}

/// Declaration visibility
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Internal,
    Public,
    Private,
    External,
}

/// Storage class of a declaration
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageLocation {
    #[default]
    Default,
    Memory,
    Storage,
    Calldata,
}

/// State mutability of a function
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    #[default]
    Nonpayable,
    Payable,
    View,
    Pure,
}

/// Literal flavor
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiteralKind {
    Number,
    String,
    Bool,
    Hex,
}

/// Source extent message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Src {
    pub line: u32,
    pub column: u32,
    pub start: u32,
    pub end: u32,
    pub length: u32,
    /// ID of the nearest enclosing node, `null` only for the root unit
    pub parent_index: Option<u64>,
}

/// Type signature pair: display string plus canonical identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    pub type_string: String,
    pub type_identifier: String,
}
