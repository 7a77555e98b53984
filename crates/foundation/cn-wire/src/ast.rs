//! AST node messages
//!
//! One message per node kind, wrapped in the [`Node`] tagged union whose
//! `node_type` tag matches the [`crate::NodeType`] spelling. Child links are
//! node IDs into the exporting session's flattened node list.

use crate::{LiteralKind, Mutability, Src, StorageLocation, TypeDescription, Visibility};
use serde::{Deserialize, Serialize};

/// Any AST node message, discriminated by `node_type`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Node {
    SourceUnit(SourceUnit),
    PragmaDirective(PragmaDirective),
    ContractDefinition(ContractDefinition),
    StructDefinition(StructDefinition),
    EnumDefinition(EnumDefinition),
    EnumValue(EnumValue),
    FunctionDefinition(FunctionDefinition),
    Parameter(Parameter),
    VariableDeclaration(VariableDeclaration),
    OverrideSpecifier(OverrideSpecifier),
    Block(Block),
    ExpressionStatement(ExpressionStatement),
    ReturnStatement(ReturnStatement),
    VariableDeclarationStatement(VariableDeclarationStatement),
    IfStatement(IfStatement),
    Identifier(Identifier),
    Literal(Literal),
    BinaryOperation(BinaryOperation),
    UnaryOperation(UnaryOperation),
    FunctionCall(FunctionCall),
    MemberAccess(MemberAccess),
    IndexAccess(IndexAccess),
    TupleExpression(TupleExpression),
    PayableConversion(PayableConversion),
    ElementaryTypeName(ElementaryTypeName),
    UserDefinedTypeName(UserDefinedTypeName),
}

impl Node {
    /// ID of the projected node, regardless of kind
    pub fn id(&self) -> u64 {
        match self {
            Self::SourceUnit(node) => node.id,
            Self::PragmaDirective(node) => node.id,
            Self::ContractDefinition(node) => node.id,
            Self::StructDefinition(node) => node.id,
            Self::EnumDefinition(node) => node.id,
            Self::EnumValue(node) => node.id,
            Self::FunctionDefinition(node) => node.id,
            Self::Parameter(node) => node.id,
            Self::VariableDeclaration(node) => node.id,
            Self::OverrideSpecifier(node) => node.id,
            Self::Block(node) => node.id,
            Self::ExpressionStatement(node) => node.id,
            Self::ReturnStatement(node) => node.id,
            Self::VariableDeclarationStatement(node) => node.id,
            Self::IfStatement(node) => node.id,
            Self::Identifier(node) => node.id,
            Self::Literal(node) => node.id,
            Self::BinaryOperation(node) => node.id,
            Self::UnaryOperation(node) => node.id,
            Self::FunctionCall(node) => node.id,
            Self::MemberAccess(node) => node.id,
            Self::IndexAccess(node) => node.id,
            Self::TupleExpression(node) => node.id,
            Self::PayableConversion(node) => node.id,
            Self::ElementaryTypeName(node) => node.id,
            Self::UserDefinedTypeName(node) => node.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    /// Top-level declaration IDs in source order
    pub nodes: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PragmaDirective {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractDefinition {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    /// Member declaration IDs in source order
    pub nodes: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructDefinition {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub canonical_name: String,
    pub visibility: Visibility,
    pub storage_location: StorageLocation,
    pub members: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub canonical_name: String,
    pub members: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub visibility: Visibility,
    pub state_mutability: Mutability,
    pub parameters: Vec<u64>,
    pub return_parameters: Vec<u64>,
    pub override_specifier: Option<u64>,
    pub body: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub type_name: Option<u64>,
    pub storage_location: StorageLocation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub visibility: Visibility,
    pub storage_location: StorageLocation,
    pub state_variable: bool,
    pub type_name: Option<u64>,
    pub value: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideSpecifier {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub overrides: Vec<u64>,
    pub referenced_declaration: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub statements: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub expression: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub expression: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarationStatement {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub declarations: Vec<u64>,
    pub initial_value: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub condition: u64,
    pub true_body: u64,
    pub false_body: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub referenced_declaration: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub kind: LiteralKind,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperation {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub operator: String,
    pub left_expression: u64,
    pub right_expression: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperation {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub operator: String,
    pub expression: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub expression: u64,
    pub arguments: Vec<u64>,
    pub argument_types: Vec<TypeDescription>,
    pub referenced_declaration: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberAccess {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub expression: u64,
    pub member_name: String,
    pub referenced_declaration: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexAccess {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub base_expression: u64,
    pub index_expression: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TupleExpression {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub components: Vec<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayableConversion {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub payable: bool,
    pub arguments: Vec<u64>,
    pub argument_types: Vec<TypeDescription>,
    pub referenced_declaration: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementaryTypeName {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserDefinedTypeName {
    pub id: u64,
    pub src: Src,
    pub type_description: Option<TypeDescription>,
    pub name: String,
    pub referenced_declaration: Option<u64>,
}
