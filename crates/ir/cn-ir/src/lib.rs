//! Flattened IR records for lowered declarations
//!
//! Where the AST is a spanning tree of IDs, an IR record is a self-contained
//! summary of one declaration: members are embedded, display fields are
//! denormalized, and each record keeps its own clone of the AST node it was
//! lowered from as provenance. Records are immutable after construction and
//! compare by value, so lowering the same AST twice yields equal records.

mod external;

use cn_ast::{Node, TypeDescription};
use cn_span::NodeId;
use cn_wire::{Mutability, NodeType, StorageLocation, Visibility};

/// Lowered source unit: the roster of its contracts
#[derive(Clone, Debug, PartialEq)]
pub struct SourceUnitIr {
    pub id: NodeId,
    pub name: String,
    pub contracts: Vec<ContractIr>,
    /// Clone of the originating AST node
    pub source: Node,
}

/// Lowered contract with its member declarations embedded
#[derive(Clone, Debug, PartialEq)]
pub struct ContractIr {
    pub id: NodeId,
    pub name: String,
    pub functions: Vec<FunctionIr>,
    pub structs: Vec<StructIr>,
    pub enums: Vec<EnumIr>,
    pub source: Node,
}

/// Lowered function signature
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionIr {
    pub id: NodeId,
    pub name: String,
    pub canonical_name: String,
    pub referenced_declaration: Option<NodeId>,
    pub visibility: Visibility,
    pub state_mutability: Mutability,
    pub parameters: Vec<ParameterIr>,
    pub return_parameters: Vec<ParameterIr>,
    pub override_specifier: Option<OverrideIr>,
    pub type_description: Option<TypeDescription>,
    pub source: Node,
}

/// Lowered struct declaration
#[derive(Clone, Debug, PartialEq)]
pub struct StructIr {
    pub id: NodeId,
    pub name: String,
    pub canonical_name: String,
    pub referenced_declaration: Option<NodeId>,
    pub visibility: Visibility,
    pub storage_location: StorageLocation,
    /// Member records in AST declaration order
    pub members: Vec<ParameterIr>,
    pub type_description: Option<TypeDescription>,
    pub source: Node,
}

/// Lowered enum declaration; values become member records
#[derive(Clone, Debug, PartialEq)]
pub struct EnumIr {
    pub id: NodeId,
    pub name: String,
    pub canonical_name: String,
    pub members: Vec<ParameterIr>,
    pub type_description: Option<TypeDescription>,
    pub source: Node,
}

/// Lowered override specifier
#[derive(Clone, Debug, PartialEq)]
pub struct OverrideIr {
    pub id: NodeId,
    pub name: String,
    pub referenced_declaration: Option<NodeId>,
    pub type_description: Option<TypeDescription>,
    pub source: Node,
}

/// One struct member, enum value, or function parameter
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterIr {
    pub id: NodeId,
    pub name: String,
    /// Display name of the member's type, empty when the type is unresolved
    pub type_name: String,
    pub storage_location: StorageLocation,
    /// Copied unchanged from the AST node it was lowered from
    pub type_description: Option<TypeDescription>,
}

impl SourceUnitIr {
    pub fn node_type(&self) -> NodeType {
        NodeType::SourceUnit
    }
}

impl ContractIr {
    pub fn node_type(&self) -> NodeType {
        NodeType::ContractDefinition
    }
}

impl FunctionIr {
    pub fn node_type(&self) -> NodeType {
        NodeType::FunctionDefinition
    }
}

impl StructIr {
    pub fn node_type(&self) -> NodeType {
        NodeType::StructDefinition
    }
}

impl EnumIr {
    pub fn node_type(&self) -> NodeType {
        NodeType::EnumDefinition
    }
}

impl OverrideIr {
    pub fn node_type(&self) -> NodeType {
        NodeType::OverrideSpecifier
    }
}
