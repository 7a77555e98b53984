//! Typed, uniquely addressed AST for one build session
//!
//! Every node carries a session-unique [`NodeId`], a [`SourceSpan`], an
//! optional [`TypeDescription`], and a kind-specific payload. Cross-tree
//! links (parents, children, referenced declarations) are always IDs resolved
//! through the [`Ast`] arena, never owned references, so the tree stays
//! acyclic and trivially serializable.

pub mod typedesc;

mod external;

use cn_span::{NodeId, SourceSpan};
use cn_wire::{LiteralKind, Mutability, NodeType, StorageLocation, Visibility};
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Type signature of an expression or declaration
///
/// `type_string` is the human-readable signature; `type_identifier` is the
/// canonical, grammar-stable identifier used for structural equality. Both
/// are built from child descriptions and kind-local data, never from source
/// text, so structurally identical expressions compare equal regardless of
/// spelling.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TypeDescription {
    pub type_string: String,
    pub type_identifier: String,
}

impl TypeDescription {
    pub fn new(type_string: impl Into<String>, type_identifier: impl Into<String>) -> Self {
        Self {
            type_string: type_string.into(),
            type_identifier: type_identifier.into(),
        }
    }
}

impl From<&TypeDescription> for cn_wire::TypeDescription {
    fn from(desc: &TypeDescription) -> Self {
        Self {
            type_string: desc.type_string.clone(),
            type_identifier: desc.type_identifier.clone(),
        }
    }
}

/// Result of installing a deferred reference on a node
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResolutionOutcome {
    /// The node needs no further revisit pass
    Complete,
    /// The node consumed the reference but is still untyped; revisit once
    /// the referenced declaration has a type description
    RevisitRequired,
}

/// One AST node: identity, provenance, type, kind payload
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub src: SourceSpan,
    pub type_description: Option<TypeDescription>,
    pub kind: NodeKind,
}

/// Closed catalog of node kinds
///
/// Adding a kind means a new variant here plus entries in the type
/// description dispatch (`typedesc`), the wire projection (`external`), and
/// the dispatcher's kind selection. All of those match exhaustively, so the
/// compiler enforces the catalog stays in sync.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    SourceUnit {
        name: String,
        nodes: Vec<NodeId>,
    },
    PragmaDirective {
        text: String,
    },
    ContractDefinition {
        name: String,
        nodes: Vec<NodeId>,
    },
    StructDefinition {
        name: String,
        canonical_name: String,
        visibility: Visibility,
        storage_location: StorageLocation,
        members: Vec<NodeId>,
    },
    EnumDefinition {
        name: String,
        canonical_name: String,
        members: Vec<NodeId>,
    },
    EnumValue {
        name: String,
    },
    FunctionDefinition {
        name: String,
        visibility: Visibility,
        state_mutability: Mutability,
        parameters: Vec<NodeId>,
        return_parameters: Vec<NodeId>,
        override_specifier: Option<NodeId>,
        body: Option<NodeId>,
    },
    Parameter {
        name: String,
        type_name: Option<NodeId>,
        storage_location: StorageLocation,
    },
    VariableDeclaration {
        name: String,
        visibility: Visibility,
        storage_location: StorageLocation,
        state_variable: bool,
        type_name: Option<NodeId>,
        value: Option<NodeId>,
    },
    OverrideSpecifier {
        /// Name of the overridden declaration
        name: String,
        overrides: Vec<NodeId>,
        referenced_declaration: Option<NodeId>,
    },
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    ReturnStatement {
        expression: Option<NodeId>,
    },
    VariableDeclarationStatement {
        declarations: Vec<NodeId>,
        initial_value: Option<NodeId>,
    },
    IfStatement {
        condition: NodeId,
        true_body: NodeId,
        false_body: Option<NodeId>,
    },
    Identifier {
        name: String,
        referenced_declaration: Option<NodeId>,
    },
    Literal {
        kind: LiteralKind,
        value: String,
    },
    BinaryOperation {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    UnaryOperation {
        operator: String,
        expression: NodeId,
    },
    FunctionCall {
        expression: NodeId,
        arguments: Vec<NodeId>,
        argument_types: Vec<TypeDescription>,
        referenced_declaration: Option<NodeId>,
    },
    MemberAccess {
        expression: NodeId,
        member_name: String,
        referenced_declaration: Option<NodeId>,
    },
    IndexAccess {
        base: NodeId,
        index: Option<NodeId>,
    },
    TupleExpression {
        components: Vec<NodeId>,
    },
    PayableConversion {
        payable: bool,
        arguments: Vec<NodeId>,
        argument_types: Vec<TypeDescription>,
        referenced_declaration: Option<NodeId>,
    },
    ElementaryTypeName {
        name: String,
    },
    UserDefinedTypeName {
        name: String,
        referenced_declaration: Option<NodeId>,
    },
}

impl Node {
    pub fn new(id: NodeId, src: SourceSpan, kind: NodeKind) -> Self {
        Self {
            id,
            src,
            type_description: None,
            kind,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn src(&self) -> &SourceSpan {
        &self.src
    }

    pub fn type_description(&self) -> Option<&TypeDescription> {
        self.type_description.as_ref()
    }

    /// Kind discriminant in the wire schema's vocabulary
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::SourceUnit { .. } => NodeType::SourceUnit,
            NodeKind::PragmaDirective { .. } => NodeType::PragmaDirective,
            NodeKind::ContractDefinition { .. } => NodeType::ContractDefinition,
            NodeKind::StructDefinition { .. } => NodeType::StructDefinition,
            NodeKind::EnumDefinition { .. } => NodeType::EnumDefinition,
            NodeKind::EnumValue { .. } => NodeType::EnumValue,
            NodeKind::FunctionDefinition { .. } => NodeType::FunctionDefinition,
            NodeKind::Parameter { .. } => NodeType::Parameter,
            NodeKind::VariableDeclaration { .. } => NodeType::VariableDeclaration,
            NodeKind::OverrideSpecifier { .. } => NodeType::OverrideSpecifier,
            NodeKind::Block { .. } => NodeType::Block,
            NodeKind::ExpressionStatement { .. } => NodeType::ExpressionStatement,
            NodeKind::ReturnStatement { .. } => NodeType::ReturnStatement,
            NodeKind::VariableDeclarationStatement { .. } => {
                NodeType::VariableDeclarationStatement
            }
            NodeKind::IfStatement { .. } => NodeType::IfStatement,
            NodeKind::Identifier { .. } => NodeType::Identifier,
            NodeKind::Literal { .. } => NodeType::Literal,
            NodeKind::BinaryOperation { .. } => NodeType::BinaryOperation,
            NodeKind::UnaryOperation { .. } => NodeType::UnaryOperation,
            NodeKind::FunctionCall { .. } => NodeType::FunctionCall,
            NodeKind::MemberAccess { .. } => NodeType::MemberAccess,
            NodeKind::IndexAccess { .. } => NodeType::IndexAccess,
            NodeKind::TupleExpression { .. } => NodeType::TupleExpression,
            NodeKind::PayableConversion { .. } => NodeType::PayableConversion,
            NodeKind::ElementaryTypeName { .. } => NodeType::ElementaryTypeName,
            NodeKind::UserDefinedTypeName { .. } => NodeType::UserDefinedTypeName,
        }
    }

    /// Direct child IDs in source order, empty for leaf kinds
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::SourceUnit { nodes, .. } | NodeKind::ContractDefinition { nodes, .. } => {
                nodes.clone()
            }
            NodeKind::StructDefinition { members, .. }
            | NodeKind::EnumDefinition { members, .. } => members.clone(),
            NodeKind::FunctionDefinition {
                parameters,
                return_parameters,
                override_specifier,
                body,
                ..
            } => {
                let mut children = parameters.clone();
                children.extend(return_parameters.iter().copied());
                children.extend(override_specifier.iter().copied());
                children.extend(body.iter().copied());
                children
            }
            NodeKind::Parameter { type_name, .. } => type_name.iter().copied().collect(),
            NodeKind::VariableDeclaration {
                type_name, value, ..
            } => type_name.iter().chain(value.iter()).copied().collect(),
            NodeKind::OverrideSpecifier { overrides, .. } => overrides.clone(),
            NodeKind::Block { statements } => statements.clone(),
            NodeKind::ExpressionStatement { expression } => vec![*expression],
            NodeKind::ReturnStatement { expression } => expression.iter().copied().collect(),
            NodeKind::VariableDeclarationStatement {
                declarations,
                initial_value,
            } => {
                let mut children = declarations.clone();
                children.extend(initial_value.iter().copied());
                children
            }
            NodeKind::IfStatement {
                condition,
                true_body,
                false_body,
            } => {
                let mut children = vec![*condition, *true_body];
                children.extend(false_body.iter().copied());
                children
            }
            NodeKind::BinaryOperation { left, right, .. } => vec![*left, *right],
            NodeKind::UnaryOperation { expression, .. } => vec![*expression],
            NodeKind::FunctionCall {
                expression,
                arguments,
                ..
            } => {
                let mut children = vec![*expression];
                children.extend(arguments.iter().copied());
                children
            }
            NodeKind::MemberAccess { expression, .. } => vec![*expression],
            NodeKind::IndexAccess { base, index } => {
                let mut children = vec![*base];
                children.extend(index.iter().copied());
                children
            }
            NodeKind::TupleExpression { components } => components.clone(),
            NodeKind::PayableConversion { arguments, .. } => arguments.clone(),
            NodeKind::PragmaDirective { .. }
            | NodeKind::EnumValue { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::ElementaryTypeName { .. }
            | NodeKind::UserDefinedTypeName { .. } => Vec::new(),
        }
    }

    /// Name of the declaration this node still needs resolved, if any
    ///
    /// Drives the deferred-resolution pass: only kinds that name another
    /// declaration and have not been resolved yet report a name.
    pub fn pending_reference(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier {
                name,
                referenced_declaration: None,
            }
            | NodeKind::UserDefinedTypeName {
                name,
                referenced_declaration: None,
            }
            | NodeKind::OverrideSpecifier {
                name,
                referenced_declaration: None,
                ..
            } => Some(name),
            _ => None,
        }
    }

    /// Install a deferred reference
    ///
    /// The reference is written at most once: a second invocation with the
    /// same declaration ID is a no-op reporting [`ResolutionOutcome::Complete`],
    /// and a conflicting ID never overwrites the first. The type description
    /// is only adopted by nodes that are still untyped; kinds that computed
    /// their type from children (payable conversion among them) keep it.
    /// Kinds whose references carry wire-schema slots but are never scheduled
    /// by name resolution (function call, member access) ignore the write.
    pub fn set_reference(
        &mut self,
        declaration: NodeId,
        description: &TypeDescription,
    ) -> ResolutionOutcome {
        let slot = match &mut self.kind {
            NodeKind::Identifier {
                referenced_declaration,
                ..
            }
            | NodeKind::UserDefinedTypeName {
                referenced_declaration,
                ..
            }
            | NodeKind::OverrideSpecifier {
                referenced_declaration,
                ..
            }
            | NodeKind::PayableConversion {
                referenced_declaration,
                ..
            } => referenced_declaration,
            _ => return ResolutionOutcome::Complete,
        };

        match slot {
            Some(existing) if *existing != declaration => return ResolutionOutcome::Complete,
            _ => *slot = Some(declaration),
        }

        if self.type_description.is_none() {
            if description.type_identifier.is_empty() {
                return ResolutionOutcome::RevisitRequired;
            }
            self.type_description = Some(description.clone());
        }

        ResolutionOutcome::Complete
    }
}

/// Arena-and-index store for one session's nodes
///
/// Nodes live in creation order; the side index maps session IDs to arena
/// slots. One session owns one `Ast`; there is no cross-session sharing.
#[derive(Debug, Default)]
pub struct Ast {
    arena: Arena<Node>,
    index: FxHashMap<NodeId, Idx<Node>>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node, indexing it by its session ID
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id;
        let idx = self.arena.alloc(node);
        self.index.insert(id, idx);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|idx| &self.arena[*idx])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index.get(&id).map(|idx| &mut self.arena[*idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter().map(|(_, node)| node)
    }

    /// IDs in creation order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena.iter().map(|(_, node)| node.id)
    }

    pub fn type_description_of(&self, id: NodeId) -> Option<&TypeDescription> {
        self.get(id).and_then(Node::type_description)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
