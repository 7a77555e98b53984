//! Projection of AST nodes into the wire schema
//!
//! Total, field-by-field copies: every fully constructed node projects
//! without failure, unresolved references become explicit `null`s, and the
//! conversion never re-enters parsing or lowering.

use crate::{Node, NodeKind, TypeDescription};
use cn_span::{NodeId, SourceSpan};
use cn_wire::ast as wire;

fn id_of(id: NodeId) -> u64 {
    id.as_u64()
}

fn ids_of(ids: &[NodeId]) -> Vec<u64> {
    ids.iter().copied().map(id_of).collect()
}

fn src_of(span: &SourceSpan) -> cn_wire::Src {
    cn_wire::Src {
        line: span.line,
        column: span.column,
        start: span.start,
        end: span.end,
        length: span.length,
        parent_index: span.parent.map(NodeId::as_u64),
    }
}

fn desc_of(description: Option<&TypeDescription>) -> Option<cn_wire::TypeDescription> {
    description.map(Into::into)
}

fn descs_of(descriptions: &[TypeDescription]) -> Vec<cn_wire::TypeDescription> {
    descriptions.iter().map(Into::into).collect()
}

impl Node {
    /// Convert this node into its external wire message
    pub fn to_external(&self) -> wire::Node {
        let id = id_of(self.id);
        let src = src_of(&self.src);
        let type_description = desc_of(self.type_description.as_ref());

        match &self.kind {
            NodeKind::SourceUnit { name, nodes } => wire::Node::SourceUnit(wire::SourceUnit {
                id,
                src,
                type_description,
                name: name.clone(),
                nodes: ids_of(nodes),
            }),
            NodeKind::PragmaDirective { text } => {
                wire::Node::PragmaDirective(wire::PragmaDirective {
                    id,
                    src,
                    type_description,
                    text: text.clone(),
                })
            }
            NodeKind::ContractDefinition { name, nodes } => {
                wire::Node::ContractDefinition(wire::ContractDefinition {
                    id,
                    src,
                    type_description,
                    name: name.clone(),
                    nodes: ids_of(nodes),
                })
            }
            NodeKind::StructDefinition {
                name,
                canonical_name,
                visibility,
                storage_location,
                members,
            } => wire::Node::StructDefinition(wire::StructDefinition {
                id,
                src,
                type_description,
                name: name.clone(),
                canonical_name: canonical_name.clone(),
                visibility: *visibility,
                storage_location: *storage_location,
                members: ids_of(members),
            }),
            NodeKind::EnumDefinition {
                name,
                canonical_name,
                members,
            } => wire::Node::EnumDefinition(wire::EnumDefinition {
                id,
                src,
                type_description,
                name: name.clone(),
                canonical_name: canonical_name.clone(),
                members: ids_of(members),
            }),
            NodeKind::EnumValue { name } => wire::Node::EnumValue(wire::EnumValue {
                id,
                src,
                type_description,
                name: name.clone(),
            }),
            NodeKind::FunctionDefinition {
                name,
                visibility,
                state_mutability,
                parameters,
                return_parameters,
                override_specifier,
                body,
            } => wire::Node::FunctionDefinition(wire::FunctionDefinition {
                id,
                src,
                type_description,
                name: name.clone(),
                visibility: *visibility,
                state_mutability: *state_mutability,
                parameters: ids_of(parameters),
                return_parameters: ids_of(return_parameters),
                override_specifier: override_specifier.map(id_of),
                body: body.map(id_of),
            }),
            NodeKind::Parameter {
                name,
                type_name,
                storage_location,
            } => wire::Node::Parameter(wire::Parameter {
                id,
                src,
                type_description,
                name: name.clone(),
                type_name: type_name.map(id_of),
                storage_location: *storage_location,
            }),
            NodeKind::VariableDeclaration {
                name,
                visibility,
                storage_location,
                state_variable,
                type_name,
                value,
            } => wire::Node::VariableDeclaration(wire::VariableDeclaration {
                id,
                src,
                type_description,
                name: name.clone(),
                visibility: *visibility,
                storage_location: *storage_location,
                state_variable: *state_variable,
                type_name: type_name.map(id_of),
                value: value.map(id_of),
            }),
            NodeKind::OverrideSpecifier {
                name,
                overrides,
                referenced_declaration,
            } => wire::Node::OverrideSpecifier(wire::OverrideSpecifier {
                id,
                src,
                type_description,
                name: name.clone(),
                overrides: ids_of(overrides),
                referenced_declaration: referenced_declaration.map(id_of),
            }),
            NodeKind::Block { statements } => wire::Node::Block(wire::Block {
                id,
                src,
                type_description,
                statements: ids_of(statements),
            }),
            NodeKind::ExpressionStatement { expression } => {
                wire::Node::ExpressionStatement(wire::ExpressionStatement {
                    id,
                    src,
                    type_description,
                    expression: id_of(*expression),
                })
            }
            NodeKind::ReturnStatement { expression } => {
                wire::Node::ReturnStatement(wire::ReturnStatement {
                    id,
                    src,
                    type_description,
                    expression: expression.map(id_of),
                })
            }
            NodeKind::VariableDeclarationStatement {
                declarations,
                initial_value,
            } => wire::Node::VariableDeclarationStatement(wire::VariableDeclarationStatement {
                id,
                src,
                type_description,
                declarations: ids_of(declarations),
                initial_value: initial_value.map(id_of),
            }),
            NodeKind::IfStatement {
                condition,
                true_body,
                false_body,
            } => wire::Node::IfStatement(wire::IfStatement {
                id,
                src,
                type_description,
                condition: id_of(*condition),
                true_body: id_of(*true_body),
                false_body: false_body.map(id_of),
            }),
            NodeKind::Identifier {
                name,
                referenced_declaration,
            } => wire::Node::Identifier(wire::Identifier {
                id,
                src,
                type_description,
                name: name.clone(),
                referenced_declaration: referenced_declaration.map(id_of),
            }),
            NodeKind::Literal { kind, value } => wire::Node::Literal(wire::Literal {
                id,
                src,
                type_description,
                kind: *kind,
                value: value.clone(),
            }),
            NodeKind::BinaryOperation {
                operator,
                left,
                right,
            } => wire::Node::BinaryOperation(wire::BinaryOperation {
                id,
                src,
                type_description,
                operator: operator.clone(),
                left_expression: id_of(*left),
                right_expression: id_of(*right),
            }),
            NodeKind::UnaryOperation {
                operator,
                expression,
            } => wire::Node::UnaryOperation(wire::UnaryOperation {
                id,
                src,
                type_description,
                operator: operator.clone(),
                expression: id_of(*expression),
            }),
            NodeKind::FunctionCall {
                expression,
                arguments,
                argument_types,
                referenced_declaration,
            } => wire::Node::FunctionCall(wire::FunctionCall {
                id,
                src,
                type_description,
                expression: id_of(*expression),
                arguments: ids_of(arguments),
                argument_types: descs_of(argument_types),
                referenced_declaration: referenced_declaration.map(id_of),
            }),
            NodeKind::MemberAccess {
                expression,
                member_name,
                referenced_declaration,
            } => wire::Node::MemberAccess(wire::MemberAccess {
                id,
                src,
                type_description,
                expression: id_of(*expression),
                member_name: member_name.clone(),
                referenced_declaration: referenced_declaration.map(id_of),
            }),
            NodeKind::IndexAccess { base, index } => wire::Node::IndexAccess(wire::IndexAccess {
                id,
                src,
                type_description,
                base_expression: id_of(*base),
                index_expression: index.map(id_of),
            }),
            NodeKind::TupleExpression { components } => {
                wire::Node::TupleExpression(wire::TupleExpression {
                    id,
                    src,
                    type_description,
                    components: ids_of(components),
                })
            }
            NodeKind::PayableConversion {
                payable,
                arguments,
                argument_types,
                referenced_declaration,
            } => wire::Node::PayableConversion(wire::PayableConversion {
                id,
                src,
                type_description,
                payable: *payable,
                arguments: ids_of(arguments),
                argument_types: descs_of(argument_types),
                referenced_declaration: referenced_declaration.map(id_of),
            }),
            NodeKind::ElementaryTypeName { name } => {
                wire::Node::ElementaryTypeName(wire::ElementaryTypeName {
                    id,
                    src,
                    type_description,
                    name: name.clone(),
                })
            }
            NodeKind::UserDefinedTypeName {
                name,
                referenced_declaration,
            } => wire::Node::UserDefinedTypeName(wire::UserDefinedTypeName {
                id,
                src,
                type_description,
                name: name.clone(),
                referenced_declaration: referenced_declaration.map(id_of),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedesc;
    use cn_span::{IdTracker, TokenPos};

    #[test]
    fn projection_round_trips_scalar_fields() {
        let tracker = IdTracker::new();
        let parent = tracker.next_id();
        let span = SourceSpan::from_tokens(TokenPos::new(4, 8, 120), TokenPos::new(4, 28, 140))
            .with_parent(parent);

        let mut node = Node::new(
            tracker.next_id(),
            span.clone(),
            NodeKind::PayableConversion {
                payable: true,
                arguments: Vec::new(),
                argument_types: Vec::new(),
                referenced_declaration: None,
            },
        );
        node.type_description = Some(typedesc::payable_conversion(&[]));

        let wire::Node::PayableConversion(message) = node.to_external() else {
            panic!("projected to the wrong message kind");
        };

        assert_eq!(message.id, node.id.as_u64());
        assert_eq!(message.src.line, span.line);
        assert_eq!(message.src.column, span.column);
        assert_eq!(message.src.start, span.start);
        assert_eq!(message.src.end, span.end);
        assert_eq!(message.src.length, span.length);
        assert_eq!(message.src.parent_index, Some(parent.as_u64()));
        assert!(message.payable);
        assert_eq!(message.referenced_declaration, None);
        assert_eq!(
            message.type_description.map(|desc| desc.type_identifier),
            Some("t_function_payable$_$".to_string())
        );
    }

    #[test]
    fn override_specifier_projection_keeps_the_name() {
        let tracker = IdTracker::new();
        let overridden = tracker.next_id();
        let node = Node::new(
            tracker.next_id(),
            SourceSpan::synthetic(),
            NodeKind::OverrideSpecifier {
                name: "sweep".into(),
                overrides: Vec::new(),
                referenced_declaration: Some(overridden),
            },
        );

        let wire::Node::OverrideSpecifier(message) = node.to_external() else {
            panic!("projected to the wrong message kind");
        };
        assert_eq!(message.name, "sweep");
        assert_eq!(message.referenced_declaration, Some(overridden.as_u64()));
    }

    #[test]
    fn every_kind_projects_totally() {
        let tracker = IdTracker::new();
        let child = tracker.next_id();
        let kinds = vec![
            NodeKind::SourceUnit {
                name: "vault.sol".into(),
                nodes: vec![child],
            },
            NodeKind::PragmaDirective {
                text: "pragma solidity ^0.8.0;".into(),
            },
            NodeKind::ContractDefinition {
                name: "Vault".into(),
                nodes: vec![child],
            },
            NodeKind::StructDefinition {
                name: "Position".into(),
                canonical_name: "Vault.Position".into(),
                visibility: cn_wire::Visibility::Internal,
                storage_location: cn_wire::StorageLocation::Default,
                members: vec![child],
            },
            NodeKind::EnumDefinition {
                name: "Mode".into(),
                canonical_name: "Vault.Mode".into(),
                members: vec![child],
            },
            NodeKind::EnumValue { name: "Open".into() },
            NodeKind::FunctionDefinition {
                name: "deposit".into(),
                visibility: cn_wire::Visibility::Public,
                state_mutability: cn_wire::Mutability::Payable,
                parameters: vec![child],
                return_parameters: Vec::new(),
                override_specifier: None,
                body: None,
            },
            NodeKind::Parameter {
                name: "amount".into(),
                type_name: Some(child),
                storage_location: cn_wire::StorageLocation::Default,
            },
            NodeKind::VariableDeclaration {
                name: "owner".into(),
                visibility: cn_wire::Visibility::Private,
                storage_location: cn_wire::StorageLocation::Default,
                state_variable: true,
                type_name: Some(child),
                value: None,
            },
            NodeKind::OverrideSpecifier {
                name: "deposit".into(),
                overrides: vec![child],
                referenced_declaration: None,
            },
            NodeKind::Block {
                statements: vec![child],
            },
            NodeKind::ExpressionStatement { expression: child },
            NodeKind::ReturnStatement { expression: None },
            NodeKind::VariableDeclarationStatement {
                declarations: vec![child],
                initial_value: None,
            },
            NodeKind::IfStatement {
                condition: child,
                true_body: child,
                false_body: None,
            },
            NodeKind::Identifier {
                name: "owner".into(),
                referenced_declaration: None,
            },
            NodeKind::Literal {
                kind: cn_wire::LiteralKind::Number,
                value: "42".into(),
            },
            NodeKind::BinaryOperation {
                operator: "+".into(),
                left: child,
                right: child,
            },
            NodeKind::UnaryOperation {
                operator: "-".into(),
                expression: child,
            },
            NodeKind::FunctionCall {
                expression: child,
                arguments: vec![child],
                argument_types: vec![typedesc::elementary("uint256")],
                referenced_declaration: None,
            },
            NodeKind::MemberAccess {
                expression: child,
                member_name: "balance".into(),
                referenced_declaration: None,
            },
            NodeKind::IndexAccess {
                base: child,
                index: None,
            },
            NodeKind::TupleExpression {
                components: vec![child],
            },
            NodeKind::PayableConversion {
                payable: false,
                arguments: Vec::new(),
                argument_types: Vec::new(),
                referenced_declaration: None,
            },
            NodeKind::ElementaryTypeName {
                name: "uint256".into(),
            },
            NodeKind::UserDefinedTypeName {
                name: "Position".into(),
                referenced_declaration: None,
            },
        ];

        for kind in kinds {
            let node = Node::new(tracker.next_id(), SourceSpan::synthetic(), kind);
            let node_type = node.node_type();
            let message = node.to_external();
            assert_eq!(message.id(), node.id.as_u64(), "{node_type:?}");
        }
    }
}
