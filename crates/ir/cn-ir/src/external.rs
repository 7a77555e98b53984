//! Projection of IR records into the wire schema

use crate::{
    ContractIr, EnumIr, FunctionIr, OverrideIr, ParameterIr, SourceUnitIr, StructIr,
};
use cn_span::{NodeId, SourceSpan};
use cn_wire::ir as wire;
use cn_wire::NodeType;

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

impl SourceUnitIr {
    pub fn to_external(&self) -> wire::SourceUnit {
        wire::SourceUnit {
            id: self.id.as_u64(),
            node_type: NodeType::SourceUnit,
            name: self.name.clone(),
            contracts: self
                .contracts
                .iter()
                .map(ContractIr::to_external)
                .collect(),
        }
    }
}

impl ContractIr {
    pub fn to_external(&self) -> wire::Contract {
        wire::Contract {
            id: self.id.as_u64(),
            node_type: NodeType::ContractDefinition,
            kind: NodeType::ContractDefinition,
            name: self.name.clone(),
            src: src_of(&self.source.src),
            functions: self
                .functions
                .iter()
                .map(FunctionIr::to_external)
                .collect(),
            structs: self.structs.iter().map(StructIr::to_external).collect(),
            enums: self.enums.iter().map(EnumIr::to_external).collect(),
        }
    }
}

impl FunctionIr {
    pub fn to_external(&self) -> wire::Function {
        wire::Function {
            id: self.id.as_u64(),
            node_type: NodeType::FunctionDefinition,
            kind: NodeType::FunctionDefinition,
            name: self.name.clone(),
            canonical_name: self.canonical_name.clone(),
            referenced_declaration_id: self.referenced_declaration.map(NodeId::as_u64),
            visibility: self.visibility,
            state_mutability: self.state_mutability,
            parameters: self
                .parameters
                .iter()
                .map(ParameterIr::to_external)
                .collect(),
            return_parameters: self
                .return_parameters
                .iter()
                .map(ParameterIr::to_external)
                .collect(),
            override_specifier: self
                .override_specifier
                .as_ref()
                .map(OverrideIr::to_external),
            type_description: self.type_description.as_ref().map(Into::into),
        }
    }
}

impl StructIr {
    pub fn to_external(&self) -> wire::Struct {
        wire::Struct {
            id: self.id.as_u64(),
            node_type: NodeType::StructDefinition,
            kind: NodeType::StructDefinition,
            name: self.name.clone(),
            canonical_name: self.canonical_name.clone(),
            referenced_declaration_id: self.referenced_declaration.map(NodeId::as_u64),
            visibility: self.visibility,
            storage_location: self.storage_location,
            members: self.members.iter().map(ParameterIr::to_external).collect(),
            type_name: "struct".into(),
            type_description: self.type_description.as_ref().map(Into::into),
        }
    }
}

impl EnumIr {
    pub fn to_external(&self) -> wire::Enum {
        wire::Enum {
            id: self.id.as_u64(),
            node_type: NodeType::EnumDefinition,
            kind: NodeType::EnumDefinition,
            name: self.name.clone(),
            canonical_name: self.canonical_name.clone(),
            members: self.members.iter().map(ParameterIr::to_external).collect(),
            type_description: self.type_description.as_ref().map(Into::into),
        }
    }
}

impl OverrideIr {
    pub fn to_external(&self) -> wire::Override {
        wire::Override {
            id: self.id.as_u64(),
            node_type: NodeType::OverrideSpecifier,
            name: self.name.clone(),
            referenced_declaration_id: self.referenced_declaration.map(NodeId::as_u64),
            type_description: self.type_description.as_ref().map(Into::into),
        }
    }
}

impl ParameterIr {
    pub fn to_external(&self) -> wire::Parameter {
        wire::Parameter {
            id: self.id.as_u64(),
            node_type: NodeType::Parameter,
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            storage_location: self.storage_location,
            type_description: self.type_description.as_ref().map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cn_ast::{Node, NodeKind, TypeDescription};
    use cn_span::{SourceSpan, TokenPos};
    use cn_wire::{StorageLocation, Visibility};

    #[test]
    fn struct_projection_carries_members_in_order() {
        let span = SourceSpan::from_tokens(TokenPos::new(3, 4, 40), TokenPos::new(8, 4, 110));
        let source = Node::new(
            NodeId(4),
            span,
            NodeKind::StructDefinition {
                name: "Position".into(),
                canonical_name: "Vault.Position".into(),
                visibility: Visibility::Internal,
                storage_location: StorageLocation::Default,
                members: vec![NodeId(5), NodeId(7)],
            },
        );
        let record = StructIr {
            id: NodeId(4),
            name: "Position".into(),
            canonical_name: "Vault.Position".into(),
            referenced_declaration: None,
            visibility: Visibility::Internal,
            storage_location: StorageLocation::Default,
            members: vec![
                ParameterIr {
                    id: NodeId(5),
                    name: "amount".into(),
                    type_name: "uint256".into(),
                    storage_location: StorageLocation::Default,
                    type_description: Some(TypeDescription::new("uint256", "t_uint256")),
                },
                ParameterIr {
                    id: NodeId(7),
                    name: "owner".into(),
                    type_name: "address".into(),
                    storage_location: StorageLocation::Default,
                    type_description: Some(TypeDescription::new("address", "t_address")),
                },
            ],
            type_description: Some(TypeDescription::new(
                "struct Vault.Position",
                "t_struct$_Vault_Position_$",
            )),
            source,
        };

        let message = record.to_external();
        assert_eq!(message.type_name, "struct");
        assert_eq!(message.members.len(), 2);
        assert_eq!(message.members[0].name, "amount");
        assert_eq!(message.members[1].name, "owner");
        assert_eq!(message.referenced_declaration_id, None);

        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["referenced_declaration_id"], serde_json::Value::Null);
        assert_eq!(value["members"][0]["type"], "uint256");
    }
}
