//! IR record messages
//!
//! Flattened semantic records for lowered declarations. Composite records
//! embed their member records (a struct carries its parameters) because the
//! members belong to the record; references to other declarations stay
//! numeric IDs.

use crate::{Mutability, NodeType, Src, StorageLocation, TypeDescription, Visibility};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub id: u64,
    pub node_type: NodeType,
    pub name: String,
    pub contracts: Vec<Contract>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: u64,
    pub node_type: NodeType,
    pub kind: NodeType,
    pub name: String,
    pub src: Src,
    pub functions: Vec<Function>,
    pub structs: Vec<Struct>,
    pub enums: Vec<Enum>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: u64,
    pub node_type: NodeType,
    pub kind: NodeType,
    pub name: String,
    pub canonical_name: String,
    pub referenced_declaration_id: Option<u64>,
    pub visibility: Visibility,
    pub state_mutability: Mutability,
    pub parameters: Vec<Parameter>,
    pub return_parameters: Vec<Parameter>,
    pub override_specifier: Option<Override>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    pub id: u64,
    pub node_type: NodeType,
    pub kind: NodeType,
    pub name: String,
    pub canonical_name: String,
    pub referenced_declaration_id: Option<u64>,
    pub visibility: Visibility,
    pub storage_location: StorageLocation,
    pub members: Vec<Parameter>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub id: u64,
    pub node_type: NodeType,
    pub kind: NodeType,
    pub name: String,
    pub canonical_name: String,
    pub members: Vec<Parameter>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub id: u64,
    pub node_type: NodeType,
    pub name: String,
    pub referenced_declaration_id: Option<u64>,
    pub type_description: Option<TypeDescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: u64,
    pub node_type: NodeType,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub storage_location: StorageLocation,
    pub type_description: Option<TypeDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_record_serializes_type_field_name() {
        let record = Struct {
            id: 4,
            node_type: NodeType::StructDefinition,
            kind: NodeType::StructDefinition,
            name: "Position".into(),
            canonical_name: "Vault.Position".into(),
            referenced_declaration_id: None,
            visibility: Visibility::Internal,
            storage_location: StorageLocation::Default,
            members: vec![],
            type_name: "struct".into(),
            type_description: Some(TypeDescription {
                type_string: "struct Vault.Position".into(),
                type_identifier: "t_struct$_Vault_Position_$".into(),
            }),
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["type"], "struct");
        assert_eq!(value["node_type"], "STRUCT_DEFINITION");
        assert_eq!(value["referenced_declaration_id"], serde_json::Value::Null);
    }
}
