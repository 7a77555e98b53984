//! AST → IR lowering pass
//!
//! [`IrBuilder`] borrows a completed AST immutably and summarizes its
//! declarations into flattened records. The borrow guarantees lowering never
//! mutates the tree, so lowering the same AST any number of times yields
//! equal records.

use cn_ast::{Ast, Node, NodeKind};
use cn_ir::{
    ContractIr, EnumIr, FunctionIr, OverrideIr, ParameterIr, SourceUnitIr, StructIr,
};
use cn_span::NodeId;
use cn_wire::StorageLocation;
use miette::Diagnostic;
use thiserror::Error;

/// Lowering failure: the AST handed in is internally inconsistent
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum LowerError {
    /// A node references an ID the arena does not hold
    #[error("node {id} is not present in the tree")]
    #[diagnostic(code(cinder::ir::missing_node))]
    MissingNode { id: NodeId },

    /// The node at `id` is not the kind this lowering expects
    #[error("node {id} is a {found}, expected a {expected}")]
    #[diagnostic(code(cinder::ir::kind_mismatch))]
    KindMismatch {
        id: NodeId,
        expected: &'static str,
        found: String,
    },
}

/// Lowers declarations out of one completed AST
pub struct IrBuilder<'ast> {
    ast: &'ast Ast,
}

impl<'ast> IrBuilder<'ast> {
    pub fn new(ast: &'ast Ast) -> Self {
        Self { ast }
    }

    fn node(&self, id: NodeId) -> Result<&'ast Node, LowerError> {
        self.ast.get(id).ok_or(LowerError::MissingNode { id })
    }

    /// Nearest enclosing contract definition, found through span parents
    fn enclosing_contract_name(&self, node: &Node) -> Option<String> {
        let mut current = node.src.parent;
        while let Some(id) = current {
            let parent = self.ast.get(id)?;
            if let NodeKind::ContractDefinition { name, .. } = &parent.kind {
                return Some(name.clone());
            }
            current = parent.src.parent;
        }
        None
    }

    fn qualify(&self, node: &Node, name: &str) -> String {
        match self.enclosing_contract_name(node) {
            Some(contract) => format!("{contract}.{name}"),
            None => name.to_owned(),
        }
    }

    pub fn lower_source_unit(&self, id: NodeId) -> Result<SourceUnitIr, LowerError> {
        let node = self.node(id)?;
        let NodeKind::SourceUnit { name, nodes } = &node.kind else {
            return Err(kind_mismatch(node, "source unit"));
        };

        let mut contracts = Vec::new();
        for child in nodes {
            let member = self.node(*child)?;
            if matches!(member.kind, NodeKind::ContractDefinition { .. }) {
                contracts.push(self.lower_contract(*child)?);
            }
        }

        Ok(SourceUnitIr {
            id,
            name: name.clone(),
            contracts,
            source: node.clone(),
        })
    }

    pub fn lower_contract(&self, id: NodeId) -> Result<ContractIr, LowerError> {
        let node = self.node(id)?;
        let NodeKind::ContractDefinition { name, nodes } = &node.kind else {
            return Err(kind_mismatch(node, "contract definition"));
        };

        let mut functions = Vec::new();
        let mut structs = Vec::new();
        let mut enums = Vec::new();
        for child in nodes {
            match &self.node(*child)?.kind {
                NodeKind::FunctionDefinition { .. } => functions.push(self.lower_function(*child)?),
                NodeKind::StructDefinition { .. } => structs.push(self.lower_struct(*child)?),
                NodeKind::EnumDefinition { .. } => enums.push(self.lower_enum(*child)?),
                // State variables and nested statements are not summarized.
                _ => {}
            }
        }

        Ok(ContractIr {
            id,
            name: name.clone(),
            functions,
            structs,
            enums,
            source: node.clone(),
        })
    }

    pub fn lower_function(&self, id: NodeId) -> Result<FunctionIr, LowerError> {
        let node = self.node(id)?;
        let NodeKind::FunctionDefinition {
            name,
            visibility,
            state_mutability,
            parameters,
            return_parameters,
            override_specifier,
            ..
        } = &node.kind
        else {
            return Err(kind_mismatch(node, "function definition"));
        };

        let override_specifier = match override_specifier {
            Some(specifier) => Some(self.lower_override(*specifier)?),
            None => None,
        };

        Ok(FunctionIr {
            id,
            name: name.clone(),
            canonical_name: self.qualify(node, name),
            referenced_declaration: None,
            visibility: *visibility,
            state_mutability: *state_mutability,
            parameters: self.lower_parameters(parameters)?,
            return_parameters: self.lower_parameters(return_parameters)?,
            override_specifier,
            type_description: node.type_description.clone(),
            source: node.clone(),
        })
    }

    pub fn lower_struct(&self, id: NodeId) -> Result<StructIr, LowerError> {
        let node = self.node(id)?;
        let NodeKind::StructDefinition {
            name,
            canonical_name,
            visibility,
            storage_location,
            members,
        } = &node.kind
        else {
            return Err(kind_mismatch(node, "struct definition"));
        };

        Ok(StructIr {
            id,
            name: name.clone(),
            canonical_name: canonical_name.clone(),
            referenced_declaration: None,
            visibility: *visibility,
            storage_location: *storage_location,
            members: self.lower_parameters(members)?,
            type_description: node.type_description.clone(),
            source: node.clone(),
        })
    }

    pub fn lower_enum(&self, id: NodeId) -> Result<EnumIr, LowerError> {
        let node = self.node(id)?;
        let NodeKind::EnumDefinition {
            name,
            canonical_name,
            members,
        } = &node.kind
        else {
            return Err(kind_mismatch(node, "enum definition"));
        };

        let mut records = Vec::new();
        for member in members {
            let value = self.node(*member)?;
            let NodeKind::EnumValue { name: value_name } = &value.kind else {
                return Err(kind_mismatch(value, "enum value"));
            };
            records.push(ParameterIr {
                id: *member,
                name: value_name.clone(),
                type_name: canonical_name.clone(),
                storage_location: StorageLocation::Default,
                type_description: value.type_description.clone(),
            });
        }

        Ok(EnumIr {
            id,
            name: name.clone(),
            canonical_name: canonical_name.clone(),
            members: records,
            type_description: node.type_description.clone(),
            source: node.clone(),
        })
    }

    pub fn lower_override(&self, id: NodeId) -> Result<OverrideIr, LowerError> {
        let node = self.node(id)?;
        let NodeKind::OverrideSpecifier {
            name,
            referenced_declaration,
            ..
        } = &node.kind
        else {
            return Err(kind_mismatch(node, "override specifier"));
        };

        Ok(OverrideIr {
            id,
            name: name.clone(),
            referenced_declaration: *referenced_declaration,
            type_description: node.type_description.clone(),
            source: node.clone(),
        })
    }

    /// Member records in AST declaration order
    fn lower_parameters(&self, members: &[NodeId]) -> Result<Vec<ParameterIr>, LowerError> {
        let mut records = Vec::new();
        for member in members {
            let node = self.node(*member)?;
            let record = match &node.kind {
                NodeKind::Parameter {
                    name,
                    type_name,
                    storage_location,
                } => ParameterIr {
                    id: *member,
                    name: name.clone(),
                    type_name: self.type_display(*type_name)?,
                    storage_location: *storage_location,
                    type_description: node.type_description.clone(),
                },
                NodeKind::VariableDeclaration {
                    name,
                    storage_location,
                    type_name,
                    ..
                } => ParameterIr {
                    id: *member,
                    name: name.clone(),
                    type_name: self.type_display(*type_name)?,
                    storage_location: *storage_location,
                    type_description: node.type_description.clone(),
                },
                _ => return Err(kind_mismatch(node, "parameter")),
            };
            records.push(record);
        }
        Ok(records)
    }

    fn type_display(&self, type_name: Option<NodeId>) -> Result<String, LowerError> {
        let Some(id) = type_name else {
            return Ok(String::new());
        };
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::ElementaryTypeName { name } | NodeKind::UserDefinedTypeName { name, .. } => {
                Ok(name.clone())
            }
            _ => Err(kind_mismatch(node, "type name")),
        }
    }
}

fn kind_mismatch(node: &Node, expected: &'static str) -> LowerError {
    LowerError::KindMismatch {
        id: node.id,
        expected,
        found: format!("{:?}", node.node_type()),
    }
}
