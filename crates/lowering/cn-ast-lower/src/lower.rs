//! Context dispatch and AST construction
//!
//! Construction order per node: allocate the node's ID, derive its span from
//! the context (parenting it per the scope), recurse into children, then
//! compute the type description from the now-available child descriptions.

use crate::error::{BuildDiagnostic, BuildError};
use crate::scope::Scope;
use cn_ast::{typedesc, Ast, Node, NodeKind, ResolutionOutcome, TypeDescription};
use cn_span::{IdTracker, NodeId, SourceSpan};
use cn_syntax::{Context, ContextKind};
use cn_wire::{LiteralKind, Mutability, StorageLocation, Visibility};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// One build session: context tree in, typed AST out
pub struct AstBuilder {
    tracker: IdTracker,
    ast: Ast,
    /// Declared names (simple and contract-qualified) to node IDs
    declarations: IndexMap<String, NodeId>,
    diagnostics: Vec<BuildDiagnostic>,
    /// Name of the contract currently being lowered, for canonical names
    contract_name: Option<String>,
}

impl AstBuilder {
    /// New session with its own ID tracker
    pub fn new() -> Self {
        Self::with_tracker(IdTracker::new())
    }

    /// New session drawing IDs from a caller-provided tracker, for drivers
    /// that want one ID space across several units
    pub fn with_tracker(tracker: IdTracker) -> Self {
        Self {
            tracker,
            ast: Ast::new(),
            declarations: IndexMap::new(),
            diagnostics: Vec::new(),
            contract_name: None,
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn diagnostics(&self) -> &[BuildDiagnostic] {
        &self.diagnostics
    }

    pub fn declarations(&self) -> &IndexMap<String, NodeId> {
        &self.declarations
    }

    /// Finish the session, yielding the AST and collected diagnostics
    pub fn finish(self) -> (Ast, Vec<BuildDiagnostic>) {
        (self.ast, self.diagnostics)
    }

    /// Entry point: dispatch a source-unit context
    pub fn build_source_unit(&mut self, ctx: &Context) -> Result<NodeId, BuildError> {
        if ctx.kind != ContextKind::SourceUnit {
            return Err(unknown_alternative(ctx));
        }

        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, None);
        let scope = Scope {
            unit: Some(id),
            ..Scope::root()
        };

        let mut nodes = Vec::new();
        for child in &ctx.children {
            nodes.push(self.lower_unit_member(child, scope)?);
        }

        let node = Node::new(
            id,
            src,
            NodeKind::SourceUnit {
                name: ctx.text.clone(),
                nodes,
            },
        );
        Ok(self.ast.insert(node))
    }

    /// Deferred-reference resolution over the completed AST
    ///
    /// Installs references for every node that still names a declaration,
    /// then repeats the revisit pass while any node reports it needs one.
    /// Between passes, descriptions that landed on type-name nodes are
    /// copied up to the declarations owning them, so a reference to a
    /// user-defined-typed variable converges once its type name resolves.
    /// Names with no constructed declaration are recorded as diagnostics and
    /// left unset.
    pub fn resolve_references(&mut self) {
        let pending: Vec<(NodeId, String)> = self
            .ast
            .nodes()
            .filter_map(|node| {
                node.pending_reference()
                    .map(|name| (node.id, name.to_owned()))
            })
            .collect();

        let mut revisit = Vec::new();
        let mut reported = FxHashSet::default();
        for (id, name) in pending {
            match self.lookup_declaration(&name) {
                Some(declaration) => {
                    if self.install_reference(id, declaration) == ResolutionOutcome::RevisitRequired
                    {
                        revisit.push((id, declaration));
                    }
                }
                None => {
                    if reported.insert(id) {
                        self.diagnostics
                            .push(BuildDiagnostic::UnresolvedReference { node: id, name });
                    }
                }
            }
        }

        self.propagate_type_descriptions();
        while !revisit.is_empty() {
            let before = revisit.len();
            let mut next = Vec::new();
            for (id, declaration) in revisit {
                if self.install_reference(id, declaration) == ResolutionOutcome::RevisitRequired {
                    next.push((id, declaration));
                }
            }
            if next.len() == before {
                // No progress; a declaration cycle is keeping these untyped.
                break;
            }
            revisit = next;
            self.propagate_type_descriptions();
        }
    }

    /// Copy resolved type-name descriptions onto the declarations that own
    /// them. A variable or parameter of user-defined type is untyped at
    /// construction; once its type-name child resolves, the declaration
    /// adopts that description and revisited references can read it.
    fn propagate_type_descriptions(&mut self) {
        let updates: Vec<(NodeId, TypeDescription)> = self
            .ast
            .nodes()
            .filter(|node| node.type_description.is_none())
            .filter_map(|node| {
                let type_name = match &node.kind {
                    NodeKind::Parameter { type_name, .. }
                    | NodeKind::VariableDeclaration { type_name, .. } => (*type_name)?,
                    _ => return None,
                };
                self.ast
                    .type_description_of(type_name)
                    .map(|description| (node.id, description.clone()))
            })
            .collect();

        for (id, description) in updates {
            if let Some(node) = self.ast.get_mut(id) {
                node.type_description = Some(description);
            }
        }
    }

    fn lookup_declaration(&self, name: &str) -> Option<NodeId> {
        self.declarations.get(name).copied()
    }

    fn install_reference(&mut self, id: NodeId, declaration: NodeId) -> ResolutionOutcome {
        let description = self
            .ast
            .type_description_of(declaration)
            .cloned()
            .unwrap_or_else(|| TypeDescription::new("", ""));
        match self.ast.get_mut(id) {
            Some(node) => node.set_reference(declaration, &description),
            None => ResolutionOutcome::Complete,
        }
    }

    fn span_of(&mut self, id: NodeId, ctx: &Context, parent: Option<NodeId>) -> SourceSpan {
        let mut span = SourceSpan::from_tokens(ctx.start, ctx.stop);
        span.parent = parent;
        if span.is_degenerate() {
            self.diagnostics.push(BuildDiagnostic::DegenerateSpan {
                node: id,
                start: span.start,
                end: span.end,
            });
        }
        span
    }

    fn declare(&mut self, name: &str, id: NodeId) {
        self.declarations.insert(name.to_owned(), id);
        if let Some(contract) = &self.contract_name {
            self.declarations.insert(format!("{contract}.{name}"), id);
        }
    }

    fn canonical_name(&self, name: &str) -> String {
        match &self.contract_name {
            Some(contract) => format!("{contract}.{name}"),
            None => name.to_owned(),
        }
    }

    // --- declarations ---

    fn lower_unit_member(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        match &ctx.kind {
            ContextKind::PragmaDirective => self.lower_pragma(ctx, scope),
            ContextKind::ContractDefinition => self.lower_contract(ctx, scope),
            ContextKind::StructDefinition => self.lower_struct(ctx, scope),
            ContextKind::EnumDefinition => self.lower_enum(ctx, scope),
            ContextKind::FunctionDefinition => self.lower_function(ctx, scope),
            _ => Err(unknown_alternative(ctx)),
        }
    }

    fn lower_pragma(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let node = Node::new(
            id,
            src,
            NodeKind::PragmaDirective {
                text: ctx.text.clone(),
            },
        );
        Ok(self.ast.insert(node))
    }

    fn lower_contract(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let name = required_name(ctx)?;
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        self.declare(&name, id);

        let previous = self.contract_name.replace(name.clone());
        let inner = scope.inside_contract(id);

        let mut nodes = Vec::new();
        let mut result = Ok(());
        for child in &ctx.children {
            if child.kind == ContextKind::Identifier {
                continue;
            }
            match self.lower_contract_member(child, inner) {
                Ok(member) => nodes.push(member),
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
        self.contract_name = previous;
        result?;

        let mut node = Node::new(id, src, NodeKind::ContractDefinition { name: name.clone(), nodes });
        node.type_description = Some(typedesc::contract(&name));
        Ok(self.ast.insert(node))
    }

    fn lower_contract_member(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        match &ctx.kind {
            ContextKind::StructDefinition => self.lower_struct(ctx, scope),
            ContextKind::EnumDefinition => self.lower_enum(ctx, scope),
            ContextKind::FunctionDefinition => self.lower_function(ctx, scope),
            ContextKind::StateVariableDeclaration => self.lower_state_variable(ctx, scope),
            _ => Err(unknown_alternative(ctx)),
        }
    }

    fn lower_struct(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let name = required_name(ctx)?;
        let canonical_name = self.canonical_name(&name);
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        self.declare(&name, id);

        let mut members = Vec::new();
        for child in ctx.children_of_kind(&ContextKind::Parameter) {
            members.push(self.lower_parameter(child, scope.inside_expression(id))?);
        }

        let mut node = Node::new(
            id,
            src,
            NodeKind::StructDefinition {
                name,
                canonical_name: canonical_name.clone(),
                visibility: Visibility::Internal,
                storage_location: StorageLocation::Default,
                members,
            },
        );
        node.type_description = Some(typedesc::struct_type(&canonical_name));
        Ok(self.ast.insert(node))
    }

    fn lower_enum(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let name = required_name(ctx)?;
        let canonical_name = self.canonical_name(&name);
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        self.declare(&name, id);

        let enum_description = typedesc::enum_type(&canonical_name);
        let mut members = Vec::new();
        for child in ctx.children_of_kind(&ContextKind::EnumValue) {
            let value_id = self.tracker.next_id();
            let value_src = self.span_of(value_id, child, Some(id));
            let mut value = Node::new(
                value_id,
                value_src,
                NodeKind::EnumValue {
                    name: child.text.clone(),
                },
            );
            value.type_description = Some(enum_description.clone());
            members.push(self.ast.insert(value));
        }

        let mut node = Node::new(
            id,
            src,
            NodeKind::EnumDefinition {
                name,
                canonical_name,
                members,
            },
        );
        node.type_description = Some(enum_description);
        Ok(self.ast.insert(node))
    }

    fn lower_function(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let name = required_name(ctx)?;
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        self.declare(&name, id);

        let visibility = visibility_of(ctx);
        let state_mutability = mutability_of(ctx);
        let inner = scope.inside_function(id);

        let mut lists = ctx.children_of_kind(&ContextKind::ParameterList);
        let parameters = match lists.next() {
            Some(list) => self.lower_parameter_list(list, inner)?,
            None => Vec::new(),
        };
        let return_parameters = match lists.next() {
            Some(list) => self.lower_parameter_list(list, inner)?,
            None => Vec::new(),
        };

        let override_specifier = match ctx.child_of_kind(&ContextKind::OverrideSpecifier) {
            Some(specifier) => Some(self.lower_override_specifier(specifier, inner)?),
            None => None,
        };

        let body = match ctx.child_of_kind(&ContextKind::Block) {
            Some(block) => Some(self.lower_statement(block, inner)?),
            None => None,
        };

        let parameter_types: Vec<TypeDescription> = parameters
            .iter()
            .filter_map(|parameter| self.ast.type_description_of(*parameter).cloned())
            .collect();

        let mut node = Node::new(
            id,
            src,
            NodeKind::FunctionDefinition {
                name,
                visibility,
                state_mutability,
                parameters,
                return_parameters,
                override_specifier,
                body,
            },
        );
        node.type_description = Some(typedesc::function(&parameter_types));
        Ok(self.ast.insert(node))
    }

    fn lower_parameter_list(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<Vec<NodeId>, BuildError> {
        let mut parameters = Vec::new();
        for child in &ctx.children {
            if child.kind != ContextKind::Parameter {
                return Err(unknown_alternative(child));
            }
            parameters.push(self.lower_parameter(child, scope)?);
        }
        Ok(parameters)
    }

    fn lower_parameter(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let name = ctx.identifier_text().unwrap_or_default().to_owned();
        let storage_location = storage_location_of(ctx);

        let type_name = match type_name_child(ctx) {
            Some(child) => Some(self.lower_type_name(child, scope.inside_expression(id))?),
            None => None,
        };
        let description = type_name.and_then(|type_name| {
            self.ast.type_description_of(type_name).cloned()
        });

        let mut node = Node::new(
            id,
            src,
            NodeKind::Parameter {
                name,
                type_name,
                storage_location,
            },
        );
        node.type_description = description;
        Ok(self.ast.insert(node))
    }

    fn lower_state_variable(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let name = required_name(ctx)?;
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        self.declare(&name, id);

        let type_name = match type_name_child(ctx) {
            Some(child) => Some(self.lower_type_name(child, scope.inside_expression(id))?),
            None => None,
        };
        let description = type_name.and_then(|type_name| {
            self.ast.type_description_of(type_name).cloned()
        });

        // The declaration's name arrives as an identifier production of its
        // own; the initializer is any expression child other than that one.
        let name_index = ctx
            .children
            .iter()
            .position(|child| child.kind == ContextKind::Identifier);
        let value_ctx = ctx
            .children
            .iter()
            .enumerate()
            .find(|(index, child)| Some(*index) != name_index && is_expression(&child.kind))
            .map(|(_, child)| child);

        // The initializer sees this declaration as its span parent.
        let value = match value_ctx {
            Some(child) => Some(self.lower_expression(child, scope.initializing(id))?),
            None => None,
        };

        let mut node = Node::new(
            id,
            src,
            NodeKind::VariableDeclaration {
                name,
                visibility: visibility_of(ctx),
                storage_location: storage_location_of(ctx),
                state_variable: true,
                type_name,
                value,
            },
        );
        node.type_description = description;
        Ok(self.ast.insert(node))
    }

    fn lower_override_specifier(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let name = ctx.identifier_text().unwrap_or(&ctx.text).to_owned();

        let mut overrides = Vec::new();
        for child in ctx.children_of_kind(&ContextKind::UserDefinedTypeName) {
            overrides.push(self.lower_type_name(child, scope.inside_expression(id))?);
        }

        let node = Node::new(
            id,
            src,
            NodeKind::OverrideSpecifier {
                name,
                overrides,
                referenced_declaration: None,
            },
        );
        Ok(self.ast.insert(node))
    }

    // --- statements ---

    fn lower_statement(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        match &ctx.kind {
            ContextKind::Block => self.lower_block(ctx, scope),
            ContextKind::ExpressionStatement => self.lower_expression_statement(ctx, scope),
            ContextKind::ReturnStatement => self.lower_return(ctx, scope),
            ContextKind::VariableDeclarationStatement => {
                self.lower_variable_statement(ctx, scope)
            }
            ContextKind::IfStatement => self.lower_if(ctx, scope),
            _ => Err(unknown_alternative(ctx)),
        }
    }

    fn lower_block(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let inner = scope.inside_body(id);

        let mut statements = Vec::new();
        for child in &ctx.children {
            statements.push(self.lower_statement(child, inner)?);
        }

        let node = Node::new(id, src, NodeKind::Block { statements });
        Ok(self.ast.insert(node))
    }

    fn lower_expression_statement(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let child = ctx
            .children
            .first()
            .ok_or_else(|| missing_child(ctx, "expression"))?;
        let expression = self.lower_expression(child, scope)?;

        let node = Node::new(id, src, NodeKind::ExpressionStatement { expression });
        Ok(self.ast.insert(node))
    }

    fn lower_return(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let expression = match ctx.children.first() {
            Some(child) => Some(self.lower_expression(child, scope)?),
            None => None,
        };

        let node = Node::new(id, src, NodeKind::ReturnStatement { expression });
        Ok(self.ast.insert(node))
    }

    fn lower_variable_statement(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());

        let mut declarations = Vec::new();
        for child in ctx.children_of_kind(&ContextKind::Parameter) {
            declarations.push(self.lower_local_declaration(child, scope)?);
        }

        // The initializer parents to the first declared variable.
        let initial_value = match ctx.children.iter().find(|child| is_expression(&child.kind)) {
            Some(child) => {
                let inner = match declarations.first() {
                    Some(first) => scope.initializing(*first),
                    None => scope,
                };
                Some(self.lower_expression(child, inner)?)
            }
            None => None,
        };

        let node = Node::new(
            id,
            src,
            NodeKind::VariableDeclarationStatement {
                declarations,
                initial_value,
            },
        );
        Ok(self.ast.insert(node))
    }

    fn lower_local_declaration(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<NodeId, BuildError> {
        let name = required_name(ctx)?;
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        self.declare(&name, id);

        let type_name = match type_name_child(ctx) {
            Some(child) => Some(self.lower_type_name(child, scope.inside_expression(id))?),
            None => None,
        };
        let description = type_name.and_then(|type_name| {
            self.ast.type_description_of(type_name).cloned()
        });

        let mut node = Node::new(
            id,
            src,
            NodeKind::VariableDeclaration {
                name,
                visibility: Visibility::Internal,
                storage_location: storage_location_of(ctx),
                state_variable: false,
                type_name,
                value: None,
            },
        );
        node.type_description = description;
        Ok(self.ast.insert(node))
    }

    fn lower_if(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());

        let condition_ctx = ctx
            .children
            .iter()
            .find(|child| is_expression(&child.kind))
            .ok_or_else(|| missing_child(ctx, "condition"))?;
        let condition = self.lower_expression(condition_ctx, scope)?;

        let mut blocks = ctx.children_of_kind(&ContextKind::Block);
        let true_ctx = blocks.next().ok_or_else(|| missing_child(ctx, "body"))?;
        let true_body = self.lower_statement(true_ctx, scope)?;
        let false_body = match blocks.next() {
            Some(block) => Some(self.lower_statement(block, scope)?),
            None => None,
        };

        let node = Node::new(
            id,
            src,
            NodeKind::IfStatement {
                condition,
                true_body,
                false_body,
            },
        );
        Ok(self.ast.insert(node))
    }

    // --- expressions ---

    fn lower_expression(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        match &ctx.kind {
            ContextKind::Identifier => self.lower_identifier(ctx, scope),
            ContextKind::NumberLiteral => self.lower_literal(ctx, scope, LiteralKind::Number),
            ContextKind::StringLiteral => self.lower_literal(ctx, scope, LiteralKind::String),
            ContextKind::BooleanLiteral => self.lower_literal(ctx, scope, LiteralKind::Bool),
            ContextKind::HexLiteral => self.lower_literal(ctx, scope, LiteralKind::Hex),
            ContextKind::BinaryExpression => self.lower_binary(ctx, scope),
            ContextKind::UnaryExpression => self.lower_unary(ctx, scope),
            ContextKind::FunctionCall => self.lower_call(ctx, scope),
            ContextKind::MemberAccess => self.lower_member_access(ctx, scope),
            ContextKind::IndexAccess => self.lower_index_access(ctx, scope),
            ContextKind::TupleExpression => self.lower_tuple(ctx, scope),
            ContextKind::PayableConversion => self.lower_payable_conversion(ctx, scope),
            _ => Err(unknown_alternative(ctx)),
        }
    }

    fn lower_identifier(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let node = Node::new(
            id,
            src,
            NodeKind::Identifier {
                name: ctx.text.clone(),
                referenced_declaration: None,
            },
        );
        Ok(self.ast.insert(node))
    }

    fn lower_literal(
        &mut self,
        ctx: &Context,
        scope: Scope,
        kind: LiteralKind,
    ) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let mut node = Node::new(
            id,
            src,
            NodeKind::Literal {
                kind,
                value: ctx.text.clone(),
            },
        );
        node.type_description = Some(typedesc::literal(kind));
        Ok(self.ast.insert(node))
    }

    fn lower_binary(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let inner = scope.inside_expression(id);

        let mut operands = ctx.children.iter();
        let left_ctx = operands
            .next()
            .ok_or_else(|| missing_child(ctx, "left operand"))?;
        let right_ctx = operands
            .next()
            .ok_or_else(|| missing_child(ctx, "right operand"))?;

        let left = self.lower_expression(left_ctx, inner)?;
        let right = self.lower_expression(right_ctx, inner)?;
        let description = self.ast.type_description_of(left).cloned();

        let mut node = Node::new(
            id,
            src,
            NodeKind::BinaryOperation {
                operator: ctx.text.clone(),
                left,
                right,
            },
        );
        node.type_description = description;
        Ok(self.ast.insert(node))
    }

    fn lower_unary(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let operand_ctx = ctx
            .children
            .first()
            .ok_or_else(|| missing_child(ctx, "operand"))?;
        let expression = self.lower_expression(operand_ctx, scope.inside_expression(id))?;
        let description = self.ast.type_description_of(expression).cloned();

        let mut node = Node::new(
            id,
            src,
            NodeKind::UnaryOperation {
                operator: ctx.text.clone(),
                expression,
            },
        );
        node.type_description = description;
        Ok(self.ast.insert(node))
    }

    fn lower_call(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let inner = scope.inside_expression(id);

        let callee_ctx = ctx
            .children
            .iter()
            .find(|child| is_expression(&child.kind))
            .ok_or_else(|| missing_child(ctx, "callee"))?;
        let expression = self.lower_expression(callee_ctx, inner)?;

        let (arguments, argument_types) = self.lower_arguments(ctx, inner)?;

        let node = Node::new(
            id,
            src,
            NodeKind::FunctionCall {
                expression,
                arguments,
                argument_types,
                referenced_declaration: None,
            },
        );
        Ok(self.ast.insert(node))
    }

    fn lower_member_access(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let base_ctx = ctx
            .children
            .first()
            .ok_or_else(|| missing_child(ctx, "base expression"))?;
        let expression = self.lower_expression(base_ctx, scope.inside_expression(id))?;

        let node = Node::new(
            id,
            src,
            NodeKind::MemberAccess {
                expression,
                member_name: ctx.text.clone(),
                referenced_declaration: None,
            },
        );
        Ok(self.ast.insert(node))
    }

    fn lower_index_access(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let inner = scope.inside_expression(id);

        let mut children = ctx.children.iter();
        let base_ctx = children
            .next()
            .ok_or_else(|| missing_child(ctx, "base expression"))?;
        let base = self.lower_expression(base_ctx, inner)?;
        let index = match children.next() {
            Some(child) => Some(self.lower_expression(child, inner)?),
            None => None,
        };
        let description = self.ast.type_description_of(base).cloned();

        let mut node = Node::new(id, src, NodeKind::IndexAccess { base, index });
        node.type_description = description;
        Ok(self.ast.insert(node))
    }

    fn lower_tuple(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let inner = scope.inside_expression(id);

        let mut components = Vec::new();
        for child in &ctx.children {
            components.push(self.lower_expression(child, inner)?);
        }

        let component_types: Option<Vec<TypeDescription>> = components
            .iter()
            .map(|component| self.ast.type_description_of(*component).cloned())
            .collect();

        let mut node = Node::new(id, src, NodeKind::TupleExpression { components });
        node.type_description = component_types.map(|types| typedesc::tuple(&types));
        Ok(self.ast.insert(node))
    }

    /// Payable conversion: `payable(<args>)`
    ///
    /// Children are dispatched before the type description is computed; the
    /// description depends only on the argument descriptions, so this kind
    /// never requires a revisit pass.
    fn lower_payable_conversion(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<NodeId, BuildError> {
        let id = self.tracker.next_id();
        let src = self.span_of(id, ctx, scope.span_parent());
        let payable = ctx.has_child(&ContextKind::PayableKeyword);

        let (arguments, argument_types) = self.lower_arguments(ctx, scope.inside_expression(id))?;

        let mut node = Node::new(
            id,
            src,
            NodeKind::PayableConversion {
                payable,
                arguments,
                argument_types: argument_types.clone(),
                referenced_declaration: None,
            },
        );
        node.type_description = Some(typedesc::payable_conversion(&argument_types));
        Ok(self.ast.insert(node))
    }

    /// Lower a call-argument list child, keeping the type list parallel to
    /// the argument list (untyped arguments contribute an empty description)
    fn lower_arguments(
        &mut self,
        ctx: &Context,
        scope: Scope,
    ) -> Result<(Vec<NodeId>, Vec<TypeDescription>), BuildError> {
        let mut arguments = Vec::new();
        let mut argument_types = Vec::new();

        if let Some(list) = ctx.child_of_kind(&ContextKind::CallArgumentList) {
            for child in &list.children {
                let argument = self.lower_expression(child, scope)?;
                argument_types.push(
                    self.ast
                        .type_description_of(argument)
                        .cloned()
                        .unwrap_or_else(|| TypeDescription::new("", "")),
                );
                arguments.push(argument);
            }
        }

        Ok((arguments, argument_types))
    }

    // --- type names ---

    fn lower_type_name(&mut self, ctx: &Context, scope: Scope) -> Result<NodeId, BuildError> {
        match &ctx.kind {
            ContextKind::ElementaryTypeName => {
                let id = self.tracker.next_id();
                let src = self.span_of(id, ctx, scope.span_parent());
                let mut node = Node::new(
                    id,
                    src,
                    NodeKind::ElementaryTypeName {
                        name: ctx.text.clone(),
                    },
                );
                node.type_description = Some(typedesc::elementary(&ctx.text));
                Ok(self.ast.insert(node))
            }
            ContextKind::UserDefinedTypeName => {
                let id = self.tracker.next_id();
                let src = self.span_of(id, ctx, scope.span_parent());
                let node = Node::new(
                    id,
                    src,
                    NodeKind::UserDefinedTypeName {
                        name: ctx.text.clone(),
                        referenced_declaration: None,
                    },
                );
                Ok(self.ast.insert(node))
            }
            _ => Err(unknown_alternative(ctx)),
        }
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_alternative(ctx: &Context) -> BuildError {
    BuildError::UnknownAlternative {
        found: ctx.kind.to_string(),
        line: ctx.start.line,
        column: ctx.start.column,
    }
}

fn missing_child(ctx: &Context, expected: &'static str) -> BuildError {
    BuildError::MissingChild {
        kind: ctx.kind.to_string(),
        expected,
        line: ctx.start.line,
        column: ctx.start.column,
    }
}

fn required_name(ctx: &Context) -> Result<String, BuildError> {
    ctx.identifier_text()
        .map(str::to_owned)
        .ok_or_else(|| missing_child(ctx, "name"))
}

fn type_name_child(ctx: &Context) -> Option<&Context> {
    ctx.children.iter().find(|child| {
        matches!(
            child.kind,
            ContextKind::ElementaryTypeName | ContextKind::UserDefinedTypeName
        )
    })
}

fn is_expression(kind: &ContextKind) -> bool {
    matches!(
        kind,
        ContextKind::Identifier
            | ContextKind::NumberLiteral
            | ContextKind::StringLiteral
            | ContextKind::BooleanLiteral
            | ContextKind::HexLiteral
            | ContextKind::BinaryExpression
            | ContextKind::UnaryExpression
            | ContextKind::FunctionCall
            | ContextKind::MemberAccess
            | ContextKind::IndexAccess
            | ContextKind::TupleExpression
            | ContextKind::PayableConversion
    )
}

fn visibility_of(ctx: &Context) -> Visibility {
    match ctx
        .child_of_kind(&ContextKind::Visibility)
        .map(|child| child.text.as_str())
    {
        Some("public") => Visibility::Public,
        Some("private") => Visibility::Private,
        Some("external") => Visibility::External,
        _ => Visibility::Internal,
    }
}

fn mutability_of(ctx: &Context) -> Mutability {
    match ctx
        .child_of_kind(&ContextKind::StateMutability)
        .map(|child| child.text.as_str())
    {
        Some("payable") => Mutability::Payable,
        Some("view") => Mutability::View,
        Some("pure") => Mutability::Pure,
        _ => Mutability::Nonpayable,
    }
}

fn storage_location_of(ctx: &Context) -> StorageLocation {
    match ctx
        .child_of_kind(&ContextKind::StorageLocation)
        .map(|child| child.text.as_str())
    {
        Some("memory") => StorageLocation::Memory,
        Some("storage") => StorageLocation::Storage,
        Some("calldata") => StorageLocation::Calldata,
        _ => StorageLocation::Default,
    }
}
