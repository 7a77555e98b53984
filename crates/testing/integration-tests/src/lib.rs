//! Integration test utilities for the cinder front-end
//!
//! The grammar component lives outside this repository, so end-to-end tests
//! feed hand-built context trees into the pipeline. The fixture here owns
//! the standard `vault.sol` tree the tests share, plus helpers for building
//! ad-hoc contexts.

use anyhow::Result;
use cn_ast::Ast;
use cn_ast_lower::{AstBuilder, BuildDiagnostic};
use cn_span::{NodeId, TokenPos};
use cn_syntax::{Context, ContextKind};

pub fn pos(offset: u32) -> TokenPos {
    TokenPos::new(1, offset, offset)
}

pub fn ctx(kind: ContextKind, start: u32, stop: u32) -> Context {
    Context::new(kind, pos(start), pos(stop))
}

/// `<type> <name>` parameter or struct member production
pub fn parameter(name: &str, type_name: &str, start: u32) -> Context {
    ctx(ContextKind::Parameter, start, start + 20)
        .with_child(ctx(ContextKind::ElementaryTypeName, start, start + 8).with_text(type_name))
        .with_child(ctx(ContextKind::Identifier, start + 10, start + 16).with_text(name))
}

/// `payable(<args>)` production
pub fn payable_conversion(start: u32, stop: u32, arguments: Vec<Context>) -> Context {
    let mut conversion = ctx(ContextKind::PayableConversion, start, stop).with_child(
        ctx(ContextKind::PayableKeyword, start, start + 6).with_text("payable"),
    );
    if !arguments.is_empty() {
        conversion = conversion.with_child(
            ctx(ContextKind::CallArgumentList, start + 8, stop - 1).with_children(arguments),
        );
    }
    conversion
}

/// Outcome of one full build session
pub struct BuiltUnit {
    pub ast: Ast,
    pub root: NodeId,
    pub diagnostics: Vec<BuildDiagnostic>,
}

/// Run a context tree through construction and reference resolution
pub fn build(unit: &Context) -> Result<BuiltUnit> {
    let mut builder = AstBuilder::new();
    let root = builder.build_source_unit(unit)?;
    builder.resolve_references();
    let (ast, diagnostics) = builder.finish();
    Ok(BuiltUnit {
        ast,
        root,
        diagnostics,
    })
}

/// The standard fixture the end-to-end tests share:
///
/// ```text
/// // vault.sol
/// pragma solidity ^0.8.0;
/// contract Vault {
///     struct Position { uint256 amount; address owner; }
///     enum Mode { Open, Locked }
///     address beneficiary;
///     function sweep(uint256 amount) public payable {
///         payable(beneficiary);
///     }
/// }
/// ```
pub fn vault_unit() -> Context {
    let pragma =
        ctx(ContextKind::PragmaDirective, 0, 22).with_text("pragma solidity ^0.8.0;");

    let position = ctx(ContextKind::StructDefinition, 45, 115)
        .with_child(ctx(ContextKind::Identifier, 52, 60).with_text("Position"))
        .with_child(parameter("amount", "uint256", 64))
        .with_child(parameter("owner", "address", 88));

    let mode = ctx(ContextKind::EnumDefinition, 120, 155)
        .with_child(ctx(ContextKind::Identifier, 125, 129).with_text("Mode"))
        .with_child(ctx(ContextKind::EnumValue, 132, 136).with_text("Open"))
        .with_child(ctx(ContextKind::EnumValue, 139, 145).with_text("Locked"));

    let beneficiary = ctx(ContextKind::StateVariableDeclaration, 160, 180)
        .with_child(ctx(ContextKind::ElementaryTypeName, 160, 166).with_text("address"))
        .with_child(ctx(ContextKind::Identifier, 168, 178).with_text("beneficiary"));

    let call = payable_conversion(
        220,
        240,
        vec![ctx(ContextKind::Identifier, 228, 238).with_text("beneficiary")],
    );
    let statement = ctx(ContextKind::ExpressionStatement, 220, 241).with_child(call);
    let body = ctx(ContextKind::Block, 218, 243).with_child(statement);

    let sweep = ctx(ContextKind::FunctionDefinition, 185, 245)
        .with_child(ctx(ContextKind::Identifier, 194, 198).with_text("sweep"))
        .with_child(ctx(ContextKind::Visibility, 210, 215).with_text("public"))
        .with_child(ctx(ContextKind::StateMutability, 216, 217).with_text("payable"))
        .with_child(
            ctx(ContextKind::ParameterList, 199, 209)
                .with_child(parameter("amount", "uint256", 200)),
        )
        .with_child(body);

    let contract = ctx(ContextKind::ContractDefinition, 25, 248)
        .with_child(ctx(ContextKind::Identifier, 34, 38).with_text("Vault"))
        .with_child(position)
        .with_child(mode)
        .with_child(beneficiary)
        .with_child(sweep);

    ctx(ContextKind::SourceUnit, 0, 250)
        .with_text("vault.sol")
        .with_child(pragma)
        .with_child(contract)
}
