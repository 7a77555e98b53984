//! End-to-end pipeline tests: context tree → AST → IR

use cn_ast::{NodeKind, TypeDescription};
use cn_ir_lower::IrBuilder;
use cn_syntax::ContextKind;
use cn_wire::{Mutability, Visibility};
use integration_tests::{build, ctx, payable_conversion, vault_unit};

#[test]
fn vault_builds_without_diagnostics() {
    let built = build(&vault_unit()).expect("build");
    assert!(built.diagnostics.is_empty(), "{:?}", built.diagnostics);
}

#[test]
fn every_node_has_a_unique_id_and_parents_precede_children() {
    let built = build(&vault_unit()).expect("build");
    let ast = &built.ast;

    let mut seen = std::collections::HashSet::new();
    for id in ast.ids() {
        assert!(seen.insert(id), "duplicate id {id}");
    }

    let mut stack = vec![built.root];
    while let Some(parent) = stack.pop() {
        let node = ast.get(parent).expect("node");
        for child in node.children() {
            assert!(parent < child);
            stack.push(child);
        }
    }
}

#[test]
fn span_parent_chain_reaches_the_source_unit() {
    let built = build(&vault_unit()).expect("build");
    let ast = &built.ast;

    for node in ast.nodes() {
        let mut current = node.src.parent;
        let mut steps = 0;
        while let Some(parent) = current {
            current = ast.get(parent).expect("parent exists").src.parent;
            steps += 1;
            assert!(steps <= ast.len(), "parent cycle at {}", node.id);
        }
    }

    let root = ast.get(built.root).expect("root");
    assert_eq!(root.src.parent, None);
}

#[test]
fn uninitialized_state_variable_carries_no_value() {
    let built = build(&vault_unit()).expect("build");

    let declaration = built
        .ast
        .nodes()
        .find(|node| {
            matches!(&node.kind, NodeKind::VariableDeclaration { name, .. }
                if name == "beneficiary")
        })
        .expect("state variable");
    let NodeKind::VariableDeclaration { value, .. } = &declaration.kind else {
        unreachable!()
    };
    assert_eq!(*value, None);

    // Exactly one identifier names the variable: the reference inside the
    // function body. The declaration itself must not spawn another.
    let identifiers = built
        .ast
        .nodes()
        .filter(|node| {
            matches!(&node.kind, NodeKind::Identifier { name, .. } if name == "beneficiary")
        })
        .count();
    assert_eq!(identifiers, 1);
}

#[test]
fn identifier_resolves_to_the_state_variable() {
    let built = build(&vault_unit()).expect("build");
    let ast = &built.ast;

    let declaration = ast
        .nodes()
        .find(|node| {
            matches!(&node.kind, NodeKind::VariableDeclaration { name, state_variable, .. }
                if name == "beneficiary" && *state_variable)
        })
        .expect("state variable");
    let identifier = ast
        .nodes()
        .find(|node| {
            matches!(&node.kind, NodeKind::Identifier { name, .. } if name == "beneficiary")
        })
        .expect("identifier");

    let NodeKind::Identifier {
        referenced_declaration,
        ..
    } = &identifier.kind
    else {
        unreachable!()
    };
    assert_eq!(*referenced_declaration, Some(declaration.id));
    assert_eq!(
        identifier.type_description.as_ref(),
        declaration.type_description.as_ref()
    );
}

#[test]
fn payable_conversion_descriptions_match_known_values() {
    // Zero arguments.
    let unit = ctx(ContextKind::SourceUnit, 0, 60)
        .with_text("conv.sol")
        .with_child(
            ctx(ContextKind::ContractDefinition, 0, 58)
                .with_child(ctx(ContextKind::Identifier, 9, 10).with_text("C"))
                .with_child(
                    ctx(ContextKind::FunctionDefinition, 12, 56)
                        .with_child(ctx(ContextKind::Identifier, 21, 22).with_text("f"))
                        .with_child(
                            ctx(ContextKind::Block, 24, 54).with_child(
                                ctx(ContextKind::ExpressionStatement, 26, 52)
                                    .with_child(payable_conversion(26, 50, vec![])),
                            ),
                        ),
                ),
        );
    let built = build(&unit).expect("build");
    let conversion = built
        .ast
        .nodes()
        .find(|node| matches!(node.kind, NodeKind::PayableConversion { .. }))
        .expect("conversion");
    assert_eq!(
        conversion.type_description,
        Some(TypeDescription::new(
            "function() payable",
            "t_function_payable$_$"
        ))
    );

    // One address-typed argument.
    let argument = ctx(ContextKind::HexLiteral, 34, 44).with_text("0xCAFE");
    let unit = ctx(ContextKind::SourceUnit, 0, 60)
        .with_text("conv.sol")
        .with_child(
            ctx(ContextKind::ContractDefinition, 0, 58)
                .with_child(ctx(ContextKind::Identifier, 9, 10).with_text("C"))
                .with_child(
                    ctx(ContextKind::FunctionDefinition, 12, 56)
                        .with_child(ctx(ContextKind::Identifier, 21, 22).with_text("f"))
                        .with_child(
                            ctx(ContextKind::Block, 24, 54).with_child(
                                ctx(ContextKind::ExpressionStatement, 26, 52)
                                    .with_child(payable_conversion(26, 50, vec![argument])),
                            ),
                        ),
                ),
        );
    let built = build(&unit).expect("build");
    let conversion = built
        .ast
        .nodes()
        .find(|node| matches!(node.kind, NodeKind::PayableConversion { .. }))
        .expect("conversion");
    assert_eq!(
        conversion.type_description,
        Some(TypeDescription::new(
            "function(address) payable",
            "t_function_payable$_t_address$"
        ))
    );
}

#[test]
fn struct_lowers_to_a_two_member_record() {
    let built = build(&vault_unit()).expect("build");
    let unit = IrBuilder::new(&built.ast)
        .lower_source_unit(built.root)
        .expect("lower");

    let vault = &unit.contracts[0];
    let position = &vault.structs[0];
    assert_eq!(position.canonical_name, "Vault.Position");
    assert_eq!(position.members.len(), 2);
    assert_eq!(position.members[0].type_name, "uint256");
    assert_eq!(position.members[1].type_name, "address");

    for member in &position.members {
        let from_ast = built
            .ast
            .type_description_of(member.id)
            .expect("member typed");
        assert_eq!(member.type_description.as_ref(), Some(from_ast));
    }
}

#[test]
fn function_record_reflects_signature_modifiers() {
    let built = build(&vault_unit()).expect("build");
    let unit = IrBuilder::new(&built.ast)
        .lower_source_unit(built.root)
        .expect("lower");

    let sweep = &unit.contracts[0].functions[0];
    assert_eq!(sweep.name, "sweep");
    assert_eq!(sweep.canonical_name, "Vault.sweep");
    assert_eq!(sweep.visibility, Visibility::Public);
    assert_eq!(sweep.state_mutability, Mutability::Payable);
}

#[test]
fn lowering_is_pure() {
    let built = build(&vault_unit()).expect("build");
    let builder = IrBuilder::new(&built.ast);
    assert_eq!(
        builder.lower_source_unit(built.root).expect("lower"),
        builder.lower_source_unit(built.root).expect("lower"),
    );
}

#[test]
fn two_sessions_over_the_same_tree_agree() {
    let unit = vault_unit();
    let first = build(&unit).expect("build");
    let second = build(&unit).expect("build");

    // Fresh trackers start from the same seed, so IDs and everything derived
    // from them line up between sessions.
    let lhs: Vec<_> = first.ast.nodes().cloned().collect();
    let rhs: Vec<_> = second.ast.nodes().cloned().collect();
    assert_eq!(lhs, rhs);
}

#[test]
fn unknown_alternative_aborts_the_session() {
    let unit = ctx(ContextKind::SourceUnit, 0, 20)
        .with_text("drift.sol")
        .with_child(ctx(ContextKind::Unknown("assembly_block".into()), 2, 18));
    assert!(build(&unit).is_err());
}
