//! Type description synthesis
//!
//! One pure template per node kind. Display strings and canonical
//! identifiers are concatenated from child descriptions and kind-local
//! literals only — never re-derived from source text — so two structurally
//! identical expressions always produce byte-identical identifiers no matter
//! how they were spelled.

use crate::TypeDescription;
use cn_wire::LiteralKind;

/// Fixed delimiter joining child identifiers inside composite identifiers
const SEGMENT_DELIMITER: &str = "$_";

fn join_strings(descriptions: &[TypeDescription]) -> String {
    descriptions
        .iter()
        .map(|desc| desc.type_string.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn join_identifiers(descriptions: &[TypeDescription]) -> String {
    descriptions
        .iter()
        .map(|desc| desc.type_identifier.as_str())
        .collect::<Vec<_>>()
        .join(SEGMENT_DELIMITER)
}

/// Payable conversion over the given argument types
///
/// Zero arguments collapse the delimiter to the empty join:
/// `function() payable` / `t_function_payable$_$`.
pub fn payable_conversion(argument_types: &[TypeDescription]) -> TypeDescription {
    TypeDescription::new(
        format!("function({}) payable", join_strings(argument_types)),
        format!("t_function_payable$_{}$", join_identifiers(argument_types)),
    )
}

/// Non-payable function signature over parameter types
pub fn function(parameter_types: &[TypeDescription]) -> TypeDescription {
    TypeDescription::new(
        format!("function({})", join_strings(parameter_types)),
        format!("t_function_$_{}$", join_identifiers(parameter_types)),
    )
}

/// Elementary type name (`uint256`, `address payable`, ...)
pub fn elementary(name: &str) -> TypeDescription {
    TypeDescription::new(name, format!("t_{}", name.replace(' ', "_")))
}

/// Struct type from its canonical (contract-qualified) name
pub fn struct_type(canonical_name: &str) -> TypeDescription {
    TypeDescription::new(
        format!("struct {canonical_name}"),
        format!("t_struct$_{}_$", canonical_name.replace('.', "_")),
    )
}

/// Enum type from its canonical name
pub fn enum_type(canonical_name: &str) -> TypeDescription {
    TypeDescription::new(
        format!("enum {canonical_name}"),
        format!("t_enum$_{}_$", canonical_name.replace('.', "_")),
    )
}

/// Contract type from the contract name
pub fn contract(name: &str) -> TypeDescription {
    TypeDescription::new(format!("contract {name}"), format!("t_contract$_{name}_$"))
}

/// Tuple over component types
pub fn tuple(component_types: &[TypeDescription]) -> TypeDescription {
    TypeDescription::new(
        format!("tuple({})", join_strings(component_types)),
        format!("t_tuple$_{}$", join_identifiers(component_types)),
    )
}

/// Literal type from the literal flavor
pub fn literal(kind: LiteralKind) -> TypeDescription {
    match kind {
        LiteralKind::Number => elementary("uint256"),
        LiteralKind::String => elementary("string"),
        LiteralKind::Bool => elementary("bool"),
        LiteralKind::Hex => elementary("address"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payable_conversion_without_arguments() {
        let desc = payable_conversion(&[]);
        assert_eq!(desc.type_string, "function() payable");
        assert_eq!(desc.type_identifier, "t_function_payable$_$");
    }

    #[test]
    fn payable_conversion_with_one_argument() {
        let desc = payable_conversion(&[elementary("address")]);
        assert_eq!(desc.type_string, "function(address) payable");
        assert_eq!(desc.type_identifier, "t_function_payable$_t_address$");
    }

    #[test]
    fn payable_conversion_with_two_arguments() {
        let desc = payable_conversion(&[elementary("address"), elementary("uint256")]);
        assert_eq!(desc.type_string, "function(address,uint256) payable");
        assert_eq!(
            desc.type_identifier,
            "t_function_payable$_t_address$_t_uint256$"
        );
    }

    #[test]
    fn identifiers_are_deterministic_across_constructions() {
        let first = payable_conversion(&[elementary("address"), elementary("bool")]);
        let second = payable_conversion(&[
            TypeDescription::new("address", "t_address"),
            TypeDescription::new("bool", "t_bool"),
        ]);
        assert_eq!(first.type_identifier, second.type_identifier);
        assert_eq!(first, second);
    }

    #[test]
    fn elementary_spaces_become_underscores() {
        let desc = elementary("address payable");
        assert_eq!(desc.type_string, "address payable");
        assert_eq!(desc.type_identifier, "t_address_payable");
    }

    #[test]
    fn canonical_struct_identifier_flattens_qualifier() {
        let desc = struct_type("Vault.Position");
        assert_eq!(desc.type_string, "struct Vault.Position");
        assert_eq!(desc.type_identifier, "t_struct$_Vault_Position_$");
    }

    #[test]
    fn tuple_joins_components() {
        let desc = tuple(&[elementary("uint256"), elementary("address")]);
        assert_eq!(desc.type_string, "tuple(uint256,address)");
        assert_eq!(desc.type_identifier, "t_tuple$_t_uint256$_t_address$");
    }
}
