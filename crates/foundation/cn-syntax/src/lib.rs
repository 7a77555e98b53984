//! Parse-tree contexts handed to the core by the external grammar component
//!
//! The grammar, lexer, and parse-tree generator live outside this repository.
//! This crate defines the data contract they must satisfy: one [`Context`]
//! per syntactic production, carrying the production's concrete grammar
//! alternative, its start/stop token positions, the raw token text where the
//! production is token-bearing (identifiers, literals, operators, keywords),
//! and its child productions in source order.

use cn_span::TokenPos;
use std::fmt;

/// One parse-tree production as delivered by the external parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// The concrete grammar alternative this production matched
    pub kind: ContextKind,
    /// Position of the first token
    pub start: TokenPos,
    /// Position of the last token
    pub stop: TokenPos,
    /// Token text for token-bearing productions, empty otherwise
    pub text: String,
    /// Child productions in source order
    pub children: Vec<Context>,
}

impl Context {
    pub fn new(kind: ContextKind, start: TokenPos, stop: TokenPos) -> Self {
        Self {
            kind,
            start,
            stop,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Context) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Context>) -> Self {
        self.children.extend(children);
        self
    }

    /// First child matching `kind`, if any
    pub fn child_of_kind(&self, kind: &ContextKind) -> Option<&Context> {
        self.children.iter().find(|child| &child.kind == kind)
    }

    /// All children matching `kind`, in source order
    pub fn children_of_kind<'a>(
        &'a self,
        kind: &'a ContextKind,
    ) -> impl Iterator<Item = &'a Context> {
        self.children.iter().filter(move |child| &child.kind == kind)
    }

    /// Whether any direct child matches `kind`
    pub fn has_child(&self, kind: &ContextKind) -> bool {
        self.child_of_kind(kind).is_some()
    }

    /// Text of the first identifier child, if present
    pub fn identifier_text(&self) -> Option<&str> {
        self.child_of_kind(&ContextKind::Identifier)
            .map(|child| child.text.as_str())
    }
}

/// Concrete grammar alternatives recognized by the dispatcher
///
/// The catalog is closed: a production kind the dispatcher does not know is
/// grammar drift and surfaces through [`ContextKind::Unknown`], which the
/// dispatcher treats as a fatal construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    /// Top-level container for one parsed file
    SourceUnit,
    /// Pragma directive
    PragmaDirective,
    /// Contract definition
    ContractDefinition,
    /// Struct definition
    StructDefinition,
    /// Enum definition
    EnumDefinition,
    /// One enum value
    EnumValue,
    /// Function definition
    FunctionDefinition,
    /// Parameter list
    ParameterList,
    /// One parameter or struct member
    Parameter,
    /// State variable declaration
    StateVariableDeclaration,
    /// Override specifier on a function or variable
    OverrideSpecifier,
    /// Statement block
    Block,
    /// Expression statement
    ExpressionStatement,
    /// Return statement
    ReturnStatement,
    /// Local variable declaration statement
    VariableDeclarationStatement,
    /// If statement
    IfStatement,
    /// Call argument list
    CallArgumentList,
    /// Payable conversion expression
    PayableConversion,
    /// The `payable` keyword inside a payable conversion
    PayableKeyword,
    /// Identifier
    Identifier,
    /// Number literal
    NumberLiteral,
    /// String literal
    StringLiteral,
    /// Boolean literal
    BooleanLiteral,
    /// Hex/address literal
    HexLiteral,
    /// Binary operation (operator in `text`)
    BinaryExpression,
    /// Unary operation (operator in `text`)
    UnaryExpression,
    /// Function call
    FunctionCall,
    /// Member access (member name in `text`)
    MemberAccess,
    /// Index access
    IndexAccess,
    /// Tuple expression
    TupleExpression,
    /// Elementary type name (`uint256`, `address`, ... in `text`)
    ElementaryTypeName,
    /// User-defined type name (referenced declaration name in `text`)
    UserDefinedTypeName,
    /// Visibility marker (`public`, `internal`, ... in `text`)
    Visibility,
    /// State mutability marker (`payable`, `view`, ... in `text`)
    StateMutability,
    /// Storage location marker (`memory`, `storage`, `calldata` in `text`)
    StorageLocation,
    /// Grammar alternative this core does not recognize
    Unknown(String),
}

impl fmt::Display for ContextKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnit => write!(formatter, "source_unit"),
            Self::PragmaDirective => write!(formatter, "pragma_directive"),
            Self::ContractDefinition => write!(formatter, "contract_definition"),
            Self::StructDefinition => write!(formatter, "struct_definition"),
            Self::EnumDefinition => write!(formatter, "enum_definition"),
            Self::EnumValue => write!(formatter, "enum_value"),
            Self::FunctionDefinition => write!(formatter, "function_definition"),
            Self::ParameterList => write!(formatter, "parameter_list"),
            Self::Parameter => write!(formatter, "parameter"),
            Self::StateVariableDeclaration => write!(formatter, "state_variable_declaration"),
            Self::OverrideSpecifier => write!(formatter, "override_specifier"),
            Self::Block => write!(formatter, "block"),
            Self::ExpressionStatement => write!(formatter, "expression_statement"),
            Self::ReturnStatement => write!(formatter, "return_statement"),
            Self::VariableDeclarationStatement => {
                write!(formatter, "variable_declaration_statement")
            }
            Self::IfStatement => write!(formatter, "if_statement"),
            Self::CallArgumentList => write!(formatter, "call_argument_list"),
            Self::PayableConversion => write!(formatter, "payable_conversion"),
            Self::PayableKeyword => write!(formatter, "payable_keyword"),
            Self::Identifier => write!(formatter, "identifier"),
            Self::NumberLiteral => write!(formatter, "number_literal"),
            Self::StringLiteral => write!(formatter, "string_literal"),
            Self::BooleanLiteral => write!(formatter, "boolean_literal"),
            Self::HexLiteral => write!(formatter, "hex_literal"),
            Self::BinaryExpression => write!(formatter, "binary_expression"),
            Self::UnaryExpression => write!(formatter, "unary_expression"),
            Self::FunctionCall => write!(formatter, "function_call"),
            Self::MemberAccess => write!(formatter, "member_access"),
            Self::IndexAccess => write!(formatter, "index_access"),
            Self::TupleExpression => write!(formatter, "tuple_expression"),
            Self::ElementaryTypeName => write!(formatter, "elementary_type_name"),
            Self::UserDefinedTypeName => write!(formatter, "user_defined_type_name"),
            Self::Visibility => write!(formatter, "visibility"),
            Self::StateMutability => write!(formatter, "state_mutability"),
            Self::StorageLocation => write!(formatter, "storage_location"),
            Self::Unknown(name) => write!(formatter, "unknown({name})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cn_span::TokenPos;

    fn pos(offset: u32) -> TokenPos {
        TokenPos::new(1, offset, offset)
    }

    #[test]
    fn child_lookup_preserves_order() {
        let ctx = Context::new(ContextKind::CallArgumentList, pos(0), pos(10))
            .with_child(Context::new(ContextKind::Identifier, pos(0), pos(2)).with_text("a"))
            .with_child(Context::new(ContextKind::NumberLiteral, pos(4), pos(5)).with_text("42"))
            .with_child(Context::new(ContextKind::Identifier, pos(7), pos(9)).with_text("b"));

        let names: Vec<_> = ctx
            .children_of_kind(&ContextKind::Identifier)
            .map(|child| child.text.as_str())
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert!(ctx.has_child(&ContextKind::NumberLiteral));
        assert!(!ctx.has_child(&ContextKind::PayableKeyword));
    }

    #[test]
    fn identifier_text_finds_first_identifier() {
        let ctx = Context::new(ContextKind::ContractDefinition, pos(0), pos(20))
            .with_child(Context::new(ContextKind::Identifier, pos(9), pos(13)).with_text("Vault"));
        assert_eq!(ctx.identifier_text(), Some("Vault"));
    }
}
