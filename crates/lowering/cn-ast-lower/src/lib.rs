//! Parse dispatcher: external parse-tree contexts → typed AST
//!
//! One [`AstBuilder`] is one build session. It walks the context tree the
//! external parser produced, constructs AST nodes bottom-up, and runs the
//! deferred-reference resolution pass once construction finishes.

pub mod error;

mod lower;
mod scope;

pub use error::{BuildDiagnostic, BuildError};
pub use lower::AstBuilder;
pub use scope::Scope;
