//! Build errors and recoverable diagnostics

use cn_span::NodeId;
use miette::Diagnostic;
use thiserror::Error;

/// Fatal construction error: the session aborts, no partial node is returned
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum BuildError {
    /// An unrecognized concrete grammar alternative reached kind selection.
    /// The grammar and this dispatcher have drifted apart; that is a bug in
    /// the toolkit, not in the analyzed source.
    #[error("unrecognized grammar alternative `{found}` at {line}:{column}")]
    #[diagnostic(
        code(cinder::dispatch::unknown_alternative),
        help("the external grammar produced a production this dispatcher does not know")
    )]
    UnknownAlternative {
        /// Display name of the offending alternative
        found: String,
        /// Source line of the production
        line: u32,
        /// Source column of the production
        column: u32,
    },

    /// A production arrived without a child its grammar rule guarantees
    #[error("`{kind}` production at {line}:{column} is missing its {expected}")]
    #[diagnostic(code(cinder::dispatch::missing_child))]
    MissingChild {
        /// Production kind being dispatched
        kind: String,
        /// Description of the absent child
        expected: &'static str,
        /// Source line of the production
        line: u32,
        /// Source column of the production
        column: u32,
    },
}

/// Recoverable condition collected on the session and surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildDiagnostic {
    /// A context reported its stop token before its start token; the span
    /// was clamped to length 0
    DegenerateSpan {
        /// Node whose span was clamped
        node: NodeId,
        /// Reported start offset
        start: u32,
        /// Reported end offset
        end: u32,
    },
    /// A deferred reference named a declaration this session never
    /// constructed; the node's reference stays unset
    UnresolvedReference {
        /// Node holding the dangling reference
        node: NodeId,
        /// Name that failed to resolve
        name: String,
    },
}
