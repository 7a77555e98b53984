//! Node identity and source spans
//!
//! One build session owns one [`IdTracker`]; every AST node it constructs
//! draws a strictly increasing [`NodeId`] from it. IDs are only meaningful
//! within the session that issued them. The tracker is atomic, so a driver
//! that wants a single ID space across several source units may share one
//! tracker between sessions instead.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for an AST node within one build session
#[derive(
    Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing node IDs
///
/// Allocation is a single atomic increment, nothing else, so the tracker may
/// be shared between sessions running on separate threads.
#[derive(Debug)]
pub struct IdTracker {
    next: AtomicU64,
}

impl IdTracker {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Allocate the next node ID
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of IDs handed out so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of one token boundary as reported by the external parser
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenPos {
    /// 1-based source line
    pub line: u32,
    /// 0-based column
    pub column: u32,
    /// Absolute byte offset
    pub offset: u32,
}

impl TokenPos {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Source extent of one AST node
///
/// `parent` is the nearest already-constructed enclosing node: the declared
/// variable if the node initializes one, else the parent expression, else the
/// enclosing statement body. Only the root source unit has no parent.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub line: u32,
    pub column: u32,
    pub start: u32,
    pub end: u32,
    pub length: u32,
    pub parent: Option<NodeId>,
}

impl SourceSpan {
    /// Derive a span from a production's start/stop tokens
    ///
    /// Length is `end - start + 1`. A degenerate pair (`stop` before `start`)
    /// clamps to length 0 instead of wrapping; callers detect that case with
    /// [`SourceSpan::is_degenerate`] and surface a diagnostic.
    pub fn from_tokens(start: TokenPos, stop: TokenPos) -> Self {
        let length = if stop.offset >= start.offset {
            stop.offset - start.offset + 1
        } else {
            0
        };

        Self {
            line: start.line,
            column: start.column,
            start: start.offset,
            end: stop.offset,
            length,
            parent: None,
        }
    }

    /// Span for a synthetic node with no source extent
    pub fn synthetic() -> Self {
        Self {
            line: 0,
            column: 0,
            start: 0,
            end: 0,
            length: 0,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// True if the producing context reported its stop before its start
    pub fn is_degenerate(&self) -> bool {
        self.end < self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_is_strictly_increasing() {
        let tracker = IdTracker::new();
        let mut last = tracker.next_id();
        for _ in 0..100 {
            let next = tracker.next_id();
            assert!(next > last);
            last = next;
        }
        assert_eq!(tracker.issued(), 101);
    }

    #[test]
    fn tracker_is_unique_across_threads() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let tracker = Arc::new(IdTracker::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let tracker = Arc::clone(&tracker);
            handles.push(std::thread::spawn(move || {
                (0..250).map(|_| tracker.next_id()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("worker panicked") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn span_length_arithmetic() {
        let span = SourceSpan::from_tokens(TokenPos::new(1, 0, 10), TokenPos::new(1, 14, 24));
        assert_eq!(span.length, 15);
        assert_eq!(span.length, span.end - span.start + 1);
        assert!(!span.is_degenerate());
    }

    #[test]
    fn single_byte_span_has_length_one() {
        let span = SourceSpan::from_tokens(TokenPos::new(3, 4, 7), TokenPos::new(3, 4, 7));
        assert_eq!(span.length, 1);
    }

    #[test]
    fn degenerate_span_clamps_to_zero() {
        let span = SourceSpan::from_tokens(TokenPos::new(1, 8, 20), TokenPos::new(1, 2, 12));
        assert_eq!(span.length, 0);
        assert!(span.is_degenerate());
    }
}
