//! Decision diagram nodes and the reference encoding

use serde::{Deserialize, Serialize};

/// Reserved sentinel reference meaning "no rule matched"
pub const NO_MATCH: i64 = -1;

/// A binary-branch node of the decision diagram
///
/// `high` is followed when the node's condition evaluates true, `low`
/// otherwise. Both use the reference encoding documented on [`NodeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNode {
    /// Index into the model's condition table
    pub condition: u32,

    /// Reference taken on a true outcome
    pub high: i64,

    /// Reference taken on a false outcome
    pub low: i64,
}

/// A decoded node reference.
///
/// The wire encoding packs three cases into one `i64`:
///
/// * `-1` — the no-match terminal ([`NO_MATCH`])
/// * `-(k + 2)` — terminal at result-table index `k` (so `-2` is result 0)
/// * `>= 0` — index into the node array
///
/// Every `i64` decodes unambiguously; range checking against the actual
/// table sizes happens during model validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// No rule matched
    NoMatch,
    /// Terminal: result-table index
    Result(usize),
    /// Interior: node-array index
    Node(usize),
}

impl NodeRef {
    /// Decode a raw reference
    pub fn decode(raw: i64) -> NodeRef {
        if raw >= 0 {
            NodeRef::Node(raw as usize)
        } else if raw == NO_MATCH {
            NodeRef::NoMatch
        } else {
            NodeRef::Result((-raw - 2) as usize)
        }
    }

    /// Encode this reference back to its raw form
    pub fn encode(self) -> i64 {
        match self {
            NodeRef::NoMatch => NO_MATCH,
            NodeRef::Result(index) => -(index as i64) - 2,
            NodeRef::Node(index) => index as i64,
        }
    }

    /// Raw encoding of a result-table index
    pub fn result(index: usize) -> i64 {
        NodeRef::Result(index).encode()
    }

    /// Raw encoding of a node-array index
    pub fn node(index: usize) -> i64 {
        NodeRef::Node(index).encode()
    }

    /// Whether this reference is a terminal (result or no-match)
    pub fn is_terminal(self) -> bool {
        !matches!(self, NodeRef::Node(_))
    }
}
