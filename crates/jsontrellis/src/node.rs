//! Nodes of the partial syntax tree.
use alloc::{string::String, vec::Vec};
use core::fmt;

use crate::value::Value;

/// Identity of an [`AstNode`] within one session.
///
/// Ids are assigned in creation order starting at zero and are never reused,
/// so an id doubles as the node's index in [`ParserState::nodes`].
///
/// [`ParserState::nodes`]: crate::ParserState::nodes
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(id: u32) -> Self {
        NodeId(id)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The JSON type of a node, fixed when the node is created.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl NodeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }

    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Array | NodeKind::Object)
    }
}

/// One node of the partial syntax tree.
///
/// Only `closed`, `buffer`, `resolved_value`, `children` and `keys` change
/// after creation, and only by appending or by `closed` going from `false`
/// to `true`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub closed: bool,
    /// Decoded text of a string, or raw numeral text of a number, read so
    /// far. Empty for other kinds.
    pub buffer: String,
    pub resolved_value: Option<Value>,
    /// Child ids of an array or object, in document order.
    pub children: Vec<NodeId>,
    /// Keys of an object, parallel to `children`.
    pub keys: Vec<String>,
}

impl AstNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            closed: false,
            buffer: String::new(),
            resolved_value: None,
            children: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Child id stored under `key`, if this is an object that has it.
    ///
    /// When a key repeats, the last occurrence wins, as in most JSON
    /// decoders.
    #[must_use]
    pub fn child_by_key(&self, key: &str) -> Option<NodeId> {
        self.keys
            .iter()
            .rposition(|k| k == key)
            .map(|i| self.children[i])
    }

    /// Best-effort numeric value of a number node's buffer.
    ///
    /// Only a numeral ending in a digit parses; prefixes such as `-`, `1.`
    /// or `2e+` are not numbers yet.
    #[must_use]
    pub fn partial_number(&self) -> Option<f64> {
        if self.kind != NodeKind::Number || !self.buffer.ends_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        self.buffer.parse::<f64>().ok()
    }
}
