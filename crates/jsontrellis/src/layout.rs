//! Tree layout for visualising a partial syntax tree.
//!
//! [`layout`] places every node of a [`ParserState`] on a grid: `depth` is
//! the nesting level and `x` a horizontal slot. Leaves take consecutive
//! slots in document order and every container is centred over its first
//! and last child, so a growing document only ever appends slots on the
//! right and existing nodes keep their position until a sibling arrives.
//!
//! ```rust
//! use jsontrellis::{Schema, Session, layout};
//!
//! let mut session = Session::new(Schema::array("", Schema::number("")));
//! session.feed(r#"[1, {"a": true}"#);
//!
//! let layout = layout(session.state());
//! assert_eq!(
//!     layout.outline(),
//!     "#0 [] ...\n  [0]: #1 1\n  [1]: #2 {}\n    a: #3 true\n"
//! );
//! ```
use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};
use core::fmt::{self, Write};

use crate::{
    node::{AstNode, NodeId, NodeKind},
    state::ParserState,
    value::write_escaped_string,
};

/// How a child hangs off its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLabel {
    Key(String),
    Index(usize),
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::Key(key) => f.write_str(key),
            EdgeLabel::Index(index) => write!(f, "[{index}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub label: EdgeLabel,
}

/// A node with its grid position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub depth: usize,
    pub x: f64,
    /// Short rendering of the node's content: `{}`, `[]`, a quoted string
    /// or the raw scalar text.
    pub label: String,
    pub closed: bool,
}

/// Placed nodes in pre-order plus the edges between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<Edge>,
    /// Number of leaf slots used.
    pub width: usize,
    /// Number of levels used.
    pub height: usize,
}

/// Lays out the tree rooted at `state.root_id`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(state: &ParserState) -> Layout {
    let mut out = Layout::default();
    let Some(root) = state.root_id else {
        return out;
    };

    // Position in `out.nodes` of every visited id.
    let mut slot_of: Vec<Option<usize>> = vec![None; state.nodes.len()];
    let mut stack = vec![(root, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = state.node(id) else {
            continue;
        };
        slot_of[id.index()] = Some(out.nodes.len());
        out.height = out.height.max(depth + 1);

        let x = if node.children.is_empty() {
            out.width += 1;
            (out.width - 1) as f64
        } else {
            0.0
        };
        out.nodes.push(PlacedNode {
            id,
            kind: node.kind,
            depth,
            x,
            label: summary(node),
            closed: node.closed,
        });

        for (i, child) in node.children.iter().enumerate() {
            let label = match node.kind {
                NodeKind::Object => EdgeLabel::Key(node.keys.get(i).cloned().unwrap_or_default()),
                _ => EdgeLabel::Index(i),
            };
            out.edges.push(Edge {
                parent: id,
                child: *child,
                label,
            });
        }
        stack.extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
    }

    // Children follow their parent in pre-order, so walking backwards places
    // every child before its parent.
    for i in (0..out.nodes.len()).rev() {
        let Some(node) = state.node(out.nodes[i].id) else {
            continue;
        };
        let position = |id: Option<&NodeId>| {
            id.and_then(|id| slot_of[id.index()])
                .map(|slot| out.nodes[slot].x)
        };
        if let (Some(first), Some(last)) =
            (position(node.children.first()), position(node.children.last()))
        {
            out.nodes[i].x = (first + last) / 2.0;
        }
    }

    out
}

fn summary(node: &AstNode) -> String {
    match node.kind {
        NodeKind::Object => "{}".to_string(),
        NodeKind::Array => "[]".to_string(),
        NodeKind::String => {
            let mut out = String::from("\"");
            let _ = write_escaped_string(&node.buffer, &mut out);
            out.push('"');
            out
        }
        NodeKind::Number | NodeKind::Boolean | NodeKind::Null => node.buffer.clone(),
    }
}

impl Layout {
    /// Indented text rendering, one node per line.
    ///
    /// Each line shows the incoming edge label, the node id and its
    /// summary; nodes that are still open end in `...`.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            for _ in 0..node.depth {
                out.push_str("  ");
            }
            if let Some(edge) = self.edges.iter().find(|e| e.child == node.id) {
                let _ = write!(out, "{}: ", edge.label);
            }
            let _ = write!(out, "{} {}", node.id, node.label);
            if !node.closed {
                out.push_str(" ...");
            }
            out.push('\n');
        }
        out
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{EdgeLabel, layout};
    use crate::{
        builder::AstBuilder, node::NodeId, options::SessionOptions, scanner::Scanner,
        state::ParserState,
    };

    fn parse(text: &str) -> ParserState {
        let mut scanner = Scanner::new(&SessionOptions::default());
        let mut builder = AstBuilder::new();
        let _ = scanner.scan(text, &mut builder);
        builder.into_state()
    }

    #[test]
    fn empty_state_has_empty_layout() {
        let layout = layout(&ParserState::default());
        assert!(layout.nodes.is_empty());
        assert_eq!((layout.width, layout.height), (0, 0));
        assert_eq!(layout.outline(), "");
    }

    #[test]
    fn parents_are_centred_over_children() {
        let layout = layout(&parse(r#"{"a":[1,2,3],"b":"x"}"#));
        let x = |id| layout.node(NodeId::new(id)).unwrap().x;

        assert_eq!([x(2), x(3), x(4), x(5)], [0.0, 1.0, 2.0, 3.0]);
        assert!((x(1) - 1.0).abs() < f64::EPSILON);
        assert!((x(0) - 2.0).abs() < f64::EPSILON);
        assert_eq!((layout.width, layout.height), (4, 3));
    }

    #[test]
    fn edges_carry_keys_and_indices() {
        let layout = layout(&parse(r#"{"list":["p","q"]}"#));
        let labels: Vec<_> = layout.edges.iter().map(|e| e.label.clone()).collect();
        assert_eq!(
            labels,
            [
                EdgeLabel::Key("list".into()),
                EdgeLabel::Index(0),
                EdgeLabel::Index(1),
            ]
        );
    }

    #[test]
    fn outline_marks_open_nodes() {
        let layout = layout(&parse("{\"a\":[1,\"x\\n"));
        assert_eq!(
            layout.outline(),
            "#0 {} ...\n  a: #1 [] ...\n    [0]: #2 1\n    [1]: #3 \"x\\n\" ...\n"
        );
    }

    #[test]
    fn empty_containers_are_leaves() {
        let layout = layout(&parse("[[],{}]"));
        let xs: Vec<_> = layout.nodes.iter().map(|n| n.x).collect();
        assert_eq!(xs, [0.5, 0.0, 1.0]);
    }
}
