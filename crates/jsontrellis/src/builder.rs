//! Incremental AST builder.
//!
//! [`AstBuilder`] receives the scanner's tokens and grows the node arena of a
//! [`ParserState`]. It keeps a stack of open containers mirroring the nesting
//! depth, the key waiting for its value, and the scalar currently being read.
//! No token is ever re-applied, so the work per character is constant and
//! node identities never change.
use alloc::{string::String, vec::Vec};

use crate::{
    node::{AstNode, NodeId, NodeKind},
    scanner::{Literal, Token, TokenSink},
    state::ParserState,
    value::{Map, Value},
};

/// Applies scanner tokens to a [`ParserState`].
#[derive(Debug, Default)]
pub struct AstBuilder {
    state: ParserState,
    /// Open arrays and objects, innermost last.
    stack: Vec<NodeId>,
    key_buffer: String,
    /// Key read inside the innermost object whose value has not started.
    pending_key: Option<String>,
    /// String or number node still receiving characters.
    open_scalar: Option<NodeId>,
    /// Nodes created or mutated since the last [`take_changed`].
    ///
    /// [`take_changed`]: AstBuilder::take_changed
    changed: Vec<NodeId>,
}

impl AstBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ParserState {
        &mut self.state
    }

    #[must_use]
    pub fn into_state(self) -> ParserState {
        self.state
    }

    /// Ids of nodes created or mutated since the previous call, ascending.
    pub fn take_changed(&mut self) -> Vec<NodeId> {
        let mut changed = core::mem::take(&mut self.changed);
        changed.sort_unstable();
        changed.dedup();
        changed
    }

    fn mark(&mut self, id: NodeId) {
        if self.changed.last() != Some(&id) {
            self.changed.push(id);
        }
    }

    /// Allocates a node and attaches it to the innermost open container.
    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.state.next_id);
        self.state.next_id += 1;
        self.state.nodes.push(AstNode::new(id, kind));
        self.mark(id);

        match self.stack.last().copied() {
            Some(parent_id) => {
                let key = self.pending_key.take();
                if let Some(parent) = self.state.node_mut(parent_id) {
                    parent.children.push(id);
                    if parent.kind == NodeKind::Object {
                        parent.keys.push(key.unwrap_or_default());
                    }
                }
                self.mark(parent_id);
            }
            None => {
                self.state.root_id.get_or_insert(id);
            }
        }

        id
    }

    fn append(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.state.node_mut(id) {
            node.buffer.push_str(text);
        }
        self.mark(id);
    }

    fn close_scalar(&mut self) {
        let Some(id) = self.open_scalar.take() else {
            return;
        };
        if let Some(node) = self.state.node_mut(id) {
            node.resolved_value = match node.kind {
                NodeKind::String => Some(Value::String(node.buffer.clone())),
                NodeKind::Number => node.buffer.parse::<f64>().ok().map(Value::Number),
                _ => None,
            };
            node.closed = true;
        }
        self.mark(id);
    }

    /// Closes the innermost container, materialising its value from the
    /// children that have one. Children without a resolved value are left
    /// out.
    fn close_container(&mut self) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        self.pending_key = None;

        let Some(node) = self.state.node(id) else {
            return;
        };
        let resolved = |child: &NodeId| {
            self.state
                .node(*child)
                .and_then(|c| c.resolved_value.clone())
        };
        let value = match node.kind {
            NodeKind::Array => Value::Array(node.children.iter().filter_map(resolved).collect()),
            _ => {
                let mut map = Map::new();
                for (key, child) in node.keys.iter().zip(&node.children) {
                    if let Some(value) = resolved(child) {
                        map.insert(key.clone(), value);
                    }
                }
                Value::Object(map)
            }
        };

        if let Some(node) = self.state.node_mut(id) {
            node.resolved_value = Some(value);
            node.closed = true;
        }
        self.mark(id);
    }
}

impl TokenSink for AstBuilder {
    fn token(&mut self, token: Token<'_>) {
        match token {
            Token::ObjectOpen => {
                let id = self.create(NodeKind::Object);
                self.stack.push(id);
            }
            Token::ArrayOpen => {
                let id = self.create(NodeKind::Array);
                self.stack.push(id);
            }
            Token::ObjectClose | Token::ArrayClose => self.close_container(),
            Token::KeyStart => self.key_buffer.clear(),
            Token::KeyChars(text) => self.key_buffer.push_str(text),
            Token::KeyEnd => self.pending_key = Some(core::mem::take(&mut self.key_buffer)),
            Token::StringStart => self.open_scalar = Some(self.create(NodeKind::String)),
            Token::StringChars(text) => {
                if let Some(id) = self.open_scalar {
                    self.append(id, text);
                }
            }
            Token::NumberChars(text) => {
                let id = match self.open_scalar {
                    Some(id) => id,
                    None => {
                        let id = self.create(NodeKind::Number);
                        self.open_scalar = Some(id);
                        id
                    }
                };
                self.append(id, text);
            }
            Token::StringEnd | Token::NumberEnd => self.close_scalar(),
            Token::Literal(literal) => {
                let (kind, value) = match literal {
                    Literal::True => (NodeKind::Boolean, Value::Boolean(true)),
                    Literal::False => (NodeKind::Boolean, Value::Boolean(false)),
                    Literal::Null => (NodeKind::Null, Value::Null),
                };
                let id = self.create(kind);
                if let Some(node) = self.state.node_mut(id) {
                    node.buffer.push_str(literal.as_str());
                    node.resolved_value = Some(value);
                    node.closed = true;
                }
            }
            Token::Comma | Token::Colon | Token::EndOfInput => {}
        }
    }
}
