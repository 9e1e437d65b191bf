//! Schema-guided resolution of the partial syntax tree.
//!
//! [`resolve`] walks the node arena alongside a [`Schema`] and produces the
//! best value that can be shown right now:
//!
//! - non-streaming scalars appear only once their node is closed;
//! - streaming strings show the decoded text read so far, streaming numbers
//!   the numeral read so far when it already parses;
//! - objects carry each declared field that resolves (undeclared keys are
//!   dropped) and arrays the elements that resolve, in order;
//! - a non-streaming object or array is withheld until closed, a streaming
//!   one appears as soon as its node exists;
//! - unions and nullables follow the type of the node actually observed.
//!
//! A node whose type cannot satisfy the schema resolves to `None` rather than
//! failing, so an imperfect model response still renders what it can.
//! Resolution reads nothing but its arguments.
use alloc::vec::Vec;

use crate::{
    node::{AstNode, NodeId, NodeKind},
    schema::{Schema, SchemaKind},
    state::ParserState,
    value::{Map, Value},
};

/// Resolves node `id` of `nodes` against `schema`.
#[must_use]
pub fn resolve(schema: &Schema, nodes: &[AstNode], id: NodeId) -> Option<Value> {
    let node = nodes.get(id.index())?;

    match &schema.kind {
        SchemaKind::String => scalar(schema, node, NodeKind::String, |n| {
            Some(Value::String(n.buffer.clone()))
        }),
        SchemaKind::Number => scalar(schema, node, NodeKind::Number, |n| {
            n.partial_number().map(Value::Number)
        }),
        SchemaKind::Boolean => scalar(schema, node, NodeKind::Boolean, |_| None),
        SchemaKind::Null => scalar(schema, node, NodeKind::Null, |_| None),
        SchemaKind::Enum(values) => scalar(schema, node, NodeKind::String, |_| None)
            .filter(|v| v.as_str().is_some_and(|s| values.iter().any(|m| m == s))),
        SchemaKind::Nullable(inner) => {
            if node.kind == NodeKind::Null {
                node.closed.then_some(Value::Null)
            } else {
                resolve(inner, nodes, id)
            }
        }
        SchemaKind::Union(branches) => {
            pick_branch(branches, node).and_then(|branch| resolve(branch, nodes, id))
        }
        SchemaKind::Object(fields) => {
            if node.kind != NodeKind::Object || (!schema.streaming && !node.closed) {
                return None;
            }
            let mut map = Map::new();
            for (name, field) in fields {
                if let Some(value) = node
                    .child_by_key(name)
                    .and_then(|child| resolve(field, nodes, child))
                {
                    map.insert(name.clone(), value);
                }
            }
            Some(Value::Object(map))
        }
        SchemaKind::Array(element) => {
            if node.kind != NodeKind::Array || (!schema.streaming && !node.closed) {
                return None;
            }
            Some(Value::Array(
                node.children
                    .iter()
                    .filter_map(|child| resolve(element, nodes, *child))
                    .collect(),
            ))
        }
    }
}

/// Resolves the root of `state`, if it has one.
#[must_use]
pub fn resolve_root(schema: &Schema, state: &ParserState) -> Option<Value> {
    state
        .root_id
        .and_then(|root| resolve(schema, &state.nodes, root))
}

fn scalar(
    schema: &Schema,
    node: &AstNode,
    kind: NodeKind,
    partial: impl FnOnce(&AstNode) -> Option<Value>,
) -> Option<Value> {
    if node.kind != kind {
        None
    } else if node.closed {
        node.resolved_value.clone()
    } else if schema.streaming {
        partial(node)
    } else {
        None
    }
}

/// Picks the union branch for `node`.
///
/// Branches that cannot accept the node's type are skipped. When several
/// object branches remain, the first one declaring every key seen so far
/// wins, then the first one declaring the first key, then the first
/// candidate.
fn pick_branch<'s>(branches: &'s [Schema], node: &AstNode) -> Option<&'s Schema> {
    let mut candidates = branches.iter().filter(|b| b.accepts(node.kind));
    let first = candidates.next()?;
    if node.kind != NodeKind::Object || node.keys.is_empty() {
        return Some(first);
    }

    let candidates: Vec<&Schema> = core::iter::once(first).chain(candidates).collect();

    candidates
        .iter()
        .copied()
        .find(|b| node.keys.iter().all(|k| declares(b, k)))
        .or_else(|| {
            candidates
                .iter()
                .copied()
                .find(|b| declares(b, &node.keys[0]))
        })
        .or(Some(first))
}

fn declares(branch: &Schema, key: &str) -> bool {
    branch
        .fields()
        .is_some_and(|fields| fields.iter().any(|(name, _)| name == key))
}
