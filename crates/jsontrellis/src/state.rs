use alloc::vec::Vec;

use crate::{
    error::ParseError,
    node::{AstNode, NodeId},
};

/// Everything a session knows about the document so far.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParserState {
    /// All nodes created so far, ordered by id.
    pub nodes: Vec<AstNode>,
    /// The top-level node, once the first value has started.
    pub root_id: Option<NodeId>,
    /// Id the next created node receives.
    pub next_id: u32,
    /// Characters consumed so far, cumulative across chunks.
    pub index: usize,
    /// Where the document stopped being valid JSON, if it did.
    pub error: Option<ParseError>,
    /// The root is closed and every required schema field is present.
    pub is_complete: bool,
}

impl ParserState {
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn root(&self) -> Option<&AstNode> {
        self.root_id.and_then(|id| self.node(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut AstNode> {
        self.nodes.get_mut(id.index())
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::ParserState;
    use crate::{schema::Schema, session::Session};

    fn round_trip(state: &ParserState) -> ParserState {
        let json = serde_json::to_string(state).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn open_state_survives_serde() {
        let mut session = Session::new(Schema::string("").streaming());
        session.feed(r#"{"title":"Hi","tags":["a",2.5],"ok":true,"n":-1"#);
        let state = session.state();
        assert!(state.nodes.iter().any(|n| n.closed));
        assert!(state.nodes.iter().any(|n| !n.closed));
        assert_eq!(&round_trip(state), state);
    }

    #[test]
    fn error_survives_serde() {
        let mut session = Session::new(Schema::string(""));
        session.feed("[1, }");
        let state = session.state();
        assert!(state.error.is_some());
        assert_eq!(&round_trip(state), state);
    }
}
