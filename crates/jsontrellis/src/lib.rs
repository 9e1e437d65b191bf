//! Incremental JSON parsing for structured output that is still streaming.
//!
//! A [`Session`] consumes a JSON document chunk by chunk and maintains a
//! partial syntax tree whose nodes keep stable ids for the lifetime of the
//! session. After every chunk the tree is resolved against a [`Schema`] into
//! the best [`Value`] that can be shown so far, which lets a renderer paint a
//! response before the model has finished writing it.
//!
//! ```rust
//! use jsontrellis::{Schema, Session, produce_prefixes};
//!
//! let schema = Schema::object(
//!     "Weather",
//!     [
//!         ("location", Schema::string("City").streaming()),
//!         ("temperature", Schema::number("Degrees")),
//!     ],
//! )
//! .streaming();
//! let document = r#"{"location":"Lisbon","temperature":21}"#;
//!
//! let mut session = Session::new(schema);
//! for prefix in produce_prefixes(document, 8) {
//!     let update = session.feed(prefix);
//!     if let Some(value) = update.value {
//!         // The location grows letter by letter; the temperature appears
//!         // only once the closing brace terminates it.
//!         assert!(value.get("temperature").is_none() || update.state.is_complete);
//!     }
//! }
//! assert!(session.state().is_complete);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod chunk_utils;
mod error;
mod escape_buffer;
mod layout;
mod literal_buffer;
mod node;
mod options;
mod resolve;
mod scanner;
mod schema;
mod session;
mod state;
mod value;

#[cfg(test)]
mod tests;

pub use builder::AstBuilder;
pub use chunk_utils::{produce_chunks, produce_prefixes};
pub use error::ParseError;
pub use layout::{Edge, EdgeLabel, Layout, PlacedNode, layout};
pub use node::{AstNode, NodeId, NodeKind};
pub use options::{DEFAULT_MAX_DEPTH, FeedMode, SessionOptions};
pub use resolve::{resolve, resolve_root};
pub use scanner::{Literal, Scanner, Token, TokenSink};
pub use schema::{Schema, SchemaKind};
pub use session::{Session, Update};
pub use state::ParserState;
pub use value::{Array, Map, Value};
