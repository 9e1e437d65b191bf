//! Declarative description of the value a session expects.
//!
//! A [`Schema`] tells the resolver what shape to carve out of the partial
//! syntax tree and which parts may be shown before they are complete. Every
//! schema node carries a human-readable description (it doubles as the
//! structured-output contract sent to a model, see
//! [`Schema::to_json_schema`]) and a `streaming` flag.
//!
//! # Examples
//!
//! ```rust
//! use jsontrellis::Schema;
//!
//! let schema = Schema::object(
//!     "Weather card",
//!     [
//!         ("location", Schema::string("City name").streaming()),
//!         ("temperature", Schema::number("Degrees Fahrenheit")),
//!         ("unit", Schema::enumeration("Unit", ["F", "C"]).optional()),
//!     ],
//! )
//! .streaming();
//!
//! assert!(schema.streaming);
//! assert_eq!(schema.fields().map(<[_]>::len), Some(3));
//! ```
use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    node::NodeKind,
    value::{Map, Value},
};

/// The closed set of shapes a [`Schema`] can describe.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Null,
    /// A string restricted to the listed values.
    Enum(Vec<String>),
    /// Any one of the branches; chosen by the observed node type.
    Union(Vec<Schema>),
    /// `null` or the inner schema.
    Nullable(Box<Schema>),
    /// Named fields in declaration order.
    Object(Vec<(String, Schema)>),
    /// Homogeneous elements.
    Array(Box<Schema>),
}

/// A node of a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub description: String,
    /// Whether a partial value may be surfaced before the node is closed.
    pub streaming: bool,
    /// Whether an enclosing object is complete without this field.
    pub optional: bool,
}

impl Schema {
    fn new(kind: SchemaKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            streaming: false,
            optional: false,
        }
    }

    #[must_use]
    pub fn string(description: impl Into<String>) -> Self {
        Self::new(SchemaKind::String, description)
    }

    #[must_use]
    pub fn number(description: impl Into<String>) -> Self {
        Self::new(SchemaKind::Number, description)
    }

    #[must_use]
    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(SchemaKind::Boolean, description)
    }

    #[must_use]
    pub fn null(description: impl Into<String>) -> Self {
        Self::new(SchemaKind::Null, description)
    }

    #[must_use]
    pub fn enumeration<I, S>(description: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(SchemaKind::Enum(values), description)
    }

    #[must_use]
    pub fn any_of(description: impl Into<String>, branches: impl IntoIterator<Item = Schema>) -> Self {
        Self::new(SchemaKind::Union(branches.into_iter().collect()), description)
    }

    /// `null` or `inner`. The description and streaming flag are taken from
    /// `inner`.
    #[must_use]
    pub fn nullable(inner: Schema) -> Self {
        let description = inner.description.clone();
        let streaming = inner.streaming;
        let mut schema = Self::new(SchemaKind::Nullable(Box::new(inner)), description);
        schema.streaming = streaming;
        schema
    }

    #[must_use]
    pub fn object<I, K>(description: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        Self::new(SchemaKind::Object(fields), description)
    }

    #[must_use]
    pub fn array(description: impl Into<String>, element: Schema) -> Self {
        Self::new(SchemaKind::Array(Box::new(element)), description)
    }

    /// Marks this node as streaming.
    #[must_use]
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Marks this node as an optional object field.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Declared fields, looking through `Nullable`.
    #[must_use]
    pub fn fields(&self) -> Option<&[(String, Schema)]> {
        match &self.kind {
            SchemaKind::Object(fields) => Some(fields),
            SchemaKind::Nullable(inner) => inner.fields(),
            _ => None,
        }
    }

    /// Whether a node of type `kind` can satisfy this schema.
    #[must_use]
    pub fn accepts(&self, kind: NodeKind) -> bool {
        match &self.kind {
            SchemaKind::String | SchemaKind::Enum(_) => kind == NodeKind::String,
            SchemaKind::Number => kind == NodeKind::Number,
            SchemaKind::Boolean => kind == NodeKind::Boolean,
            SchemaKind::Null => kind == NodeKind::Null,
            SchemaKind::Nullable(inner) => kind == NodeKind::Null || inner.accepts(kind),
            SchemaKind::Union(branches) => branches.iter().any(|b| b.accepts(kind)),
            SchemaKind::Object(_) => kind == NodeKind::Object,
            SchemaKind::Array(_) => kind == NodeKind::Array,
        }
    }

    /// Whether `value` is a complete instance: right types throughout and
    /// every non-optional object field present.
    #[must_use]
    pub fn is_satisfied_by(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (SchemaKind::String, Value::String(_))
            | (SchemaKind::Number, Value::Number(_))
            | (SchemaKind::Boolean, Value::Boolean(_))
            | (SchemaKind::Null | SchemaKind::Nullable(_), Value::Null) => true,
            (SchemaKind::Enum(values), Value::String(s)) => values.iter().any(|v| v == s),
            (SchemaKind::Nullable(inner), value) => inner.is_satisfied_by(value),
            (SchemaKind::Union(branches), value) => {
                branches.iter().any(|b| b.is_satisfied_by(value))
            }
            (SchemaKind::Object(fields), Value::Object(map)) => {
                fields.iter().all(|(name, field)| match map.get(name) {
                    Some(v) => field.is_satisfied_by(v),
                    None => field.optional,
                })
            }
            (SchemaKind::Array(element), Value::Array(items)) => {
                items.iter().all(|item| element.is_satisfied_by(item))
            }
            _ => false,
        }
    }

    /// Renders the schema as a JSON Schema document.
    ///
    /// ```rust
    /// use jsontrellis::Schema;
    ///
    /// let schema = Schema::object(
    ///     "Reply",
    ///     [("response", Schema::string("Text to show"))],
    /// );
    /// assert_eq!(
    ///     schema.to_json_schema().to_string(),
    ///     concat!(
    ///         r#"{"additionalProperties":false,"description":"Reply","#,
    ///         r#""properties":{"response":{"description":"Text to show","type":"string"}},"#,
    ///         r#""required":["response"],"type":"object"}"#,
    ///     )
    /// );
    /// ```
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        let mut set = |key: &str, value: Value| {
            out.insert(key.to_string(), value);
        };

        match &self.kind {
            SchemaKind::String => set("type", "string".into()),
            SchemaKind::Number => set("type", "number".into()),
            SchemaKind::Boolean => set("type", "boolean".into()),
            SchemaKind::Null => set("type", "null".into()),
            SchemaKind::Enum(values) => {
                set("type", "string".into());
                set(
                    "enum",
                    Value::Array(values.iter().map(|v| Value::from(v.as_str())).collect()),
                );
            }
            SchemaKind::Union(branches) => {
                set(
                    "anyOf",
                    Value::Array(branches.iter().map(Schema::to_json_schema).collect()),
                );
            }
            SchemaKind::Nullable(inner) => {
                let null = Value::Object(Map::from([("type".to_string(), "null".into())]));
                set("anyOf", Value::Array(alloc::vec![inner.to_json_schema(), null]));
            }
            SchemaKind::Object(fields) => {
                let properties = fields
                    .iter()
                    .map(|(name, field)| (name.clone(), field.to_json_schema()))
                    .collect::<Map>();
                let required = fields
                    .iter()
                    .filter(|(_, field)| !field.optional)
                    .map(|(name, _)| Value::from(name.as_str()))
                    .collect::<Vec<_>>();
                set("type", "object".into());
                set("properties", Value::Object(properties));
                set("required", Value::Array(required));
                set("additionalProperties", false.into());
            }
            SchemaKind::Array(element) => {
                set("type", "array".into());
                set("items", element.to_json_schema());
            }
        }

        if !self.description.is_empty() {
            set("description", self.description.as_str().into());
        }

        Value::Object(out)
    }
}
