//! IR node model
//!
//! A [`Node`] is one [`NodeKind`] plus its fields in engine order. Wrapper slots are
//! resolved when the tree is decoded ([`json`]), so consumers only ever see concrete
//! nodes: a single child slot is [`Value::Node`], a repeated one is [`Value::List`], and
//! an empty wrapper inside a list is `None`.

pub mod json;
pub mod kind;

pub use kind::NodeKind;

use crate::error::{Error, Result};
use crate::walk::{self, Children, Walk};

/// `server_version_num` stamped on trees built by [`ParseTree::single`]
pub const PG_VERSION_NUM: i64 = 170004;

/// Value of one node field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Strings and enum constants
    Str(String),
    Node(Box<Node>),
    List(Vec<Option<Node>>),
}

impl Value {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node.as_ref()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Node> for Value {
    fn from(v: Node) -> Self {
        Value::Node(Box::new(v))
    }
}

impl From<Vec<Node>> for Value {
    fn from(v: Vec<Node>) -> Self {
        Value::List(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<Node>>> for Value {
    fn from(v: Vec<Option<Node>>) -> Self {
        Value::List(v)
    }
}

/// One `(name, value)` pair of a node
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// snake_case schema field name
    pub name: String,
    pub value: Value,
}

/// A node of the engine's parse tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    fields: Vec<Field>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    /// Builder form of [`Node::set`]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing an existing one in place or appending a new one
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// A single child slot, if set
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.field(name).and_then(Value::as_node)
    }

    /// The non-empty entries of a repeated child slot
    pub fn list(&self, name: &str) -> Vec<&Node> {
        self.slots(name).iter().flatten().collect()
    }

    /// Raw entries of a repeated child slot, empty wrappers included
    pub fn slots(&self, name: &str) -> &[Option<Node>] {
        match self.field(name) {
            Some(Value::List(items)) => items,
            _ => &[],
        }
    }

    /// A string field, `None` when absent or empty
    pub fn str(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// A boolean field; absent reads as `false`
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some(Value::Bool(true)))
    }

    /// An integer field; absent reads as `0`
    pub fn int(&self, name: &str) -> i64 {
        match self.field(name) {
            Some(Value::Int(v)) => *v,
            _ => 0,
        }
    }

    /// An enum field; absent reads as `""`
    pub fn tag(&self, name: &str) -> &str {
        self.field(name).and_then(Value::as_str).unwrap_or("")
    }

    /// The text of a `String` value node
    pub fn as_string(&self) -> Option<&str> {
        if self.kind == NodeKind::String {
            Some(self.tag("sval"))
        } else {
            None
        }
    }

    /// Direct children in field order, empty wrappers skipped
    pub fn children(&self) -> Children<'_> {
        Children::new(self)
    }

    /// Pre-order traversal rooted at this node
    pub fn walk(&self) -> Walk<'_> {
        walk::walk(self)
    }

    /// Encode as a wrapped JSON node (`{"Kind": {...}}`)
    pub fn to_value(&self) -> serde_json::Value {
        json::encode_wrapped(self)
    }

    /// Decode a wrapped JSON node
    pub fn from_value(value: &serde_json::Value) -> Result<Node> {
        json::decode_wrapped(value, "<root>")?
            .ok_or_else(|| Error::invalid_tree("empty node wrapper"))
    }
}

/// A whole parse result: a `ParseResult` node holding `RawStmt`s
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    root: Node,
}

impl ParseTree {
    pub fn new(root: Node) -> Result<Self> {
        if !root.is(NodeKind::ParseResult) {
            return Err(Error::invalid_tree(format!(
                "expected ParseResult at the root, found {}",
                root.kind()
            )));
        }
        Ok(Self { root })
    }

    /// Build a tree holding `stmts`, each wrapped in a `RawStmt`
    pub fn from_statements(stmts: impl IntoIterator<Item = Node>) -> Self {
        let raw: Vec<Node> = stmts
            .into_iter()
            .map(|stmt| Node::new(NodeKind::RawStmt).with("stmt", stmt))
            .collect();
        let root = Node::new(NodeKind::ParseResult)
            .with("version", PG_VERSION_NUM)
            .with("stmts", raw);
        Self { root }
    }

    /// Minimal one-statement container around `stmt`
    pub fn single(stmt: Node) -> Self {
        Self::from_statements([stmt])
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Self::new(json::decode_root(value)?)
    }

    pub fn to_value(&self) -> serde_json::Value {
        json::encode_fields(&self.root)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn version(&self) -> i64 {
        self.root.int("version")
    }

    /// The `RawStmt` containers
    pub fn raw_statements(&self) -> Vec<&Node> {
        self.root.list("stmts")
    }

    /// The statement nodes, unwrapped from their `RawStmt`s
    pub fn statements(&self) -> impl Iterator<Item = &Node> + '_ {
        self.root
            .slots("stmts")
            .iter()
            .flatten()
            .filter_map(|raw| raw.child("stmt"))
    }

    pub fn is_empty(&self) -> bool {
        self.statements().next().is_none()
    }
}
