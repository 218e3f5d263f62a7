//! Interface to the external grammar engine
//!
//! The engine (libpg_query or a binding to it) owns the SQL grammar. pgpretty only
//! needs three things from it: a parse tree, canonical text for a single node, and
//! keyword classification for identifier quoting.

use thiserror::Error;

use crate::ir::{Node, ParseTree};

/// Structured error reported by the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", .cursor_pos.map(|pos| format!(" at position {pos}")).unwrap_or_default())]
pub struct EngineError {
    /// Human-readable description
    pub message: String,
    /// 1-based position in the input where the error was detected
    pub cursor_pos: Option<usize>,
    /// Additional parser context
    pub context: Option<String>,
    /// Engine-internal function that raised the error
    pub funcname: Option<String>,
    /// Engine-internal source file
    pub filename: Option<String>,
    /// Line in `filename`
    pub lineno: Option<u32>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cursor_pos: None,
            context: None,
            funcname: None,
            filename: None,
            lineno: None,
        }
    }

    pub fn at(mut self, cursor_pos: usize) -> Self {
        self.cursor_pos = Some(cursor_pos);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Keyword classification of a scanned token, as in PostgreSQL's `kwlist.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeywordKind {
    #[default]
    NoKeyword,
    Unreserved,
    ColName,
    TypeFuncName,
    Reserved,
}

/// One token produced by [`Engine::scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanToken {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub keyword: KeywordKind,
}

/// The grammar engine collaborator
pub trait Engine {
    /// Parse SQL text into a tree
    fn parse(&self, sql: &str) -> Result<ParseTree, EngineError>;

    /// Canonical SQL text for a whole tree
    fn deparse(&self, tree: &ParseTree) -> Result<String, EngineError>;

    /// Tokenize SQL text
    fn scan(&self, sql: &str) -> Result<Vec<ScanToken>, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn parse(&self, sql: &str) -> Result<ParseTree, EngineError> {
        (**self).parse(sql)
    }

    fn deparse(&self, tree: &ParseTree) -> Result<String, EngineError> {
        (**self).deparse(tree)
    }

    fn scan(&self, sql: &str) -> Result<Vec<ScanToken>, EngineError> {
        (**self).scan(sql)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn parse(&self, sql: &str) -> Result<ParseTree, EngineError> {
        (**self).parse(sql)
    }

    fn deparse(&self, tree: &ParseTree) -> Result<String, EngineError> {
        (**self).deparse(tree)
    }

    fn scan(&self, sql: &str) -> Result<Vec<ScanToken>, EngineError> {
        (**self).scan(sql)
    }
}

/// Canonical text for a single node, wrapped in a one-statement tree
pub fn deparse_node<E: Engine + ?Sized>(engine: &E, node: &Node) -> Result<String, EngineError> {
    engine.deparse(&ParseTree::single(node.clone()))
}
