//! pgpretty - a precedence-aware pretty printer for PostgreSQL parse trees
//!
//! Parsing is delegated to an external grammar engine (libpg_query) through the
//! [`Engine`] trait. This crate walks the engine's tree ([`ir`], [`walk`]), decides
//! parenthesization ([`precedence`]) and prints canonical SQL ([`formatter`]).

pub mod engine;
pub mod error;
pub mod formatter;
pub mod ir;
pub mod precedence;
pub mod walk;

pub use engine::{Engine, EngineError, KeywordKind, ScanToken};
pub use error::{Error, Result};
pub use formatter::{format_sql, format_tree, Formatter};
pub use ir::{Node, NodeKind, ParseTree, Value};
pub use walk::{walk, Dispatch, Visitor};

/// Parse `sql` with `engine` and return it in canonical layout
pub fn format<E: Engine>(engine: E, sql: &str) -> Result<String> {
    format_sql(engine, sql)
}

/// Check if `sql` is already in canonical layout
pub fn check<E: Engine>(engine: E, sql: &str) -> Result<bool> {
    let formatted = format_sql(engine, sql)?;
    Ok(formatted == sql)
}
