//! Utility functions for the SQL formatter

use once_cell::sync::Lazy;
use regex::Regex;

use super::rules::{QUOTING_PROBE, SIMPLE_IDENT};
use crate::engine::{Engine, EngineError, KeywordKind};

static SIMPLE_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SIMPLE_IDENT).expect("Invalid identifier pattern regex"));

/// Lowercase, starts with a letter or underscore, only `[a-z0-9_]` after that
pub(crate) fn is_simple_ident(name: &str) -> bool {
    SIMPLE_IDENT_RE.is_match(name)
}

/// Wrap in double quotes, doubling embedded quotes
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Wrap in single quotes, doubling embedded quotes
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Ask the engine's scanner whether `name` is a reserved keyword
pub(crate) fn is_reserved_keyword<E: Engine + ?Sized>(engine: &E, name: &str) -> Result<bool, EngineError> {
    let tokens = engine.scan(&format!("{QUOTING_PROBE}{name}"))?;
    Ok(tokens
        .get(1)
        .is_some_and(|token| token.keyword == KeywordKind::Reserved))
}

/// Bit string constant as the engine stores it (`b0101`, `x1F`) to SQL syntax
pub(crate) fn bit_string_literal(bsval: &str) -> String {
    if let Some(bits) = bsval.strip_prefix(['b', 'B']) {
        format!("B'{bits}'")
    } else if let Some(hex) = bsval.strip_prefix(['x', 'X']) {
        format!("X'{hex}'")
    } else {
        format!("B'{bsval}'")
    }
}
