//! Error types for pgpretty

use miette::Diagnostic;
use thiserror::Error;

use crate::engine::EngineError;
use crate::ir::NodeKind;

/// Result type alias for pgpretty operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pgpretty
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("{error}")]
    #[diagnostic(code(pgpretty::parse_error))]
    Parse {
        error: EngineError,
        #[label("here")]
        span: Option<(usize, usize)>,
        #[help]
        context: Option<String>,
    },

    #[error("cannot format {kind} node")]
    #[diagnostic(code(pgpretty::unsupported))]
    Unsupported {
        kind: NodeKind,
        #[source]
        source: EngineError,
    },

    #[error("cannot classify identifier `{ident}`")]
    #[diagnostic(code(pgpretty::quoting_oracle))]
    QuotingOracle {
        ident: String,
        #[source]
        source: EngineError,
    },

    #[error("Invalid parse tree: {message}")]
    #[diagnostic(code(pgpretty::invalid_tree))]
    InvalidTree { message: String },

    #[error("JSON error: {0}")]
    #[diagnostic(code(pgpretty::json_error))]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an engine parse failure, pointing the label at its cursor position
    pub fn parse(error: EngineError) -> Self {
        // cursor positions from the engine are 1-based
        let span = error.cursor_pos.map(|pos| (pos.saturating_sub(1), 1));
        let context = error.context.clone();
        Error::Parse {
            error,
            span,
            context,
        }
    }

    pub(crate) fn invalid_tree(message: impl Into<String>) -> Self {
        Error::InvalidTree {
            message: message.into(),
        }
    }

    /// The engine error behind this failure, if any
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Error::Parse { error, .. } => Some(error),
            Error::Unsupported { source, .. } | Error::QuotingOracle { source, .. } => Some(source),
            Error::InvalidTree { .. } | Error::Json(_) => None,
        }
    }
}
