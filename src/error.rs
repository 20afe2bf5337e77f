//! Error types for query construction.

use thiserror::Error;

/// Errors that can occur while building or rendering a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SporkError {
    #[error("Invalid join kind: {name}")]
    InvalidJoinKind { name: String },

    #[error("Unsupported literal type: {type_name}")]
    UnsupportedLiteralType { type_name: String },

    #[error("Invalid bounds: rows between {lower} and {upper}")]
    InvalidFrameBounds { lower: String, upper: String },

    #[error("Row bounds can only be offset by an integer, got {type_name}")]
    InvalidOffsetType { type_name: String },

    #[error("Cannot negate an incomplete expression")]
    IncompleteNegation,

    #[error("A query must have a selection")]
    MissingSelection,

    #[error("A query must have a dataset")]
    MissingDataset,

    #[error("Invalid query document: {0}")]
    Document(String),
}

/// Result type for query construction.
pub type SporkResult<T> = Result<T, SporkError>;
