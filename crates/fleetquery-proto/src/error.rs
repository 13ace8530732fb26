//! Protocol error types.

use thiserror::Error;

use crate::clause::ClauseType;

/// Protocol-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The clause type has no SQL rendering; it only exists for in-memory
    /// matching and must not reach the SQL builder.
    #[error("clause type {0} cannot be rendered as a SQL operator")]
    UnsupportedClauseType(ClauseType),

    /// Unknown clause type name in stored data.
    #[error("unknown clause type '{0}'")]
    UnknownClauseType(String),

    /// Unknown sort order name in stored data.
    #[error("unknown sort order '{0}'")]
    UnknownSortOrder(String),

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}
