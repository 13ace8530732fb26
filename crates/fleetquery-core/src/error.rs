//! Core error types.

use thiserror::Error;

/// Device-list evaluation errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] fleetquery_proto::Error),

    /// A status clause carried a literal other than Running, Disabled or
    /// Pending.
    #[error("unknown device status '{0}'")]
    UnknownStatus(String),

    /// Device document JSON could not be parsed.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}
