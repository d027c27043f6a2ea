//! Parse errors for shared identifiers.

use thiserror::Error;

/// Failure to parse a wire identifier into a shared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The string is not one of the fixed role identifiers.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The string is not `Voll`, `Limit` or `Kein`.
    #[error("Unknown permission level: {0}")]
    UnknownLevel(String),
}
