//! Error types for the OSC core.
//!
//! Address and encode errors are programmer errors: they are raised on
//! the sending / registration path and surfaced immediately. Pattern
//! errors are recoverable; the dispatcher falls back to literal
//! matching when it sees one.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OscError {
    /// Malformed address or pattern: missing leading slash, empty
    /// segment, or a disallowed character.
    #[error("invalid OSC address: {0}")]
    Address(String),

    /// A value could not be represented with the requested type tag.
    #[error("cannot encode OSC value: {0}")]
    Encode(String),

    /// Unmatched brace group in an address pattern.
    #[error("invalid OSC address pattern: {0}")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, OscError>;
