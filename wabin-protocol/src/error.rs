//! Encoder error types and stable error kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that abort an encode call.
///
/// Every variant is fatal for the node tree being encoded; no partial output
/// is ever returned.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("content too large to encode: {len} bytes")]
    LengthOverflow { len: u64 },

    #[error("invalid token: {0}")]
    InvalidToken(usize),

    #[error("double byte dictionary token out of range: {token:?} (index {index})")]
    DictionaryPageOutOfRange { token: String, index: usize },

    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("invalid children: {0}")]
    InvalidChildren(String),

    #[error("list too long: {count} entries (max {max})")]
    ListTooLong { count: usize, max: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Returns the stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::LengthOverflow { .. } => ErrorKind::LengthOverflow,
            ProtocolError::InvalidToken(_) => ErrorKind::InvalidToken,
            ProtocolError::DictionaryPageOutOfRange { .. } => ErrorKind::DictionaryPageOutOfRange,
            ProtocolError::InvalidNode(_) => ErrorKind::InvalidNode,
            ProtocolError::InvalidChildren(_) => ErrorKind::InvalidChildren,
            ProtocolError::ListTooLong { .. } => ErrorKind::ListTooLong,
            ProtocolError::Json(_) => ErrorKind::InvalidNode,
        }
    }

    pub(crate) fn invalid_node(reason: impl Into<String>) -> Self {
        Self::InvalidNode(reason.into())
    }

    pub(crate) fn invalid_children(reason: impl Into<String>) -> Self {
        Self::InvalidChildren(reason.into())
    }
}

/// Stable error kinds.
///
/// These names are reported by tooling and must remain stable across
/// versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    LengthOverflow,
    InvalidToken,
    DictionaryPageOutOfRange,
    InvalidNode,
    InvalidChildren,
    ListTooLong,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::LengthOverflow => write!(f, "LENGTH_OVERFLOW"),
            ErrorKind::InvalidToken => write!(f, "INVALID_TOKEN"),
            ErrorKind::DictionaryPageOutOfRange => write!(f, "DICTIONARY_PAGE_OUT_OF_RANGE"),
            ErrorKind::InvalidNode => write!(f, "INVALID_NODE"),
            ErrorKind::InvalidChildren => write!(f, "INVALID_CHILDREN"),
            ErrorKind::ListTooLong => write!(f, "LIST_TOO_LONG"),
        }
    }
}
