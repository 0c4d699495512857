//! Tokenizer errors.

use thiserror::Error;

use crate::input::Position;

/// What kind of construct was left open.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("unclosed string")]
    UnclosedString,

    #[error("unclosed comment")]
    UnclosedComment,

    #[error("unclosed url")]
    UnclosedUrl,
}

/// A malformed construct found while scanning, with the position where it starts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at {position}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: Position,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: Position) -> Self {
        Self { kind, position }
    }
}
