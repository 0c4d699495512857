//! Parser and tree-edit errors.

use cascade_lexer::{Position, SyntaxError};
use indextree::NodeId;
use thiserror::Error;

/// Errors that can occur while building a stylesheet from source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("unexpected `}}` at {position}")]
    UnexpectedCloseBrace { position: Position },

    #[error("unclosed block at {position}")]
    UnclosedBlock { position: Position },

    #[error("missing `:` in `{text}` at {position}")]
    MissingColon { text: String, position: Position },

    #[error("missing property name at {position}")]
    MissingProperty { position: Position },
}

impl ParseError {
    /// Where in the input the error was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Syntax(err) => err.position,
            ParseError::UnexpectedCloseBrace { position }
            | ParseError::UnclosedBlock { position }
            | ParseError::MissingColon { position, .. }
            | ParseError::MissingProperty { position } => *position,
        }
    }
}

/// A structural edit that would leave the tree malformed.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("node {0:?} does not belong to this stylesheet or was removed")]
    Removed(NodeId),

    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),

    #[error("the root node cannot be moved, detached or removed")]
    RootNode,

    #[error("node {0:?} has no parent to insert next to")]
    NoParent(NodeId),

    #[error("inserting {0:?} would place it inside itself")]
    Cycle(NodeId),

    #[error(transparent)]
    Node(#[from] indextree::NodeError),
}
