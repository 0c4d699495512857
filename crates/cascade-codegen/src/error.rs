/// Error types for the cascade processor

use std::path::PathBuf;
use cascade_parser::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessError>;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Parse error in {file}: {source}")]
    Parse { file: PathBuf, source: ParseError },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl ProcessError {
    pub fn parse(file: impl Into<PathBuf>, source: ParseError) -> Self {
        ProcessError::Parse {
            file: file.into(),
            source,
        }
    }

    pub fn invalid_option(message: impl Into<String>) -> Self {
        ProcessError::InvalidOption(message.into())
    }
}
