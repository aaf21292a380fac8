use std::path::PathBuf;

/// Errors raised while loading a document into a [`LineSource`].
///
/// [`LineSource`]: crate::source::LineSource
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the lexer and parser.
///
/// Malformed input is never an error: bad metadata degrades to comment text
/// and unknown shapes fall back to plain lines. The only hard failure is a
/// document too large for the 32-bit lexeme position fields.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("{what} of {value} exceeds the lexeme position range")]
    CapacityExceeded { what: &'static str, value: usize },
    #[error(transparent)]
    Source(#[from] SourceError),
}
