#![forbid(unsafe_code)]

//! Errors surfaced by the skipping filter.

use std::io;

/// Skipping filter errors.
///
/// Malformed escape sequences and invalid UTF-8 are not errors; the only
/// failure is the sink refusing a write.
#[derive(Debug)]
pub enum SkipError {
    /// The underlying sink failed to accept output.
    SinkWriteFailed(io::Error),
}

impl SkipError {
    /// The I/O error kind reported by the sink.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::SinkWriteFailed(err) => err.kind(),
        }
    }
}

impl std::fmt::Display for SkipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinkWriteFailed(err) => write!(f, "sink write failed: {err}"),
        }
    }
}

impl std::error::Error for SkipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SinkWriteFailed(err) => Some(err),
        }
    }
}

impl From<io::Error> for SkipError {
    fn from(err: io::Error) -> Self {
        Self::SinkWriteFailed(err)
    }
}

impl From<SkipError> for io::Error {
    fn from(err: SkipError) -> Self {
        match err {
            SkipError::SinkWriteFailed(inner) => inner,
        }
    }
}
