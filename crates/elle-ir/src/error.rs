//! Errors the embedded LLVM-IR parser can raise.

use elle_source::types::SourceLocation;
use thiserror::Error;

/// A recoverable parse error, reported to the receiver without aborting the
/// parse (matching the round-trip guarantee for otherwise-well-formed
/// input).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message} ({location})")]
pub struct IrParseError {
    /// Human-readable message.
    pub message: String,
    /// Where the error occurred.
    pub location: SourceLocation,
}

impl IrParseError {
    /// Builds a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self { message: message.into(), location }
    }
}
