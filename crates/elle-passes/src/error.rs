//! Pass error types and the failure taxonomy passes report against.

use elle_source::types::SourceLocation;
use thiserror::Error;

/// The broad category a [`PassError`] falls into, matching `spec.md` §7's
/// taxonomy so tests and the pass manager can branch on category rather
/// than parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// A structural/invariant violation (the AST validator's domain).
    Structural,
    /// A name or member could not be resolved (path expander, name lowerer).
    Resolution,
    /// A type mismatch or missing type information (type resolver/guesser/validator).
    Typing,
    /// A domain rule violation that isn't purely structural or a type error
    /// (enum lowerer ambiguity, for-lowerer's "unexpected type", and similar).
    Semantic,
    /// A filesystem or import-resolution failure (the preprocessor).
    Io,
}

/// An error raised by a single pass.
///
/// Carries the same `{message, file, line, column}` shape as
/// [`elle_source::types::Diagnostic`] plus a [`FailureCategory`], so callers
/// can present a flat diagnostic list while still filtering on category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{category:?}: {message} ({file}:{line}:{column})")]
pub struct PassError {
    /// Human-readable message.
    pub message: String,
    /// Path or name of the file the error applies to.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// The error's category.
    pub category: FailureCategory,
}

impl PassError {
    /// Builds a pass error from a message, a source location, and a category.
    #[must_use]
    pub fn new(message: impl Into<String>, location: &SourceLocation, category: FailureCategory) -> Self {
        Self {
            message: message.into(),
            file: location.file.clone(),
            line: location.line,
            column: location.column,
            category,
        }
    }
}
