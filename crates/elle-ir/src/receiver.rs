//! The push-parser's callback boundary.

use elle_source::types::SourceLocation;

use crate::event::EventKind;
use crate::error::IrParseError;

/// Receives the event stream [`crate::IrParser`] produces.
///
/// A structural node is bracketed by `node_start`/`node_end`; leaf data
/// (operand text, literal values, raw tokens) arrives via `data` between
/// the two. Implementations typically build an `AnyNode::Instruction`-style
/// tree node per `node_start`, matching how every other pass boundary in
/// this workspace consumes an event stream rather than a parse tree
/// directly.
pub trait Receiver {
    /// A structural node begins.
    fn node_start(&mut self, kind: EventKind, location: &SourceLocation);

    /// A leaf datum (operand, literal, raw token) arrives.
    fn data(&mut self, kind: EventKind, text: &str, location: &SourceLocation);

    /// The most recently started structural node ends.
    fn node_end(&mut self, kind: EventKind);

    /// A recoverable parse error was found; the parser continues past it.
    fn error(&mut self, error: &IrParseError);

    /// Called once per token consumed, purely for diagnostics that need to
    /// quote the exact source range (the default implementation ignores it).
    fn source_location(&mut self, _location: &SourceLocation) {}
}
