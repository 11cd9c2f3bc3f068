//! Push parser for the textual LLVM-IR escape hatch embedded in Elle source.
//!
//! `spec.md` §4.3 lets a class field or rule value hold a raw LLVM-IR
//! fragment instead of going through the rest of the pipeline's type system.
//! This crate lexes and parses that fragment far enough to report its
//! structure — module, function, basic block, instruction — as a stream of
//! [`Event`]s, without attempting to model the full ~150-production LLVM
//! assembly grammar. Unrecognized-but-well-formed input still round-trips:
//! it surfaces as [`EventKind::Token`] rather than a parse error.
//!
//! The embedding compiler (`elle-compiler`) is expected to implement
//! [`Receiver`] over its own `AnyNode` arena the same way it implements
//! [`elle_passes::passes::preprocessor::ImportResolver`] over its own
//! translation-unit recursion: this crate only produces the event stream,
//! it never builds a tree of its own.

pub mod error;
pub mod event;
pub mod parser;
pub mod receiver;
pub mod token;

pub use error::IrParseError;
pub use event::{Event, EventKind};
pub use parser::IrParser;
pub use receiver::Receiver;
pub use token::Token;
