//! Source file handling and position tracking for the Elle programming language.
//!
//! This crate provides the fundamental types and utilities for working with source code
//! in the Elle compiler pipeline. It handles source file representation, content access,
//! and precise location tracking through spans and positions.
//!
//! It also defines [`types::SourceLocation`] and [`types::Diagnostic`], the
//! self-contained location/message shapes carried directly on AST nodes and
//! produced by every pass, independent of any live `SourceManager`.

pub mod types;
