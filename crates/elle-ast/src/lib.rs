//! Abstract Syntax Tree (AST) definitions for the Elle programming language.
//!
//! The AST is an arena ([`ast::AST`]) of generation-checked [`nodes::NodeID`]
//! handles over a tagged-union node type, [`nodes::AnyNode`]. Passes walk it
//! with the double-dispatch [`visitor::Visitor`]/[`visitor::MutVisitor`]
//! traits; type annotations live outside the arena as the small [`types::Type`]
//! algebra.

#[macro_use]
pub mod macros;

pub mod ast;
pub mod nodes;
pub mod types;
pub mod visitor;
