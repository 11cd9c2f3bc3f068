//! Shared helpers used by several passes.

use elle_ast::ast::AST;
use elle_ast::nodes::{AnyNode, ASTNode, NodeID, NodeKind};

/// Overwrites a node's kind and payload in place, preserving its id and
/// parent back-link.
///
/// Several passes replace a node's entire shape while keeping its identity:
/// the color maker turns a `#color` instruction into an `ObjectDefinition`,
/// the enum lowerer turns a bare `PropertyName` into an `Assignment`, and so
/// on. Doing this in place (rather than allocating a new node and rewiring
/// the parent's child list) keeps every other reference to the id valid.
pub(crate) fn replace_node(ast: &mut AST, id: NodeID, kind: NodeKind, data: AnyNode) {
    let parent = ast.get_node(id).and_then(|node| node.data.parent());
    let mut data = data.with_id(id);
    if let Some(parent) = parent {
        data = data.with_parent(parent);
    }
    if let Some(node) = ast.get_node_mut(id) {
        node.kind = kind;
        node.data = data;
    }
}
