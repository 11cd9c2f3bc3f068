//! Pass 5: checks structural invariants (`spec.md` §3) before type work
//! begins.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind};

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

/// Validates invariants 1, 3, and 4 of the data model: every non-root node
/// has a parent whose children include it, every `ValuePath` has at least
/// one segment with a well-formed head, and every `ClassDecl` field/method
/// is shaped correctly.
#[derive(Debug, Default)]
pub struct AstValidator {
    errors: Vec<PassError>,
}

impl AstValidator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn check_parent_links(&mut self, ast: &AST, root: NodeID) {
        for id in ast.collect_nodes_pre_order(root) {
            if id == root {
                continue;
            }
            let Some(node) = ast.get_node(id) else { continue };
            let Some(parent_id) = node.data.parent() else {
                self.errors.push(PassError::new(
                    format!("node {id} has no parent"),
                    node.data.location(),
                    FailureCategory::Structural,
                ));
                continue;
            };
            let Some(parent) = ast.get_node(parent_id) else {
                self.errors.push(PassError::new(
                    format!("node {id}'s parent {parent_id} does not exist"),
                    node.data.location(),
                    FailureCategory::Structural,
                ));
                continue;
            };
            if !parent.data.children().contains(&id) {
                self.errors.push(PassError::new(
                    format!("node {id}'s parent {parent_id} does not list it as a child"),
                    node.data.location(),
                    FailureCategory::Structural,
                ));
            }
        }
    }

    fn check_value_paths(&mut self, ast: &AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Path) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::ValuePath(path) = &node.data else { continue };
            if path.segments.is_empty() {
                self.errors.push(PassError::new("value path has no segments", path.location(), FailureCategory::Structural));
                continue;
            }
            let Some(head) = ast.get_node(path.segments[0]) else { continue };
            let head_ok = matches!(head.data, AnyNode::VarName(_) | AnyNode::PropertyName(_) | AnyNode::Selector(_));
            if !head_ok {
                self.errors.push(PassError::new(
                    "value path's first segment must be a variable name, property name, or selector",
                    path.location(),
                    FailureCategory::Structural,
                ));
            }
        }
    }

    fn check_class_members(&mut self, ast: &AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::ClassDecl(class) = &node.data else { continue };
            for field_id in &class.fields {
                let Some(field_node) = ast.get_node(*field_id) else { continue };
                if !matches!(field_node.data, AnyNode::VarDecl(_)) {
                    self.errors.push(PassError::new(
                        format!("class '{}' field {field_id} is not a VarDecl", class.name()),
                        class.location(),
                        FailureCategory::Structural,
                    ));
                }
            }
            for method_id in &class.methods {
                let Some(method_node) = ast.get_node(*method_id) else { continue };
                if !matches!(method_node.data, AnyNode::FunctionDecl(_)) {
                    self.errors.push(PassError::new(
                        format!("class '{}' method {method_id} is not a FunctionDecl", class.name()),
                        class.location(),
                        FailureCategory::Structural,
                    ));
                }
            }
        }
    }
}

impl Pass for AstValidator {
    fn name(&self) -> &'static str { "ast_validator" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        self.check_parent_links(ast, root);
        self.check_value_paths(ast, root);
        self.check_class_members(ast, root);
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { true }
}
