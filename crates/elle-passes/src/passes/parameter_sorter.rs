//! Pass 17: reorders function arguments to canonical positions — required
//! before optional before variadic — stable within each bucket.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind};

use crate::error::PassError;
use crate::manager::Pass;

/// A declared argument's required/optional/variadic bucket.
///
/// No dedicated "variadic" flag exists on `VarDecl`; by convention a
/// variadic trailing parameter is named `...` (mirroring the calling
/// convention's own spelling), same as an optional parameter is simply one
/// that declares an initializer.
fn bucket(ast: &AST, id: NodeID) -> u8 {
    let Some(node) = ast.get_node(id) else { return 0 };
    let AnyNode::VarDecl(decl) = &node.data else { return 0 };
    if decl.name == "..." {
        2
    } else if decl.init_val.is_some() {
        1
    } else {
        0
    }
}

/// Reorders each function's argument list into required/optional/variadic
/// canonical order.
#[derive(Debug, Default)]
pub struct ParameterSorter {
    errors: Vec<PassError>,
}

impl ParameterSorter {
    /// Creates a new parameter sorter.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Pass for ParameterSorter {
    fn name(&self) -> &'static str { "parameter_sorter" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for function_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(function_id) else { continue };
            let AnyNode::FunctionDecl(decl) = &node.data else { continue };
            let mut arguments = decl.arguments.clone();
            arguments.sort_by_key(|id| bucket(ast, *id));

            if let Some(node) = ast.get_node_mut(function_id) {
                if let AnyNode::FunctionDecl(decl) = &mut node.data {
                    decl.arguments = arguments;
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{FunctionDecl, NumberLiteral, RootNode, VarDecl};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn reorders_variadic_optional_and_required_arguments() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let variadic = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "...")));
        let default_value = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1")));
        let optional = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "limit").with_init_val(default_value)),
        );
        ast.set_parent(default_value, optional);
        let required = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "name")));

        let function_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(
                FunctionDecl::new(NodeID::placeholder(), loc(), "f").with_arguments(vec![variadic, optional, required]),
            ),
        );
        ast.set_parent(variadic, function_id);
        ast.set_parent(optional, function_id);
        ast.set_parent(required, function_id);
        ast.set_parent(function_id, root_id);

        let mut pass = ParameterSorter::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(function_id).expect("node still exists");
        let AnyNode::FunctionDecl(decl) = &node.data else { panic!("expected FunctionDecl") };
        assert_eq!(decl.arguments, vec![required, optional, variadic]);
    }
}
