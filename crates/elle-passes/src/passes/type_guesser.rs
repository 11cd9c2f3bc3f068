//! Pass 11: bidirectional type inference — propagates types from
//! initializers to declarations and back from declarations to bare literals.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, Typed};
use elle_ast::types::Type;

use crate::error::PassError;
use crate::manager::Pass;

/// Infers missing types by propagating a known type across an
/// `Assignment`/`VarDecl` initializer edge in either direction.
#[derive(Debug, Default)]
pub struct TypeGuesser {
    errors: Vec<PassError>,
}

impl TypeGuesser {
    /// Creates a new type guesser.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn literal_type(&self, ast: &AST, id: NodeID) -> Option<Type> {
        let node = ast.get_node(id)?;
        match &node.data {
            AnyNode::NumberLiteral(_) => Some(Type::basic("i64")),
            AnyNode::BoolLiteral(_) => Some(Type::basic("bool")),
            AnyNode::StringLiteral(_) => Some(Type::basic("str")),
            AnyNode::ObjectDefinition(def) => Some(Type::Object(def.object_type.clone())),
            _ => None,
        }
    }
}

impl Pass for TypeGuesser {
    fn name(&self) -> &'static str { "type_guesser" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        // Forward: declaration has no type, but its initializer is a literal
        // whose type is known.
        for id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::VarDecl(decl) = &node.data else { continue };
            if decl.get_type().is_some() {
                continue;
            }
            let Some(init_val) = decl.init_val else { continue };
            let Some(inferred) = self.literal_type(ast, init_val) else { continue };
            if let Some(node) = ast.get_node_mut(id) {
                if let AnyNode::VarDecl(decl) = &mut node.data {
                    decl.set_type(inferred);
                }
            }
        }

        // Backward: assignment's subject (a declared field) has a known
        // type, but the right-hand side is an untyped number literal that
        // should adopt the field's numeric width.
        for id in ast.find_nodes_of_kind(root, NodeKind::Assignment) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::Assignment(assignment) = &node.data else { continue };
            let subject = assignment.subject;
            let value = assignment.value;

            let subject_type = ast.get_node(subject).and_then(|n| match &n.data {
                AnyNode::VarDecl(decl) => decl.get_type().cloned(),
                AnyNode::PropertyName(p) => p.get_type().cloned(),
                _ => None,
            });
            let Some(subject_type) = subject_type else { continue };
            if !subject_type.is_number_type() {
                continue;
            }

            if let Some(node) = ast.get_node_mut(value) {
                if let AnyNode::NumberLiteral(literal) = &mut node.data {
                    if literal.get_type().is_none() {
                        literal.set_type(subject_type);
                    }
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Assignment, RootNode, VarDecl};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn infers_declaration_type_from_literal_initializer() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let init = ast.alloc_node(NodeKind::Literal, AnyNode::BoolLiteral(elle_ast::nodes::BoolLiteral::new(NodeID::placeholder(), loc(), true)));
        let decl_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "flag").with_init_val(init)),
        );
        ast.set_parent(init, decl_id);
        ast.set_parent(decl_id, root_id);

        let mut pass = TypeGuesser::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(decl_id).expect("node still exists");
        let AnyNode::VarDecl(decl) = &node.data else { panic!("expected VarDecl") };
        assert_eq!(decl.get_type().map(Type::name), Some("bool".to_string()));
    }

    #[test]
    fn propagates_subject_type_back_to_untyped_literal() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let subject = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(subject) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("f64"));
            }
        }
        let value = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(elle_ast::nodes::NumberLiteral::new(NodeID::placeholder(), loc(), "1")));
        let assignment_id = ast.alloc_node(NodeKind::Assignment, AnyNode::Assignment(Assignment::new(NodeID::placeholder(), loc(), subject, value)));
        ast.set_parent(subject, assignment_id);
        ast.set_parent(value, assignment_id);
        ast.set_parent(assignment_id, root_id);

        let mut pass = TypeGuesser::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(value).expect("node still exists");
        let AnyNode::NumberLiteral(literal) = &node.data else { panic!("expected NumberLiteral") };
        assert_eq!(literal.get_type().map(Type::name), Some("f64".to_string()));
    }
}
