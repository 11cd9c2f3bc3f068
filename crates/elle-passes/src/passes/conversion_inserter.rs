//! Pass 18: wraps assignment/argument values in a conversion call when the
//! value's type differs from its target's and a conversion is registered.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, FunctionCall, NodeID, NodeKind, Typed};
use elle_ast::types::Type;
use rustc_hash::FxHashMap;

use crate::error::PassError;
use crate::manager::Pass;

/// Reads the resolved type off whichever typed variant `id` happens to be.
fn node_type(ast: &AST, id: NodeID) -> Option<Type> {
    let node = ast.get_node(id)?;
    match &node.data {
        AnyNode::VarDecl(n) => n.get_type().cloned(),
        AnyNode::PropertyName(n) => n.get_type().cloned(),
        AnyNode::VarName(n) => n.get_type().cloned(),
        AnyNode::NumberLiteral(n) => n.get_type().cloned(),
        AnyNode::BoolLiteral(n) => n.get_type().cloned(),
        AnyNode::StringLiteral(n) => n.get_type().cloned(),
        AnyNode::Assignment(n) => n.get_type().cloned(),
        AnyNode::ValuePath(n) => n.get_type().cloned(),
        AnyNode::IndexAccessor(n) => n.get_type().cloned(),
        AnyNode::FunctionCall(n) => n.get_type().cloned(),
        AnyNode::Expression(n) => n.get_type().cloned(),
        AnyNode::UnaryExpression(n) => n.get_type().cloned(),
        AnyNode::Enum(n) => n.get_type().cloned(),
        AnyNode::FlowControl(n) => n.get_type().cloned(),
        AnyNode::Rule(n) => n.get_type().cloned(),
        _ => None,
    }
}

/// Wraps mismatched-type values in a registered conversion function call.
///
/// The registry maps `(from_type_name, to_type_name)` to the conversion
/// function's name, e.g. `("i32", "f64") -> "i32_to_f64"`.
pub struct ConversionInserter {
    conversions: FxHashMap<(String, String), String>,
    errors: Vec<PassError>,
}

impl ConversionInserter {
    /// Creates a new conversion inserter with the given registry.
    #[must_use]
    pub fn new(conversions: FxHashMap<(String, String), String>) -> Self { Self { conversions, errors: Vec::new() } }

    fn wrap(&self, ast: &mut AST, assignment_id: NodeID, value: NodeID, conversion_name: &str) {
        let Some(value_node) = ast.get_node(value) else { return };
        let location = value_node.data.location().clone();
        let call = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::FunctionCall(FunctionCall::new(NodeID::placeholder(), location, conversion_name, vec![value])),
        );
        ast.set_parent(value, call);
        ast.set_parent(call, assignment_id);
        if let Some(node) = ast.get_node_mut(assignment_id) {
            if let AnyNode::Assignment(assignment) = &mut node.data {
                assignment.value = call;
            }
        }
    }
}

impl Pass for ConversionInserter {
    fn name(&self) -> &'static str { "conversion_inserter" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Assignment) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::Assignment(assignment) = &node.data else { continue };
            let subject = assignment.subject;
            let value = assignment.value;

            let subject_type = node_type(ast, subject);
            let value_type = node_type(ast, value);

            let (Some(subject_type), Some(value_type)) = (subject_type, value_type) else { continue };
            if subject_type == value_type {
                continue;
            }
            let Some(conversion_name) = self.conversions.get(&(value_type.name(), subject_type.name())).cloned() else {
                continue;
            };
            self.wrap(ast, id, value, &conversion_name);
        }

        for id in ast.find_nodes_of_kind(root, NodeKind::Expression) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::FunctionCall(call) = &node.data else { continue };
            let Some(target) = self.resolve_target(ast, root, &call.name) else { continue };
            let arguments = call.arguments.clone();
            for (argument, expected) in arguments.iter().zip(target.iter()) {
                let Some(actual) = node_type(ast, *argument) else { continue };
                if &actual == expected {
                    continue;
                }
                let Some(conversion_name) = self.conversions.get(&(actual.name(), expected.name())).cloned() else { continue };
                self.wrap_argument(ast, id, *argument, &conversion_name);
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

impl ConversionInserter {
    fn resolve_target(&self, ast: &AST, root: NodeID, name: &str) -> Option<Vec<Type>> {
        for function_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let node = ast.get_node(function_id)?;
            if let AnyNode::FunctionDecl(decl) = &node.data {
                if decl.name == name {
                    return Some(decl.arguments.iter().filter_map(|id| node_type(ast, *id)).collect());
                }
            }
        }
        None
    }

    fn wrap_argument(&self, ast: &mut AST, call_id: NodeID, argument: NodeID, conversion_name: &str) {
        let Some(argument_node) = ast.get_node(argument) else { return };
        let location = argument_node.data.location().clone();
        let wrapped = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::FunctionCall(FunctionCall::new(NodeID::placeholder(), location, conversion_name, vec![argument])),
        );
        ast.set_parent(argument, wrapped);
        ast.set_parent(wrapped, call_id);
        if let Some(node) = ast.get_node_mut(call_id) {
            if let AnyNode::FunctionCall(call) = &mut node.data {
                for slot in &mut call.arguments {
                    if *slot == argument {
                        *slot = wrapped;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Assignment, NumberLiteral, RootNode, VarDecl};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn wraps_mismatched_assignment_value_in_conversion_call() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let subject = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(subject) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("f64"));
            }
        }

        let value = ast.alloc_node(
            NodeKind::Literal,
            AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1").with_type(Type::basic("i32"))),
        );

        let assignment_id = ast.alloc_node(
            NodeKind::Assignment,
            AnyNode::Assignment(Assignment::new(NodeID::placeholder(), loc(), subject, value)),
        );
        ast.set_parent(subject, assignment_id);
        ast.set_parent(value, assignment_id);
        ast.set_parent(assignment_id, root_id);

        let mut conversions = FxHashMap::default();
        let _ = conversions.insert(("i32".to_string(), "f64".to_string()), "i32_to_f64".to_string());
        let mut pass = ConversionInserter::new(conversions);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(assignment_id).expect("node still exists");
        let AnyNode::Assignment(assignment) = &node.data else { panic!("expected Assignment") };
        let wrapped = ast.get_node(assignment.value).expect("wrapped value exists");
        let AnyNode::FunctionCall(call) = &wrapped.data else { panic!("expected FunctionCall") };
        assert_eq!(call.name, "i32_to_f64");
    }

    #[test]
    fn leaves_matching_types_untouched() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let subject = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(subject) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("i32"));
            }
        }
        let value = ast.alloc_node(
            NodeKind::Literal,
            AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1").with_type(Type::basic("i32"))),
        );
        let assignment_id = ast.alloc_node(
            NodeKind::Assignment,
            AnyNode::Assignment(Assignment::new(NodeID::placeholder(), loc(), subject, value)),
        );
        ast.set_parent(subject, assignment_id);
        ast.set_parent(value, assignment_id);
        ast.set_parent(assignment_id, root_id);

        let mut pass = ConversionInserter::new(FxHashMap::default());
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(assignment_id).expect("node still exists");
        let AnyNode::Assignment(assignment) = &node.data else { panic!("expected Assignment") };
        assert_eq!(assignment.value, value);
    }
}
