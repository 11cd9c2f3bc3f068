//! Pass 15: turns `for (subject)` into the three-argument `(init,
//! condition, step)` form the backend expects.

use elle_ast::ast::AST;
use elle_ast::nodes::{
    ASTNode, Assignment, AnyNode, Expression, FlowControlKind, NodeID, NodeKind, NumberLiteral, PropertyName,
    Typed, ValuePath, VarDecl, VarName,
};
use elle_ast::types::Type;

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

/// Lowers `for (subject) { body }` to numeric- or object-iteration form,
/// depending on `subject`'s resolved type.
#[derive(Debug, Default)]
pub struct ForLowerer {
    errors: Vec<PassError>,
}

impl ForLowerer {
    /// Creates a new for-lowerer.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn subject_type(&self, ast: &AST, subject: NodeID) -> Option<Type> {
        ast.get_node(subject).and_then(|n| match &n.data {
            AnyNode::VarName(v) => v.get_type().cloned(),
            AnyNode::ValuePath(p) => p.get_type().cloned(),
            AnyNode::FunctionCall(c) => c.get_type().cloned(),
            AnyNode::NumberLiteral(n) => Some(n.get_type().cloned().unwrap_or_else(|| Type::basic("i64"))),
            _ => None,
        })
    }
}

impl Pass for ForLowerer {
    fn name(&self) -> &'static str { "for_lowerer" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::FlowControl) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::FlowControl(flow) = &node.data else { continue };
            if flow.flow_kind != FlowControlKind::For || flow.arguments.len() != 1 {
                continue;
            }
            let subject = flow.arguments[0];
            let location = flow.location().clone();
            let subject_type = self.subject_type(ast, subject);

            let (counter_name, arguments) = match subject_type {
                Some(ty) if ty.is_number_type() => {
                    let zero = alloc_zero(ast, &location);
                    let value_var = ast.alloc_node(
                        NodeKind::Declaration,
                        AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), location.clone(), "@value").with_init_val(zero)),
                    );
                    ast.set_parent(zero, value_var);
                    let var_ref = alloc_var_ref(ast, &location, "@value");
                    let condition = ast.alloc_node(
                        NodeKind::Expression,
                        AnyNode::Expression(Expression::new(NodeID::placeholder(), location.clone(), "<", var_ref, subject)),
                    );
                    ast.set_parent(var_ref, condition);
                    ast.set_parent(subject, condition);
                    let step_target = alloc_var_ref(ast, &location, "@value");
                    let one = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), location.clone(), "1")));
                    let step_value = ast.alloc_node(
                        NodeKind::Expression,
                        AnyNode::Expression(Expression::new(NodeID::placeholder(), location.clone(), "+:", step_target, one)),
                    );
                    ast.set_parent(step_target, step_value);
                    ast.set_parent(one, step_value);
                    let step_subject = alloc_var_ref(ast, &location, "@value");
                    let step = ast.alloc_node(
                        NodeKind::Assignment,
                        AnyNode::Assignment(Assignment::new(NodeID::placeholder(), location.clone(), step_subject, step_value)),
                    );
                    ast.set_parent(step_subject, step);
                    ast.set_parent(step_value, step);
                    ("@value", vec![value_var, condition, step])
                }
                Some(ty) if ty.is_object_type() => {
                    let zero = alloc_zero(ast, &location);
                    let key_var = ast.alloc_node(
                        NodeKind::Declaration,
                        AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), location.clone(), "@key").with_init_val(zero)),
                    );
                    ast.set_parent(zero, key_var);
                    let key_ref = alloc_var_ref(ast, &location, "@key");
                    let size_prop = ast.alloc_node(
                        NodeKind::Identifier,
                        AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), location.clone(), "size")),
                    );
                    let size_path = ast.alloc_node(
                        NodeKind::Path,
                        AnyNode::ValuePath(ValuePath::new(NodeID::placeholder(), location.clone(), vec![subject, size_prop])),
                    );
                    ast.set_parent(size_prop, size_path);
                    let condition = ast.alloc_node(
                        NodeKind::Expression,
                        AnyNode::Expression(Expression::new(NodeID::placeholder(), location.clone(), "<", key_ref, size_path)),
                    );
                    ast.set_parent(key_ref, condition);
                    ast.set_parent(size_path, condition);
                    let step_target = alloc_var_ref(ast, &location, "@key");
                    let one = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), location.clone(), "1")));
                    let step_value = ast.alloc_node(
                        NodeKind::Expression,
                        AnyNode::Expression(Expression::new(NodeID::placeholder(), location.clone(), "+:", step_target, one)),
                    );
                    ast.set_parent(step_target, step_value);
                    ast.set_parent(one, step_value);
                    let step_subject = alloc_var_ref(ast, &location, "@key");
                    let step = ast.alloc_node(
                        NodeKind::Assignment,
                        AnyNode::Assignment(Assignment::new(NodeID::placeholder(), location.clone(), step_subject, step_value)),
                    );
                    ast.set_parent(step_subject, step);
                    ast.set_parent(step_value, step);
                    ("@key", vec![key_var, condition, step])
                }
                _ => {
                    self.errors.push(PassError::new("unexpected type", &location, FailureCategory::Typing));
                    continue;
                }
            };

            for &argument in &arguments {
                ast.set_parent(argument, id);
            }
            let _ = counter_name;
            if let Some(node) = ast.get_node_mut(id) {
                if let AnyNode::FlowControl(flow) = &mut node.data {
                    flow.arguments = arguments;
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{FlowControl, RootNode};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn lowers_numeric_for_to_three_argument_form() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let subject = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "limit")));
        if let Some(node) = ast.get_node_mut(subject) {
            if let AnyNode::VarName(name) = &mut node.data {
                name.set_type(Type::basic("i32"));
            }
        }
        let for_id = ast.alloc_node(
            NodeKind::FlowControl,
            AnyNode::FlowControl(
                FlowControl::new(NodeID::placeholder(), loc(), FlowControlKind::For).with_arguments(vec![subject]),
            ),
        );
        ast.set_parent(subject, for_id);
        ast.set_parent(for_id, root_id);

        let mut pass = ForLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(for_id).expect("node still exists");
        let AnyNode::FlowControl(flow) = &node.data else { panic!("expected FlowControl") };
        assert_eq!(flow.arguments.len(), 3);
    }

    #[test]
    fn lowers_numeric_for_with_bare_literal_subject() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let subject = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "10")));
        let for_id = ast.alloc_node(
            NodeKind::FlowControl,
            AnyNode::FlowControl(
                FlowControl::new(NodeID::placeholder(), loc(), FlowControlKind::For).with_arguments(vec![subject]),
            ),
        );
        ast.set_parent(subject, for_id);
        ast.set_parent(for_id, root_id);

        let mut pass = ForLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(for_id).expect("node still exists");
        let AnyNode::FlowControl(flow) = &node.data else { panic!("expected FlowControl") };
        assert_eq!(flow.arguments.len(), 3);
    }

    #[test]
    fn reports_unexpected_subject_type() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let subject = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "flag")));
        if let Some(node) = ast.get_node_mut(subject) {
            if let AnyNode::VarName(name) = &mut node.data {
                name.set_type(Type::basic("bool"));
            }
        }
        let for_id = ast.alloc_node(
            NodeKind::FlowControl,
            AnyNode::FlowControl(
                FlowControl::new(NodeID::placeholder(), loc(), FlowControlKind::For).with_arguments(vec![subject]),
            ),
        );
        ast.set_parent(subject, for_id);
        ast.set_parent(for_id, root_id);

        let mut pass = ForLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        assert_eq!(pass.errors().len(), 1);
        assert_eq!(pass.errors()[0].category, FailureCategory::Typing);
    }
}

fn alloc_zero(ast: &mut AST, location: &elle_source::types::SourceLocation) -> NodeID {
    ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), location.clone(), "0")))
}

fn alloc_var_ref(ast: &mut AST, location: &elle_source::types::SourceLocation, name: &str) -> NodeID {
    ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), location.clone(), name)))
}
