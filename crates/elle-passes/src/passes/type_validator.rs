//! Pass 22: resolves every function call's target declaration and checks
//! argument count and argument types against it.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, Typed};
use elle_ast::types::Type;

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

fn argument_type(ast: &AST, id: NodeID) -> Option<Type> {
    let node = ast.get_node(id)?;
    match &node.data {
        AnyNode::VarDecl(n) => n.get_type().cloned(),
        _ => None,
    }
}

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
        _ => None,
    }
}

struct Target {
    arguments: Vec<NodeID>,
    is_variadic: bool,
}

/// Resolves each call's target declaration and checks arity and argument
/// types, reporting any mismatch with the call's source location.
#[derive(Debug, Default)]
pub struct TypeValidator {
    errors: Vec<PassError>,
}

impl TypeValidator {
    /// Creates a new type validator.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn resolve(&self, ast: &AST, root: NodeID, name: &str) -> Option<Target> {
        for function_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let node = ast.get_node(function_id)?;
            if let AnyNode::FunctionDecl(decl) = &node.data {
                if decl.name == name {
                    let is_variadic = decl.arguments.last().is_some_and(|last| {
                        ast.get_node(*last)
                            .is_some_and(|n| matches!(&n.data, AnyNode::VarDecl(d) if d.name == "..."))
                    });
                    return Some(Target { arguments: decl.arguments.clone(), is_variadic });
                }
            }
        }
        None
    }
}

impl Pass for TypeValidator {
    fn name(&self) -> &'static str { "type_validator" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Expression) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::FunctionCall(call) = &node.data else { continue };
            let location = call.location().clone();
            let name = call.name.clone();
            let call_arguments = call.arguments.clone();

            let Some(target) = self.resolve(ast, root, &name) else { continue };

            let required = target.arguments.len();
            let min_required = target
                .arguments
                .iter()
                .filter(|id| {
                    ast.get_node(**id)
                        .is_some_and(|n| matches!(&n.data, AnyNode::VarDecl(d) if d.init_val.is_none() && d.name != "..."))
                })
                .count();

            if target.is_variadic {
                if call_arguments.len() < min_required {
                    self.errors.push(PassError::new(
                        format!("call to '{name}' passes {} arguments, expected at least {min_required}", call_arguments.len()),
                        &location,
                        FailureCategory::Typing,
                    ));
                    continue;
                }
            } else if call_arguments.len() < min_required || call_arguments.len() > required {
                self.errors.push(PassError::new(
                    format!("call to '{name}' passes {} arguments, expected {required}", call_arguments.len()),
                    &location,
                    FailureCategory::Typing,
                ));
                continue;
            }

            for (argument, expected_id) in call_arguments.iter().zip(target.arguments.iter()) {
                let Some(expected) = argument_type(ast, *expected_id) else { continue };
                let Some(actual) = node_type(ast, *argument) else { continue };
                if actual != expected {
                    self.errors.push(PassError::new(
                        format!("call to '{name}' passes '{}' where '{}' was expected", actual.name(), expected.name()),
                        &location,
                        FailureCategory::Typing,
                    ));
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{FunctionCall, FunctionDecl, NumberLiteral, RootNode, VarDecl};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn reports_argument_count_mismatch() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let param = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(param) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("i32"));
            }
        }
        let function_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(FunctionDecl::new(NodeID::placeholder(), loc(), "f").with_arguments(vec![param])),
        );
        ast.set_parent(param, function_id);
        ast.set_parent(function_id, root_id);

        let call_id = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::FunctionCall(FunctionCall::new(NodeID::placeholder(), loc(), "f", Vec::new())),
        );
        ast.set_parent(call_id, root_id);

        let mut pass = TypeValidator::new();
        pass.perform_visit(&mut ast, root_id);

        assert_eq!(pass.errors().len(), 1);
        assert_eq!(pass.errors()[0].category, FailureCategory::Typing);
    }

    #[test]
    fn reports_argument_type_mismatch() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let param = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(param) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("i32"));
            }
        }
        let function_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(FunctionDecl::new(NodeID::placeholder(), loc(), "f").with_arguments(vec![param])),
        );
        ast.set_parent(param, function_id);
        ast.set_parent(function_id, root_id);

        let argument = ast.alloc_node(
            NodeKind::Literal,
            AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1").with_type(Type::basic("f64"))),
        );
        let call_id = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::FunctionCall(FunctionCall::new(NodeID::placeholder(), loc(), "f", vec![argument])),
        );
        ast.set_parent(argument, call_id);
        ast.set_parent(call_id, root_id);

        let mut pass = TypeValidator::new();
        pass.perform_visit(&mut ast, root_id);

        assert_eq!(pass.errors().len(), 1);
        assert!(pass.errors()[0].message.contains("where"));
    }

    #[test]
    fn accepts_matching_call() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let param = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(param) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("i32"));
            }
        }
        let function_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(FunctionDecl::new(NodeID::placeholder(), loc(), "f").with_arguments(vec![param])),
        );
        ast.set_parent(param, function_id);
        ast.set_parent(function_id, root_id);

        let argument = ast.alloc_node(
            NodeKind::Literal,
            AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1").with_type(Type::basic("i32"))),
        );
        let call_id = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::FunctionCall(FunctionCall::new(NodeID::placeholder(), loc(), "f", vec![argument])),
        );
        ast.set_parent(argument, call_id);
        ast.set_parent(call_id, root_id);

        let mut pass = TypeValidator::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
    }
}
