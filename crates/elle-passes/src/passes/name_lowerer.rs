//! Pass 20: decorates identifiers with namespace and type-signature
//! information to produce linker-stable names.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, Typed};

use crate::error::PassError;
use crate::manager::Pass;

fn mangled_method_name(class_name: &str, method_name: &str, arguments: &[NodeID], ast: &AST) -> String {
    let arg_sig: String = arguments
        .iter()
        .filter_map(|id| ast.get_node(*id))
        .filter_map(|node| match &node.data {
            AnyNode::VarDecl(decl) => decl.get_type().map(elle_ast::types::Type::name),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_");
    if arg_sig.is_empty() {
        format!("{class_name}__{method_name}")
    } else {
        format!("{class_name}__{method_name}__{arg_sig}")
    }
}

/// Qualifies every method's name with its owning class and argument-type
/// signature, and every free function's name with its argument-type
/// signature, so the backend can emit linker-stable symbols.
#[derive(Debug, Default)]
pub struct NameLowerer {
    errors: Vec<PassError>,
}

impl NameLowerer {
    /// Creates a new name lowerer.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Pass for NameLowerer {
    fn name(&self) -> &'static str { "name_lowerer" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for class_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(class_id) else { continue };
            let AnyNode::ClassDecl(class) = &node.data else { continue };
            let class_name = class.object_type.name.clone();
            let methods = class.methods.clone();

            for method_id in methods {
                let Some(method_node) = ast.get_node(method_id) else { continue };
                let AnyNode::FunctionDecl(decl) = &method_node.data else { continue };
                let mangled = mangled_method_name(&class_name, &decl.name, &decl.arguments, ast);
                if let Some(method_node) = ast.get_node_mut(method_id) {
                    if let AnyNode::FunctionDecl(decl) = &mut method_node.data {
                        decl.name = mangled;
                    }
                }
            }
        }

        for function_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(function_id) else { continue };
            let AnyNode::FunctionDecl(decl) = &node.data else { continue };
            // Methods are handled above (and already carry the owning
            // class's name); a free function has no parent `ClassDecl`.
            let is_method = ast
                .get_node(function_id)
                .and_then(|n| n.data.parent())
                .and_then(|parent_id| ast.get_node(parent_id))
                .is_some_and(|parent_node| matches!(parent_node.data, AnyNode::ClassDecl(_)));
            if is_method {
                continue;
            }
            let mangled = mangled_method_name("global", &decl.name, &decl.arguments, ast);
            if let Some(node) = ast.get_node_mut(function_id) {
                if let AnyNode::FunctionDecl(decl) = &mut node.data {
                    decl.name = mangled;
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{ClassDecl, FunctionDecl, RootNode, VarDecl};
    use elle_ast::types::{ObjectType, Type};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn mangles_method_name_with_class_and_argument_types() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let argument = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "amount")));
        if let Some(node) = ast.get_node_mut(argument) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("i32"));
            }
        }
        let method = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(FunctionDecl::new(NodeID::placeholder(), loc(), "deposit").with_arguments(vec![argument])),
        );
        ast.set_parent(argument, method);

        let class_type = ObjectType { name: "Account".to_string(), param_types: Vec::new() };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), class_type).with_methods(vec![method])),
        );
        ast.set_parent(method, class_id);
        ast.set_parent(class_id, root_id);

        let mut pass = NameLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(method).expect("node still exists");
        let AnyNode::FunctionDecl(decl) = &node.data else { panic!("expected FunctionDecl") };
        assert_eq!(decl.name, "Account__deposit__i32");
    }

    #[test]
    fn mangles_free_function_under_global_namespace() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let function = ast.alloc_node(NodeKind::Declaration, AnyNode::FunctionDecl(FunctionDecl::new(NodeID::placeholder(), loc(), "helper")));
        ast.set_parent(function, root_id);

        let mut pass = NameLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(function).expect("node still exists");
        let AnyNode::FunctionDecl(decl) = &node.data else { panic!("expected FunctionDecl") };
        assert_eq!(decl.name, "global__helper");
    }
}
