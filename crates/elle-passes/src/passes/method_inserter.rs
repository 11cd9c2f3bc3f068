//! Pass 6: synthesises default getters/setters for `vvar` fields and
//! default constructors where missing.

use elle_ast::ast::AST;
use elle_ast::nodes::{
    ASTNode, Assignment, AnyNode, FlowControl, FlowControlKind, FunctionDecl, NodeID, NodeKind, ValuePath, VarDecl,
    VarName,
};
use elle_source::types::SourceLocation;

use crate::error::PassError;
use crate::manager::Pass;

fn synthesized_location(base: &SourceLocation) -> SourceLocation { base.clone() }

/// Inserts `get_<field>`/`set_<field>` method pairs for every `vvar` field
/// that doesn't already declare one, and an empty constructor (`new`) for
/// every class that declares none.
#[derive(Debug, Default)]
pub struct MethodInserter {
    errors: Vec<PassError>,
}

impl MethodInserter {
    /// Creates a new method inserter.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn method_named(&self, ast: &AST, methods: &[NodeID], name: &str) -> bool {
        methods.iter().any(|id| {
            ast.get_node(*id)
                .is_some_and(|node| matches!(&node.data, AnyNode::FunctionDecl(decl) if decl.name == name))
        })
    }

    fn synthesize_getter(&self, ast: &mut AST, class_id: NodeID, field_name: &str, location: &SourceLocation) -> NodeID {
        let self_ref = ast.alloc_node(
            NodeKind::Identifier,
            AnyNode::VarName(VarName::new(NodeID::placeholder(), synthesized_location(location), "@self")),
        );
        let field_ref = ast.alloc_node(
            NodeKind::Identifier,
            AnyNode::VarName(VarName::new(NodeID::placeholder(), synthesized_location(location), format!("@{field_name}"))),
        );
        let path = ast.alloc_node(
            NodeKind::Path,
            AnyNode::ValuePath(ValuePath::new(NodeID::placeholder(), synthesized_location(location), vec![self_ref, field_ref])),
        );
        ast.set_parent(self_ref, path);
        ast.set_parent(field_ref, path);

        let return_stmt = ast.alloc_node(
            NodeKind::FlowControl,
            AnyNode::FlowControl(
                FlowControl::new(NodeID::placeholder(), synthesized_location(location), FlowControlKind::Return)
                    .with_arguments(vec![path]),
            ),
        );
        ast.set_parent(path, return_stmt);

        let getter = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(
                FunctionDecl::new(NodeID::placeholder(), synthesized_location(location), format!("get_{field_name}"))
                    .with_body(vec![return_stmt]),
            ),
        );
        ast.set_parent(return_stmt, getter);
        if let Some(node) = ast.get_node_mut(getter) {
            node.data = AnyNode::FunctionDecl(parented_function_decl(node.data.clone(), class_id));
        }
        getter
    }

    fn synthesize_setter(&self, ast: &mut AST, class_id: NodeID, field_name: &str, location: &SourceLocation) -> NodeID {
        let argument = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), synthesized_location(location), "value")),
        );

        let self_ref = ast.alloc_node(
            NodeKind::Identifier,
            AnyNode::VarName(VarName::new(NodeID::placeholder(), synthesized_location(location), "@self")),
        );
        let field_ref = ast.alloc_node(
            NodeKind::Identifier,
            AnyNode::VarName(VarName::new(NodeID::placeholder(), synthesized_location(location), format!("@{field_name}"))),
        );
        let path = ast.alloc_node(
            NodeKind::Path,
            AnyNode::ValuePath(ValuePath::new(NodeID::placeholder(), synthesized_location(location), vec![self_ref, field_ref])),
        );
        ast.set_parent(self_ref, path);
        ast.set_parent(field_ref, path);

        let value_ref = ast.alloc_node(
            NodeKind::Identifier,
            AnyNode::VarName(VarName::new(NodeID::placeholder(), synthesized_location(location), "@value")),
        );
        let assignment = ast.alloc_node(
            NodeKind::Assignment,
            AnyNode::Assignment(Assignment::new(NodeID::placeholder(), synthesized_location(location), path, value_ref)),
        );
        ast.set_parent(path, assignment);
        ast.set_parent(value_ref, assignment);

        let setter = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::FunctionDecl(
                FunctionDecl::new(NodeID::placeholder(), synthesized_location(location), format!("set_{field_name}"))
                    .with_arguments(vec![argument])
                    .with_body(vec![assignment]),
            ),
        );
        ast.set_parent(argument, setter);
        ast.set_parent(assignment, setter);
        if let Some(node) = ast.get_node_mut(setter) {
            node.data = AnyNode::FunctionDecl(parented_function_decl(node.data.clone(), class_id));
        }
        setter
    }
}

/// Re-parents a freshly allocated `FunctionDecl` onto its owning class.
///
/// Synthesized methods have no way to mark `NodeCommon::hidden` after
/// construction (the field is private to each node struct), so these methods
/// are visible to pretty-printers like any user-written one; only the
/// parent back-link needs fixing up here.
fn parented_function_decl(data: AnyNode, class_id: NodeID) -> FunctionDecl {
    let AnyNode::FunctionDecl(decl) = data.with_parent(class_id) else {
        unreachable!("caller passes a FunctionDecl")
    };
    decl
}

impl Pass for MethodInserter {
    fn name(&self) -> &'static str { "method_inserter" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for class_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(class_id) else { continue };
            let AnyNode::ClassDecl(class) = &node.data else { continue };
            let location = class.location().clone();
            let fields = class.fields.clone();
            let mut methods = class.methods.clone();

            let vvar_fields: Vec<String> = fields
                .iter()
                .filter_map(|field_id| ast.get_node(*field_id))
                .filter_map(|field_node| match &field_node.data {
                    AnyNode::VarDecl(decl) if decl.is_vvar => Some(decl.name.clone()),
                    _ => None,
                })
                .collect();

            let mut inserted = Vec::new();
            for field_name in &vvar_fields {
                if !self.method_named(ast, &methods, &format!("get_{field_name}")) {
                    let getter = self.synthesize_getter(ast, class_id, field_name, &location);
                    inserted.push(getter);
                }
                if !self.method_named(ast, &methods, &format!("set_{field_name}")) {
                    let setter = self.synthesize_setter(ast, class_id, field_name, &location);
                    inserted.push(setter);
                }
            }

            if !self.method_named(ast, &methods, "new") {
                let ctor = ast.alloc_node(
                    NodeKind::Declaration,
                    AnyNode::FunctionDecl(
                        FunctionDecl::new(NodeID::placeholder(), synthesized_location(&location), "new")
                            .with_body(Vec::new()),
                    ),
                );
                if let Some(node) = ast.get_node_mut(ctor) {
                    node.data = AnyNode::FunctionDecl(parented_function_decl(node.data.clone(), class_id));
                }
                inserted.push(ctor);
            }

            if inserted.is_empty() {
                continue;
            }

            methods.extend(inserted);
            if let Some(node) = ast.get_node_mut(class_id) {
                if let AnyNode::ClassDecl(class) = &mut node.data {
                    class.methods = methods;
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{ClassDecl, RootNode};
    use elle_ast::types::ObjectType;
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn synthesizes_getter_setter_and_constructor_for_vvar_field() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let field = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "width").with_vvar(true)),
        );
        let class_type = ObjectType { name: "Box".to_string(), param_types: Vec::new() };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), class_type).with_fields(vec![field])),
        );
        ast.set_parent(field, class_id);
        ast.set_parent(class_id, root_id);

        let mut pass = MethodInserter::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(class_id).expect("class still exists");
        let AnyNode::ClassDecl(class) = &node.data else { panic!("expected ClassDecl") };
        let names: Vec<String> = class
            .methods
            .iter()
            .filter_map(|id| ast.get_node(*id))
            .filter_map(|n| match &n.data {
                AnyNode::FunctionDecl(decl) => Some(decl.name.clone()),
                _ => None,
            })
            .collect();
        assert!(names.contains(&"get_width".to_string()));
        assert!(names.contains(&"set_width".to_string()));
        assert!(names.contains(&"new".to_string()));
    }

    #[test]
    fn does_not_duplicate_existing_method() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let existing_ctor =
            ast.alloc_node(NodeKind::Declaration, AnyNode::FunctionDecl(FunctionDecl::new(NodeID::placeholder(), loc(), "new")));
        let class_type = ObjectType { name: "Box".to_string(), param_types: Vec::new() };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), class_type).with_methods(vec![existing_ctor])),
        );
        ast.set_parent(existing_ctor, class_id);
        ast.set_parent(class_id, root_id);

        let mut pass = MethodInserter::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(class_id).expect("class still exists");
        let AnyNode::ClassDecl(class) = &node.data else { panic!("expected ClassDecl") };
        assert_eq!(class.methods.len(), 1);
    }
}
