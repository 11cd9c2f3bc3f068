//! Pass 9: flattens nested objects, expanding `is_expanded` composed fields
//! into discrete members on the owning class.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, Typed};

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

/// Copies every `is_expanded` field's own fields onto the owning class as
/// discrete members, so later passes (path expander, field sorter) see a
/// flat field list instead of a nested composition.
#[derive(Debug, Default)]
pub struct StructureLowerer {
    errors: Vec<PassError>,
}

impl StructureLowerer {
    /// Creates a new structure lowerer.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn class_fields(&self, ast: &AST, root: NodeID, type_name: &str) -> Option<Vec<NodeID>> {
        let node = ast.get_node(root)?;
        let AnyNode::RootNode(root_node) = &node.data else { return None };
        let class_id = *root_node.class_index.get(type_name)?;
        let class_node = ast.get_node(class_id)?;
        let AnyNode::ClassDecl(class) = &class_node.data else { return None };
        Some(class.fields.clone())
    }
}

impl Pass for StructureLowerer {
    fn name(&self) -> &'static str { "structure_lowerer" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for class_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(class_id) else { continue };
            let AnyNode::ClassDecl(class) = &node.data else { continue };
            let fields = class.fields.clone();
            let location = class.location().clone();

            let expanded: Vec<(NodeID, String)> = fields
                .iter()
                .filter_map(|field_id| {
                    let node = ast.get_node(*field_id)?;
                    let AnyNode::VarDecl(decl) = &node.data else { return None };
                    if !decl.is_expanded {
                        return None;
                    }
                    let ty = decl.get_type()?;
                    if ty.is_object_type() { Some((*field_id, ty.name())) } else { None }
                })
                .collect();

            if expanded.is_empty() {
                continue;
            }

            let mut new_fields = fields.clone();
            for (field_id, type_name) in expanded {
                let Some(composed_fields) = self.class_fields(ast, root, &type_name) else {
                    self.errors.push(PassError::new(
                        format!("composed type '{type_name}' not found while expanding fields"),
                        &location,
                        FailureCategory::Resolution,
                    ));
                    continue;
                };
                for composed_field in composed_fields {
                    let Some(composed_node) = ast.get_node(composed_field) else { continue };
                    let mut cloned = composed_node.data.clone().with_parent(class_id);
                    if let AnyNode::VarDecl(decl) = &mut cloned {
                        decl.is_expanded = false;
                    }
                    let new_id = ast.alloc_node(NodeKind::Declaration, cloned);
                    new_fields.push(new_id);
                }
                let _ = field_id;
            }

            if let Some(node) = ast.get_node_mut(class_id) {
                if let AnyNode::ClassDecl(class) = &mut node.data {
                    class.fields = new_fields;
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{ClassDecl, RootNode, VarDecl};
    use elle_ast::types::ObjectType;
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn copies_composed_fields_onto_owning_class() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let composed_field = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "width")));
        let composed_type = ObjectType { name: "Size".to_string(), param_types: Vec::new() };
        let composed_class = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), composed_type).with_fields(vec![composed_field])),
        );
        ast.set_parent(composed_field, composed_class);
        if let Some(node) = ast.get_node_mut(root_id) {
            if let AnyNode::RootNode(r) = &mut node.data {
                r.register_class("Size", composed_class);
            }
        }

        let expanded_field = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "size").with_expanded(true)),
        );
        if let Some(node) = ast.get_node_mut(expanded_field) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(elle_ast::types::Type::object("Size"));
            }
        }
        let owner_type = ObjectType { name: "Box".to_string(), param_types: Vec::new() };
        let owner_class = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), owner_type).with_fields(vec![expanded_field])),
        );
        ast.set_parent(expanded_field, owner_class);
        ast.set_parent(owner_class, root_id);

        let mut pass = StructureLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(owner_class).expect("class still exists");
        let AnyNode::ClassDecl(class) = &node.data else { panic!("expected ClassDecl") };
        assert_eq!(class.fields.len(), 2);
        let copied = ast.get_node(class.fields[1]).expect("copied field exists");
        let AnyNode::VarDecl(decl) = &copied.data else { panic!("expected VarDecl") };
        assert_eq!(decl.name, "width");
    }
}
