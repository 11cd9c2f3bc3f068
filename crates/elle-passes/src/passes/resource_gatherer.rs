//! Pass 23: walks the rule/element tree collecting string literals assigned
//! to fields marked `is_resource`, following composed objects recursively.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind};
use rustc_hash::FxHashSet;

use crate::error::PassError;

/// A resource path discovered by walking the tree, paired with the location
/// of the string literal that names it.
#[derive(Debug, Clone)]
pub struct Resource {
    /// The literal string value (a file path, typically).
    pub path: String,
    /// Where the literal appears.
    pub location: elle_source::types::SourceLocation,
}

/// Collects every string literal assigned to an `is_resource` field,
/// recursing into composed objects reached through assignment values.
#[derive(Debug, Default)]
pub struct ResourceGatherer {
    resources: Vec<Resource>,
    errors: Vec<PassError>,
}

impl ResourceGatherer {
    /// Creates a new resource gatherer.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The resources collected by the last `perform_visit` call.
    #[must_use]
    pub fn resources(&self) -> &[Resource] { &self.resources }

    fn class_field_is_resource(&self, ast: &AST, root: NodeID, class_name: &str, field_name: &str) -> bool {
        let Some(node) = ast.get_node(root) else { return false };
        let AnyNode::RootNode(root_node) = &node.data else { return false };
        let Some(class_id) = root_node.class_index.get(class_name).copied() else { return false };
        let Some(class_node) = ast.get_node(class_id) else { return false };
        let AnyNode::ClassDecl(class) = &class_node.data else { return false };
        class.fields.iter().any(|id| {
            ast.get_node(*id)
                .is_some_and(|n| matches!(&n.data, AnyNode::VarDecl(decl) if decl.name == field_name && decl.is_resource))
        })
    }

    fn gather_object_definition(&mut self, ast: &AST, root: NodeID, def_id: NodeID, seen: &mut FxHashSet<NodeID>) {
        if !seen.insert(def_id) {
            return;
        }
        let Some(node) = ast.get_node(def_id) else { return };
        let AnyNode::ObjectDefinition(def) = &node.data else { return };
        let class_name = def.object_type.name.clone();
        let fields = def.fields.clone();

        for assignment_id in fields {
            let Some(assignment_node) = ast.get_node(assignment_id) else { continue };
            let AnyNode::Assignment(assignment) = &assignment_node.data else { continue };
            let Some(subject_node) = ast.get_node(assignment.subject) else { continue };
            let AnyNode::PropertyName(subject) = &subject_node.data else { continue };
            let field_name = subject.name.clone();
            let value = assignment.value;

            if let Some(value_node) = ast.get_node(value) {
                match &value_node.data {
                    AnyNode::StringLiteral(lit) if self.class_field_is_resource(ast, root, &class_name, &field_name) => {
                        self.resources.push(Resource { path: lit.value.clone(), location: lit.location().clone() });
                    }
                    AnyNode::ObjectDefinition(_) => {
                        self.gather_object_definition(ast, root, value, seen);
                    }
                    _ => {}
                }
            }
        }
    }

    fn gather_rule(&mut self, ast: &AST, root: NodeID, rule_id: NodeID, seen: &mut FxHashSet<NodeID>) {
        let Some(node) = ast.get_node(rule_id) else { return };
        let AnyNode::Rule(rule) = &node.data else { return };
        let values = rule.values.clone();
        let child_rules = rule.child_rules.clone();

        for assignment_id in values {
            let Some(assignment_node) = ast.get_node(assignment_id) else { continue };
            let AnyNode::Assignment(assignment) = &assignment_node.data else { continue };
            if let Some(value_node) = ast.get_node(assignment.value) {
                if matches!(&value_node.data, AnyNode::ObjectDefinition(_)) {
                    self.gather_object_definition(ast, root, assignment.value, seen);
                }
            }
        }

        for child in child_rules {
            self.gather_rule(ast, root, child, seen);
        }
    }
}

impl crate::manager::Pass for ResourceGatherer {
    fn name(&self) -> &'static str { "resource_gatherer" }

    fn initialize(&mut self, _ast: &mut AST) {
        self.errors.clear();
        self.resources.clear();
    }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        let Some(node) = ast.get_node(root) else { return };
        let AnyNode::RootNode(root_node) = &node.data else { return };
        let rules = root_node.rules.clone();

        let mut seen = FxHashSet::default();
        for rule_id in rules {
            self.gather_rule(ast, root, rule_id, &mut seen);
        }

        for def_id in ast.find_nodes_of_kind(root, NodeKind::ObjectDefinition) {
            self.gather_object_definition(ast, root, def_id, &mut seen);
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Assignment, ClassDecl, ObjectDefinition, PropertyName, RootNode, StringLiteral, VarDecl};
    use elle_ast::types::ObjectType;
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn collects_string_literal_assigned_to_resource_field() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let field = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "src").with_resource(true)),
        );
        let class_type = ObjectType { name: "Image".to_string(), param_types: Vec::new() };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), class_type).with_fields(vec![field])),
        );
        ast.set_parent(field, class_id);
        if let Some(node) = ast.get_node_mut(root_id) {
            if let AnyNode::RootNode(r) = &mut node.data {
                r.register_class("Image", class_id);
            }
        }

        let subject = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "src")));
        let value = ast.alloc_node(NodeKind::Literal, AnyNode::StringLiteral(StringLiteral::new(NodeID::placeholder(), loc(), "logo.png")));
        let assignment_id = ast.alloc_node(NodeKind::Assignment, AnyNode::Assignment(Assignment::new(NodeID::placeholder(), loc(), subject, value)));
        ast.set_parent(subject, assignment_id);
        ast.set_parent(value, assignment_id);

        let def_type = ObjectType { name: "Image".to_string(), param_types: Vec::new() };
        let def_id = ast.alloc_node(
            NodeKind::ObjectDefinition,
            AnyNode::ObjectDefinition(ObjectDefinition::new(NodeID::placeholder(), loc(), def_type).with_fields(vec![assignment_id])),
        );
        ast.set_parent(assignment_id, def_id);
        ast.set_parent(def_id, root_id);

        let mut pass = ResourceGatherer::new();
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        assert_eq!(pass.resources().len(), 1);
        assert_eq!(pass.resources()[0].path, "logo.png");
    }
}
