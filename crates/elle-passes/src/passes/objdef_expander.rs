//! Pass 21: materializes nested initializers for modifier-only fields and
//! flattens value-path subjects down to a single segment.
//!
//! After this pass, no object definition's field assignment has a
//! multi-segment `ValuePath` subject: a modifier like `foo.bar: 1` (with no
//! flat `foo: ...` initializer alongside it) becomes `foo: Bar { bar: 1 }`,
//! with the head segment stripped from every modifier it absorbs.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, Assignment, AnyNode, NodeID, NodeKind, ObjectDefinition, PropertyName, Typed};
use elle_ast::types::ObjectType;

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

struct FieldGroup {
    field_name: String,
    field_type_name: Option<String>,
    flat: Option<NodeID>,
    modifiers: Vec<(NodeID, NodeID)>,
}

/// Rewrites each object definition's field list into flat assignments only.
#[derive(Debug, Default)]
pub struct ObjDefExpander {
    errors: Vec<PassError>,
}

impl ObjDefExpander {
    /// Creates a new objdef expander.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn class_field_type(&self, ast: &AST, root: NodeID, class_name: &str, field_name: &str) -> Option<String> {
        let node = ast.get_node(root)?;
        let AnyNode::RootNode(root_node) = &node.data else { return None };
        let class_id = *root_node.class_index.get(class_name)?;
        let class_node = ast.get_node(class_id)?;
        let AnyNode::ClassDecl(class) = &class_node.data else { return None };
        class.fields.iter().find_map(|id| {
            let field_node = ast.get_node(*id)?;
            let AnyNode::VarDecl(decl) = &field_node.data else { return None };
            if decl.name == field_name { decl.get_type().map(elle_ast::types::Type::name) } else { None }
        })
    }

    /// Groups `fields` (assignment ids) by the name of the subject's first
    /// segment, splitting each group into its flat initializer (if any) and
    /// its list of `(assignment_id, head_segment_id)` modifiers.
    fn group_fields(&self, ast: &AST, fields: &[NodeID], root: NodeID, class_name: &str) -> Vec<FieldGroup> {
        let mut groups: Vec<FieldGroup> = Vec::new();

        for &assignment_id in fields {
            let Some(node) = ast.get_node(assignment_id) else { continue };
            let AnyNode::Assignment(assignment) = &node.data else { continue };
            let Some(subject_node) = ast.get_node(assignment.subject) else { continue };

            let (field_name, is_flat, head_segment) = match &subject_node.data {
                AnyNode::PropertyName(p) => (p.name.clone(), true, None),
                AnyNode::ValuePath(path) if path.segments.len() >= 2 => {
                    let Some(head_node) = ast.get_node(path.segments[0]) else { continue };
                    let name = match &head_node.data {
                        AnyNode::PropertyName(p) => p.name.clone(),
                        AnyNode::VarName(v) => v.name.trim_start_matches('@').to_string(),
                        _ => continue,
                    };
                    (name, false, Some(path.segments[0]))
                }
                _ => continue,
            };

            let entry = groups.iter_mut().find(|g| g.field_name == field_name);
            let group = if let Some(entry) = entry {
                entry
            } else {
                let field_type_name = self.class_field_type(ast, root, class_name, &field_name);
                groups.push(FieldGroup { field_name: field_name.clone(), field_type_name, flat: None, modifiers: Vec::new() });
                groups.last_mut().expect("just pushed")
            };

            if is_flat {
                group.flat = Some(assignment_id);
            } else if let Some(head) = head_segment {
                group.modifiers.push((assignment_id, head));
            }
        }
        groups
    }

    fn materialize(&mut self, ast: &mut AST, group: &FieldGroup, location: &elle_source::types::SourceLocation) -> Option<NodeID> {
        if group.modifiers.is_empty() {
            return group.flat;
        }
        if group.flat.is_some() {
            // A flat initializer already exists alongside modifiers; the
            // modifiers stay as-is (they refine an explicit value, handled
            // by a later lowering stage) rather than being absorbed here.
            return group.flat;
        }

        let Some(type_name) = &group.field_type_name else {
            self.errors.push(PassError::new(
                format!("field '{}' has modifier assignments but an unknown type", group.field_name),
                location,
                FailureCategory::Semantic,
            ));
            return None;
        };

        let nested_type = ObjectType { name: type_name.clone(), param_types: Vec::new() };
        let mut nested_fields = Vec::new();
        for &(assignment_id, head_segment) in &group.modifiers {
            let Some(node) = ast.get_node(assignment_id) else { continue };
            let AnyNode::Assignment(assignment) = &node.data else { continue };
            let AnyNode::ValuePath(path) = &ast.get_node(assignment.subject)?.data else { continue };
            let tail = path.segments.get(1).copied()?;
            let value = assignment.value;
            let assignment_location = assignment.location().clone();

            let tail_name = ast.get_node(tail).and_then(|n| match &n.data {
                AnyNode::PropertyName(p) => Some(p.name.clone()),
                _ => None,
            })?;
            let stripped_subject = ast.alloc_node(
                NodeKind::Identifier,
                AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), assignment_location.clone(), tail_name)),
            );
            let new_assignment = ast.alloc_node(
                NodeKind::Assignment,
                AnyNode::Assignment(Assignment::new(NodeID::placeholder(), assignment_location, stripped_subject, value)),
            );
            ast.set_parent(stripped_subject, new_assignment);
            ast.set_parent(value, new_assignment);
            nested_fields.push(new_assignment);

            let _ = head_segment;
        }

        let nested_objdef = ast.alloc_node(
            NodeKind::ObjectDefinition,
            AnyNode::ObjectDefinition(ObjectDefinition::new(NodeID::placeholder(), location.clone(), nested_type).with_fields(nested_fields.clone())),
        );
        for field in &nested_fields {
            ast.set_parent(*field, nested_objdef);
        }

        let field_name_id = ast.alloc_node(
            NodeKind::Identifier,
            AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), location.clone(), group.field_name.clone())),
        );
        let wrapper = ast.alloc_node(
            NodeKind::Assignment,
            AnyNode::Assignment(Assignment::new(NodeID::placeholder(), location.clone(), field_name_id, nested_objdef)),
        );
        ast.set_parent(field_name_id, wrapper);
        ast.set_parent(nested_objdef, wrapper);
        Some(wrapper)
    }
}

impl Pass for ObjDefExpander {
    fn name(&self) -> &'static str { "objdef_expander" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for def_id in ast.find_nodes_of_kind(root, NodeKind::ObjectDefinition) {
            let Some(node) = ast.get_node(def_id) else { continue };
            let AnyNode::ObjectDefinition(def) = &node.data else { continue };
            let fields = def.fields.clone();
            let class_name = def.object_type.name.clone();
            let location = def.location().clone();

            let has_multi_segment = fields.iter().any(|id| {
                ast.get_node(*id).is_some_and(|n| match &n.data {
                    AnyNode::Assignment(a) => ast
                        .get_node(a.subject)
                        .is_some_and(|subject| matches!(&subject.data, AnyNode::ValuePath(p) if p.segments.len() >= 2)),
                    _ => false,
                })
            });
            if !has_multi_segment {
                continue;
            }

            let groups = self.group_fields(ast, &fields, root, &class_name);
            let mut new_fields = Vec::new();
            for group in &groups {
                if let Some(materialized) = self.materialize(ast, group, &location) {
                    new_fields.push(materialized);
                    ast.set_parent(materialized, def_id);
                }
            }

            if let Some(node) = ast.get_node_mut(def_id) {
                if let AnyNode::ObjectDefinition(def) = &mut node.data {
                    def.fields = new_fields;
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{ClassDecl, NumberLiteral, RootNode, ValuePath, VarDecl, VarName};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn materializes_modifier_only_field_into_nested_object() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let nested_field = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "border")));
        if let Some(node) = ast.get_node_mut(nested_field) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(elle_ast::types::Type::object("Border"));
            }
        }
        let class_type = ObjectType { name: "Box".to_string(), param_types: Vec::new() };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), class_type).with_fields(vec![nested_field])),
        );
        ast.set_parent(nested_field, class_id);
        if let Some(node) = ast.get_node_mut(root_id) {
            if let AnyNode::RootNode(r) = &mut node.data {
                r.register_class("Box", class_id);
            }
        }

        let self_ref = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "@self")));
        let border_prop = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "border")));
        let width_prop = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "width")));
        let path = ast.alloc_node(
            NodeKind::Path,
            AnyNode::ValuePath(ValuePath::new(NodeID::placeholder(), loc(), vec![border_prop, width_prop])),
        );
        ast.set_parent(border_prop, path);
        ast.set_parent(width_prop, path);
        let _ = self_ref;

        let value = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "2")));
        let modifier = ast.alloc_node(NodeKind::Assignment, AnyNode::Assignment(Assignment::new(NodeID::placeholder(), loc(), path, value)));
        ast.set_parent(path, modifier);
        ast.set_parent(value, modifier);

        let def_type = ObjectType { name: "Box".to_string(), param_types: Vec::new() };
        let def_id = ast.alloc_node(
            NodeKind::ObjectDefinition,
            AnyNode::ObjectDefinition(ObjectDefinition::new(NodeID::placeholder(), loc(), def_type).with_fields(vec![modifier])),
        );
        ast.set_parent(modifier, def_id);
        ast.set_parent(def_id, root_id);

        let mut pass = ObjDefExpander::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(def_id).expect("def still exists");
        let AnyNode::ObjectDefinition(def) = &node.data else { panic!("expected ObjectDefinition") };
        assert_eq!(def.fields.len(), 1);
        let wrapper_node = ast.get_node(def.fields[0]).expect("wrapper exists");
        let AnyNode::Assignment(wrapper) = &wrapper_node.data else { panic!("expected Assignment") };
        let subject_node = ast.get_node(wrapper.subject).expect("subject exists");
        let AnyNode::PropertyName(subject) = &subject_node.data else { panic!("expected PropertyName") };
        assert_eq!(subject.name, "border");
        let value_node = ast.get_node(wrapper.value).expect("value exists");
        assert!(matches!(value_node.data, AnyNode::ObjectDefinition(_)));
    }
}
