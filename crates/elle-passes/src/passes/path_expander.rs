//! Pass 12: walks each `ValuePath` from head to tail, inserting the
//! intermediate `PropertyName`s needed to reach members that live on a
//! composed (`is_expanded`) field rather than directly on the current class.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, PropertyName, Typed};
use elle_ast::types::Type;
use elle_source::types::SourceLocation;

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

/// One step of a search through expanded fields: the field traversed and
/// the member finally found at the end of the chain.
struct ExpansionHit {
    chain: Vec<NodeID>,
    member: NodeID,
    member_type: Option<Type>,
}

/// Expands value paths that reach through composed fields.
#[derive(Debug, Default)]
pub struct PathExpander {
    errors: Vec<PassError>,
}

impl PathExpander {
    /// Creates a new path expander.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn class_by_name(&self, ast: &AST, root: NodeID, name: &str) -> Option<NodeID> {
        let node = ast.get_node(root)?;
        let AnyNode::RootNode(root_node) = &node.data else { return None };
        root_node.class_index.get(name).copied()
    }

    fn direct_member(&self, ast: &AST, class_id: NodeID, name: &str) -> Option<(NodeID, Option<Type>)> {
        let node = ast.get_node(class_id)?;
        let AnyNode::ClassDecl(class) = &node.data else { return None };
        for member_id in class.fields.iter().chain(class.methods.iter()) {
            if let Some(member_node) = ast.get_node(*member_id) {
                if let AnyNode::VarDecl(decl) = &member_node.data {
                    if decl.name == name {
                        return Some((*member_id, decl.get_type().cloned()));
                    }
                }
            }
        }
        None
    }

    fn expanded_fields(&self, ast: &AST, class_id: NodeID) -> Vec<(NodeID, String)> {
        let Some(node) = ast.get_node(class_id) else { return Vec::new() };
        let AnyNode::ClassDecl(class) = &node.data else { return Vec::new() };
        class
            .fields
            .iter()
            .filter_map(|id| {
                let field_node = ast.get_node(*id)?;
                let AnyNode::VarDecl(decl) = &field_node.data else { return None };
                if !decl.is_expanded {
                    return None;
                }
                decl.get_type().filter(|t| t.is_object_type()).map(|t| (*id, t.name()))
            })
            .collect()
    }

    /// Depth-first search through `class_id`'s expanded fields for a member
    /// named `name`. Returns `Ok(None)` if nothing matches, `Ok(Some(hit))`
    /// for exactly one match, and `Err` if two expanded fields at the same
    /// level both resolve the name (fatal ambiguity, per the open question
    /// recorded in `DESIGN.md`).
    fn search_expanded(
        &self,
        ast: &AST,
        root: NodeID,
        class_id: NodeID,
        name: &str,
        location: &SourceLocation,
    ) -> Result<Option<ExpansionHit>, PassError> {
        let mut found: Option<ExpansionHit> = None;
        for (field_id, type_name) in self.expanded_fields(ast, class_id) {
            let Some(composed_class) = self.class_by_name(ast, root, &type_name) else { continue };
            let hit = if let Some((member, member_type)) = self.direct_member(ast, composed_class, name) {
                Some(ExpansionHit { chain: vec![field_id], member, member_type })
            } else {
                match self.search_expanded(ast, root, composed_class, name, location)? {
                    Some(mut nested) => {
                        nested.chain.insert(0, field_id);
                        Some(nested)
                    }
                    None => None,
                }
            };
            if let Some(hit) = hit {
                if found.is_some() {
                    return Err(PassError::new(
                        format!("'{name}' is ambiguous: reachable through more than one expanded field"),
                        location,
                        FailureCategory::Semantic,
                    ));
                }
                found = Some(hit);
            }
        }
        Ok(found)
    }

    fn segment_name(&self, ast: &AST, id: NodeID) -> Option<String> {
        let node = ast.get_node(id)?;
        match &node.data {
            AnyNode::PropertyName(p) => Some(p.name.clone()),
            AnyNode::VarName(v) => Some(v.name.trim_start_matches('@').to_string()),
            AnyNode::FunctionCall(call) => Some(call.name.clone()),
            _ => None,
        }
    }

    fn expand_path(&mut self, ast: &mut AST, root: NodeID, path_id: NodeID) {
        let Some(node) = ast.get_node(path_id) else { return };
        let AnyNode::ValuePath(path) = &node.data else { return };
        let segments = path.segments.clone();
        let location = path.location().clone();
        if segments.is_empty() {
            return;
        }

        let head = segments[0];
        let mut current_view = ast.get_node(head).and_then(|n| match &n.data {
            AnyNode::VarName(v) => v.get_type().cloned(),
            AnyNode::PropertyName(p) => p.get_type().cloned(),
            _ => None,
        });

        let mut new_segments = vec![head];
        for &segment in &segments[1..] {
            let Some(name) = self.segment_name(ast, segment) else {
                new_segments.push(segment);
                current_view = None;
                continue;
            };

            if name == "if_cast" {
                // Inhibits further member search: a cast resets the view
                // rather than resolving through it.
                new_segments.push(segment);
                current_view = None;
                continue;
            }

            if let Some(AnyNode::IndexAccessor(_)) = ast.get_node(segment).map(|n| &n.data) {
                current_view = self.resolve_index(ast, root, segment, current_view.as_ref(), &location);
                new_segments.push(segment);
                continue;
            }

            let Some(view_type) = current_view.clone() else {
                new_segments.push(segment);
                continue;
            };
            let Some(class_id) = self.class_by_name(ast, root, &view_type.name()) else {
                new_segments.push(segment);
                current_view = None;
                continue;
            };

            if let Some((_, member_type)) = self.direct_member(ast, class_id, &name) {
                new_segments.push(segment);
                current_view = member_type;
                continue;
            }

            match self.search_expanded(ast, root, class_id, &name, &location) {
                Ok(Some(hit)) => {
                    for field_id in &hit.chain {
                        let Some(field_node) = ast.get_node(*field_id) else { continue };
                        let field_name = match &field_node.data {
                            AnyNode::VarDecl(decl) => decl.name.clone(),
                            _ => continue,
                        };
                        let inserted = ast.alloc_node(
                            NodeKind::Identifier,
                            AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), location.clone(), field_name)),
                        );
                        ast.set_parent(inserted, path_id);
                        new_segments.push(inserted);
                    }
                    new_segments.push(segment);
                    current_view = hit.member_type;
                }
                Ok(None) => {
                    new_segments.push(segment);
                    current_view = None;
                }
                Err(error) => {
                    self.errors.push(error);
                    new_segments.push(segment);
                    current_view = None;
                }
            }
        }

        if new_segments.len() != segments.len() {
            if let Some(node) = ast.get_node_mut(path_id) {
                if let AnyNode::ValuePath(path) = &mut node.data {
                    path.segments = new_segments;
                }
            }
        }
    }

    fn resolve_index(
        &self,
        ast: &AST,
        root: NodeID,
        _segment: NodeID,
        current_view: Option<&Type>,
        _location: &SourceLocation,
    ) -> Option<Type> {
        let view = current_view?;
        if let Type::StaticArray(array) = view {
            return Some(array.element.clone());
        }
        let class_id = self.class_by_name(ast, root, &view.name())?;
        self.direct_member(ast, class_id, "at").and_then(|(_, ty)| ty)
    }
}

impl Pass for PathExpander {
    fn name(&self) -> &'static str { "path_expander" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for path_id in ast.find_nodes_of_kind(root, NodeKind::Path) {
            if ast.get_node(path_id).is_some_and(|n| matches!(n.data, AnyNode::ValuePath(_))) {
                self.expand_path(ast, root, path_id);
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{ClassDecl, RootNode, ValuePath, VarDecl, VarName};
    use elle_ast::types::{ObjectType, Type};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn inserts_intermediate_segment_for_member_reached_through_expanded_field() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let composed_field = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "width")));
        if let Some(node) = ast.get_node_mut(composed_field) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::basic("i32"));
            }
        }
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
                decl.set_type(Type::object("Size"));
            }
        }
        let owner_type = ObjectType { name: "Box".to_string(), param_types: Vec::new() };
        let owner_class = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), owner_type).with_fields(vec![expanded_field])),
        );
        ast.set_parent(expanded_field, owner_class);
        if let Some(node) = ast.get_node_mut(root_id) {
            if let AnyNode::RootNode(r) = &mut node.data {
                r.register_class("Box", owner_class);
            }
        }
        ast.set_parent(owner_class, root_id);

        let self_ref = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "@self")));
        if let Some(node) = ast.get_node_mut(self_ref) {
            if let AnyNode::VarName(name) = &mut node.data {
                name.set_type(Type::object("Box"));
            }
        }
        let width_ref = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "@width")));
        let path_id = ast.alloc_node(NodeKind::Path, AnyNode::ValuePath(ValuePath::new(NodeID::placeholder(), loc(), vec![self_ref, width_ref])));
        ast.set_parent(self_ref, path_id);
        ast.set_parent(width_ref, path_id);
        ast.set_parent(path_id, root_id);

        let mut pass = PathExpander::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(path_id).expect("path still exists");
        let AnyNode::ValuePath(path) = &node.data else { panic!("expected ValuePath") };
        assert_eq!(path.segments.len(), 3);
        let inserted = ast.get_node(path.segments[1]).expect("inserted segment exists");
        let AnyNode::PropertyName(inserted) = &inserted.data else { panic!("expected PropertyName") };
        assert_eq!(inserted.name, "size");
    }

    /// Builds an owner class with `sibling_count` expanded fields, each
    /// composing its own distinct class that defines a member named `x`,
    /// then resolves a path to `x` through the owner.
    fn run_with_sibling_expansions(sibling_count: usize) -> Vec<PassError> {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let mut expanded_fields = Vec::new();
        for i in 0..sibling_count {
            let member = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
            if let Some(node) = ast.get_node_mut(member) {
                if let AnyNode::VarDecl(decl) = &mut node.data {
                    decl.set_type(Type::basic("i32"));
                }
            }
            let composed_type = ObjectType { name: format!("Part{i}"), param_types: Vec::new() };
            let composed_class = ast.alloc_node(NodeKind::Declaration, AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), composed_type).with_fields(vec![member])));
            ast.set_parent(member, composed_class);
            if let Some(node) = ast.get_node_mut(root_id) {
                if let AnyNode::RootNode(r) = &mut node.data {
                    r.register_class(format!("Part{i}"), composed_class);
                }
            }

            let field = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), format!("part{i}")).with_expanded(true)));
            if let Some(node) = ast.get_node_mut(field) {
                if let AnyNode::VarDecl(decl) = &mut node.data {
                    decl.set_type(Type::object(format!("Part{i}")));
                }
            }
            expanded_fields.push(field);
        }

        let owner_type = ObjectType { name: "Owner".to_string(), param_types: Vec::new() };
        let owner_class = ast.alloc_node(NodeKind::Declaration, AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc(), owner_type).with_fields(expanded_fields.clone())));
        for field in &expanded_fields {
            ast.set_parent(*field, owner_class);
        }
        if let Some(node) = ast.get_node_mut(root_id) {
            if let AnyNode::RootNode(r) = &mut node.data {
                r.register_class("Owner", owner_class);
            }
        }
        ast.set_parent(owner_class, root_id);

        let self_ref = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "@self")));
        if let Some(node) = ast.get_node_mut(self_ref) {
            if let AnyNode::VarName(name) = &mut node.data {
                name.set_type(Type::object("Owner"));
            }
        }
        let x_ref = ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(VarName::new(NodeID::placeholder(), loc(), "@x")));
        let path_id = ast.alloc_node(NodeKind::Path, AnyNode::ValuePath(ValuePath::new(NodeID::placeholder(), loc(), vec![self_ref, x_ref])));
        ast.set_parent(self_ref, path_id);
        ast.set_parent(x_ref, path_id);
        ast.set_parent(path_id, root_id);

        let mut pass = PathExpander::new();
        pass.perform_visit(&mut ast, root_id);
        pass.errors().to_vec()
    }

    proptest::proptest! {
        /// Reaching a member name through exactly one expanded field always
        /// succeeds; reaching it through two or more sibling expanded
        /// fields at the same level is always a fatal ambiguity, regardless
        /// of how many siblings there are.
        #[test]
        fn sibling_expansion_count_determines_ambiguity(sibling_count in 1usize..5) {
            let errors = run_with_sibling_expansions(sibling_count);
            if sibling_count == 1 {
                proptest::prop_assert!(errors.is_empty());
            } else {
                proptest::prop_assert_eq!(errors.len(), 1);
                proptest::prop_assert_eq!(errors[0].category, FailureCategory::Semantic);
            }
        }
    }
}
