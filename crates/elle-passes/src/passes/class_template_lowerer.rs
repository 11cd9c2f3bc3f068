//! Pass 8: clones generic classes per specialization site, substituting
//! parameter types and renaming to `lil_<base>_<param1>_<param2>…`.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, ClassDecl, NodeID, NodeKind};
use elle_ast::types::{ObjectType, Type};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

fn specialized_name(base: &str, param_types: &[Type]) -> String {
    let mut name = format!("lil_{base}");
    for param in param_types {
        name.push('_');
        name.push_str(&param.name());
    }
    name
}

/// Finds every `ObjectDefinition`/`VarDecl` type naming a generic class with
/// concrete parameters and emits a specialization, retagging the site to
/// point at it.
#[derive(Debug, Default)]
pub struct ClassTemplateLowerer {
    errors: Vec<PassError>,
}

impl ClassTemplateLowerer {
    /// Creates a new class template lowerer.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn generic_classes(&self, ast: &AST, root: NodeID) -> FxHashMap<String, NodeID> {
        let Some(node) = ast.get_node(root) else { return FxHashMap::default() };
        let AnyNode::RootNode(root_node) = &node.data else { return FxHashMap::default() };
        root_node
            .class_index
            .iter()
            .filter(|(_, id)| {
                ast.get_node(**id)
                    .is_some_and(|n| matches!(&n.data, AnyNode::ClassDecl(c) if !c.object_type.param_types.is_empty()))
            })
            .map(|(name, id)| (name.clone(), *id))
            .collect()
    }

    fn specialization_sites(&self, ast: &AST, root: NodeID, generics: &FxHashMap<String, NodeID>) -> Vec<(NodeID, ObjectType)> {
        let mut sites = Vec::new();
        for id in ast.collect_nodes_pre_order(root) {
            let Some(node) = ast.get_node(id) else { continue };
            let object_type = match &node.data {
                AnyNode::ObjectDefinition(def) => Some(&def.object_type),
                _ => None,
            };
            if let Some(object_type) = object_type {
                if generics.contains_key(&object_type.name) && !object_type.param_types.is_empty() {
                    sites.push((id, object_type.clone()));
                }
            }
        }
        sites
    }

    fn substitute_type(&self, ty: &Type, params: &FxHashMap<String, Type>) -> Type {
        match ty {
            Type::Object(object_type) => {
                if let Some(replacement) = params.get(&object_type.name) {
                    return replacement.clone();
                }
                Type::Object(ObjectType {
                    name: object_type.name.clone(),
                    param_types: object_type.param_types.iter().map(|p| self.substitute_type(p, params)).collect(),
                })
            }
            Type::Pointer(pointer) => self.substitute_type(&pointer.argument, params).pointer_to(),
            Type::StaticArray(array) => self.substitute_type(&array.element, params).array_of(array.length),
            other => other.clone(),
        }
    }

    fn clone_subtree(&self, ast: &mut AST, id: NodeID, parent: Option<NodeID>, params: &FxHashMap<String, Type>) -> NodeID {
        let Some(node) = ast.get_node(id) else { return id };
        let kind = node.kind;
        let mut data = node.data.clone();
        if let Some(parent) = parent {
            data = data.with_parent(parent);
        }

        // Substitute generic parameter types in-place before re-parenting
        // children: only `VarDecl` fields carry a substitutable type at this
        // stage (method signatures retain their own generic markers until
        // the type resolver has already run earlier in the pipeline).
        if let AnyNode::VarDecl(decl) = &mut data {
            if let Some(ty) = decl.get_type().cloned() {
                decl.set_type(self.substitute_type(&ty, params));
            }
        }

        let children = data.children();
        let new_id = ast.alloc_node(kind, data);
        for child in children {
            let new_child = self.clone_subtree(ast, child, Some(new_id), params);
            if new_child != child {
                self.rewire_child(ast, new_id, child, new_child);
            }
        }
        new_id
    }

    fn rewire_child(&self, ast: &mut AST, parent: NodeID, old_child: NodeID, new_child: NodeID) {
        let Some(node) = ast.get_node_mut(parent) else { return };
        match &mut node.data {
            AnyNode::ClassDecl(class) => {
                replace_in(&mut class.fields, old_child, new_child);
                replace_in(&mut class.methods, old_child, new_child);
            }
            AnyNode::FunctionDecl(decl) => {
                replace_in(&mut decl.arguments, old_child, new_child);
                replace_in(&mut decl.body, old_child, new_child);
            }
            _ => {}
        }
    }

    fn specialize(&mut self, ast: &mut AST, root: NodeID, generic_id: NodeID, object_type: &ObjectType) -> Option<NodeID> {
        let Some(node) = ast.get_node(generic_id) else { return None };
        let AnyNode::ClassDecl(generic) = &node.data else { return None };
        let param_names: Vec<String> =
            generic.object_type.param_types.iter().map(Type::name).collect();
        if param_names.len() != object_type.param_types.len() {
            self.errors.push(PassError::new(
                format!(
                    "class '{}' expects {} type parameters, got {}",
                    generic.object_type.name,
                    param_names.len(),
                    object_type.param_types.len()
                ),
                generic.location(),
                FailureCategory::Semantic,
            ));
            return None;
        }
        let params: FxHashMap<String, Type> =
            param_names.into_iter().zip(object_type.param_types.iter().cloned()).collect();

        let name = specialized_name(&generic.object_type.name, &object_type.param_types);
        if let Some(node) = ast.get_node(root) {
            if let AnyNode::RootNode(root_node) = &node.data {
                if let Some(&existing) = root_node.class_index.get(&name) {
                    return Some(existing);
                }
            }
        }

        let new_id = self.clone_subtree(ast, generic_id, None, &params);
        if let Some(node) = ast.get_node_mut(new_id) {
            if let AnyNode::ClassDecl(class) = &mut node.data {
                class.object_type = ObjectType { name: name.clone(), param_types: Vec::new() };
            }
        }
        if let Some(node) = ast.get_node_mut(root) {
            if let AnyNode::RootNode(root_node) = &mut node.data {
                root_node.register_class(name, new_id);
            }
        }
        Some(new_id)
    }
}

fn replace_in(ids: &mut [NodeID], old: NodeID, new: NodeID) {
    for entry in ids.iter_mut() {
        if *entry == old {
            *entry = new;
        }
    }
}

impl Pass for ClassTemplateLowerer {
    fn name(&self) -> &'static str { "class_template_lowerer" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        let generics = self.generic_classes(ast, root);
        if generics.is_empty() {
            return;
        }
        let sites = self.specialization_sites(ast, root, &generics);
        let mut emitted: FxHashSet<String> = FxHashSet::default();

        for (site_id, object_type) in sites {
            let Some(&generic_id) = generics.get(&object_type.name) else { continue };
            let specialized = specialized_name(&object_type.name, &object_type.param_types);
            let new_id = if emitted.contains(&specialized) {
                ast.get_node(root).and_then(|node| match &node.data {
                    AnyNode::RootNode(r) => r.class_index.get(&specialized).copied(),
                    _ => None,
                })
            } else {
                let result = self.specialize(ast, root, generic_id, &object_type);
                if result.is_some() {
                    let _ = emitted.insert(specialized.clone());
                }
                result
            };
            if let Some(new_id) = new_id {
                if let Some(node) = ast.get_node_mut(site_id) {
                    if let AnyNode::ObjectDefinition(def) = &mut node.data {
                        def.object_type = ObjectType { name: specialized.clone(), param_types: Vec::new() };
                        let _ = new_id;
                    }
                }
            }
        }

        // Generics with at least one specialization are dropped from the
        // index; an unused generic with zero specialization sites is left
        // registered (and will simply never be referenced downstream).
        for name in emitted.iter().filter_map(|specialized| specialized.strip_prefix("lil_")) {
            if let Some(base) = name.split('_').next() {
                if generics.contains_key(base) {
                    if let Some(node) = ast.get_node_mut(root) {
                        if let AnyNode::RootNode(root_node) = &mut node.data {
                            let _ = root_node.unregister_class(base);
                        }
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
    use elle_ast::ast::AST;
    use elle_ast::nodes::{AnyNode, ClassDecl, NodeID, NodeKind, ObjectDefinition, RootNode, Typed, VarDecl};
    use elle_ast::types::{ObjectType, Type};
    use elle_source::types::SourceLocation;

    use super::*;

    #[test]
    fn specializes_generic_class_for_concrete_parameter() {
        let mut ast = AST::new();
        let loc = SourceLocation::start_of_file("t.l");

        let field = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc.clone(), "item")),
        );
        if let Some(node) = ast.get_node_mut(field) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::object("T"));
            }
        }

        let generic_type = ObjectType { name: "Box".to_string(), param_types: vec![Type::object("T")] };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(ClassDecl::new(NodeID::placeholder(), loc.clone(), generic_type).with_fields(vec![field])),
        );
        ast.set_parent(field, class_id);

        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc.clone())));
        if let Some(node) = ast.get_node_mut(root_id) {
            if let AnyNode::RootNode(r) = &mut node.data {
                r.register_class("Box", class_id);
            }
        }

        let site_type = ObjectType { name: "Box".to_string(), param_types: vec![Type::object("Number")] };
        let site = ast.alloc_node(
            NodeKind::ObjectDefinition,
            AnyNode::ObjectDefinition(ObjectDefinition::new(NodeID::placeholder(), loc, site_type)),
        );
        ast.set_parent(site, root_id);

        let mut pass = ClassTemplateLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        let Some(node) = ast.get_node(site) else { panic!("site missing") };
        let AnyNode::ObjectDefinition(def) = &node.data else { panic!("wrong kind") };
        assert_eq!(def.object_type.name, "lil_Box_Number");
        assert!(pass.errors().is_empty());
    }
}
