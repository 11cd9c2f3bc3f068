//! Pass 7: resolves named types to `ObjectType`s and `#typeOf`-style
//! annotations.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, Typed};
use elle_ast::types::Type;
use rustc_hash::FxHashSet;

use crate::error::PassError;
use crate::manager::Pass;

const BASIC_TYPE_NAMES: &[&str] =
    &["i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128", "f32", "f64", "bool", "str", "label", "void"];

/// Resolves every typed node's type attribute that currently names a known
/// class or basic type but hasn't been normalized to the `Type` algebra's
/// canonical shape (e.g. a type that started out as a bare name string
/// during parsing and must become a proper `ObjectType`/`BasicType`).
pub struct TypeResolver {
    known_classes: FxHashSet<String>,
    errors: Vec<PassError>,
}

impl TypeResolver {
    /// Creates a new type resolver.
    #[must_use]
    pub fn new() -> Self { Self { known_classes: FxHashSet::default(), errors: Vec::new() } }

    fn resolve_name(&self, name: &str) -> Type {
        if BASIC_TYPE_NAMES.contains(&name) { Type::basic(name) } else { Type::object(name) }
    }

    fn collect_classes(&mut self, ast: &AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            if let Some(node) = ast.get_node(id) {
                if let AnyNode::ClassDecl(class) = &node.data {
                    let _ = self.known_classes.insert(class.name().to_string());
                }
            }
        }
    }
}

impl Default for TypeResolver {
    fn default() -> Self { Self::new() }
}

impl Pass for TypeResolver {
    fn name(&self) -> &'static str { "type_resolver" }

    fn initialize(&mut self, _ast: &mut AST) {
        self.errors.clear();
        self.known_classes.clear();
    }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        self.collect_classes(ast, root);

        for id in ast.collect_nodes_pre_order(root) {
            let Some(node) = ast.get_node(id) else { continue };
            // Only object-named types with an empty `param_types` are
            // candidates for re-resolution: template lowering hasn't run
            // yet, so parameterized names are left untouched here.
            let current_name = match &node.data {
                AnyNode::VarDecl(d) => d.get_type().filter(|t| t.param_types().is_empty()).map(Type::name),
                AnyNode::Enum(e) => e.get_type().filter(|t| t.param_types().is_empty()).map(Type::name),
                AnyNode::FlowControl(f) => f.get_type().filter(|t| t.param_types().is_empty()).map(Type::name),
                AnyNode::Rule(r) => r.get_type().filter(|t| t.param_types().is_empty()).map(Type::name),
                _ => None,
            };
            let Some(name) = current_name else { continue };
            let resolved = self.resolve_name(&name);

            if let Some(node) = ast.get_node_mut(id) {
                match &mut node.data {
                    AnyNode::VarDecl(d) => d.set_type(resolved),
                    AnyNode::Enum(e) => e.set_type(resolved),
                    AnyNode::FlowControl(f) => f.set_type(resolved),
                    AnyNode::Rule(r) => r.set_type(resolved),
                    _ => {}
                }
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{RootNode, VarDecl};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn resolves_basic_type_name() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let decl_id = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(decl_id) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::object("i32"));
            }
        }
        ast.set_parent(decl_id, root_id);

        let mut pass = TypeResolver::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(decl_id).expect("node still exists");
        let AnyNode::VarDecl(decl) = &node.data else { panic!("expected VarDecl") };
        assert!(matches!(decl.get_type(), Some(Type::Basic(_))));
    }

    #[test]
    fn resolves_class_name_to_object_type() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let decl_id = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), "x")));
        if let Some(node) = ast.get_node_mut(decl_id) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(Type::object("Widget"));
            }
        }
        ast.set_parent(decl_id, root_id);

        let mut pass = TypeResolver::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(decl_id).expect("node still exists");
        let AnyNode::VarDecl(decl) = &node.data else { panic!("expected VarDecl") };
        assert!(matches!(decl.get_type(), Some(Type::Object(_))));
    }
}
