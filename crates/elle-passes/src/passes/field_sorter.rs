//! Pass 16: reorders class fields by alignment class (largest first, as a
//! C-style struct packer would), stable within each alignment bucket.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, NodeID, NodeKind, Typed};
use elle_ast::types::Type;

use crate::error::PassError;
use crate::manager::Pass;

fn alignment_of(ty: &Type) -> u32 {
    match ty {
        Type::Basic(b) => match b.name.as_str() {
            "i8" | "u8" | "bool" => 1,
            "i16" | "u16" => 2,
            "i32" | "u32" | "f32" => 4,
            "i64" | "u64" | "f64" | "i128" | "u128" => 8,
            "str" => 8,
            _ => 4,
        },
        Type::Object(_) | Type::Pointer(_) | Type::Function(_) => 8,
        Type::StaticArray(array) => alignment_of(&array.element),
    }
}

/// Reorders each class's field list descending by alignment class.
#[derive(Debug, Default)]
pub struct FieldSorter {
    errors: Vec<PassError>,
}

impl FieldSorter {
    /// Creates a new field sorter.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Pass for FieldSorter {
    fn name(&self) -> &'static str { "field_sorter" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for class_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(class_id) else { continue };
            let AnyNode::ClassDecl(class) = &node.data else { continue };
            let mut fields = class.fields.clone();

            let alignments: Vec<u32> = fields
                .iter()
                .map(|id| {
                    ast.get_node(*id)
                        .and_then(|n| match &n.data {
                            AnyNode::VarDecl(decl) => decl.get_type().map(alignment_of),
                            _ => None,
                        })
                        .unwrap_or(4)
                })
                .collect();

            let mut indexed: Vec<usize> = (0..fields.len()).collect();
            indexed.sort_by(|&a, &b| alignments[b].cmp(&alignments[a]));
            fields = indexed.into_iter().map(|i| fields[i]).collect();

            if let Some(node) = ast.get_node_mut(class_id) {
                if let AnyNode::ClassDecl(class) = &mut node.data {
                    class.fields = fields;
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

    fn field(ast: &mut AST, name: &str, ty: Type) -> NodeID {
        let id = ast.alloc_node(NodeKind::Declaration, AnyNode::VarDecl(VarDecl::new(NodeID::placeholder(), loc(), name)));
        if let Some(node) = ast.get_node_mut(id) {
            if let AnyNode::VarDecl(decl) = &mut node.data {
                decl.set_type(ty);
            }
        }
        id
    }

    #[test]
    fn sorts_fields_by_descending_alignment() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let byte_field = field(&mut ast, "flag", Type::basic("bool"));
        let word_field = field(&mut ast, "count", Type::basic("i32"));
        let pointer_field = field(&mut ast, "handle", Type::object("Widget"));

        let class_type = ObjectType { name: "Thing".to_string(), param_types: Vec::new() };
        let class_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::ClassDecl(
                ClassDecl::new(NodeID::placeholder(), loc(), class_type)
                    .with_fields(vec![byte_field, word_field, pointer_field]),
            ),
        );
        ast.set_parent(byte_field, class_id);
        ast.set_parent(word_field, class_id);
        ast.set_parent(pointer_field, class_id);
        ast.set_parent(class_id, root_id);

        let mut pass = FieldSorter::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(class_id).expect("class still exists");
        let AnyNode::ClassDecl(class) = &node.data else { panic!("expected ClassDecl") };
        assert_eq!(class.fields, vec![pointer_field, word_field, byte_field]);
    }
}
