//! Pass 13: assigns numeric values to bare `PropertyName` enum entries.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, Assignment, AnyNode, NodeID, NodeKind, NumberLiteral, Typed};
use elle_ast::types::Type;

use crate::error::PassError;
use crate::manager::Pass;

/// After this pass, every enum entry is an `Assignment(PropertyName →
/// NumberLiteral)`: bare entries auto-increment from 0. The counter is
/// independent of whatever explicit values are already present — it is not
/// collision-avoiding, matching the source-observed behavior of `autoIndex`
/// in the original enum lowerer.
#[derive(Debug, Default)]
pub struct EnumLowerer {
    errors: Vec<PassError>,
}

impl EnumLowerer {
    /// Creates a new enum lowerer.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Pass for EnumLowerer {
    fn name(&self) -> &'static str { "enum_lowerer" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for enum_id in ast.find_nodes_of_kind(root, NodeKind::Declaration) {
            let Some(node) = ast.get_node(enum_id) else { continue };
            let AnyNode::Enum(enum_decl) = &node.data else { continue };
            let values = enum_decl.values.clone();
            let underlying = enum_decl.get_type().cloned().unwrap_or_else(|| Type::basic("i64"));

            let mut next_value: i64 = 0;
            let mut new_values = Vec::with_capacity(values.len());
            for value_id in values {
                let Some(node) = ast.get_node(value_id) else { continue };
                if matches!(node.data, AnyNode::Assignment(_)) {
                    new_values.push(value_id);
                    continue;
                }
                let AnyNode::PropertyName(property) = &node.data else {
                    new_values.push(value_id);
                    continue;
                };
                let location = property.location().clone();

                let assigned = next_value;
                next_value += 1;

                let literal_id = ast.alloc_node(
                    NodeKind::Literal,
                    AnyNode::NumberLiteral(
                        NumberLiteral::new(NodeID::placeholder(), location.clone(), assigned.to_string()).with_type(underlying.clone()),
                    ),
                );
                let assignment_id = ast.alloc_node(
                    NodeKind::Assignment,
                    AnyNode::Assignment(Assignment::new(NodeID::placeholder(), location, value_id, literal_id)),
                );
                ast.set_parent(value_id, assignment_id);
                ast.set_parent(literal_id, assignment_id);
                ast.set_parent(assignment_id, enum_id);
                new_values.push(assignment_id);
            }

            if let Some(node) = ast.get_node_mut(enum_id) {
                if let AnyNode::Enum(enum_decl) = &mut node.data {
                    enum_decl.values = new_values;
                    if enum_decl.get_type().is_none() {
                        enum_decl.set_type(underlying);
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
    use elle_ast::nodes::{Enum, PropertyName, RootNode};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn auto_increments_bare_entries_from_zero() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let red = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "red")));
        let green = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "green")));
        let enum_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::Enum(Enum::new(NodeID::placeholder(), loc(), "Color").with_values(vec![red, green])),
        );
        ast.set_parent(red, enum_id);
        ast.set_parent(green, enum_id);
        ast.set_parent(enum_id, root_id);

        let mut pass = EnumLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(enum_id).expect("node still exists");
        let AnyNode::Enum(enum_decl) = &node.data else { panic!("expected Enum") };
        assert_eq!(enum_decl.values.len(), 2);
        for (i, value_id) in enum_decl.values.iter().enumerate() {
            let value_node = ast.get_node(*value_id).expect("value node exists");
            let AnyNode::Assignment(assignment) = &value_node.data else { panic!("expected Assignment") };
            let literal_node = ast.get_node(assignment.value).expect("literal exists");
            let AnyNode::NumberLiteral(literal) = &literal_node.data else { panic!("expected NumberLiteral") };
            assert_eq!(literal.value, i.to_string());
        }
    }

    #[test]
    fn auto_increment_ignores_explicit_values_and_can_collide() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let explicit_name = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "one")));
        let explicit_literal =
            ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(elle_ast::nodes::NumberLiteral::new(NodeID::placeholder(), loc(), "0")));
        let explicit = ast.alloc_node(
            NodeKind::Assignment,
            AnyNode::Assignment(elle_ast::nodes::Assignment::new(NodeID::placeholder(), loc(), explicit_name, explicit_literal)),
        );
        ast.set_parent(explicit_name, explicit);
        ast.set_parent(explicit_literal, explicit);

        let bare = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), "two")));

        let enum_id = ast.alloc_node(
            NodeKind::Declaration,
            AnyNode::Enum(Enum::new(NodeID::placeholder(), loc(), "Pair").with_values(vec![explicit, bare])),
        );
        ast.set_parent(explicit, enum_id);
        ast.set_parent(bare, enum_id);
        ast.set_parent(enum_id, root_id);

        let mut pass = EnumLowerer::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(enum_id).expect("node still exists");
        let AnyNode::Enum(enum_decl) = &node.data else { panic!("expected Enum") };
        // The counter starts at 0 regardless of the explicit "one" = 0
        // already present, so the bare entry collides with it instead of
        // skipping ahead to 1.
        let bare_assignment_id = enum_decl.values[1];
        let assignment_node = ast.get_node(bare_assignment_id).expect("assignment exists");
        let AnyNode::Assignment(assignment) = &assignment_node.data else { panic!("expected Assignment") };
        let literal_node = ast.get_node(assignment.value).expect("literal exists");
        let AnyNode::NumberLiteral(literal) = &literal_node.data else { panic!("expected NumberLiteral") };
        assert_eq!(literal.value, "0");
    }

    proptest::proptest! {
        /// For any mix of bare and explicit-valued entries, the bare
        /// entries are assigned 0, 1, 2, … in order, entirely independent
        /// of whichever explicit values are also present (the counter does
        /// not avoid them).
        #[test]
        fn bare_entries_get_sequential_values_independent_of_explicit(entries in proptest::collection::vec(proptest::option::of(0i64..6i64), 0..8)) {
            let mut ast = AST::new();
            let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

            let mut value_ids = Vec::new();
            for (i, explicit) in entries.iter().enumerate() {
                let name = ast.alloc_node(NodeKind::Identifier, AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), loc(), format!("e{i}"))));
                let id = match explicit {
                    Some(v) => {
                        let literal = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), v.to_string())));
                        let assignment = ast.alloc_node(NodeKind::Assignment, AnyNode::Assignment(Assignment::new(NodeID::placeholder(), loc(), name, literal)));
                        ast.set_parent(name, assignment);
                        ast.set_parent(literal, assignment);
                        assignment
                    }
                    None => name,
                };
                value_ids.push(id);
            }

            let enum_id = ast.alloc_node(NodeKind::Declaration, AnyNode::Enum(Enum::new(NodeID::placeholder(), loc(), "Gen").with_values(value_ids)));
            for id in &value_ids_of(&ast, enum_id) {
                ast.set_parent(*id, enum_id);
            }
            ast.set_parent(enum_id, root_id);

            let mut pass = EnumLowerer::new();
            pass.perform_visit(&mut ast, root_id);
            proptest::prop_assert!(pass.errors().is_empty());

            let node = ast.get_node(enum_id).expect("node still exists");
            let AnyNode::Enum(enum_decl) = &node.data else { unreachable!() };
            let mut expected_next = 0i64;
            for (original, value_id) in entries.iter().zip(enum_decl.values.iter()) {
                let value_node = ast.get_node(*value_id).expect("value node exists");
                let AnyNode::Assignment(assignment) = &value_node.data else { panic!("expected Assignment") };
                let literal_node = ast.get_node(assignment.value).expect("literal exists");
                let AnyNode::NumberLiteral(literal) = &literal_node.data else { panic!("expected NumberLiteral") };
                let parsed: i64 = literal.value.parse().expect("numeric value");
                match original {
                    Some(v) => proptest::prop_assert_eq!(parsed, *v),
                    None => {
                        proptest::prop_assert_eq!(parsed, expected_next);
                        expected_next += 1;
                    }
                }
            }
        }
    }

    /// Helper for the property test: `Enum::values` after construction,
    /// since `with_values` takes ownership of the vec passed in.
    fn value_ids_of(ast: &AST, enum_id: NodeID) -> Vec<NodeID> {
        let Some(node) = ast.get_node(enum_id) else { return Vec::new() };
        let AnyNode::Enum(enum_decl) = &node.data else { return Vec::new() };
        enum_decl.values.clone()
    }
}
