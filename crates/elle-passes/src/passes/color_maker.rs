//! Pass 3: lowers `#color` instructions to `color` object definitions.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, Assignment, AnyNode, InstructionKind, NodeID, NodeKind, ObjectDefinition, PropertyName};
use elle_ast::types::ObjectType;

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;
use crate::util::replace_node;

/// Lowers every `#color <literal>` instruction to `color { value: <literal> }`.
#[derive(Debug, Default)]
pub struct ColorMaker {
    errors: Vec<PassError>,
}

impl ColorMaker {
    /// Creates a new color maker.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Pass for ColorMaker {
    fn name(&self) -> &'static str { "color_maker" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Instruction) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::Instruction(instruction) = &node.data else { continue };
            if instruction.instruction_kind != InstructionKind::Color {
                continue;
            }
            let location = instruction.location().clone();
            let Some(argument) = instruction.argument else {
                self.errors.push(PassError::new(
                    "#color requires a literal argument",
                    &location,
                    FailureCategory::Structural,
                ));
                continue;
            };

            let property_id = ast.alloc_node(
                NodeKind::Identifier,
                AnyNode::PropertyName(PropertyName::new(NodeID::placeholder(), location.clone(), "value")),
            );
            let assignment_id = ast.alloc_node(
                NodeKind::Assignment,
                AnyNode::Assignment(Assignment::new(NodeID::placeholder(), location.clone(), property_id, argument)),
            );
            ast.set_parent(property_id, assignment_id);
            ast.set_parent(argument, assignment_id);

            let color_type = ObjectType { name: "color".to_string(), param_types: Vec::new() };
            replace_node(
                ast,
                id,
                NodeKind::ObjectDefinition,
                AnyNode::ObjectDefinition(
                    ObjectDefinition::new(NodeID::placeholder(), location, color_type).with_fields(vec![assignment_id]),
                ),
            );
            ast.set_parent(assignment_id, id);
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Instruction, RootNode, StringLiteral};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn lowers_color_instruction_to_object_definition() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let literal_id =
            ast.alloc_node(NodeKind::Literal, AnyNode::StringLiteral(StringLiteral::new(NodeID::placeholder(), loc(), "#fff")));
        let instruction_id = ast.alloc_node(
            NodeKind::Instruction,
            AnyNode::Instruction(
                Instruction::new(NodeID::placeholder(), loc(), InstructionKind::Color).with_argument(literal_id),
            ),
        );
        ast.set_parent(literal_id, instruction_id);
        ast.set_parent(instruction_id, root_id);

        let mut pass = ColorMaker::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(instruction_id).expect("node still exists");
        let AnyNode::ObjectDefinition(def) = &node.data else { panic!("expected ObjectDefinition") };
        assert_eq!(def.object_type.name, "color");
        assert_eq!(def.fields.len(), 1);
    }

    #[test]
    fn reports_missing_argument() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let instruction_id = ast.alloc_node(
            NodeKind::Instruction,
            AnyNode::Instruction(Instruction::new(NodeID::placeholder(), loc(), InstructionKind::Color)),
        );
        ast.set_parent(instruction_id, root_id);

        let mut pass = ColorMaker::new();
        pass.perform_visit(&mut ast, root_id);

        assert_eq!(pass.errors().len(), 1);
        assert_eq!(pass.errors()[0].category, FailureCategory::Structural);
    }
}
