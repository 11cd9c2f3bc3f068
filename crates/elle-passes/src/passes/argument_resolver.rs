//! Pass 1: replaces `#arg` instructions with caller-supplied literals.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, BoolLiteral, InstructionKind, NodeID, NodeKind, NumberLiteral, StringLiteral};
use rustc_hash::FxHashMap;

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;
use crate::util::replace_node;

/// A literal value supplied by the caller for one `#arg` name.
#[derive(Debug, Clone)]
pub enum ArgumentValue {
    /// Becomes a `NumberLiteral`.
    Number(String),
    /// Becomes a `StringLiteral`.
    Str(String),
    /// Becomes a `BoolLiteral`.
    Bool(bool),
}

/// Replaces every `#arg <name>` instruction with the literal bound to
/// `<name>` in the caller-supplied map.
pub struct ArgumentResolver {
    arguments: FxHashMap<String, ArgumentValue>,
    errors: Vec<PassError>,
}

impl ArgumentResolver {
    /// Creates a resolver bound to the given argument map.
    #[must_use]
    pub fn new(arguments: FxHashMap<String, ArgumentValue>) -> Self { Self { arguments, errors: Vec::new() } }
}

impl Pass for ArgumentResolver {
    fn name(&self) -> &'static str { "argument_resolver" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Instruction) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::Instruction(instruction) = &node.data else { continue };
            if instruction.instruction_kind != InstructionKind::Arg {
                continue;
            }
            let Some(name) = instruction.name.clone() else { continue };
            let location = instruction.location().clone();

            match self.arguments.get(&name) {
                Some(ArgumentValue::Number(value)) => replace_node(
                    ast,
                    id,
                    NodeKind::Literal,
                    AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), location, value.clone())),
                ),
                Some(ArgumentValue::Str(value)) => replace_node(
                    ast,
                    id,
                    NodeKind::Literal,
                    AnyNode::StringLiteral(StringLiteral::new(NodeID::placeholder(), location, value.clone())),
                ),
                Some(ArgumentValue::Bool(value)) => replace_node(
                    ast,
                    id,
                    NodeKind::Literal,
                    AnyNode::BoolLiteral(BoolLiteral::new(NodeID::placeholder(), location, *value)),
                ),
                None => self.errors.push(PassError::new(
                    format!("no argument supplied for #arg {name}"),
                    &location,
                    FailureCategory::Resolution,
                )),
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Instruction, RootNode};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn replaces_arg_instruction_with_number_literal() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let arg_id = ast.alloc_node(
            NodeKind::Instruction,
            AnyNode::Instruction(
                Instruction::new(NodeID::placeholder(), loc(), InstructionKind::Arg).with_name("count"),
            ),
        );
        ast.set_parent(arg_id, root_id);

        let mut arguments = FxHashMap::default();
        let _ = arguments.insert("count".to_string(), ArgumentValue::Number("3".to_string()));
        let mut pass = ArgumentResolver::new(arguments);
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(arg_id).expect("node still exists");
        assert!(matches!(node.data, AnyNode::NumberLiteral(_)));
    }

    #[test]
    fn reports_missing_argument() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let arg_id = ast.alloc_node(
            NodeKind::Instruction,
            AnyNode::Instruction(
                Instruction::new(NodeID::placeholder(), loc(), InstructionKind::Arg).with_name("missing"),
            ),
        );
        ast.set_parent(arg_id, root_id);

        let mut pass = ArgumentResolver::new(FxHashMap::default());
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert_eq!(pass.errors().len(), 1);
        assert_eq!(pass.errors()[0].category, FailureCategory::Resolution);
    }
}
