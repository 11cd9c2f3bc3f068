//! Pass 2: replaces `#getConfig(key)` instructions with configuration values.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, BoolLiteral, InstructionKind, NodeID, NodeKind, NumberLiteral, StringLiteral};

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;
use crate::util::replace_node;

/// A resolved configuration value.
///
/// Matches `spec.md` §6's `Configuration object` shape; `elle-compiler`'s
/// `MapConfiguration` and `Configuration` trait build on this type directly
/// rather than duplicating it, the same way `crate::dom` resolves the
/// `dom_builder` pass's circular-dependency concern.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// A numeric value.
    Number(f64),
    /// A string value.
    Str(String),
    /// A boolean value.
    Bool(bool),
    /// A list of values; unsupported as a `#getConfig` substitution target
    /// since the node set has no list-literal node.
    List(Vec<ConfigValue>),
}

/// Abstract source of configuration values, implemented by the compiler's
/// `MapConfiguration` and by tests.
pub trait Configuration {
    /// Looks up a configuration value by key.
    fn get(&self, key: &str) -> Option<ConfigValue>;
}

/// Replaces every `#getConfig(key)` instruction with its resolved value.
pub struct ConfigGetter<C> {
    config: C,
    errors: Vec<PassError>,
}

impl<C: Configuration> ConfigGetter<C> {
    /// Creates a getter bound to the given configuration source.
    #[must_use]
    pub fn new(config: C) -> Self { Self { config, errors: Vec::new() } }
}

impl<C: Configuration> Pass for ConfigGetter<C> {
    fn name(&self) -> &'static str { "config_getter" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Instruction) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::Instruction(instruction) = &node.data else { continue };
            if instruction.instruction_kind != InstructionKind::GetConfig {
                continue;
            }
            let Some(key) = instruction.name.clone() else { continue };
            let location = instruction.location().clone();

            match self.config.get(&key) {
                Some(ConfigValue::Number(value)) => replace_node(
                    ast,
                    id,
                    NodeKind::Literal,
                    AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), location, value.to_string())),
                ),
                Some(ConfigValue::Str(value)) => replace_node(
                    ast,
                    id,
                    NodeKind::Literal,
                    AnyNode::StringLiteral(StringLiteral::new(NodeID::placeholder(), location, value)),
                ),
                Some(ConfigValue::Bool(value)) => replace_node(
                    ast,
                    id,
                    NodeKind::Literal,
                    AnyNode::BoolLiteral(BoolLiteral::new(NodeID::placeholder(), location, value)),
                ),
                Some(ConfigValue::List(_)) => self.errors.push(PassError::new(
                    format!("#getConfig({key}) resolved to a list, which has no literal representation"),
                    &location,
                    FailureCategory::Semantic,
                )),
                None => self.errors.push(PassError::new(
                    format!("no configuration value for key '{key}'"),
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

    struct FixedConfig(Vec<(&'static str, ConfigValue)>);

    impl Configuration for FixedConfig {
        fn get(&self, key: &str) -> Option<ConfigValue> {
            self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
        }
    }

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn replaces_get_config_with_string_literal() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let instr_id = ast.alloc_node(
            NodeKind::Instruction,
            AnyNode::Instruction(
                Instruction::new(NodeID::placeholder(), loc(), InstructionKind::GetConfig).with_name("theme"),
            ),
        );
        ast.set_parent(instr_id, root_id);

        let mut pass = ConfigGetter::new(FixedConfig(vec![("theme", ConfigValue::Str("dark".to_string()))]));
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(instr_id).expect("node still exists");
        assert!(matches!(node.data, AnyNode::StringLiteral(_)));
    }
}
