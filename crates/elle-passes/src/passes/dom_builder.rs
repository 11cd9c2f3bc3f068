//! Pass 10: walks rules carrying a `#new` instruction to build the
//! [`crate::dom::Dom`] tree.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, InstructionKind, NodeID, NodeKind, Typed};

use crate::dom::{Dom, Element};
use crate::error::PassError;
use crate::manager::Pass;

/// Builds the `Dom` describing how many of which element kind each rule
/// instantiates.
#[derive(Debug, Default)]
pub struct DomBuilder {
    dom: Dom,
    errors: Vec<PassError>,
}

impl DomBuilder {
    /// Creates a new DOM builder.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The tree built by the last `perform_visit` call.
    #[must_use]
    pub const fn dom(&self) -> &Dom { &self.dom }

    fn repeat_count(&self, ast: &AST, argument: Option<NodeID>) -> u64 {
        let Some(argument) = argument else { return 1 };
        ast.get_node(argument)
            .and_then(|node| match &node.data {
                AnyNode::NumberLiteral(n) => n.value.parse::<u64>().ok(),
                _ => None,
            })
            .unwrap_or(1)
    }

    /// This rule's DOM element name, taken from its *first* selector.
    fn element_name(&self, ast: &AST, rule_id: NodeID) -> String {
        let Some(node) = ast.get_node(rule_id) else { return "element".to_string() };
        let AnyNode::Rule(rule) = &node.data else { return "element".to_string() };
        rule.selector_chain
            .first()
            .and_then(|id| ast.get_node(*id))
            .map_or_else(|| "element".to_string(), |n| n.data.to_string())
    }

    /// A node's resolved type, for the handful of `AnyNode` variants the
    /// `#new` instruction's argument can plausibly be.
    fn node_type(&self, ast: &AST, id: NodeID) -> Option<elle_ast::types::Type> {
        ast.get_node(id).and_then(|n| match &n.data {
            AnyNode::VarName(v) => v.get_type().cloned(),
            AnyNode::PropertyName(p) => p.get_type().cloned(),
            AnyNode::ValuePath(p) => p.get_type().cloned(),
            AnyNode::FunctionCall(c) => c.get_type().cloned(),
            AnyNode::NumberLiteral(n) => n.get_type().cloned(),
            _ => None,
        })
    }

    /// This rule's DOM element type: the rule's own type if set, else the
    /// driving instruction's type annotation, else the generic `"element"`.
    fn element_type_name(&self, ast: &AST, rule_id: NodeID, instruction_id: NodeID) -> String {
        let rule_type = ast.get_node(rule_id).and_then(|n| match &n.data {
            AnyNode::Rule(rule) => rule.get_type().cloned(),
            _ => None,
        });
        let instruction_type = || {
            ast.get_node(instruction_id).and_then(|n| match &n.data {
                AnyNode::Instruction(instruction) => instruction.argument.and_then(|arg| self.node_type(ast, arg)),
                _ => None,
            })
        };
        rule_type.or_else(instruction_type).map_or_else(|| "element".to_string(), |ty| ty.name())
    }

    fn build_rule(&mut self, ast: &AST, rule_id: NodeID, next_id: &mut u64) -> Option<Vec<Element>> {
        let node = ast.get_node(rule_id)?;
        let AnyNode::Rule(rule) = &node.data else { return None };
        let Some(instruction_id) = rule.instruction else { return None };
        let instruction_node = ast.get_node(instruction_id)?;
        let AnyNode::Instruction(instruction) = &instruction_node.data else { return None };
        if instruction.instruction_kind != InstructionKind::New {
            return None;
        }

        let count = self.repeat_count(ast, instruction.argument);
        let name = self.element_name(ast, rule_id);
        let type_name = self.element_type_name(ast, rule_id, instruction_id);
        let child_rules = rule.child_rules.clone();

        let mut elements = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = *next_id;
            *next_id += 1;
            let mut children = Vec::new();
            for child_rule in &child_rules {
                if let Some(built) = self.build_rule(ast, *child_rule, next_id) {
                    children.extend(built);
                }
            }
            elements.push(Element { name: name.clone(), element_type: type_name.clone(), id, source_rule: Some(rule_id), children });
        }
        Some(elements)
    }
}

impl Pass for DomBuilder {
    fn name(&self) -> &'static str { "dom_builder" }

    fn initialize(&mut self, _ast: &mut AST) {
        self.errors.clear();
        self.dom = Dom::new();
    }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        let mut next_id = 1;
        let rule_ids = ast.find_nodes_of_kind(root, NodeKind::Rule);
        for rule_id in &rule_ids {
            let Some(node) = ast.get_node(*rule_id) else { continue };
            // Only top-level rules seed the DOM; nested rules are visited
            // recursively from their parent's `build_rule` call.
            if matches!(node.data.parent(), Some(parent) if rule_ids.contains(&parent)) {
                continue;
            }
            if let Some(elements) = self.build_rule(ast, *rule_id, &mut next_id) {
                self.dom.root.children.extend(elements);
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Instruction, NumberLiteral, RootNode, Rule, Selector};
    use elle_ast::types::Type;
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn builds_repeated_elements_from_new_instruction() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let count = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "3")));
        let instruction_id = ast.alloc_node(
            NodeKind::Instruction,
            AnyNode::Instruction(Instruction::new(NodeID::placeholder(), loc(), InstructionKind::New).with_argument(count)),
        );
        ast.set_parent(count, instruction_id);

        let selector = ast.alloc_node(NodeKind::Identifier, AnyNode::Selector(Selector::new(NodeID::placeholder(), loc(), "box")));
        let rule_id = ast.alloc_node(
            NodeKind::Rule,
            AnyNode::Rule(Rule::new(NodeID::placeholder(), loc(), vec![selector]).with_instruction(instruction_id)),
        );
        ast.set_parent(selector, rule_id);
        ast.set_parent(instruction_id, rule_id);
        ast.set_parent(rule_id, root_id);

        let mut pass = DomBuilder::new();
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        assert_eq!(pass.dom().root.children.len(), 3);
        assert!(pass.dom().root.children.iter().all(|e| e.name == "box"));
        // Neither the rule nor its instruction carries a type here, so the
        // element type falls back to the generic name.
        assert!(pass.dom().root.children.iter().all(|e| e.element_type == "element"));
    }

    #[test]
    fn element_name_and_type_are_independent() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let instruction_id = ast.alloc_node(NodeKind::Instruction, AnyNode::Instruction(Instruction::new(NodeID::placeholder(), loc(), InstructionKind::New)));

        let first_selector = ast.alloc_node(NodeKind::Identifier, AnyNode::Selector(Selector::new(NodeID::placeholder(), loc(), "submitButton")));
        let second_selector = ast.alloc_node(NodeKind::Identifier, AnyNode::Selector(Selector::new(NodeID::placeholder(), loc(), "hover")));
        let rule_id = ast.alloc_node(
            NodeKind::Rule,
            AnyNode::Rule(Rule::new(NodeID::placeholder(), loc(), vec![first_selector, second_selector]).with_instruction(instruction_id)),
        );
        if let Some(node) = ast.get_node_mut(rule_id) {
            if let AnyNode::Rule(rule) = &mut node.data {
                rule.set_type(Type::object("Button"));
            }
        }
        ast.set_parent(first_selector, rule_id);
        ast.set_parent(second_selector, rule_id);
        ast.set_parent(instruction_id, rule_id);
        ast.set_parent(rule_id, root_id);

        let mut pass = DomBuilder::new();
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let element = &pass.dom().root.children[0];
        assert_eq!(element.name, "submitButton");
        assert_eq!(element.element_type, "Button");
    }

    #[test]
    fn rule_without_new_instruction_produces_no_element() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let selector = ast.alloc_node(NodeKind::Identifier, AnyNode::Selector(Selector::new(NodeID::placeholder(), loc(), "box")));
        let rule_id = ast.alloc_node(NodeKind::Rule, AnyNode::Rule(Rule::new(NodeID::placeholder(), loc(), vec![selector])));
        ast.set_parent(selector, rule_id);
        ast.set_parent(rule_id, root_id);

        let mut pass = DomBuilder::new();
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.dom().root.children.is_empty());
    }

    /// Renders element name/type and child count, skipping the arena-index
    /// `source_rule` field so the snapshot stays stable across unrelated
    /// node-allocation changes elsewhere in the same test.
    fn render_tree(element: &Element, depth: usize) -> String {
        let mut out = format!("{}{} ({}) children={}\n", "  ".repeat(depth), element.name, element.element_type, element.children.len());
        for child in &element.children {
            out.push_str(&render_tree(child, depth + 1));
        }
        out
    }

    #[test]
    fn snapshot_of_nested_rule_tree() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));

        let inner_selector = ast.alloc_node(NodeKind::Identifier, AnyNode::Selector(Selector::new(NodeID::placeholder(), loc(), "label")));
        let inner_instruction = ast.alloc_node(NodeKind::Instruction, AnyNode::Instruction(Instruction::new(NodeID::placeholder(), loc(), InstructionKind::New)));
        let inner_rule = ast.alloc_node(
            NodeKind::Rule,
            AnyNode::Rule(Rule::new(NodeID::placeholder(), loc(), vec![inner_selector]).with_instruction(inner_instruction)),
        );
        ast.set_parent(inner_selector, inner_rule);
        ast.set_parent(inner_instruction, inner_rule);

        let outer_selector = ast.alloc_node(NodeKind::Identifier, AnyNode::Selector(Selector::new(NodeID::placeholder(), loc(), "panel")));
        let outer_instruction = ast.alloc_node(NodeKind::Instruction, AnyNode::Instruction(Instruction::new(NodeID::placeholder(), loc(), InstructionKind::New)));
        let outer_rule = ast.alloc_node(
            NodeKind::Rule,
            AnyNode::Rule(Rule::new(NodeID::placeholder(), loc(), vec![outer_selector]).with_instruction(outer_instruction).with_child_rules(vec![inner_rule])),
        );
        ast.set_parent(outer_selector, outer_rule);
        ast.set_parent(outer_instruction, outer_rule);
        ast.set_parent(inner_rule, outer_rule);
        ast.set_parent(outer_rule, root_id);

        let mut pass = DomBuilder::new();
        pass.initialize(&mut ast);
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let rendered = pass.dom().root.children.iter().map(|e| render_tree(e, 0)).collect::<String>();
        insta::assert_snapshot!(rendered, @r###"
        panel (element) children=1
          label (element) children=0
        "###);
    }
}
