//! Tests for the Visitable trait implementation

use elle_ast::ast::AST;
use elle_ast::nodes::{AnyNode, ASTNode, BoolLiteral, FlowControlKind, NodeID, NodeKind, NumberLiteral, VarName};
use elle_ast::visitor::{Visitable, Visitor, VisitorResult};
use elle_source::types::SourceLocation;

fn loc() -> SourceLocation { SourceLocation::start_of_file("test.l") }

struct TestVisitor {
    visited_nodes: Vec<&'static str>,
}

impl TestVisitor {
    const fn new() -> Self { Self { visited_nodes: Vec::new() } }
}

impl Visitor<()> for TestVisitor {
    fn visit(&mut self, _node_id: NodeID) -> Option<()> {
        self.visited_nodes.push("visit");
        None
    }

    fn visit_number_literal(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_number_literal");
        Ok(())
    }

    fn visit_bool_literal(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_bool_literal");
        Ok(())
    }

    fn visit_var_name(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_var_name");
        Ok(())
    }

    fn visit_flow_control(&mut self, _node_id: NodeID) -> VisitorResult<()> {
        self.visited_nodes.push("visit_flow_control");
        Ok(())
    }
}

#[test]
fn any_node_dispatches_to_number_literal() {
    let mut ast = AST::new();
    let literal = NumberLiteral::new(NodeID::placeholder(), loc(), "42");
    let id = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(literal));

    let mut visitor = TestVisitor::new();
    let node = ast.get_node(id).expect("node was just allocated");
    node.data.accept(&mut visitor, id).expect("visit should succeed");

    assert_eq!(visitor.visited_nodes, vec!["visit_number_literal"]);
}

#[test]
fn any_node_dispatches_to_bool_literal() {
    let mut ast = AST::new();
    let literal = BoolLiteral::new(NodeID::placeholder(), loc(), true);
    let id = ast.alloc_node(NodeKind::Literal, AnyNode::BoolLiteral(literal));

    let mut visitor = TestVisitor::new();
    let node = ast.get_node(id).expect("node was just allocated");
    node.data.accept(&mut visitor, id).expect("visit should succeed");

    assert_eq!(visitor.visited_nodes, vec!["visit_bool_literal"]);
}

#[test]
fn concrete_type_accept_bypasses_any_node() {
    let var_name = VarName::new(NodeID::new(1, 1), loc(), "@self");
    let mut visitor = TestVisitor::new();

    var_name.accept(&mut visitor, NodeID::new(1, 1)).expect("visit should succeed");

    assert_eq!(visitor.visited_nodes, vec!["visit_var_name"]);
}

#[test]
fn alloc_node_stamps_arena_assigned_id() {
    let mut ast = AST::new();
    let literal = NumberLiteral::new(NodeID::placeholder(), loc(), "7");
    let id = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(literal));

    let node = ast.get_node(id).expect("node was just allocated");
    assert_eq!(node.data.id(), id);
}

#[test]
fn multiple_node_kinds_visit_in_order() {
    let mut ast = AST::new();

    let number_id =
        ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1")));
    let bool_id =
        ast.alloc_node(NodeKind::Literal, AnyNode::BoolLiteral(BoolLiteral::new(NodeID::placeholder(), loc(), false)));
    let flow_id = ast.alloc_node(
        NodeKind::FlowControl,
        AnyNode::FlowControl(elle_ast::nodes::FlowControl::new(NodeID::placeholder(), loc(), FlowControlKind::If)),
    );

    let mut visitor = TestVisitor::new();
    for id in [number_id, bool_id, flow_id] {
        let node = ast.get_node(id).expect("node was just allocated");
        node.data.accept(&mut visitor, id).expect("visit should succeed");
    }

    assert_eq!(
        visitor.visited_nodes,
        vec!["visit_number_literal", "visit_bool_literal", "visit_flow_control"]
    );
}

#[test]
fn removed_node_generation_is_stale() {
    let mut ast = AST::new();
    let id = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "1")));
    assert!(ast.remove(id));
    assert!(ast.get_node(id).is_none());

    let reused_id =
        ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "2")));
    assert_eq!(reused_id.index(), id.index());
    assert_ne!(reused_id.generation(), id.generation());
    assert!(ast.get_node(id).is_none(), "stale id must not resolve to the reused slot");
}
