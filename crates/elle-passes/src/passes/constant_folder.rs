//! Pass 19: evaluates pure expressions over literal operands.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, BoolLiteral, NodeID, NodeKind, NumberLiteral, Typed};

use crate::error::PassError;
use crate::manager::Pass;
use crate::util::replace_node;

enum Literal {
    Number(f64),
    Bool(bool),
}

fn read_literal(ast: &AST, id: NodeID) -> Option<Literal> {
    let node = ast.get_node(id)?;
    match &node.data {
        AnyNode::NumberLiteral(n) => n.value.parse::<f64>().ok().map(Literal::Number),
        AnyNode::BoolLiteral(b) => Some(Literal::Bool(b.value)),
        _ => None,
    }
}

fn fold_binary(operator: &str, left: &Literal, right: &Literal) -> Option<Literal> {
    match (left, right) {
        (Literal::Number(l), Literal::Number(r)) => match operator {
            "+:" => Some(Literal::Number(l + r)),
            "-:" => Some(Literal::Number(l - r)),
            "*:" => Some(Literal::Number(l * r)),
            "/:" if *r != 0.0 => Some(Literal::Number(l / r)),
            "<" => Some(Literal::Bool(l < r)),
            "<=" => Some(Literal::Bool(l <= r)),
            ">" => Some(Literal::Bool(l > r)),
            ">=" => Some(Literal::Bool(l >= r)),
            "==" => Some(Literal::Bool((l - r).abs() < f64::EPSILON)),
            "!=" => Some(Literal::Bool((l - r).abs() >= f64::EPSILON)),
            _ => None,
        },
        (Literal::Bool(l), Literal::Bool(r)) => match operator {
            "&&" => Some(Literal::Bool(*l && *r)),
            "||" => Some(Literal::Bool(*l || *r)),
            "==" => Some(Literal::Bool(l == r)),
            "!=" => Some(Literal::Bool(l != r)),
            _ => None,
        },
        _ => None,
    }
}

/// Folds `Expression`/`UnaryExpression` nodes whose operands are both
/// literals, replacing the expression in place with the computed literal.
#[derive(Debug, Default)]
pub struct ConstantFolder {
    errors: Vec<PassError>,
}

impl ConstantFolder {
    /// Creates a new constant folder.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl Pass for ConstantFolder {
    fn name(&self) -> &'static str { "constant_folder" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        // Fold depth-first (post-order) so nested constant subexpressions
        // collapse before their parent is considered.
        for id in ast.collect_nodes_post_order(root) {
            let Some(node) = ast.get_node(id) else { continue };
            let location = node.data.location().clone();

            match &node.data {
                AnyNode::Expression(expr) => {
                    let (operator, left, right) = (expr.operator.clone(), expr.left, expr.right);
                    let (Some(left_lit), Some(right_lit)) = (read_literal(ast, left), read_literal(ast, right)) else { continue };
                    let Some(folded) = fold_binary(&operator, &left_lit, &right_lit) else { continue };
                    match folded {
                        Literal::Number(value) => {
                            let ty = ast.get_node(left).and_then(|n| match &n.data {
                                AnyNode::NumberLiteral(n) => n.get_type().cloned(),
                                _ => None,
                            });
                            let mut literal = NumberLiteral::new(NodeID::placeholder(), location, format_number(value));
                            if let Some(ty) = ty {
                                literal = literal.with_type(ty);
                            }
                            replace_node(ast, id, NodeKind::Literal, AnyNode::NumberLiteral(literal));
                        }
                        Literal::Bool(value) => {
                            replace_node(ast, id, NodeKind::Literal, AnyNode::BoolLiteral(BoolLiteral::new(NodeID::placeholder(), location, value)));
                        }
                    }
                    let _ = ast.remove(left);
                    let _ = ast.remove(right);
                }
                AnyNode::UnaryExpression(unary) => {
                    let (operator, operand) = (unary.operator.clone(), unary.operand);
                    let Some(operand_lit) = read_literal(ast, operand) else { continue };
                    let folded = match (&operator[..], operand_lit) {
                        ("!", Literal::Bool(b)) => Some(Literal::Bool(!b)),
                        ("-:", Literal::Number(n)) => Some(Literal::Number(-n)),
                        _ => None,
                    };
                    let Some(folded) = folded else { continue };
                    match folded {
                        Literal::Number(value) => {
                            replace_node(
                                ast,
                                id,
                                NodeKind::Literal,
                                AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), location, format_number(value))),
                            );
                        }
                        Literal::Bool(value) => {
                            replace_node(ast, id, NodeKind::Literal, AnyNode::BoolLiteral(BoolLiteral::new(NodeID::placeholder(), location, value)));
                        }
                    }
                    let _ = ast.remove(operand);
                }
                _ => {}
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use elle_ast::nodes::{Expression, RootNode, UnaryExpression};
    use elle_source::types::SourceLocation;

    use super::*;

    fn loc() -> SourceLocation { SourceLocation::start_of_file("t.l") }

    #[test]
    fn folds_arithmetic_expression_of_two_literals() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let left = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "2")));
        let right = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "3")));
        let expr_id = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::Expression(Expression::new(NodeID::placeholder(), loc(), "+:", left, right)),
        );
        ast.set_parent(left, expr_id);
        ast.set_parent(right, expr_id);
        ast.set_parent(expr_id, root_id);

        let mut pass = ConstantFolder::new();
        pass.perform_visit(&mut ast, root_id);

        assert!(pass.errors().is_empty());
        let node = ast.get_node(expr_id).expect("node still exists");
        let AnyNode::NumberLiteral(literal) = &node.data else { panic!("expected folded NumberLiteral") };
        assert_eq!(literal.value, "5");
    }

    #[test]
    fn folds_unary_negation_of_literal() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let operand = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "4")));
        let unary_id = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::UnaryExpression(UnaryExpression::new(NodeID::placeholder(), loc(), "-:", operand)),
        );
        ast.set_parent(operand, unary_id);
        ast.set_parent(unary_id, root_id);

        let mut pass = ConstantFolder::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(unary_id).expect("node still exists");
        let AnyNode::NumberLiteral(literal) = &node.data else { panic!("expected folded NumberLiteral") };
        assert_eq!(literal.value, "-4");
    }

    #[test]
    fn leaves_non_literal_expression_untouched() {
        let mut ast = AST::new();
        let root_id = ast.alloc_node(NodeKind::Root, AnyNode::RootNode(RootNode::new(NodeID::placeholder(), loc())));
        let left = ast.alloc_node(NodeKind::Literal, AnyNode::NumberLiteral(NumberLiteral::new(NodeID::placeholder(), loc(), "2")));
        let right_decl =
            ast.alloc_node(NodeKind::Identifier, AnyNode::VarName(elle_ast::nodes::VarName::new(NodeID::placeholder(), loc(), "y")));
        let expr_id = ast.alloc_node(
            NodeKind::Expression,
            AnyNode::Expression(Expression::new(NodeID::placeholder(), loc(), "+:", left, right_decl)),
        );
        ast.set_parent(left, expr_id);
        ast.set_parent(right_decl, expr_id);
        ast.set_parent(expr_id, root_id);

        let mut pass = ConstantFolder::new();
        pass.perform_visit(&mut ast, root_id);

        let node = ast.get_node(expr_id).expect("node still exists");
        assert!(matches!(node.data, AnyNode::Expression(_)));
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
