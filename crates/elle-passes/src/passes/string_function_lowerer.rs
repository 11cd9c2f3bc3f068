//! Pass 14: rewrites interpolated string literals into concatenation
//! expressions.

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, Expression, FunctionCall, NodeID, NodeKind, StringLiteral};

use crate::error::PassError;
use crate::manager::Pass;
use crate::util::replace_node;

/// For a literal like `"hello #{name}"`, rebuilds it as a left-to-right
/// chain of `+:` concatenations: the literal's raw text (interpolation
/// markers and all — the data model doesn't retain per-segment spans, only
/// the embedded value paths) followed by a `to_str` conversion call per
/// interpolated part.
#[derive(Debug, Default)]
pub struct StringFunctionLowerer {
    errors: Vec<PassError>,
}

impl StringFunctionLowerer {
    /// Creates a new string-function lowerer.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Moves `temp`'s node into `id`'s slot, re-parenting its children, and
    /// frees `temp`.
    fn finalize(&self, ast: &mut AST, id: NodeID, temp: NodeID) {
        let Some(temp_node) = ast.get_node(temp) else { return };
        let kind = temp_node.kind;
        let data = temp_node.data.clone();
        let children = data.children();
        replace_node(ast, id, kind, data);
        for child in children {
            ast.set_parent(child, id);
        }
        let _ = ast.remove(temp);
    }
}

impl Pass for StringFunctionLowerer {
    fn name(&self) -> &'static str { "string_function_lowerer" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        for id in ast.find_nodes_of_kind(root, NodeKind::Literal) {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::StringLiteral(literal) = &node.data else { continue };
            if !literal.is_interpolated || literal.interpolated_parts.is_empty() {
                continue;
            }
            let location = literal.location().clone();
            let text = literal.value.clone();
            let interpolations = literal.interpolated_parts.clone();

            let text_id = ast.alloc_node(NodeKind::Literal, AnyNode::StringLiteral(StringLiteral::new(NodeID::placeholder(), location.clone(), text)));

            let mut chain = text_id;
            for part in interpolations {
                let conversion = ast.alloc_node(
                    NodeKind::Expression,
                    AnyNode::FunctionCall(FunctionCall::new(NodeID::placeholder(), location.clone(), "to_str", vec![part])),
                );
                ast.set_parent(part, conversion);

                let concat = ast.alloc_node(
                    NodeKind::Expression,
                    AnyNode::Expression(Expression::new(NodeID::placeholder(), location.clone(), "+:", chain, conversion)),
                );
                ast.set_parent(chain, concat);
                ast.set_parent(conversion, concat);
                chain = concat;
            }

            self.finalize(ast, id, chain);
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { false }
}
