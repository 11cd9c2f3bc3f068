//! Expression and path nodes.

use std::fmt;

use elle_source::types::SourceLocation;

use crate::{
    impl_visitable,
    nodes::{ASTNode, NodeCommon, NodeID, NodeKind, Typed},
    types::Type,
};

/// A field initializer inside an object definition, or a value binding
/// inside a rule: `subject: value`.
#[derive(Debug, Clone)]
pub struct Assignment {
    common: NodeCommon,
    /// The left-hand side: a `PropertyName`, `ValuePath`, or `VarName`.
    pub subject: NodeID,
    /// The right-hand side.
    pub value: NodeID,
    ty: Option<Type>,
}

impl Assignment {
    /// Creates a new assignment node.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, subject: NodeID, value: NodeID) -> Self {
        Self { common: NodeCommon::new(id, location), subject, value, ty: None }
    }
}

impl ASTNode for Assignment {
    fn kind(&self) -> NodeKind { NodeKind::Assignment }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { vec![self.subject, self.value] }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> { self.common.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.common.parent = Some(parent);
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl Typed for Assignment {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "<assignment>") }
}

impl_visitable!(Assignment, visit_assignment);

/// An ordered dotted-access chain: `head.tail1.tail2…`.
///
/// Per invariant 3, the first segment names a `VarName`, `PropertyName`, or
/// selector keyword (`@self`, `@this`); later segments are `PropertyName`,
/// `FunctionCall`, or `IndexAccessor`.
#[derive(Debug, Clone)]
pub struct ValuePath {
    common: NodeCommon,
    /// The path's segments, in order; never empty.
    pub segments: Vec<NodeID>,
    ty: Option<Type>,
}

impl ValuePath {
    /// Creates a new value path from its segments.
    ///
    /// ## Panics
    ///
    /// Panics if `segments` is empty; invariant 3 requires at least one.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, segments: Vec<NodeID>) -> Self {
        assert!(!segments.is_empty(), "ValuePath must have at least one segment");
        Self { common: NodeCommon::new(id, location), segments, ty: None }
    }
}

impl ASTNode for ValuePath {
    fn kind(&self) -> NodeKind { NodeKind::Path }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.segments.clone() }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> { self.common.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.common.parent = Some(parent);
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl Typed for ValuePath {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "<value-path>") }
}

impl_visitable!(ValuePath, visit_value_path);

/// An `[index]` segment within a value path.
#[derive(Debug, Clone)]
pub struct IndexAccessor {
    common: NodeCommon,
    /// The index expression.
    pub index: NodeID,
    ty: Option<Type>,
}

impl IndexAccessor {
    /// Creates a new index accessor.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, index: NodeID) -> Self {
        Self { common: NodeCommon::new(id, location), index, ty: None }
    }
}

impl ASTNode for IndexAccessor {
    fn kind(&self) -> NodeKind { NodeKind::Path }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { vec![self.index] }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> { self.common.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.common.parent = Some(parent);
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl Typed for IndexAccessor {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for IndexAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "[<index>]") }
}

impl_visitable!(IndexAccessor, visit_index_accessor);

/// A call expression, standalone or as a value-path segment.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    common: NodeCommon,
    /// The called function's name, unresolved until the name lowerer runs.
    pub name: String,
    /// Argument expressions, in declaration order.
    pub arguments: Vec<NodeID>,
    ty: Option<Type>,
}

impl FunctionCall {
    /// Creates a new function call.
    #[must_use]
    pub fn new(
        id: NodeID,
        location: SourceLocation,
        name: impl Into<String>,
        arguments: Vec<NodeID>,
    ) -> Self {
        Self { common: NodeCommon::new(id, location), name: name.into(), arguments, ty: None }
    }
}

impl ASTNode for FunctionCall {
    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.arguments.clone() }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> { self.common.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.common.parent = Some(parent);
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl Typed for FunctionCall {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}(...)", self.name) }
}

impl_visitable!(FunctionCall, visit_function_call);

/// A binary expression: arithmetic, comparison, or logical.
#[derive(Debug, Clone)]
pub struct Expression {
    common: NodeCommon,
    /// The operator's source text, e.g. `"+:"`, `"=="`, `"&&"`.
    pub operator: String,
    /// Left-hand operand.
    pub left: NodeID,
    /// Right-hand operand.
    pub right: NodeID,
    ty: Option<Type>,
}

impl Expression {
    /// Creates a new binary expression.
    #[must_use]
    pub fn new(
        id: NodeID,
        location: SourceLocation,
        operator: impl Into<String>,
        left: NodeID,
        right: NodeID,
    ) -> Self {
        Self { common: NodeCommon::new(id, location), operator: operator.into(), left, right, ty: None }
    }
}

impl ASTNode for Expression {
    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { vec![self.left, self.right] }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> { self.common.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.common.parent = Some(parent);
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl Typed for Expression {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<expr {}>", self.operator)
    }
}

impl_visitable!(Expression, visit_expression);

/// A unary operation: `+:`, `-:`, `!`, and similar prefix forms.
#[derive(Debug, Clone)]
pub struct UnaryExpression {
    common: NodeCommon,
    /// The operator's source text.
    pub operator: String,
    /// The operand.
    pub operand: NodeID,
    ty: Option<Type>,
}

impl UnaryExpression {
    /// Creates a new unary expression.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, operator: impl Into<String>, operand: NodeID) -> Self {
        Self { common: NodeCommon::new(id, location), operator: operator.into(), operand, ty: None }
    }
}

impl ASTNode for UnaryExpression {
    fn kind(&self) -> NodeKind { NodeKind::Expression }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { vec![self.operand] }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> { self.common.parent }

    fn with_parent(mut self, parent: NodeID) -> Self {
        self.common.parent = Some(parent);
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl Typed for UnaryExpression {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for UnaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<unary {}>", self.operator)
    }
}

impl_visitable!(UnaryExpression, visit_unary_expression);
