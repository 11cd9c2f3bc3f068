//! Leaf literal and identifier nodes.

use std::fmt;

use elle_source::types::SourceLocation;

use crate::{
    impl_visitable,
    nodes::{ASTNode, NodeCommon, NodeID, NodeKind, Typed},
    types::Type,
};

/// A numeric literal, kept in its original lexical form so re-printing and
/// the constant folder can agree on representation.
#[derive(Debug, Clone)]
pub struct NumberLiteral {
    common: NodeCommon,
    /// The literal's source text, e.g. `"42"` or `"3.14"`.
    pub value: String,
    ty: Option<Type>,
}

impl NumberLiteral {
    /// Creates a new number literal.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, value: impl Into<String>) -> Self {
        Self { common: NodeCommon::new(id, location), value: value.into(), ty: None }
    }

    /// Builder-style setter for the resolved type.
    #[must_use]
    pub fn with_type(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }
}

impl ASTNode for NumberLiteral {
    fn kind(&self) -> NodeKind { NodeKind::Literal }

    fn location(&self) -> &SourceLocation { &self.common.location }

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

impl Typed for NumberLiteral {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.value) }
}

impl_visitable!(NumberLiteral, visit_number_literal);

/// A `true` / `false` literal.
///
/// Supplements the original node set: the original tracks booleans as their
/// own leaf (`LILBoolLiteral`) rather than folding them into number
/// literals, and the constant folder and type guesser both special-case it.
#[derive(Debug, Clone)]
pub struct BoolLiteral {
    common: NodeCommon,
    /// The literal's value.
    pub value: bool,
    ty: Option<Type>,
}

impl BoolLiteral {
    /// Creates a new boolean literal.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, value: bool) -> Self {
        Self { common: NodeCommon::new(id, location), value, ty: None }
    }
}

impl ASTNode for BoolLiteral {
    fn kind(&self) -> NodeKind { NodeKind::Literal }

    fn location(&self) -> &SourceLocation { &self.common.location }

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

impl Typed for BoolLiteral {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for BoolLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.value) }
}

impl_visitable!(BoolLiteral, visit_bool_literal);

/// A string literal, possibly interpolated (`"hello #{name}"`).
///
/// Interpolated literals carry their embedded value paths as children; the
/// string-function lowerer rewrites them into concatenation expressions and
/// clears `is_interpolated`.
#[derive(Debug, Clone)]
pub struct StringLiteral {
    common: NodeCommon,
    /// The literal's raw source text, delimiters stripped.
    pub value: String,
    /// Whether this literal contains `#{...}` interpolation segments.
    pub is_interpolated: bool,
    /// Value paths embedded in interpolation segments, in order.
    pub interpolated_parts: Vec<NodeID>,
    ty: Option<Type>,
}

impl StringLiteral {
    /// Creates a new, non-interpolated string literal.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, value: impl Into<String>) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            value: value.into(),
            is_interpolated: false,
            interpolated_parts: Vec::new(),
            ty: None,
        }
    }

    /// Builder-style setter marking this literal as interpolated with the
    /// given embedded value paths.
    #[must_use]
    pub fn with_interpolation(mut self, parts: Vec<NodeID>) -> Self {
        self.is_interpolated = true;
        self.interpolated_parts = parts;
        self
    }
}

impl ASTNode for StringLiteral {
    fn kind(&self) -> NodeKind { NodeKind::Literal }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.interpolated_parts.clone() }

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

impl Typed for StringLiteral {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "\"{}\"", self.value) }
}

impl_visitable!(StringLiteral, visit_string_literal);

/// A bare property name, e.g. an enum entry before the enum lowerer runs, or
/// one segment of a value path.
#[derive(Debug, Clone)]
pub struct PropertyName {
    common: NodeCommon,
    /// The property's name.
    pub name: String,
    ty: Option<Type>,
}

impl PropertyName {
    /// Creates a new property name node.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, name: impl Into<String>) -> Self {
        Self { common: NodeCommon::new(id, location), name: name.into(), ty: None }
    }
}

impl ASTNode for PropertyName {
    fn kind(&self) -> NodeKind { NodeKind::Identifier }

    fn location(&self) -> &SourceLocation { &self.common.location }

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

impl Typed for PropertyName {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name) }
}

impl_visitable!(PropertyName, visit_property_name);

/// A variable reference, e.g. the head of a value path or a lone `@self`.
#[derive(Debug, Clone)]
pub struct VarName {
    common: NodeCommon,
    /// The variable's name, including a leading `@` if present in source.
    pub name: String,
    ty: Option<Type>,
}

impl VarName {
    /// Creates a new variable-name node.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, name: impl Into<String>) -> Self {
        Self { common: NodeCommon::new(id, location), name: name.into(), ty: None }
    }
}

impl ASTNode for VarName {
    fn kind(&self) -> NodeKind { NodeKind::Identifier }

    fn location(&self) -> &SourceLocation { &self.common.location }

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

impl Typed for VarName {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name) }
}

impl_visitable!(VarName, visit_var_name);

/// One segment of a rule's selector chain, e.g. a tag name, `.class`,
/// `#id`, `@self`, or a combinator (`>`, `+`).
#[derive(Debug, Clone)]
pub struct Selector {
    common: NodeCommon,
    /// The selector segment's source text.
    pub value: String,
}

impl Selector {
    /// Creates a new selector segment.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, value: impl Into<String>) -> Self {
        Self { common: NodeCommon::new(id, location), value: value.into() }
    }
}

impl ASTNode for Selector {
    fn kind(&self) -> NodeKind { NodeKind::Identifier }

    fn location(&self) -> &SourceLocation { &self.common.location }

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

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.value) }
}

impl_visitable!(Selector, visit_selector);
