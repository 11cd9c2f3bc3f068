//! Declaration nodes: variables, classes, functions, enums, and object
//! literals.

use std::fmt;

use elle_source::types::SourceLocation;

use crate::{
    impl_visitable,
    nodes::{ASTNode, NodeCommon, NodeID, NodeKind, Typed},
    types::{ObjectType, Type},
};

/// A variable, field, or method-signature declaration.
///
/// Covers plain `var` declarations, class fields, and method signatures
/// (whose `ty` is a `Type::Function`); the flags distinguish the variants
/// the later passes care about.
#[derive(Debug, Clone)]
pub struct VarDecl {
    common: NodeCommon,
    /// The declared name.
    pub name: String,
    ty: Option<Type>,
    /// The initializer expression, if any.
    pub init_val: Option<NodeID>,
    /// Whether this was declared `const`.
    pub is_const: bool,
    /// Whether this is a `vvar` (gets a synthesized getter/setter pair).
    pub is_vvar: bool,
    /// Whether the resource gatherer should collect string literals
    /// assigned to this field.
    pub is_resource: bool,
    /// Whether this is a composition member searched by the path expander
    /// when a value path's segment isn't directly declared.
    pub is_expanded: bool,
    /// For method signatures, the return type (mirrors the function type's
    /// own return type for convenience at call sites).
    pub return_type: Option<Type>,
}

impl VarDecl {
    /// Creates a new variable declaration.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, name: impl Into<String>) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            name: name.into(),
            ty: None,
            init_val: None,
            is_const: false,
            is_vvar: false,
            is_resource: false,
            is_expanded: false,
            return_type: None,
        }
    }

    /// Builder-style setter for the initializer.
    #[must_use]
    pub const fn with_init_val(mut self, init_val: NodeID) -> Self {
        self.init_val = Some(init_val);
        self
    }

    /// Builder-style setter for `is_const`.
    #[must_use]
    pub const fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    /// Builder-style setter for `is_vvar`.
    #[must_use]
    pub const fn with_vvar(mut self, is_vvar: bool) -> Self {
        self.is_vvar = is_vvar;
        self
    }

    /// Builder-style setter for `is_resource`.
    #[must_use]
    pub const fn with_resource(mut self, is_resource: bool) -> Self {
        self.is_resource = is_resource;
        self
    }

    /// Builder-style setter for `is_expanded`.
    #[must_use]
    pub const fn with_expanded(mut self, is_expanded: bool) -> Self {
        self.is_expanded = is_expanded;
        self
    }
}

impl ASTNode for VarDecl {
    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.init_val.into_iter().collect() }

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

impl Typed for VarDecl {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "var {}", self.name) }
}

impl_visitable!(VarDecl, visit_var_decl);

/// A class declaration, generic or concrete.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    common: NodeCommon,
    /// This class's own type, parameterized for generic classes.
    pub object_type: ObjectType,
    /// The inherited base class's type, if any.
    pub inherit_type: Option<Type>,
    /// Whether this class forwards constructor arguments to its base.
    pub receives_inherits: bool,
    /// Field declarations, in source order (invariant 4: all `VarDecl`).
    pub fields: Vec<NodeID>,
    /// Method declarations, in source order (invariant 4: all `VarDecl`
    /// whose type is a `Type::Function`).
    pub methods: Vec<NodeID>,
    /// Whether this class is declared `extern` (no method bodies expected).
    pub is_extern: bool,
}

impl ClassDecl {
    /// Creates a new class declaration with no fields or methods.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, object_type: ObjectType) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            object_type,
            inherit_type: None,
            receives_inherits: false,
            fields: Vec::new(),
            methods: Vec::new(),
            is_extern: false,
        }
    }

    /// Builder-style setter for the base class.
    #[must_use]
    pub fn with_inherit_type(mut self, inherit_type: Type) -> Self {
        self.inherit_type = Some(inherit_type);
        self
    }

    /// Builder-style setter for this class's fields.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<NodeID>) -> Self {
        self.fields = fields;
        self
    }

    /// Builder-style setter for this class's methods.
    #[must_use]
    pub fn with_methods(mut self, methods: Vec<NodeID>) -> Self {
        self.methods = methods;
        self
    }

    /// The class's bare name, per the embedded `ObjectType`.
    #[must_use]
    pub fn name(&self) -> &str { &self.object_type.name }
}

impl ASTNode for ClassDecl {
    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> {
        self.fields.iter().chain(self.methods.iter()).copied().collect()
    }

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

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.object_type.name)
    }
}

impl_visitable!(ClassDecl, visit_class_decl);

/// A function or method declaration.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    common: NodeCommon,
    /// The declared name.
    pub name: String,
    /// Argument declarations, in source order.
    pub arguments: Vec<NodeID>,
    /// The body's top-level statements, in source order.
    pub body: Vec<NodeID>,
    /// The declared return type, absent for functions returning nothing.
    pub return_type: Option<Type>,
    /// Whether this is an `extern` declaration with no body.
    pub is_extern: bool,
}

impl FunctionDecl {
    /// Creates a new function declaration with no arguments or body.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, name: impl Into<String>) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            name: name.into(),
            arguments: Vec::new(),
            body: Vec::new(),
            return_type: None,
            is_extern: false,
        }
    }

    /// Builder-style setter for the argument list.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<NodeID>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Builder-style setter for the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<NodeID>) -> Self {
        self.body = body;
        self
    }

    /// Builder-style setter for the return type.
    #[must_use]
    pub fn with_return_type(mut self, return_type: Type) -> Self {
        self.return_type = Some(return_type);
        self
    }
}

impl ASTNode for FunctionDecl {
    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> {
        self.arguments.iter().chain(self.body.iter()).copied().collect()
    }

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

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}(...)", self.name)
    }
}

impl_visitable!(FunctionDecl, visit_function_decl);

/// An enum declaration.
///
/// Before the enum lowerer runs, `values` may contain bare `PropertyName`
/// entries; after it runs, invariant 6 holds: every value is an
/// `Assignment(PropertyName -> NumberLiteral)` with a unique numeric value.
#[derive(Debug, Clone)]
pub struct Enum {
    common: NodeCommon,
    /// The enum's name.
    pub name: String,
    /// The enum's underlying type, default `i64` until the type resolver
    /// runs.
    pub ty: Option<Type>,
    /// Entries, in source order: `PropertyName` before lowering,
    /// `Assignment` after.
    pub values: Vec<NodeID>,
}

impl Enum {
    /// Creates a new enum declaration.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, name: impl Into<String>) -> Self {
        Self { common: NodeCommon::new(id, location), name: name.into(), ty: None, values: Vec::new() }
    }

    /// Builder-style setter for the entry list.
    #[must_use]
    pub fn with_values(mut self, values: Vec<NodeID>) -> Self {
        self.values = values;
        self
    }
}

impl ASTNode for Enum {
    fn kind(&self) -> NodeKind { NodeKind::Declaration }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.values.clone() }

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

impl Typed for Enum {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for Enum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "enum {}", self.name) }
}

impl_visitable!(Enum, visit_enum);

/// An object literal: `Type { field: value, ... }`.
#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    common: NodeCommon,
    /// The constructed type; non-empty `param_types` mark a template
    /// specialization site.
    pub object_type: ObjectType,
    /// Field initializers, as `Assignment` nodes.
    ///
    /// After the objdef expander runs, every assignment's subject is a flat
    /// `PropertyName` (no multi-segment value paths).
    pub fields: Vec<NodeID>,
}

impl ObjectDefinition {
    /// Creates a new object definition with no field initializers.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, object_type: ObjectType) -> Self {
        Self { common: NodeCommon::new(id, location), object_type, fields: Vec::new() }
    }

    /// Builder-style setter for the field initializer list.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<NodeID>) -> Self {
        self.fields = fields;
        self
    }
}

impl ASTNode for ObjectDefinition {
    fn kind(&self) -> NodeKind { NodeKind::ObjectDefinition }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.fields.clone() }

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

impl fmt::Display for ObjectDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ ... }}", self.object_type.name)
    }
}

impl_visitable!(ObjectDefinition, visit_object_definition);
