//! The type algebra.
//!
//! Types are not arena nodes: they are a small closed algebra attached
//! directly to the AST nodes that carry a type annotation (see
//! [`crate::nodes::Typed`]). Keeping them out of the arena means cloning a
//! type (e.g. when specializing a class template, or stamping an enum's
//! values with the enum's underlying type) is a plain `Clone`, with no
//! arena allocation or parent rewiring involved.

use std::fmt;

/// A resolved or annotated type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A primitive type (`i8`..`i64`, `f32`, `f64`, `bool`, `str`, `label`, ...).
    Basic(BasicType),
    /// A named class, optionally parameterized (`Box(i64)`).
    Object(ObjectType),
    /// A pointer to another type.
    Pointer(Box<PointerType>),
    /// A fixed-length array of another type.
    StaticArray(Box<StaticArrayType>),
    /// A function signature.
    Function(Box<FunctionType>),
}

/// A primitive type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicType {
    /// The primitive's name, e.g. `"i64"`.
    pub name: String,
}

/// A named, possibly-parameterized class type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectType {
    /// The class name.
    pub name: String,
    /// Type parameters, non-empty only for unspecialized generic classes
    /// and the object definitions that instantiate them.
    pub param_types: Vec<Type>,
}

/// A pointer to another type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointerType {
    /// The pointee type.
    pub argument: Type,
}

/// A fixed-length array type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticArrayType {
    /// The element type.
    pub element: Type,
    /// The array length.
    pub length: u64,
}

/// A function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Argument types, in declaration order.
    pub arguments: Vec<Type>,
    /// Return type, absent for functions returning nothing.
    pub return_type: Option<Type>,
    /// Whether the last argument accepts a variable number of trailing values.
    pub is_variadic: bool,
}

/// Names treated as numeric primitives by the type algebra.
const NUMBER_TYPE_NAMES: &[&str] =
    &["i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128", "f32", "f64"];

impl Type {
    /// Shorthand for a named primitive type.
    #[must_use]
    pub fn basic(name: impl Into<String>) -> Self { Self::Basic(BasicType { name: name.into() }) }

    /// Shorthand for a named, unparameterized object type.
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(ObjectType { name: name.into(), param_types: Vec::new() })
    }

    /// Shorthand for a named object type with type parameters.
    #[must_use]
    pub fn object_with_params(name: impl Into<String>, param_types: Vec<Self>) -> Self {
        Self::Object(ObjectType { name: name.into(), param_types })
    }

    /// Shorthand for a pointer to `self`.
    #[must_use]
    pub fn pointer_to(self) -> Self { Self::Pointer(Box::new(PointerType { argument: self })) }

    /// Shorthand for a fixed-length array of `self`.
    #[must_use]
    pub fn array_of(self, length: u64) -> Self {
        Self::StaticArray(Box::new(StaticArrayType { element: self, length }))
    }

    /// Returns the bare name of this type, used for class-index lookups and
    /// diagnostics. Compound types (pointer, array, function) report a
    /// synthetic name derived from their structure.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Basic(b) => b.name.clone(),
            Self::Object(o) => o.name.clone(),
            Self::Pointer(p) => format!("{}*", p.argument.name()),
            Self::StaticArray(a) => format!("[{} x {}]", a.length, a.element.name()),
            Self::Function(f) => format!(
                "({}){}",
                f.arguments.iter().map(Self::name).collect::<Vec<_>>().join(","),
                f.return_type.as_ref().map_or_else(String::new, |r| format!("->{}", r.name())),
            ),
        }
    }

    /// Returns the type's parameters, for `ObjectType`; empty otherwise.
    #[must_use]
    pub fn param_types(&self) -> &[Self] {
        match self {
            Self::Object(o) => &o.param_types,
            _ => &[],
        }
    }

    /// True if this is a basic numeric type, per the for-lowerer's and
    /// constant-folder's `isNumberType` checks.
    #[must_use]
    pub fn is_number_type(&self) -> bool {
        matches!(self, Self::Basic(b) if NUMBER_TYPE_NAMES.contains(&b.name.as_str()))
    }

    /// True if this is an object type (the for-lowerer's second branch).
    #[must_use]
    pub const fn is_object_type(&self) -> bool { matches!(self, Self::Object(_)) }

    /// True if this is `bool`.
    #[must_use]
    pub fn is_bool_type(&self) -> bool { matches!(self, Self::Basic(b) if b.name == "bool") }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name()) }
}
