//! Declarative macros for reducing boilerplate in AST node implementations.
//!
//! This module contains macros that generate repetitive trait implementations
//! for the `AnyNode` enum and related types. These macros significantly reduce
//! code duplication and make it easier to add new node types.
//!
//! ## Design Philosophy
//!
//! Rather than manually writing a match arm per trait per node kind, we use a
//! master list of node variants and generate all implementations from it.
//!
//! - **Single Source of Truth**: all node variants are defined in one place
//! - **Type Safety**: the compiler ensures all variants are handled
//! - **Maintainability**: adding a node type means updating only the master list

/// Master list of all AST node variants.
///
/// Each line follows `EnumVariant(Type) => visitor_method_name,`. Adding a
/// node kind means: add its struct, add a line here, recompile.
#[macro_export]
macro_rules! for_each_node_variant {
    ($callback:ident) => {
        $callback! {
            Assignment(Assignment) => visit_assignment,
            BoolLiteral(BoolLiteral) => visit_bool_literal,
            ClassDecl(ClassDecl) => visit_class_decl,
            Enum(Enum) => visit_enum,
            Expression(Expression) => visit_expression,
            FlowControl(FlowControl) => visit_flow_control,
            FunctionCall(FunctionCall) => visit_function_call,
            FunctionDecl(FunctionDecl) => visit_function_decl,
            IndexAccessor(IndexAccessor) => visit_index_accessor,
            Instruction(Instruction) => visit_instruction,
            NumberLiteral(NumberLiteral) => visit_number_literal,
            ObjectDefinition(ObjectDefinition) => visit_object_definition,
            PropertyName(PropertyName) => visit_property_name,
            RootNode(RootNode) => visit_root_node,
            Rule(Rule) => visit_rule,
            Selector(Selector) => visit_selector,
            StringLiteral(StringLiteral) => visit_string_literal,
            UnaryExpression(UnaryExpression) => visit_unary_expression,
            ValuePath(ValuePath) => visit_value_path,
            VarDecl(VarDecl) => visit_var_decl,
            VarName(VarName) => visit_var_name,
        }
    };
}

/// Generates the `ASTNode` trait implementation for `AnyNode`.
#[macro_export]
macro_rules! impl_astnode_for_anynode {
    ($($variant:ident($type:ty) => $visit:ident),* $(,)?) => {
        impl $crate::nodes::ASTNode for $crate::nodes::AnyNode {
            fn id(&self) -> $crate::nodes::NodeID {
                match self {
                    $(Self::$variant(node) => node.id(),)*
                }
            }

            fn with_id(self, id: $crate::nodes::NodeID) -> Self {
                match self {
                    $(Self::$variant(node) => Self::$variant(node.with_id(id)),)*
                }
            }

            fn parent(&self) -> Option<$crate::nodes::NodeID> {
                match self {
                    $(Self::$variant(node) => node.parent(),)*
                }
            }

            fn with_parent(self, parent: $crate::nodes::NodeID) -> Self {
                match self {
                    $(Self::$variant(node) => Self::$variant(node.with_parent(parent)),)*
                }
            }

            fn kind(&self) -> $crate::nodes::NodeKind {
                match self {
                    $(Self::$variant(node) => node.kind(),)*
                }
            }

            fn location(&self) -> &elle_source::types::SourceLocation {
                match self {
                    $(Self::$variant(node) => node.location(),)*
                }
            }

            fn children(&self) -> Vec<$crate::nodes::NodeID> {
                match self {
                    $(Self::$variant(node) => node.children(),)*
                }
            }

            fn is_hidden(&self) -> bool {
                match self {
                    $(Self::$variant(node) => node.is_hidden(),)*
                }
            }
        }
    };
}

/// Generates the `Visitable` trait implementation for `AnyNode`.
#[macro_export]
macro_rules! impl_visitable_for_anynode {
    ($($variant:ident($type:ty) => $visit:ident),* $(,)?) => {
        impl $crate::visitor::Visitable for $crate::nodes::AnyNode {
            fn accept<T>(
                &self,
                visitor: &mut dyn $crate::visitor::Visitor<T>,
                node_id: $crate::nodes::NodeID,
            ) -> $crate::visitor::VisitorResult<T> {
                match self {
                    $(Self::$variant(_) => visitor.$visit(node_id),)*
                }
            }

            fn accept_mut<T>(
                &self,
                visitor: &mut dyn $crate::visitor::MutVisitor<T>,
                node_id: $crate::nodes::NodeID,
            ) -> $crate::visitor::VisitorResult<T> {
                match self {
                    $(Self::$variant(_) => visitor.$visit(node_id),)*
                }
            }
        }
    };
}

/// Generates a `Visitable` implementation for one concrete node type.
#[macro_export]
macro_rules! impl_visitable {
    ($type:ty, $method:ident) => {
        impl $crate::visitor::Visitable for $type {
            fn accept<T>(
                &self,
                visitor: &mut dyn $crate::visitor::Visitor<T>,
                node_id: $crate::nodes::NodeID,
            ) -> $crate::visitor::VisitorResult<T> {
                visitor.$method(node_id)
            }

            fn accept_mut<T>(
                &self,
                visitor: &mut dyn $crate::visitor::MutVisitor<T>,
                node_id: $crate::nodes::NodeID,
            ) -> $crate::visitor::VisitorResult<T> {
                visitor.$method(node_id)
            }
        }
    };
}

/// Generates the `Display` implementation for `AnyNode`, delegating to each
/// variant's own `Display`.
#[macro_export]
macro_rules! impl_display_for_anynode {
    ($($variant:ident($type:ty) => $visit:ident),* $(,)?) => {
        impl std::fmt::Display for $crate::nodes::AnyNode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant(node) => node.fmt(f),)*
                }
            }
        }
    };
}

/// Generates the `get_as<T>()` accessor on `AnyNode` via a type-name check
/// and a pointer cast, avoiding a manual match arm per type at every call
/// site that needs a concrete node back.
///
/// ## Safety
///
/// The cast only fires once `type_name::<T>()` has been checked equal to the
/// variant's own concrete type, so `T` and the variant's payload type are the
/// same type and the reinterpret cast is a no-op at the bit level.
#[macro_export]
macro_rules! impl_get_as_for_anynode {
    ($($variant:ident($type:ty) => $visit:ident),* $(,)?) => {
        impl $crate::nodes::AnyNode {
            /// Gets a strongly-typed reference to the inner node data.
            ///
            /// ## Errors
            ///
            /// Returns an error message if the variant doesn't match `T`.
            #[allow(unsafe_code, clippy::undocumented_unsafe_blocks)]
            pub fn get_as<T: 'static>(&self) -> Result<&T, String> {
                let expected_type = std::any::type_name::<T>();

                match self {
                    $(
                        Self::$variant(inner) if std::any::type_name::<$type>() == expected_type => {
                            // SAFETY: see macro doc comment above.
                            Ok(unsafe { &*std::ptr::from_ref::<$type>(inner).cast::<T>() })
                        }
                    )*
                    _ => Err(format!("type mismatch: expected {expected_type}, got {:?}", self.kind())),
                }
            }
        }
    };
}
