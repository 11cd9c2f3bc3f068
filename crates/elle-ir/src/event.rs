//! The typed event stream `IrParser` pushes into a [`crate::Receiver`].

use elle_source::types::SourceLocation;

/// One node kind the parser can announce the start/end of, or a leaf datum.
///
/// This covers the structural skeleton named in `spec.md` §4.3 (function
/// header, argument list, function body, basic block, the instruction set)
/// plus a representative attribute/type/metadata subset. It does not reach
/// literally every production LLVM assembly supports — unrecognized but
/// well-formed input still round-trips as [`EventKind::Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// The top of a parsed module.
    Module,
    /// A `define`d function, with a body.
    FunctionDefinition,
    /// A `declare`d function, with no body.
    FunctionDeclaration,
    /// A function's formal argument list.
    ArgumentList,
    /// A single formal argument.
    Argument,
    /// A function's body: an ordered sequence of basic blocks.
    FunctionBody,
    /// A single basic block, optionally named.
    BasicBlock,
    /// A type annotation (`i32`, `float`, `%Struct`, `[4 x i8]`, `i8*`, …).
    Type,
    /// A global variable or constant definition.
    GlobalDefinition,
    /// A named type definition (`%Struct = type { ... }`).
    TypeDefinition,
    /// An attribute group (`attributes #0 = { ... }`).
    AttributeGroup,
    /// A single parameter or function attribute (`zeroext`, `noalias`, …).
    Attribute,
    /// A metadata node reference (`!dbg`, `!0`).
    Metadata,

    // Instructions (one event per instruction line).
    /// `ret`.
    Ret,
    /// `br`.
    Br,
    /// `switch`.
    Switch,
    /// An integer binary operator (`add`, `sub`, `mul`, `udiv`, …).
    IntBinOp,
    /// A floating-point binary operator (`fadd`, `fsub`, `fmul`, …).
    FloatBinOp,
    /// A bitwise operator (`and`, `or`, `xor`, `shl`, `lshr`, `ashr`).
    BitwiseOp,
    /// `icmp`.
    IntCompare,
    /// `fcmp`.
    FloatCompare,
    /// `phi`.
    Phi,
    /// `call`.
    Call,
    /// `alloca`.
    Alloca,
    /// `load`.
    Load,
    /// `store`.
    Store,
    /// `getelementptr`.
    GetElementPtr,
    /// A conversion operator (`trunc`, `zext`, `sext`, `bitcast`, …).
    Conversion,
    /// `select`.
    Select,
    /// `extractvalue`/`insertvalue`.
    AggregateOp,
    /// `unreachable`.
    Unreachable,

    /// A value operand (register reference, constant, or global).
    Operand,
    /// A raw token with no structural meaning assigned above.
    Token,
}

/// A single event: the kind, a payload (if the kind carries a leaf datum),
/// and the source range it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// What kind of node or leaf this is.
    pub kind: EventKind,
    /// The raw text this event was derived from.
    pub text: String,
    /// Where in the source this event occurred.
    pub location: SourceLocation,
}

impl Event {
    /// Builds a new event.
    #[must_use]
    pub fn new(kind: EventKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self { kind, text: text.into(), location }
    }
}
