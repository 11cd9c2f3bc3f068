//! Control-flow, rule, and preprocessor-instruction nodes.

use std::fmt;

use elle_source::types::SourceLocation;

use crate::{
    impl_visitable,
    nodes::{ASTNode, NodeCommon, NodeID, NodeKind, Typed},
    types::Type,
};

/// The kind of a [`FlowControl`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControlKind {
    /// `if (cond) { ... }`.
    If,
    /// The `else` branch of an `if`.
    Else,
    /// `for (subject) { ... }`, pre-lowering: one argument (`subject`).
    /// Post-lowering: three arguments (`init`, `condition`, `step`).
    For,
    /// `while (cond) { ... }`.
    While,
    /// `switch (subject) { case ...: ... }`.
    Switch,
    /// One `case` arm of a `switch`.
    Case,
    /// `return [value]`.
    Return,
    /// `repeat (count) { ... }`.
    Repeat,
    /// `finally { ... }`.
    Finally,
}

/// An `if`/`else`/`for`/`while`/`switch`/`return`/... control construct.
#[derive(Debug, Clone)]
pub struct FlowControl {
    common: NodeCommon,
    /// Which construct this is.
    pub flow_kind: FlowControlKind,
    /// The construct's arguments, e.g. a condition expression, or, for a
    /// lowered `for`, the `(init, condition, step)` triple.
    pub arguments: Vec<NodeID>,
    /// The body's statements, in source order.
    pub body: Vec<NodeID>,
    ty: Option<Type>,
}

impl FlowControl {
    /// Creates a new flow-control node with no arguments or body.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, flow_kind: FlowControlKind) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            flow_kind,
            arguments: Vec::new(),
            body: Vec::new(),
            ty: None,
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
}

impl ASTNode for FlowControl {
    fn kind(&self) -> NodeKind { NodeKind::FlowControl }

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

impl Typed for FlowControl {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:?}", self.flow_kind) }
}

impl_visitable!(FlowControl, visit_flow_control);

/// A CSS-like selector chain plus body block.
#[derive(Debug, Clone)]
pub struct Rule {
    common: NodeCommon,
    /// The selector chain this rule matches, in order.
    pub selector_chain: Vec<NodeID>,
    ty: Option<Type>,
    /// Value bindings directly inside this rule's body (`Assignment`s).
    pub values: Vec<NodeID>,
    /// Nested rules.
    pub child_rules: Vec<NodeID>,
    /// The rule's driving preprocessor instruction, if any (typically
    /// `#new`).
    pub instruction: Option<NodeID>,
}

impl Rule {
    /// Creates a new rule with an empty body.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, selector_chain: Vec<NodeID>) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            selector_chain,
            ty: None,
            values: Vec::new(),
            child_rules: Vec::new(),
            instruction: None,
        }
    }

    /// Builder-style setter for this rule's value bindings.
    #[must_use]
    pub fn with_values(mut self, values: Vec<NodeID>) -> Self {
        self.values = values;
        self
    }

    /// Builder-style setter for this rule's child rules.
    #[must_use]
    pub fn with_child_rules(mut self, child_rules: Vec<NodeID>) -> Self {
        self.child_rules = child_rules;
        self
    }

    /// Builder-style setter for this rule's driving instruction.
    #[must_use]
    pub const fn with_instruction(mut self, instruction: NodeID) -> Self {
        self.instruction = Some(instruction);
        self
    }

    /// This rule's first selector segment, used as the DOM element name.
    #[must_use]
    pub fn first_selector(&self) -> Option<NodeID> { self.selector_chain.first().copied() }
}

impl ASTNode for Rule {
    fn kind(&self) -> NodeKind { NodeKind::Rule }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> {
        self.selector_chain
            .iter()
            .chain(self.values.iter())
            .chain(self.child_rules.iter())
            .chain(self.instruction.iter())
            .copied()
            .collect()
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

impl Typed for Rule {
    fn get_type(&self) -> Option<&Type> { self.ty.as_ref() }

    fn set_type(&mut self, ty: Type) { self.ty = Some(ty); }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "<rule>") }
}

impl_visitable!(Rule, visit_rule);

/// The kind of a preprocessor [`Instruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    /// `#needs <path>` — symbol-only import.
    Needs,
    /// `#import <path>` — full import.
    Import,
    /// `#if <name>` — conditional on a translation-unit constant.
    If,
    /// `#snippet <name> { ... }` — defines a textual macro.
    Snippet,
    /// `#paste <name>` — expands a previously defined snippet.
    Paste,
    /// `#arg <name>` — replaced with a caller-supplied literal.
    Arg,
    /// `#getConfig(<key>)` — replaced with a configuration value.
    GetConfig,
    /// `#new [count]` — drives DOM element creation for its owning rule.
    New,
    /// `#color <literal>` — lowered to a `color` object definition.
    Color,
}

/// A preprocessor instruction.
#[derive(Debug, Clone)]
pub struct Instruction {
    common: NodeCommon,
    /// Which instruction this is.
    pub instruction_kind: InstructionKind,
    /// The instruction's name argument, e.g. an import path or a snippet
    /// name.
    pub name: Option<String>,
    /// The instruction's expression argument, e.g. `#new`'s repeat count or
    /// `#getConfig`'s key.
    pub argument: Option<NodeID>,
    /// Whether this instruction should emit a pretty-print banner while the
    /// pass manager runs in verbose mode.
    pub verbose: bool,
}

impl Instruction {
    /// Creates a new instruction with no name or argument.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation, instruction_kind: InstructionKind) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            instruction_kind,
            name: None,
            argument: None,
            verbose: false,
        }
    }

    /// Builder-style setter for the name argument.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style setter for the expression argument.
    #[must_use]
    pub const fn with_argument(mut self, argument: NodeID) -> Self {
        self.argument = Some(argument);
        self
    }
}

impl ASTNode for Instruction {
    fn kind(&self) -> NodeKind { NodeKind::Instruction }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.argument.into_iter().collect() }

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

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.instruction_kind)
    }
}

impl_visitable!(Instruction, visit_instruction);
