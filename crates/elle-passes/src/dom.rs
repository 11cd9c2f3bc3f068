//! The static element tree built by the [`crate::passes::dom_builder`] pass.
//!
//! `spec.md` §4.4 describes this as realized in the driving compiler crate;
//! it lives here instead so the `dom_builder` pass (which must run as pass
//! 10, in order, alongside every other pass under `elle_passes::passes`)
//! can build it without `elle-passes` depending back on `elle-compiler`.
//! `elle-compiler` re-exports these types for its public API (see
//! `spec.md` §6's `PipelineOutput`).

use elle_ast::nodes::NodeID;

/// A single static element in the DOM tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The element's name, taken from its driving rule's first selector.
    pub name: String,
    /// The element's type name.
    pub element_type: String,
    /// A monotonically increasing id, unique within the tree.
    pub id: u64,
    /// The rule node that produced this element, if any (absent for the
    /// synthetic root).
    pub source_rule: Option<NodeID>,
    /// Child elements, in creation order.
    pub children: Vec<Element>,
}

impl Element {
    /// The synthetic root element: name `@root`, type `container`, id 0.
    #[must_use]
    pub fn root() -> Self {
        Self { name: "@root".to_string(), element_type: "container".to_string(), id: 0, source_rule: None, children: Vec::new() }
    }

    /// Total element count in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize { 1 + self.children.iter().map(Self::count).sum::<usize>() }
}

/// The immutable-after-build static element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dom {
    /// The synthetic root element.
    pub root: Element,
}

impl Dom {
    /// Creates a new, empty DOM with just the synthetic root.
    #[must_use]
    pub fn new() -> Self { Self { root: Element::root() } }

    /// Total element count, including the root.
    #[must_use]
    pub fn len(&self) -> usize { self.root.count() }

    /// Whether this DOM contains only the synthetic root.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.root.children.is_empty() }
}

impl Default for Dom {
    fn default() -> Self { Self::new() }
}
