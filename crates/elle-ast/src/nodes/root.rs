//! The per-translation-unit root node.

use std::fmt;

use elle_source::types::SourceLocation;
use rustc_hash::FxHashMap;

use crate::{
    impl_visitable,
    nodes::{ASTNode, NodeCommon, NodeID, NodeKind},
};

/// The per-translation-unit container.
///
/// Holds the ordered top-level nodes plus two indexes used heavily by later
/// passes: classes by name (the class template lowerer's specialization
/// search, the path expander's member lookup) and the flat list of
/// top-level rules (the DOM builder's entry point).
#[derive(Debug, Clone)]
pub struct RootNode {
    common: NodeCommon,
    /// Top-level nodes, in source order.
    pub children: Vec<NodeID>,
    /// Classes indexed by name, kept in sync as the class template lowerer
    /// removes generics and inserts specializations.
    pub class_index: FxHashMap<String, NodeID>,
    /// Top-level rules, in source order.
    pub rules: Vec<NodeID>,
}

impl RootNode {
    /// Creates a new, empty root node.
    #[must_use]
    pub fn new(id: NodeID, location: SourceLocation) -> Self {
        Self {
            common: NodeCommon::new(id, location),
            children: Vec::new(),
            class_index: FxHashMap::default(),
            rules: Vec::new(),
        }
    }

    /// Builder-style setter for the top-level node list.
    #[must_use]
    pub fn with_children(mut self, children: Vec<NodeID>) -> Self {
        self.children = children;
        self
    }

    /// Registers a class in the name index, as run by the preprocessor for
    /// freshly-parsed classes and by the class template lowerer for
    /// specializations.
    pub fn register_class(&mut self, name: impl Into<String>, class_id: NodeID) {
        let _ = self.class_index.insert(name.into(), class_id);
    }

    /// Removes a class from the name index, as run by the class template
    /// lowerer once a generic's specializations have all been emitted.
    pub fn unregister_class(&mut self, name: &str) -> Option<NodeID> { self.class_index.remove(name) }
}

impl ASTNode for RootNode {
    fn kind(&self) -> NodeKind { NodeKind::Root }

    fn location(&self) -> &SourceLocation { &self.common.location }

    fn children(&self) -> Vec<NodeID> { self.children.clone() }

    fn id(&self) -> NodeID { self.common.id }

    fn with_id(mut self, id: NodeID) -> Self {
        self.common.id = id;
        self
    }

    fn parent(&self) -> Option<NodeID> {
        // A RootNode never has a parent (invariant 1 of §3).
        None
    }

    fn with_parent(self, _parent: NodeID) -> Self {
        // A RootNode never has a parent (invariant 1 of §3).
        self
    }

    fn is_hidden(&self) -> bool { self.common.hidden }
}

impl fmt::Display for RootNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<root: {} top-level nodes>", self.children.len())
    }
}

impl_visitable!(RootNode, visit_root_node);
