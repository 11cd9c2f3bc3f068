//! Pass 4: resolves `#needs`/`#import`, evaluates `#if`, and expands
//! `#snippet`/`#paste`.
//!
//! Cross-translation-unit recursion (loading a sibling file and running the
//! full pipeline over it) is the driving compiler's job, not this pass's:
//! the preprocessor depends on an [`ImportResolver`] that the driver
//! implements, matching Design Note 5 ("explicit state on the unit object
//! with two maps").

use std::path::{Path, PathBuf};

use elle_ast::ast::AST;
use elle_ast::nodes::{ASTNode, AnyNode, InstructionKind, NodeID, NodeKind};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{FailureCategory, PassError};
use crate::manager::Pass;

/// Which directive triggered an import: `#needs` only pulls symbols in,
/// `#import` pulls a full (non-exported) copy of the unit's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportMode {
    /// `#needs <path>`.
    Needs,
    /// `#import <path>`.
    Import,
}

/// Resolves a sibling translation unit by path, recursing the pipeline over
/// it and returning the root of its (already-processed) tree grafted into
/// the caller's arena.
pub trait ImportResolver {
    /// Resolves `path` under `mode`, returning the imported subtree's root.
    ///
    /// ## Errors
    ///
    /// Returns a message on read or compile failure.
    fn resolve(&mut self, ast: &mut AST, path: &Path, mode: ImportMode) -> Result<NodeID, String>;
}

/// Resolves `#needs`/`#import`/`#if`/`#snippet`/`#paste` instructions.
pub struct Preprocessor<R> {
    resolver: R,
    /// Current translation-unit constants, consulted by `#if`.
    constants: FxHashMap<String, bool>,
    needs_memo: FxHashMap<PathBuf, NodeID>,
    import_memo: FxHashMap<PathBuf, NodeID>,
    /// Snippet bodies registered by name; only single-node bodies can be
    /// spliced back in by `#paste` (see `splice_paste`'s doc comment).
    snippets: FxHashMap<String, NodeID>,
    build_files: FxHashSet<PathBuf>,
    resources: Vec<String>,
    errors: Vec<PassError>,
}

impl<R: ImportResolver> Preprocessor<R> {
    /// Creates a new preprocessor with the given constants and resolver.
    #[must_use]
    pub fn new(resolver: R, constants: FxHashMap<String, bool>) -> Self {
        Self {
            resolver,
            constants,
            needs_memo: FxHashMap::default(),
            import_memo: FxHashMap::default(),
            snippets: FxHashMap::default(),
            build_files: FxHashSet::default(),
            resources: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// The deduplicated set of files this translation unit requires to build.
    #[must_use]
    pub fn build_files(&self) -> Vec<PathBuf> { self.build_files.iter().cloned().collect() }

    /// Resource paths discovered through `is_resource`-marked fields feeding
    /// into an import. Populated by the resource gatherer pass; kept here
    /// too so a driver can inspect import-time resources before that pass runs.
    #[must_use]
    pub fn resources(&self) -> &[String] { &self.resources }

    fn handle_import(&mut self, ast: &mut AST, id: NodeID, mode: ImportMode, path: &str, location: &elle_source::types::SourceLocation) {
        let path_buf = PathBuf::from(path);
        let memo = match mode {
            ImportMode::Needs => &mut self.needs_memo,
            ImportMode::Import => &mut self.import_memo,
        };

        if memo.contains_key(&path_buf) {
            // Already resolved: the directive becomes a no-op but still
            // contributes symbols (Design: memoized per (path, mode)).
            if let Some(node) = ast.get_node_mut(id) {
                if let AnyNode::Instruction(instruction) = &mut node.data {
                    instruction.verbose = false;
                }
            }
            return;
        }

        match self.resolver.resolve(ast, &path_buf, mode) {
            Ok(imported_root) => {
                let _ = self.build_files.insert(path_buf.clone());
                let memo = match mode {
                    ImportMode::Needs => &mut self.needs_memo,
                    ImportMode::Import => &mut self.import_memo,
                };
                let _ = memo.insert(path_buf, imported_root);
            }
            Err(message) => self.errors.push(PassError::new(message, location, FailureCategory::Io)),
        }
    }

    /// Splices a registered snippet's body in place of a `#paste` instruction.
    ///
    /// Only single-node snippet bodies are supported: most `#snippet`
    /// definitions in this domain bind a single value expression, and
    /// splicing a multi-statement body into an arbitrary parent's ordered
    /// child list generically (across every container node kind) isn't
    /// attempted here.
    fn splice_paste(&mut self, ast: &mut AST, id: NodeID, name: &str, location: &elle_source::types::SourceLocation) {
        let Some(&snippet_root) = self.snippets.get(name) else {
            self.errors.push(PassError::new(
                format!("#paste references unknown snippet '{name}'"),
                location,
                FailureCategory::Resolution,
            ));
            return;
        };

        let Some(parent) = ast.get_node(id).and_then(|node| node.data.parent()) else { return };
        let Some(node) = ast.get_node(snippet_root) else { return };
        let kind = node.kind;
        // Clones must carry no back-link into the original tree
        // (invariant 5): `with_parent` below points it at the paste site's
        // parent instead of the snippet definition's.
        let data = node.data.clone().with_parent(parent);
        let _ = ast.alloc_node(kind, data);
        let _ = ast.remove(id);
    }
}

impl<R: ImportResolver> Pass for Preprocessor<R> {
    fn name(&self) -> &'static str { "preprocessor" }

    fn initialize(&mut self, _ast: &mut AST) { self.errors.clear(); }

    fn perform_visit(&mut self, ast: &mut AST, root: NodeID) {
        let instruction_ids = ast.find_nodes_of_kind(root, NodeKind::Instruction);

        for id in &instruction_ids {
            let Some(node) = ast.get_node(*id) else { continue };
            let AnyNode::Instruction(instruction) = &node.data else { continue };
            if instruction.instruction_kind != InstructionKind::Snippet {
                continue;
            }
            if let (Some(name), Some(body)) = (instruction.name.clone(), instruction.argument) {
                let _ = self.snippets.insert(name, body);
            }
        }

        for id in instruction_ids {
            let Some(node) = ast.get_node(id) else { continue };
            let AnyNode::Instruction(instruction) = &node.data else { continue };
            let kind = instruction.instruction_kind;
            let name = instruction.name.clone();
            let location = instruction.location().clone();

            match kind {
                InstructionKind::Needs => {
                    if let Some(path) = name {
                        self.handle_import(ast, id, ImportMode::Needs, &path, &location);
                    }
                }
                InstructionKind::Import => {
                    if let Some(path) = name {
                        self.handle_import(ast, id, ImportMode::Import, &path, &location);
                    }
                }
                InstructionKind::If => {
                    let Some(constant_name) = name else { continue };
                    let satisfied = self.constants.get(&constant_name).copied().unwrap_or(false);
                    if !satisfied {
                        let _ = ast.remove(id);
                    }
                }
                InstructionKind::Paste => {
                    if let Some(snippet_name) = name {
                        self.splice_paste(ast, id, &snippet_name, &location);
                    }
                }
                InstructionKind::Snippet
                | InstructionKind::Arg
                | InstructionKind::GetConfig
                | InstructionKind::New
                | InstructionKind::Color => {}
            }
        }
    }

    fn errors(&self) -> &[PassError] { &self.errors }

    fn is_terminal_on_error(&self) -> bool { true }
}
