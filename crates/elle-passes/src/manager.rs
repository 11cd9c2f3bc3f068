//! The linear pass orchestrator.

use elle_ast::ast::AST;
use elle_ast::nodes::NodeID;
use log::{debug, error, warn};

use crate::error::PassError;

/// A single transformation over the AST.
///
/// Passes run in a fixed order (`spec.md` §4.2); each may read and write the
/// tree. `initialize` resets any pass-local state (memo tables, counters)
/// ahead of `perform_visit`, mirroring the two-step lifecycle of the
/// original's `LILVisitor::initializeVisit`/`performVisit` pair.
pub trait Pass {
    /// A short, human-readable name used in verbose logging.
    fn name(&self) -> &'static str;

    /// Resets pass-local state ahead of a run.
    fn initialize(&mut self, ast: &mut AST);

    /// Runs the pass over the tree rooted at `root`.
    fn perform_visit(&mut self, ast: &mut AST, root: NodeID);

    /// Errors accumulated during the most recent `perform_visit`.
    fn errors(&self) -> &[PassError];

    /// Whether an error from this pass should halt the pipeline.
    ///
    /// Defaults to `true`: most passes assume a well-formed tree going in,
    /// so the default is conservative. The preprocessor is `true` per §4.2
    /// ("Failure is fatal"); most validators are `false` so that a single
    /// run surfaces every problem it can find.
    fn is_terminal_on_error(&self) -> bool { true }
}

/// Owns the ordered pass sequence and drives them to completion.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
    root: NodeID,
    /// Raw source text, kept for diagnostics that need to quote a line.
    source: String,
    verbose: bool,
    /// Errors accumulated across every pass that has run so far.
    diagnostics: Vec<PassError>,
}

impl PassManager {
    /// Creates a new manager for the given pass sequence and tree root.
    #[must_use]
    pub fn new(passes: Vec<Box<dyn Pass>>, root: NodeID, source: impl Into<String>) -> Self {
        Self { passes, root, source: source.into(), verbose: false, diagnostics: Vec::new() }
    }

    /// Enables verbose logging of each pass's name/position at `trace!`.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The raw source text this manager was constructed with.
    #[must_use]
    pub fn source(&self) -> &str { &self.source }

    /// All diagnostics accumulated so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[PassError] { &self.diagnostics }

    /// Runs every pass in order against `ast`, stopping early if a
    /// terminal-on-error pass reports a failure.
    ///
    /// ## Errors
    ///
    /// Returns the accumulated diagnostics if any pass reported an error.
    pub fn run(&mut self, ast: &mut AST) -> Result<(), Vec<PassError>> {
        for (position, pass) in self.passes.iter_mut().enumerate() {
            debug!("running pass {}/{}: {}", position + 1, self.passes.len(), pass.name());
            if self.verbose {
                log::trace!(
                    "tree before {}: {} live nodes",
                    pass.name(),
                    ast.node_count()
                );
            }

            pass.initialize(ast);
            pass.perform_visit(ast, self.root);

            let pass_errors = pass.errors();
            if !pass_errors.is_empty() {
                warn!("pass {} reported {} error(s)", pass.name(), pass_errors.len());
                self.diagnostics.extend(pass_errors.iter().cloned());

                if pass.is_terminal_on_error() {
                    error!("pass {} is terminal on error, stopping pipeline", pass.name());
                    return Err(self.diagnostics.clone());
                }
            }
        }

        if self.diagnostics.is_empty() { Ok(()) } else { Err(self.diagnostics.clone()) }
    }
}
