//! The pass-manager entry point used by the external CLI.

use std::path::{Path, PathBuf};

use elle_ast::ast::AST;
use elle_ast::nodes::NodeID;
use elle_passes::error::PassError;
use elle_passes::manager::{Pass, PassManager};
use elle_passes::passes::{
    ArgumentResolver, ArgumentValue, AstValidator, ClassTemplateLowerer, ColorMaker, ConfigGetter, Configuration, ConstantFolder,
    ConversionInserter, DomBuilder, EnumLowerer, FieldSorter, ForLowerer, ImportMode, ImportResolver, MethodInserter, NameLowerer,
    ObjDefExpander, ParameterSorter, PathExpander, Preprocessor, Resource, ResourceGatherer, StringFunctionLowerer, StructureLowerer,
    TypeGuesser, TypeResolver, TypeValidator,
};
use rustc_hash::FxHashMap;

use crate::dom::Dom;
use crate::unit::TranslationUnit;

/// Parses a translation unit's source text directly into the shared arena.
///
/// This is the parser/AST-builder boundary (`spec.md` §6): the core never
/// reads raw source itself. Implementations allocate nodes into `ast` via
/// its `alloc_node`/`set_parent` API and return the new unit's root.
///
/// ## Errors
///
/// Returns a message on a syntax or I/O error.
pub trait TranslationUnitParser {
    /// Parses `unit` into `ast`, returning the parsed unit's root node.
    fn parse(&mut self, ast: &mut AST, unit: &TranslationUnit) -> Result<NodeID, String>;
}

/// A build-required file discovered by the preprocessor, paired with
/// whether the instruction that pulled it in was marked verbose.
#[derive(Debug, Clone)]
pub struct BuildFile {
    /// The resolved path.
    pub path: PathBuf,
    /// Whether the importing instruction requested verbose tracing.
    pub verbose_flag: bool,
}

/// Everything the external IR emitter needs after the pipeline succeeds.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The transformed tree's root.
    pub root: NodeID,
    /// Files this unit requires to build, deduplicated.
    pub build_files: Vec<BuildFile>,
    /// Resource paths collected by the resource gatherer.
    pub resources: Vec<String>,
    /// The static element tree built by the DOM builder pass.
    pub dom: Dom,
}

/// Resolves `#needs`/`#import` by recursing the driver's pipeline over a
/// sibling file, synchronously and depth-first (`spec.md` §5).
struct RecursiveResolver<'a, P> {
    parser: &'a mut P,
    base: &'a TranslationUnit,
}

impl<P: TranslationUnitParser> ImportResolver for RecursiveResolver<'_, P> {
    fn resolve(&mut self, ast: &mut AST, path: &Path, mode: ImportMode) -> Result<NodeID, String> {
        let resolved = resolve_import_path(self.base, path);
        let source = std::fs::read_to_string(&resolved).map_err(|err| format!("{}: {err}", resolved.display()))?;

        let mut child = self.base.clone();
        child.source = source;
        child.file = resolved.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        child.dir = resolved.parent().map(|p| p.display().to_string()).unwrap_or_default();
        child.is_main = false;
        child.is_being_imported_with_needs = mode == ImportMode::Needs;
        child.is_being_imported_with_import = mode == ImportMode::Import;

        self.parser.parse(ast, &child)
    }
}

fn resolve_import_path(unit: &TranslationUnit, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let candidate = Path::new(&unit.dir).join(path);
    if candidate.exists() {
        return candidate;
    }
    let mut named = path.to_path_buf();
    if !unit.suffix.is_empty() && named.extension().is_none() {
        named.set_extension(unit.suffix.trim_start_matches('.'));
    }
    Path::new(&unit.dir).join(named)
}

fn argument_map(unit: &TranslationUnit) -> FxHashMap<String, ArgumentValue> {
    unit.arguments.iter().map(|name| (name.clone(), ArgumentValue::Bool(true))).collect()
}

fn constants_map(unit: &TranslationUnit) -> FxHashMap<String, bool> {
    unit.constants.iter().map(|name| (name.clone(), true)).collect()
}

/// Orchestrates parsing, the 23-pass pipeline, and the external-facing
/// output types for a single translation unit.
pub struct Driver<C> {
    config: C,
}

impl<C: Configuration + Clone> Driver<C> {
    /// Creates a driver bound to the given configuration source.
    #[must_use]
    pub fn new(config: C) -> Self { Self { config } }

    /// Parses `unit` and runs the full pass pipeline over it.
    ///
    /// ## Errors
    ///
    /// Returns the accumulated diagnostics if parsing or any terminal pass
    /// fails.
    pub fn run(&mut self, unit: &TranslationUnit, parser: &mut impl TranslationUnitParser) -> Result<PipelineOutput, Vec<PassError>> {
        let mut ast = AST::new();
        let root = parser.parse(&mut ast, unit).map_err(|message| {
            vec![PassError::new(message, &elle_source::types::SourceLocation::start_of_file(&unit.file), elle_passes::error::FailureCategory::Io)]
        })?;

        let resolver = RecursiveResolver { parser, base: unit };
        let mut preprocessor = Preprocessor::new(resolver, constants_map(unit));

        let mut dom_builder = DomBuilder::new();
        let mut resource_gatherer = ResourceGatherer::new();

        let passes: Vec<Box<dyn Pass>> = vec![
            Box::new(ArgumentResolver::new(argument_map(unit))),
            Box::new(ConfigGetter::new(self.config.clone())),
            Box::new(ColorMaker::new()),
        ];

        // The preprocessor, DOM builder, and resource gatherer carry state
        // the driver needs back out (build files, the element tree,
        // resource paths); they're run as their own manager passes below
        // rather than boxed into the same `Vec`, so their owning values
        // survive past the run.
        let mut manager = PassManager::new(passes, root, unit.source.clone()).with_verbose(unit.verbose);
        manager.run(&mut ast)?;

        preprocessor.initialize(&mut ast);
        preprocessor.perform_visit(&mut ast, root);
        if !preprocessor.errors().is_empty() {
            return Err(preprocessor.errors().to_vec());
        }

        let rest: Vec<Box<dyn Pass>> = vec![
            Box::new(AstValidator::new()),
            Box::new(MethodInserter::new()),
            Box::new(TypeResolver::new()),
            Box::new(ClassTemplateLowerer::new()),
            Box::new(StructureLowerer::new()),
        ];
        let mut manager = PassManager::new(rest, root, unit.source.clone()).with_verbose(unit.verbose);
        manager.run(&mut ast)?;

        dom_builder.initialize(&mut ast);
        dom_builder.perform_visit(&mut ast, root);

        let rest: Vec<Box<dyn Pass>> = vec![
            Box::new(TypeGuesser::new()),
            Box::new(PathExpander::new()),
            Box::new(EnumLowerer::new()),
            Box::new(StringFunctionLowerer::new()),
            Box::new(ForLowerer::new()),
            Box::new(FieldSorter::new()),
            Box::new(ParameterSorter::new()),
            Box::new(ConversionInserter::new(FxHashMap::default())),
            Box::new(ConstantFolder::new()),
            Box::new(NameLowerer::new()),
            Box::new(ObjDefExpander::new()),
            Box::new(TypeValidator::new()),
        ];
        let mut manager = PassManager::new(rest, root, unit.source.clone()).with_verbose(unit.verbose);
        manager.run(&mut ast)?;

        resource_gatherer.initialize(&mut ast);
        resource_gatherer.perform_visit(&mut ast, root);

        Ok(PipelineOutput {
            root,
            build_files: preprocessor.build_files().into_iter().map(|path| BuildFile { path, verbose_flag: unit.verbose }).collect(),
            resources: resource_gatherer.resources().iter().map(|r: &Resource| r.path.clone()).collect(),
            dom: dom_builder.dom().clone(),
        })
    }
}
