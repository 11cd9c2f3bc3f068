//! The external-facing description of a single translation unit.

/// Identifies a single translation unit and carries everything the
/// preprocessor needs to resolve relative imports and evaluate `#if`/`#arg`
/// without touching the filesystem itself.
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    /// The original textual source.
    pub source: String,
    /// The directory this unit's file lives in.
    pub dir: String,
    /// The unit's file name.
    pub file: String,
    /// The compiler's own installation directory, used to locate
    /// `std/configure_defaults.l`.
    pub compiler_dir: String,
    /// Appended to bare import names during path resolution.
    pub suffix: String,
    /// User-visible arguments, queried by `#arg`.
    pub arguments: Vec<String>,
    /// Names that evaluate to `true` in `#if` conditions.
    pub constants: Vec<String>,
    /// Additional forced imports, realized as synthetic `#import`
    /// instructions ahead of parsing.
    pub imports: Vec<String>,
    /// Whether this unit is the program's entry point.
    pub is_main: bool,
    /// Enables the pass manager's verbose tree pretty-printing.
    pub verbose: bool,
    /// Enables debug tracing while importing `std.l`.
    pub debug_std_lil: bool,
    /// Whether `std.l` should be imported implicitly.
    pub import_std_lil: bool,
    /// Whether `std/configure_defaults.l` must be imported before parsing.
    pub needs_configure_defaults: bool,
    /// Enables debug tracing while importing `configure_defaults.l`.
    pub debug_configure_defaults: bool,
    /// Set while this unit is being pulled in via `#needs` from a parent.
    pub is_being_imported_with_needs: bool,
    /// Set while this unit is being pulled in via `#import` from a parent.
    pub is_being_imported_with_import: bool,
}

impl TranslationUnit {
    /// Creates a translation unit for the given source and file name, with
    /// every other field at its default.
    #[must_use]
    pub fn new(source: impl Into<String>, file: impl Into<String>) -> Self {
        Self { source: source.into(), file: file.into(), ..Self::default() }
    }

    /// Builder-style setter marking this as the program's main unit.
    #[must_use]
    pub const fn as_main(mut self) -> Self {
        self.is_main = true;
        self
    }
}
