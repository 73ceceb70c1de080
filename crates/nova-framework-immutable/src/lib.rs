//! Immutable wrapper generator.
//!
//! For a class annotated with `@ImmutableWrapper` Nova emits a subclass
//! `Immutable<Name>` that wraps an existing instance. Every inherited mutator
//! (any method whose name starts with `set`) is overridden to throw, and every
//! other overridable method delegates to the wrapped instance, so the wrapper
//! is a live read-only view of the original object.
//!
//! Generation happens in three steps:
//! 1. [`resolve`] walks the super class chain and collects the most-derived
//!    declaration of every overridable signature.
//! 2. [`lower`] turns the result into a [`WrapperClass`] declaration tree.
//! 3. [`print`] renders the tree as Java source.

mod context;
mod ir;
mod print;
mod resolve;

pub use context::GenerationContext;
pub use ir::{lower, ConstructorDecl, FieldDecl, MethodBody, MethodDecl, WrapperClass};
pub use print::{print, PrintConfig};
pub use resolve::{
    ancestor_of, resolve, MethodKind, ResolvedMethod, ResolvedMethodSet, MUTATOR_PREFIX,
};

pub const DEFAULT_WRAPPER_PREFIX: &str = "Immutable";
pub const DEFAULT_FIELD_NAME: &str = "target";
pub const DEFAULT_EXCEPTION: &str = "java.lang.UnsupportedOperationException";

/// Naming and emission knobs for generated wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperOptions {
    /// Prepended to the domain class' simple name.
    pub prefix: String,
    /// Name of the field holding the wrapped instance.
    pub field_name: String,
    /// Exception thrown by mutator overrides.
    pub exception: String,
    pub section_comments: bool,
}

impl Default for WrapperOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_WRAPPER_PREFIX.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            exception: DEFAULT_EXCEPTION.to_string(),
            section_comments: true,
        }
    }
}

/// Render the complete wrapper compilation unit for `ctx`.
pub fn render(ctx: &GenerationContext<'_>) -> String {
    let class = lower(ctx);
    let config = PrintConfig {
        section_comments: ctx.options().section_comments,
        ..PrintConfig::default()
    };
    print(&class, config)
}
