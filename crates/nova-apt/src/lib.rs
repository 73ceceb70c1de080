//! Annotation-processing driver for Nova's source generators.
//!
//! A processing round picks up every class carrying the wrapper marker
//! annotation, generates its immutable wrapper and hands the text to a
//! [`Filer`]. Failures are scoped to a single class: the round keeps going
//! and reports one diagnostic per class that could not be generated.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod filer;
mod processor;
mod progress;

pub use filer::{source_file_path, Filer, FsFiler, MemoryFiler};
pub use processor::{
    check_subclassable, GeneratedWrapper, ImmutableWrapperProcessor, Round, RoundReport,
};
pub use progress::{
    AptProgressEvent, AptProgressEventKind, NoopProgressReporter, ProgressReporter,
    RecordingProgressReporter,
};

/// Simple name of the marker annotation recognised by default.
pub const IMMUTABLE_WRAPPER_ANNOTATION: &str = "ImmutableWrapper";

/// Where generated sources go unless configured otherwise (Maven layout).
pub const DEFAULT_GENERATED_SOURCES_DIR: &str = "target/generated-sources/annotations";

/// Resolve the generated-sources root for a project.
///
/// Relative `configured` paths are taken relative to `project_root`.
pub fn generated_sources_root(project_root: &Path, configured: Option<&Path>) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => project_root.join(path),
        None => project_root.join(DEFAULT_GENERATED_SOURCES_DIR),
    }
}

#[derive(Debug, Error)]
pub enum AptError {
    #[error("failed to create source file for {target}: {source}")]
    CreateFile {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write source file for {target}: {source}")]
    WriteFile {
        target: String,
        #[source]
        source: io::Error,
    },
}

impl AptError {
    /// Qualified name of the wrapper that could not be written.
    pub fn target(&self) -> &str {
        match self {
            AptError::CreateFile { target, .. } | AptError::WriteFile { target, .. } => target,
        }
    }
}
