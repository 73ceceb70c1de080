use std::path::PathBuf;

use nova_framework::TypeProvider;
use nova_framework_immutable::{render, GenerationContext, WrapperOptions};
use nova_types::{ClassDef, ClassId, ClassKind, Diagnostic};
use serde::Serialize;

use crate::{
    AptError, AptProgressEvent, Filer, ProgressReporter, IMMUTABLE_WRAPPER_ANNOTATION,
};

/// State of the current processing round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Round {
    /// Set on the final round, after which no new sources may be generated.
    pub processing_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedWrapper {
    /// Qualified name of the annotated class.
    pub source: String,
    /// Qualified name of the generated wrapper.
    pub target: String,
    pub path: PathBuf,
    pub mutating: usize,
    pub forwarding: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// Whether the processor took ownership of the marker annotation this round.
    pub claimed: bool,
    pub generated: Vec<GeneratedWrapper>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RoundReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Generates `Immutable*` wrappers for classes carrying the marker annotation.
#[derive(Debug, Clone)]
pub struct ImmutableWrapperProcessor {
    annotation: String,
    options: WrapperOptions,
}

impl Default for ImmutableWrapperProcessor {
    fn default() -> Self {
        Self::new(WrapperOptions::default())
    }
}

impl ImmutableWrapperProcessor {
    pub fn new(options: WrapperOptions) -> Self {
        Self {
            annotation: IMMUTABLE_WRAPPER_ANNOTATION.to_string(),
            options,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// The marker annotation this processor claims.
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn options(&self) -> &WrapperOptions {
        &self.options
    }

    /// Run one round over every annotated class known to `db`.
    pub fn process(
        &self,
        db: &dyn TypeProvider,
        round: Round,
        filer: &mut dyn Filer,
        progress: &mut dyn ProgressReporter,
    ) -> RoundReport {
        if round.processing_over {
            return RoundReport::default();
        }

        let roots = db.annotated_with(&self.annotation);
        tracing::debug!(
            target: "nova.apt",
            annotation = %self.annotation,
            count = roots.len(),
            "found annotated classes"
        );
        let mut report = self.process_classes(db, &roots, filer, progress);
        report.claimed = true;
        report
    }

    /// Generate wrappers for an explicit set of root classes.
    ///
    /// A class that cannot be handled produces an error diagnostic and does
    /// not stop the remaining classes from being generated.
    pub fn process_classes(
        &self,
        db: &dyn TypeProvider,
        roots: &[ClassId],
        filer: &mut dyn Filer,
        progress: &mut dyn ProgressReporter,
    ) -> RoundReport {
        let mut report = RoundReport::default();
        progress.event(AptProgressEvent::begin("Generating immutable wrappers"));

        for &root in roots {
            let class = db.class(root);
            let _span =
                tracing::info_span!(target: "nova.apt", "immutable_wrapper", class = %class.name)
                    .entered();

            if let Some(diagnostic) = check_subclassable(class, &self.annotation) {
                tracing::warn!(target: "nova.apt", "{}", diagnostic.message);
                report.diagnostics.push(diagnostic);
                continue;
            }

            progress.event(
                AptProgressEvent::report(format!("Generating wrapper for {}", class.name))
                    .for_class(&class.name),
            );

            match self.generate(db, root, filer) {
                Ok(generated) => {
                    tracing::info!(
                        target: "nova.apt",
                        wrapper = %generated.target,
                        path = %generated.path.display(),
                        "generated immutable wrapper"
                    );
                    report.generated.push(generated);
                }
                Err(err) => {
                    tracing::error!(target: "nova.apt", wrapper = %err.target(), error = %err, "wrapper generation failed");
                    report
                        .diagnostics
                        .push(Diagnostic::error("APT_WRITE_FAILED", err.to_string(), None));
                }
            }
        }

        progress.event(AptProgressEvent::end());
        report
    }

    /// Render the wrapper for `root` and hand it to `filer`.
    pub fn generate(
        &self,
        db: &dyn TypeProvider,
        root: ClassId,
        filer: &mut dyn Filer,
    ) -> Result<GeneratedWrapper, AptError> {
        let ctx = GenerationContext::new(db, root, self.options.clone());
        let source = render(&ctx);
        let path = filer.write_source(ctx.target_name(), &source)?;

        let methods = ctx.methods();
        Ok(GeneratedWrapper {
            source: ctx.domain_name().to_string(),
            target: ctx.target_name().to_string(),
            path,
            mutating: methods.mutating().count(),
            forwarding: methods.other().count(),
        })
    }
}

/// Reject classes a wrapper cannot extend: non-classes and final classes.
pub fn check_subclassable(class: &ClassDef, annotation: &str) -> Option<Diagnostic> {
    if class.kind != ClassKind::Class {
        return Some(Diagnostic::error(
            "APT_NOT_A_CLASS",
            format!(
                "@{annotation} can only be applied to classes; {} is not a class",
                class.name
            ),
            None,
        ));
    }
    if class.is_final {
        return Some(Diagnostic::error(
            "APT_FINAL_CLASS",
            format!(
                "cannot generate an immutable wrapper for final class {}",
                class.name
            ),
            None,
        ));
    }
    None
}
