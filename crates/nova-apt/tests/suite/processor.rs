use std::io;
use std::path::PathBuf;

use nova_apt::{
    AptError, AptProgressEventKind, Filer, ImmutableWrapperProcessor, MemoryFiler,
    NoopProgressReporter, RecordingProgressReporter, Round,
};
use nova_framework::{MemoryTypeProvider, TypeProvider};
use nova_framework_immutable::WrapperOptions;
use nova_types::{ClassDef, ClassKind, MethodDef, Parameter, PrimitiveType, Type};

use pretty_assertions::assert_eq;

fn bean(name: &str, prop: &str) -> ClassDef {
    let int = Type::Primitive(PrimitiveType::Int);
    ClassDef::new(name)
        .annotated("dev.alexengrig.util.annotation.ImmutableWrapper")
        .with_method(MethodDef::new(format!("get{prop}"), int.clone(), vec![]))
        .with_method(MethodDef::new(
            format!("set{prop}"),
            Type::Void,
            vec![Parameter::new("value", int)],
        ))
}

fn inheritance_model() -> MemoryTypeProvider {
    let mut provider = MemoryTypeProvider::new();
    provider.add_class(bean("com.example.GrandFatherDomain", "GrandFatherInt"));
    provider.add_class(
        bean("com.example.FatherDomain", "FatherInt").extends("com.example.GrandFatherDomain"),
    );
    provider.add_class(
        bean("com.example.SonDomain", "SonInt").extends("com.example.FatherDomain"),
    );
    provider.add_class(ClassDef::new("com.example.Unmarked"));
    provider
}

/// Fails for one target name and forwards everything else.
struct FlakyFiler {
    fail_for: &'static str,
    inner: MemoryFiler,
}

impl Filer for FlakyFiler {
    fn write_source(&mut self, qualified_name: &str, source: &str) -> Result<PathBuf, AptError> {
        if qualified_name == self.fail_for {
            return Err(AptError::CreateFile {
                target: qualified_name.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only file system"),
            });
        }
        self.inner.write_source(qualified_name, source)
    }
}

#[test]
fn generates_a_wrapper_per_annotated_class() {
    let provider = inheritance_model();
    let processor = ImmutableWrapperProcessor::default();
    let mut filer = MemoryFiler::new();

    let report = processor.process(&provider, Round::default(), &mut filer, &mut NoopProgressReporter);

    assert!(report.claimed);
    assert!(!report.has_errors());
    let targets: Vec<_> = report.generated.iter().map(|g| g.target.as_str()).collect();
    assert_eq!(
        targets,
        [
            "com.example.ImmutableGrandFatherDomain",
            "com.example.ImmutableFatherDomain",
            "com.example.ImmutableSonDomain",
        ]
    );
    let son = &report.generated[2];
    assert_eq!(son.source, "com.example.SonDomain");
    assert_eq!((son.mutating, son.forwarding), (3, 3));
    assert_eq!(son.path, PathBuf::from("com/example/ImmutableSonDomain.java"));

    let text = filer.get("com.example.ImmutableSonDomain").unwrap();
    assert!(text.contains("public class ImmutableSonDomain extends com.example.SonDomain {"));
    assert!(text.contains("return this.target.getGrandFatherInt();"));
    assert!(filer.get("com.example.ImmutableUnmarked").is_none());
}

#[test]
fn final_round_generates_nothing() {
    let provider = inheritance_model();
    let processor = ImmutableWrapperProcessor::default();
    let mut filer = MemoryFiler::new();

    let report = processor.process(
        &provider,
        Round {
            processing_over: true,
        },
        &mut filer,
        &mut NoopProgressReporter,
    );
    assert!(!report.claimed);
    assert!(report.generated.is_empty());
    assert!(filer.files.is_empty());
}

#[test]
fn sink_failure_is_reported_and_round_continues() {
    let provider = inheritance_model();
    let processor = ImmutableWrapperProcessor::default();
    let mut filer = FlakyFiler {
        fail_for: "com.example.ImmutableFatherDomain",
        inner: MemoryFiler::new(),
    };

    let report = processor.process(&provider, Round::default(), &mut filer, &mut NoopProgressReporter);

    assert_eq!(report.error_count(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.code, "APT_WRITE_FAILED");
    assert!(
        diagnostic.message.contains("com.example.ImmutableFatherDomain"),
        "diagnostic should name the failing wrapper: {}",
        diagnostic.message
    );
    assert_eq!(report.generated.len(), 2);
    assert!(filer.inner.get("com.example.ImmutableSonDomain").is_some());
    assert!(filer.inner.get("com.example.ImmutableFatherDomain").is_none());
}

#[test]
fn rejects_final_classes_and_non_classes() {
    let mut provider = MemoryTypeProvider::new();
    let mut sealed = ClassDef::new("com.example.Sealed").annotated("ImmutableWrapper");
    sealed.is_final = true;
    let sealed = provider.add_class(sealed);
    let mut iface = ClassDef::new("com.example.Shape").annotated("ImmutableWrapper");
    iface.kind = ClassKind::Interface;
    let iface = provider.add_class(iface);
    let ok = provider.add_class(ClassDef::new("com.example.Fine").annotated("ImmutableWrapper"));

    let processor = ImmutableWrapperProcessor::default();
    let mut filer = MemoryFiler::new();
    let report = processor.process_classes(
        &provider,
        &[sealed, iface, ok],
        &mut filer,
        &mut NoopProgressReporter,
    );

    let codes: Vec<_> = report.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, ["APT_FINAL_CLASS", "APT_NOT_A_CLASS"]);
    assert!(report.diagnostics[0].message.contains("com.example.Sealed"));
    assert!(report.diagnostics[1].message.contains("com.example.Shape"));
    assert_eq!(report.generated.len(), 1);
    assert_eq!(provider.class(ok).name, report.generated[0].source);
}

#[test]
fn custom_annotation_and_options() {
    let mut provider = MemoryTypeProvider::new();
    provider.add_class(ClassDef::new("com.example.View").annotated("ReadOnly"));
    provider.add_class(ClassDef::new("com.example.Other").annotated("ImmutableWrapper"));

    let options = WrapperOptions {
        prefix: "Frozen".to_string(),
        ..WrapperOptions::default()
    };
    let processor = ImmutableWrapperProcessor::new(options).with_annotation("ReadOnly");
    let mut filer = MemoryFiler::new();
    let report = processor.process(&provider, Round::default(), &mut filer, &mut NoopProgressReporter);

    assert_eq!(processor.annotation(), "ReadOnly");
    let keys: Vec<_> = filer.files.keys().cloned().collect();
    assert_eq!(keys, ["com.example.FrozenView"]);
    assert_eq!(report.generated.len(), 1);
}

#[test]
fn reports_progress_per_class() {
    let provider = inheritance_model();
    let processor = ImmutableWrapperProcessor::default();
    let mut progress = RecordingProgressReporter::default();

    processor.process(&provider, Round::default(), &mut MemoryFiler::new(), &mut progress);

    let kinds: Vec<_> = progress.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [
            AptProgressEventKind::Begin,
            AptProgressEventKind::Report,
            AptProgressEventKind::Report,
            AptProgressEventKind::Report,
            AptProgressEventKind::End,
        ]
    );
    assert_eq!(
        progress.events[3].class_name.as_deref(),
        Some("com.example.SonDomain")
    );
}

#[test]
fn non_class_diagnostic_names_the_configured_annotation() {
    let mut provider = MemoryTypeProvider::new();
    let mut shape = ClassDef::new("com.example.Shape").annotated("com.example.ReadOnly");
    shape.kind = ClassKind::Interface;
    provider.add_class(shape);

    let processor = ImmutableWrapperProcessor::default().with_annotation("ReadOnly");
    let report = processor.process(
        &provider,
        Round::default(),
        &mut MemoryFiler::new(),
        &mut NoopProgressReporter,
    );

    assert_eq!(report.diagnostics.len(), 1);
    let message = &report.diagnostics[0].message;
    assert!(message.starts_with("@ReadOnly can only be applied to classes"), "{message}");
    assert!(!message.contains("ImmutableWrapper"), "{message}");
}
