use nova_framework::{MemoryTypeProvider, ModelError, TypeModel, TypeProvider};
use nova_types::ClassDef;

use pretty_assertions::assert_eq;

fn chain() -> MemoryTypeProvider {
    let mut provider = MemoryTypeProvider::new();
    provider.add_class(ClassDef::new("com.example.GrandFather").annotated("ImmutableWrapper"));
    provider.add_class(
        ClassDef::new("com.example.Father")
            .extends("com.example.GrandFather")
            .annotated("dev.alexengrig.util.annotation.ImmutableWrapper"),
    );
    provider.add_class(ClassDef::new("com.example.Son").extends("com.example.Father"));
    provider
}

#[test]
fn super_class_follows_known_classes_only() {
    let mut provider = chain();
    let external = provider.add_class(ClassDef::new("com.example.Child").extends("org.lib.Base"));

    let son = provider.lookup_class("com.example.Son").unwrap();
    let father = provider.lookup_class("com.example.Father").unwrap();
    let grand_father = provider.lookup_class("com.example.GrandFather").unwrap();

    assert_eq!(provider.super_class(son), Some(father));
    assert_eq!(provider.super_class(father), Some(grand_father));
    assert_eq!(provider.super_class(grand_father), None);
    assert_eq!(provider.super_class(external), None);
}

#[test]
fn annotated_with_matches_simple_and_qualified_markers() {
    let provider = chain();
    let names: Vec<_> = provider
        .annotated_with("ImmutableWrapper")
        .into_iter()
        .map(|id| provider.class(id).name.clone())
        .collect();
    assert_eq!(names, vec!["com.example.GrandFather", "com.example.Father"]);
}

#[test]
fn model_rejects_duplicate_classes() {
    let model = TypeModel {
        classes: vec![ClassDef::new("com.example.A"), ClassDef::new("com.example.A")],
    };
    let err = MemoryTypeProvider::from_model(model).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateClass(name) if name == "com.example.A"));
}

#[test]
fn loads_model_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.json");
    std::fs::write(
        &path,
        r#"{ "classes": [
            { "name": "com.example.Base", "methods": [{ "name": "getId", "return_type": "long" }] },
            { "name": "com.example.Impl", "super_class": "com.example.Base" }
        ] }"#,
    )
    .unwrap();

    let provider = MemoryTypeProvider::load_from_path(&path).unwrap();
    assert_eq!(provider.len(), 2);
    let base = provider.lookup_class("com.example.Base").unwrap();
    let imp = provider.lookup_class("com.example.Impl").unwrap();
    assert_eq!(provider.super_class(imp), Some(base));
    assert_eq!(provider.class(base).methods[0].signature(), "getId()");
}

#[test]
fn reports_json_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"classes\": [").unwrap();

    let err = MemoryTypeProvider::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ModelError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

fn load_single_method(method_json: &str) -> Result<MemoryTypeProvider, ModelError> {
    let json = format!(r#"{{ "classes": [{{ "name": "com.example.Bean", "methods": [{method_json}] }}] }}"#);
    let model: TypeModel = serde_json::from_str(&json).unwrap();
    MemoryTypeProvider::from_model(model)
}

#[test]
fn model_rejects_methods_that_cannot_be_emitted() {
    let cases = [
        (r#"{ "name": "get-x", "return_type": "int" }"#, "name is not a Java identifier"),
        (r#"{ "name": "default" }"#, "name is not a Java identifier"),
        (
            r#"{ "name": "setX", "params": [{ "name": "class", "ty": "int" }] }"#,
            "parameter `class` is not a Java identifier",
        ),
        (
            r#"{ "name": "setX", "params": [{ "name": "x", "ty": "int" }, { "name": "x", "ty": "long" }] }"#,
            "parameter `x` is declared more than once",
        ),
        (
            r#"{ "name": "setX", "params": [{ "name": "x", "ty": "void" }] }"#,
            "parameter `x` has type void",
        ),
    ];

    for (method, expected) in cases {
        match load_single_method(method) {
            Err(ModelError::InvalidMethod { class, reason, .. }) => {
                assert_eq!(class, "com.example.Bean");
                assert_eq!(reason, expected, "for {method}");
            }
            other => panic!("expected InvalidMethod for {method}, got {other:?}"),
        }
    }
}

#[test]
fn model_accepts_well_formed_methods() {
    let provider = load_single_method(
        r#"{ "name": "setPair", "params": [{ "name": "left", "ty": "int" }, { "name": "$right", "ty": "java.lang.String" }] }"#,
    )
    .unwrap();
    assert_eq!(provider.len(), 1);
}
