use nova_framework::{MemoryTypeProvider, TypeProvider};
use nova_framework_immutable::{
    lower, render, GenerationContext, MethodBody, MethodKind, WrapperOptions,
};
use nova_types::{ClassDef, MethodDef, Parameter, Type, Visibility};

use pretty_assertions::assert_eq;

use super::fixtures::{bean, inheritance_chain, int};

#[test]
fn renders_simple_domain_wrapper() {
    let mut provider = MemoryTypeProvider::new();
    let root = provider.add_class(bean("com.example.simple.SimpleDomain", &["count"]));
    let ctx = GenerationContext::new(&provider, root, WrapperOptions::default());

    assert_eq!(ctx.target_simple_name(), "ImmutableSimpleDomain");
    assert_eq!(ctx.target_name(), "com.example.simple.ImmutableSimpleDomain");

    let expected = r#"package com.example.simple;

public class ImmutableSimpleDomain extends com.example.simple.SimpleDomain {
    private final com.example.simple.SimpleDomain target;

    public ImmutableSimpleDomain(com.example.simple.SimpleDomain target) {
        this.target = target;
    }

    // Immutable methods
    @java.lang.Override
    public void setCount(int count) {
        throw new java.lang.UnsupportedOperationException();
    }

    // Other methods
    @java.lang.Override
    public int getCount() {
        return this.target.getCount();
    }
}
"#;
    assert_eq!(render(&ctx), expected);
}

#[test]
fn class_without_methods_renders_minimal_wrapper() {
    let mut provider = MemoryTypeProvider::new();
    let root = provider.add_class(ClassDef::new("com.example.Marker"));
    let ctx = GenerationContext::new(&provider, root, WrapperOptions::default());

    let expected = r#"package com.example;

public class ImmutableMarker extends com.example.Marker {
    private final com.example.Marker target;

    public ImmutableMarker(com.example.Marker target) {
        this.target = target;
    }
}
"#;
    assert_eq!(render(&ctx), expected);
}

#[test]
fn default_package_omits_package_line() {
    let mut provider = MemoryTypeProvider::new();
    let root = provider.add_class(ClassDef::new("Plain"));
    let ctx = GenerationContext::new(&provider, root, WrapperOptions::default());

    assert_eq!(ctx.package_name(), None);
    assert_eq!(ctx.target_name(), "ImmutablePlain");
    let text = render(&ctx);
    assert!(text.starts_with("public class ImmutablePlain extends Plain {\n"));
    assert!(!text.contains("package"));
}

#[test]
fn carries_visibility_and_void_forwarding() {
    let mut provider = MemoryTypeProvider::new();
    let root = provider.add_class(
        ClassDef::new("com.example.Account")
            .with_method(
                MethodDef::new(
                    "transfer",
                    Type::Void,
                    vec![
                        Parameter::new("to", Type::named("com.example.Account")),
                        Parameter::new("amount", Type::Primitive(nova_types::PrimitiveType::Long)),
                    ],
                )
                .with_visibility(Visibility::Protected),
            )
            .with_method(
                MethodDef::new("tags", Type::array_of(Type::named("java.lang.String")), vec![])
                    .with_visibility(Visibility::Package),
            ),
    );
    let ctx = GenerationContext::new(&provider, root, WrapperOptions::default());
    let text = render(&ctx);

    assert!(text.contains(
        "    protected void transfer(com.example.Account to, long amount) {\n        this.target.transfer(to, amount);\n    }\n"
    ));
    assert!(text.contains(
        "    java.lang.String[] tags() {\n        return this.target.tags();\n    }\n"
    ));
    assert!(!text.contains("// Immutable methods"));
}

#[test]
fn lowered_ir_tags_every_method() {
    let provider = inheritance_chain();
    let son = provider.lookup_class("com.example.inheritance.SonDomain").unwrap();
    let ctx = GenerationContext::new(&provider, son, WrapperOptions::default());
    let class = lower(&ctx);

    assert_eq!(class.name, "ImmutableSonDomain");
    assert_eq!(class.parent, "com.example.inheritance.SonDomain");
    assert_eq!(class.package.as_deref(), Some("com.example.inheritance"));
    assert_eq!(class.field.name, class.constructor.param.name);
    assert_eq!(class.mutating().count(), 3);
    assert_eq!(class.forwarding().count(), 3);

    for method in &class.methods {
        match (&method.kind, &method.body) {
            (MethodKind::Mutating, MethodBody::Reject { exception }) => {
                assert_eq!(exception, "java.lang.UnsupportedOperationException")
            }
            (MethodKind::Forwarding, MethodBody::Forward { method: called, returns, .. }) => {
                assert_eq!(called, &method.name);
                assert!(*returns);
            }
            other => panic!("unexpected method shape: {other:?}"),
        }
    }
}

#[test]
fn colliding_parameter_is_renamed_in_declaration_and_call() {
    let mut provider = MemoryTypeProvider::new();
    let root = provider.add_class(
        ClassDef::new("com.example.Registry")
            .with_method(MethodDef::new(
                "contains",
                Type::Primitive(nova_types::PrimitiveType::Boolean),
                vec![Parameter::new("target", Type::named("java.lang.Object"))],
            ))
            .with_method(MethodDef::new(
                "setTarget",
                Type::Void,
                vec![Parameter::new("target", Type::named("java.lang.Object"))],
            )),
    );
    let ctx = GenerationContext::new(&provider, root, WrapperOptions::default());
    let text = render(&ctx);

    assert!(text.contains("public void setTarget(java.lang.Object target$1) {"));
    assert!(text.contains(
        "public boolean contains(java.lang.Object target$1) {\n        return this.target.contains(target$1);"
    ));
}

#[test]
fn honours_custom_options() {
    let mut provider = MemoryTypeProvider::new();
    let root = provider.add_class(
        ClassDef::new("com.example.Point")
            .with_method(MethodDef::new("setX", Type::Void, vec![Parameter::new("x", int())])),
    );
    let options = WrapperOptions {
        prefix: "ReadOnly".to_string(),
        field_name: "delegate".to_string(),
        exception: "java.lang.IllegalStateException".to_string(),
        section_comments: false,
    };
    let ctx = GenerationContext::new(&provider, root, options);
    let text = render(&ctx);

    assert_eq!(ctx.target_name(), "com.example.ReadOnlyPoint");
    assert!(text.contains("public class ReadOnlyPoint extends com.example.Point {"));
    assert!(text.contains("private final com.example.Point delegate;"));
    assert!(text.contains("throw new java.lang.IllegalStateException();"));
    assert!(!text.contains("//"));
}
