//! Declaration-level representation of a generated wrapper class.
//!
//! [`lower`] turns a [`GenerationContext`] into a [`WrapperClass`]; printing
//! is a separate pass so the structure can be checked without caring about
//! whitespace.

use std::collections::HashSet;

use nova_types::{Parameter, Type, Visibility};

use crate::context::GenerationContext;
use crate::resolve::{MethodKind, ResolvedMethod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperClass {
    pub package: Option<String>,
    pub name: String,
    /// Qualified name of the wrapped (and extended) class.
    pub parent: String,
    pub field: FieldDecl,
    pub constructor: ConstructorDecl,
    pub methods: Vec<MethodDecl>,
}

impl WrapperClass {
    pub fn mutating(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods
            .iter()
            .filter(|m| m.kind == MethodKind::Mutating)
    }

    pub fn forwarding(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods
            .iter()
            .filter(|m| m.kind == MethodKind::Forwarding)
    }

    pub fn method(&self, name: &str, arity: usize) -> Option<&MethodDecl> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.params.len() == arity)
    }
}

/// `private final <ty> <name>;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
}

/// Single-argument constructor storing its parameter into the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub param: Parameter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub kind: MethodKind,
    pub visibility: Visibility,
    pub return_type: Type,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: MethodBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBody {
    /// `throw new <exception>();`
    Reject { exception: String },
    /// `[return ]this.<field>.<method>(<args>);`
    Forward {
        field: String,
        method: String,
        args: Vec<String>,
        returns: bool,
    },
}

pub fn lower(ctx: &GenerationContext<'_>) -> WrapperClass {
    let options = ctx.options();
    let parent = ctx.domain_name().to_string();
    let parent_ty = Type::Named(parent.clone());
    let field = options.field_name.clone();

    let resolved = ctx.methods();
    let methods = resolved
        .mutating()
        .chain(resolved.other())
        .map(|method| lower_method(method, &field, &options.exception))
        .collect();

    WrapperClass {
        package: ctx.package_name().map(str::to_string),
        name: ctx.target_simple_name().to_string(),
        parent: parent.clone(),
        field: FieldDecl {
            name: field.clone(),
            ty: parent_ty.clone(),
        },
        constructor: ConstructorDecl {
            param: Parameter::new(field, parent_ty),
        },
        methods,
    }
}

fn lower_method(resolved: &ResolvedMethod<'_>, field: &str, exception: &str) -> MethodDecl {
    let method = resolved.method;
    let params = rename_colliding_params(&method.params, field);
    let body = match resolved.kind {
        MethodKind::Mutating => MethodBody::Reject {
            exception: exception.to_string(),
        },
        MethodKind::Forwarding => MethodBody::Forward {
            field: field.to_string(),
            method: method.name.clone(),
            args: params.iter().map(|p| p.name.clone()).collect(),
            returns: !method.return_type.is_void(),
        },
    };

    MethodDecl {
        kind: resolved.kind,
        visibility: method.visibility,
        return_type: method.return_type.clone(),
        name: method.name.clone(),
        params,
        body,
    }
}

/// A parameter named like the wrapped field would shadow it inside the
/// override. Such parameters get a `$N` suffix that is unique within the
/// method.
fn rename_colliding_params(params: &[Parameter], field: &str) -> Vec<Parameter> {
    if params.iter().all(|p| p.name != field) {
        return params.to_vec();
    }

    let mut taken: HashSet<String> = params.iter().map(|p| p.name.clone()).collect();
    params
        .iter()
        .map(|p| {
            if p.name != field {
                return p.clone();
            }
            let mut n = 1usize;
            let renamed = loop {
                let candidate = format!("{field}${n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            taken.insert(renamed.clone());
            Parameter::new(renamed, p.ty.clone())
        })
        .collect()
}
