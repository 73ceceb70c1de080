use serde::{Deserialize, Serialize};

use crate::Type;

/// Binary name of the universal root class. It never contributes members to
/// generated subclasses.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    /// Whether the kind is an ordinary class that can appear in a super class chain.
    pub fn is_class(self) -> bool {
        matches!(self, ClassKind::Class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

impl Visibility {
    /// The modifier keyword, or `None` for package-private members.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Private => Some("private"),
            Visibility::Package => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default = "void_type")]
    pub return_type: Type,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
}

fn void_type() -> Type {
    Type::Void
}

impl MethodDef {
    pub fn new(name: impl Into<String>, return_type: Type, params: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Canonical signature: `name(T1,T2)`.
    ///
    /// This is the identity of a method within a hierarchy. Return type and
    /// modifiers do not take part. Whitespace inside type arguments is dropped
    /// so `Map<K, V>` and `Map<K,V>` name the same parameter type.
    pub fn signature(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        out.push_str(&self.name);
        out.push('(');
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                out.push(',');
            }
            out.extend(param.ty.to_string().chars().filter(|c| !c.is_whitespace()));
        }
        out.push(')');
        out
    }

    /// Instance methods that a subclass in another compilation unit can see.
    pub fn is_overridable_instance(&self) -> bool {
        !self.is_static && self.visibility != Visibility::Private
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Fully qualified (canonical) name, e.g. `com.example.Foo`.
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub is_final: bool,
    /// Fully qualified name of the declared super class, if any.
    #[serde(default)]
    pub super_class: Option<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            is_final: false,
            super_class: None,
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn simple_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    /// Package derived by truncating the qualified name at its last `.`.
    pub fn package_name(&self) -> Option<&str> {
        self.name.rfind('.').map(|idx| &self.name[..idx])
    }

    /// Matches `name` against the declared annotations.
    ///
    /// Either side may be written as a simple or a qualified name; a simple
    /// name matches the last segment of a qualified one.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations
            .iter()
            .any(|declared| annotation_names_match(declared, name))
    }
}

fn annotation_names_match(declared: &str, wanted: &str) -> bool {
    let declared = declared.trim_start_matches('@');
    let wanted = wanted.trim_start_matches('@');
    if declared == wanted {
        return true;
    }
    let last = |name: &str| name.rsplit('.').next().map(str::to_owned);
    match (declared.contains('.'), wanted.contains('.')) {
        (true, false) => last(declared).as_deref() == Some(wanted),
        (false, true) => last(wanted).as_deref() == Some(declared),
        _ => false,
    }
}
