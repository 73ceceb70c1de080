//! Method resolution over a super class chain.

use std::collections::HashSet;

use indexmap::IndexMap;
use nova_framework::TypeProvider;
use nova_types::{ClassId, MethodDef, JAVA_LANG_OBJECT};

/// Methods whose name starts with this prefix are treated as mutators.
pub const MUTATOR_PREFIX: &str = "set";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Overridden to always throw.
    Mutating,
    /// Overridden to delegate to the wrapped instance.
    Forwarding,
}

impl MethodKind {
    /// Naming convention only; `setup()` is a mutator too.
    pub fn classify(name: &str) -> Self {
        if name.starts_with(MUTATOR_PREFIX) {
            MethodKind::Mutating
        } else {
            MethodKind::Forwarding
        }
    }
}

/// A method together with the class that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMethod<'db> {
    pub owner: ClassId,
    pub method: &'db MethodDef,
    pub kind: MethodKind,
}

impl ResolvedMethod<'_> {
    pub fn signature(&self) -> String {
        self.method.signature()
    }
}

/// Overridable methods of a class hierarchy keyed by canonical signature.
///
/// Each signature maps to its most-derived declaration and lives in exactly
/// one partition. Iteration follows discovery order: the root's own
/// declarations first, then whatever each ancestor adds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMethodSet<'db> {
    mutating: IndexMap<String, ResolvedMethod<'db>>,
    other: IndexMap<String, ResolvedMethod<'db>>,
}

impl<'db> ResolvedMethodSet<'db> {
    pub fn mutating(&self) -> impl Iterator<Item = &ResolvedMethod<'db>> {
        self.mutating.values()
    }

    pub fn other(&self) -> impl Iterator<Item = &ResolvedMethod<'db>> {
        self.other.values()
    }

    pub fn get(&self, signature: &str) -> Option<&ResolvedMethod<'db>> {
        self.mutating
            .get(signature)
            .or_else(|| self.other.get(signature))
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.get(signature).is_some()
    }

    pub fn len(&self) -> usize {
        self.mutating.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutating.is_empty() && self.other.is_empty()
    }

    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.mutating
            .keys()
            .chain(self.other.keys())
            .map(String::as_str)
    }
}

/// The direct super class of `class` that is worth walking.
///
/// Stops at `java.lang.Object`, at anything that is not a plain class and at
/// super classes the provider does not know.
pub fn ancestor_of(db: &dyn TypeProvider, class: ClassId) -> Option<ClassId> {
    let parent = db.super_class(class)?;
    let data = db.class(parent);
    if data.name == JAVA_LANG_OBJECT || !data.kind.is_class() {
        return None;
    }
    Some(parent)
}

/// Collect the overridable instance methods visible on `root`.
pub fn resolve<'db>(db: &'db dyn TypeProvider, root: ClassId) -> ResolvedMethodSet<'db> {
    let mut index: IndexMap<String, ResolvedMethod<'db>> = IndexMap::new();
    let mut visited = HashSet::from([root]);

    collect_declared(db, root, &mut index);

    let mut current = ancestor_of(db, root);
    while let Some(ancestor) = current {
        if !visited.insert(ancestor) {
            tracing::warn!(
                target: "nova.immutable",
                class = %db.class(root).name,
                ancestor = %db.class(ancestor).name,
                "cyclic super class chain; stopping method resolution"
            );
            break;
        }
        collect_declared(db, ancestor, &mut index);
        current = ancestor_of(db, ancestor);
    }

    let mut resolved = ResolvedMethodSet::default();
    for (signature, method) in index {
        match method.kind {
            MethodKind::Mutating => resolved.mutating.insert(signature, method),
            MethodKind::Forwarding => resolved.other.insert(signature, method),
        };
    }

    tracing::debug!(
        target: "nova.immutable",
        class = %db.class(root).name,
        mutating = resolved.mutating.len(),
        other = resolved.other.len(),
        "resolved wrapper methods"
    );
    resolved
}

fn collect_declared<'db>(
    db: &'db dyn TypeProvider,
    owner: ClassId,
    index: &mut IndexMap<String, ResolvedMethod<'db>>,
) {
    for method in db
        .class(owner)
        .methods
        .iter()
        .filter(|m| m.is_overridable_instance())
    {
        let signature = method.signature();
        if index.contains_key(&signature) {
            tracing::trace!(
                target: "nova.immutable",
                %signature,
                owner = %db.class(owner).name,
                "shadowed by a more derived declaration"
            );
            continue;
        }
        index.insert(
            signature,
            ResolvedMethod {
                owner,
                method,
                kind: MethodKind::classify(&method.name),
            },
        );
    }
}
