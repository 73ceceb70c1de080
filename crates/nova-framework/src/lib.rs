//! Type-system provider abstraction.
//!
//! Code generators never reflect over classes themselves. They ask a
//! [`TypeProvider`] for class metadata and super class links, which keeps
//! them independent of where the metadata comes from: a compiler front-end,
//! a classpath index, or a serialized [`TypeModel`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use nova_types::{
    is_java_identifier, is_java_keyword, is_qualified_name, ClassDef, ClassId, MethodDef,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query interface over a snapshot of the type system.
///
/// Implementations must be read-only for the duration of a generation
/// request.
pub trait TypeProvider {
    /// Metadata of a class previously handed out by this provider.
    fn class(&self, class: ClassId) -> &ClassDef;

    /// Find a class by its fully qualified name.
    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    /// Every class known to the provider, in a stable order.
    fn classes(&self) -> Vec<ClassId>;

    /// The declared super class, if it is known to this provider.
    fn super_class(&self, class: ClassId) -> Option<ClassId> {
        let name = self.class(class).super_class.as_deref()?;
        self.lookup_class(name)
    }

    /// Classes carrying `annotation` (simple or qualified name).
    fn annotated_with(&self, annotation: &str) -> Vec<ClassId> {
        self.classes()
            .into_iter()
            .filter(|&id| self.class(id).has_annotation(annotation))
            .collect()
    }
}

/// Serialized form of a type-system snapshot.
///
/// ```json
/// { "classes": [ { "name": "com.example.Foo", "super_class": "com.example.Base", "methods": [] } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeModel {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read type model {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse type model {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),
    #[error("class name `{0}` is not a valid qualified name")]
    InvalidName(String),
    #[error("method `{method}` of `{class}` is invalid: {reason}")]
    InvalidMethod {
        class: String,
        method: String,
        reason: String,
    },
}

/// Simple in-memory provider for tests and serialized models.
#[derive(Debug, Default)]
pub struct MemoryTypeProvider {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
}

impl MemoryTypeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a class. Replacing keeps the existing [`ClassId`].
    pub fn add_class(&mut self, class: ClassDef) -> ClassId {
        if let Some(&id) = self.by_name.get(&class.name) {
            tracing::debug!(target: "nova.framework", class = %class.name, "replacing class definition");
            self.classes[id.to_raw() as usize] = class;
            return id;
        }

        let id = ClassId::new(self.classes.len() as u32);
        self.by_name.insert(class.name.clone(), id);
        self.classes.push(class);
        id
    }

    pub fn from_model(model: TypeModel) -> Result<Self, ModelError> {
        let mut provider = Self::new();
        for class in model.classes {
            if !is_qualified_name(&class.name) {
                return Err(ModelError::InvalidName(class.name));
            }
            if provider.by_name.contains_key(&class.name) {
                return Err(ModelError::DuplicateClass(class.name));
            }
            for method in &class.methods {
                if let Some(reason) = invalid_method_reason(method) {
                    return Err(ModelError::InvalidMethod {
                        class: class.name.clone(),
                        method: method.name.clone(),
                        reason,
                    });
                }
            }
            provider.add_class(class);
        }
        Ok(provider)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: TypeModel = serde_json::from_str(&text).map_err(|source| ModelError::Json {
            path: path.display().to_string(),
            source,
        })?;
        let provider = Self::from_model(model)?;
        tracing::debug!(
            target: "nova.framework",
            path = %path.display(),
            classes = provider.classes.len(),
            "loaded type model"
        );
        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeProvider for MemoryTypeProvider {
    fn class(&self, class: ClassId) -> &ClassDef {
        self.classes
            .get(class.to_raw() as usize)
            .expect("unknown ClassId passed to provider.class()")
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn classes(&self) -> Vec<ClassId> {
        (0..self.classes.len() as u32).map(ClassId::new).collect()
    }
}

/// Why `method` could not be emitted as valid Java, if it could not.
fn invalid_method_reason(method: &MethodDef) -> Option<String> {
    if !is_usable_identifier(&method.name) {
        return Some("name is not a Java identifier".to_string());
    }

    let mut seen = HashSet::new();
    for param in &method.params {
        if !is_usable_identifier(&param.name) {
            return Some(format!("parameter `{}` is not a Java identifier", param.name));
        }
        if !seen.insert(param.name.as_str()) {
            return Some(format!("parameter `{}` is declared more than once", param.name));
        }
        if param.ty.is_void() {
            return Some(format!("parameter `{}` has type void", param.name));
        }
    }
    None
}

fn is_usable_identifier(name: &str) -> bool {
    is_java_identifier(name) && !is_java_keyword(name)
}
