use std::cell::OnceCell;

use nova_framework::TypeProvider;
use nova_types::{ClassDef, ClassId};

use crate::resolve::{resolve, ResolvedMethodSet};
use crate::WrapperOptions;

/// Facts about one root class, derived lazily and cached for the lifetime of
/// a single generation request.
pub struct GenerationContext<'db> {
    db: &'db dyn TypeProvider,
    root: ClassId,
    options: WrapperOptions,
    target_simple_name: OnceCell<String>,
    target_name: OnceCell<String>,
    methods: OnceCell<ResolvedMethodSet<'db>>,
}

impl<'db> GenerationContext<'db> {
    pub fn new(db: &'db dyn TypeProvider, root: ClassId, options: WrapperOptions) -> Self {
        Self {
            db,
            root,
            options,
            target_simple_name: OnceCell::new(),
            target_name: OnceCell::new(),
            methods: OnceCell::new(),
        }
    }

    pub fn root(&self) -> ClassId {
        self.root
    }

    pub fn options(&self) -> &WrapperOptions {
        &self.options
    }

    pub fn domain(&self) -> &'db ClassDef {
        self.db.class(self.root)
    }

    pub fn domain_simple_name(&self) -> &'db str {
        self.domain().simple_name()
    }

    pub fn domain_name(&self) -> &'db str {
        &self.domain().name
    }

    pub fn package_name(&self) -> Option<&'db str> {
        self.domain().package_name()
    }

    /// `<prefix><DomainSimpleName>`, e.g. `ImmutableAccount`.
    pub fn target_simple_name(&self) -> &str {
        self.target_simple_name
            .get_or_init(|| format!("{}{}", self.options.prefix, self.domain_simple_name()))
    }

    /// Qualified name of the wrapper; it lives in the domain class' package.
    pub fn target_name(&self) -> &str {
        self.target_name.get_or_init(|| {
            let simple = self.target_simple_name();
            match self.package_name() {
                Some(package) => format!("{package}.{simple}"),
                None => simple.to_string(),
            }
        })
    }

    pub fn methods(&self) -> &ResolvedMethodSet<'db> {
        self.methods.get_or_init(|| resolve(self.db, self.root))
    }
}

impl std::fmt::Debug for GenerationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationContext")
            .field("root", &self.domain_name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
