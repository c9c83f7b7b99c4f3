//! Renders [`TypeRef`]s as the shortest unambiguous source text.
//!
//! Classes declared in the wrapper's own package, or in one of the
//! always-simplified namespaces (the Kotlin standard library by default), are
//! written by their simple names. Everything else keeps its canonical name.

use super::{ClassName, TypeRef};

/// Namespaces whose classes are always written by simple name.
pub const DEFAULT_SIMPLIFIED_NAMESPACES: &[&str] = &["kotlin"];

/// Type name renderer scoped to one wrapper package.
#[derive(Debug, Clone, Copy)]
pub struct TypeNameSimplifier<'a> {
    package: &'a str,
    namespaces: &'a [String],
}

impl<'a> TypeNameSimplifier<'a> {
    /// Creates a simplifier for a wrapper generated into `package`.
    ///
    /// Each entry of `namespaces` also covers its sub-packages.
    #[must_use]
    pub const fn new(package: &'a str, namespaces: &'a [String]) -> Self {
        Self {
            package,
            namespaces,
        }
    }

    /// Renders `ty` relative to the wrapper package.
    ///
    /// ```
    /// use kowo_config::types::{TypeNameSimplifier, parse_type_ref};
    ///
    /// let namespaces = vec!["kotlin".to_owned()];
    /// let simplifier = TypeNameSimplifier::new("dev.example", &namespaces);
    /// let ty = parse_type_ref("kotlin.collections.List<dev.example.Mode>").unwrap();
    /// assert_eq!(simplifier.simplify(&ty), "List<Mode>");
    /// ```
    #[must_use]
    pub fn simplify(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(name) => self.class_name(name),
            TypeRef::Parameterized { raw, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.simplify(arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}<{args}>", self.class_name(raw))
            }
            TypeRef::Nullable(inner)
                if matches!(
                    inner.as_ref(),
                    TypeRef::Named(_) | TypeRef::Parameterized { .. }
                ) =>
            {
                format!("{}?", self.simplify(inner))
            }
            other => other.to_string(),
        }
    }

    fn class_name(&self, name: &ClassName) -> String {
        if self.is_simplified(name.package()) {
            name.nested_name()
        } else {
            name.canonical_name()
        }
    }

    fn is_simplified(&self, package: &str) -> bool {
        package == self.package
            || self.namespaces.iter().any(|namespace| {
                package == namespace
                    || package
                        .strip_prefix(namespace.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
    }
}

/// Owned list of the default always-simplified namespaces.
#[must_use]
pub fn default_namespaces() -> Vec<String> {
    DEFAULT_SIMPLIFIED_NAMESPACES
        .iter()
        .map(|namespace| (*namespace).to_owned())
        .collect()
}
