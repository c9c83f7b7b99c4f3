//! Data model shared by the collector and the emitter.

use std::fmt;

use camino::Utf8PathBuf;

use crate::symbols::DeclarationId;
use crate::types::ClassName;

/// Hierarchical option key locating a value in the backing store.
///
/// The root key has no segments. Each nested field appends its own segment,
/// and the textual form joins segments with `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionKey(Vec<String>);

impl OptionKey {
    /// The root of every wrapper's key space.
    pub const ROOT: Self = Self(Vec::new());

    /// Returns this key extended by `segment`.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_owned());
        Self(segments)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A declaration marked for wrapper generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigModel {
    /// Handle of the model declaration in the symbol source.
    pub declaration: DeclarationId,
    /// Qualified name of the model class.
    pub name: ClassName,
    /// Simple name of the generated wrapper class.
    pub wrapper_name: String,
    /// Whether every field gets a subscription hook.
    pub default_hook: bool,
    /// Source file declaring the model, when known.
    pub source: Option<Utf8PathBuf>,
}

impl ConfigModel {
    /// Package the wrapper is generated into.
    #[must_use]
    pub fn package(&self) -> &str {
        self.name.package()
    }
}

/// A plain option exposed as a delegated property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueField {
    /// Property name.
    pub name: String,
    /// Key segment appended to the parent key.
    pub key: String,
    /// Declared type, already simplified for the wrapper package.
    pub type_name: String,
    /// Whether the property is a `var`.
    pub mutable: bool,
    /// Whether a `subscribeTo<Name>` hook is generated.
    pub subscribe: bool,
}

/// A nested section exposed as an instance of an inner class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestField {
    /// Property name.
    pub name: String,
    /// Key segment appended to the parent key.
    pub key: String,
    /// Name of the inner class mirroring the nested declaration.
    pub class_name: String,
}

/// One generated member of a wrapper or nested class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigField {
    /// Delegated option property.
    Value(ValueField),
    /// Nested section.
    Nest(NestField),
}

impl ConfigField {
    /// Property name of the member.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Value(field) => &field.name,
            Self::Nest(field) => &field.name,
        }
    }

    /// Key segment of the member.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Value(field) => &field.key,
            Self::Nest(field) => &field.key,
        }
    }
}

/// Inner class generated for a nested model declaration.
///
/// Identity is the class name alone: two nested declarations sharing a simple
/// name map onto the same inner class.
#[derive(Debug, Clone)]
pub struct NestedClass {
    /// Simple name of the inner class.
    pub name: String,
    /// Members in declaration order.
    pub fields: Vec<ConfigField>,
}

impl PartialEq for NestedClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for NestedClass {}

/// Insertion-ordered set of nested classes, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedClassSet(Vec<NestedClass>);

impl NestedClassSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `class` unless a class with the same name is already present.
    ///
    /// Returns whether the class was inserted.
    pub fn insert(&mut self, class: NestedClass) -> bool {
        if self.contains(&class.name) {
            return false;
        }
        self.0.push(class);
        true
    }

    /// Merges another set into this one, keeping the first entry per name.
    pub fn merge(&mut self, other: Self) {
        for class in other.0 {
            self.insert(class);
        }
    }

    /// Whether a class named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|class| class.name == name)
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NestedClass> {
        self.0.iter().find(|class| class.name == name)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, NestedClass> {
        self.0.iter()
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a NestedClassSet {
    type Item = &'a NestedClass;
    type IntoIter = std::slice::Iter<'a, NestedClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Full key paths of every value field reachable from `fields`.
///
/// Nest fields are followed through `nested`; a class already on the current
/// path is not entered again.
#[must_use]
pub fn key_paths(fields: &[ConfigField], nested: &NestedClassSet) -> Vec<OptionKey> {
    let mut paths = Vec::new();
    let mut trail = Vec::new();
    walk_keys(fields, nested, &OptionKey::ROOT, &mut trail, &mut paths);
    paths
}

fn walk_keys<'a>(
    fields: &'a [ConfigField],
    nested: &'a NestedClassSet,
    parent: &OptionKey,
    trail: &mut Vec<&'a str>,
    paths: &mut Vec<OptionKey>,
) {
    for field in fields {
        let key = parent.child(field.key());
        match field {
            ConfigField::Value(_) => paths.push(key),
            ConfigField::Nest(nest) => {
                let name = nest.class_name.as_str();
                let Some(class) = nested.get(name) else {
                    continue;
                };
                if trail.contains(&name) {
                    continue;
                }
                trail.push(name);
                walk_keys(&class.fields, nested, &key, trail, paths);
                trail.pop();
            }
        }
    }
}
