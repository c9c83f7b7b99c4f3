//! Query interface onto the declaration frontend.
//!
//! The generator never walks source itself. It asks a [`SymbolSource`] for
//! marked declarations, their properties and resolved types, passing opaque
//! handles around explicitly. [`SymbolTable`] is the bundled implementation,
//! loaded from a JSON symbol dump.

mod table;

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

pub use table::{DeclarationDump, PropertyDump, SymbolDump, SymbolTable};

use crate::types::{ClassName, TypeRef};

/// Qualified name of owo-config's `@Config` annotation.
pub const CONFIG_MARKER: &str = "io.wispforest.owo.config.annotation.Config";
/// Qualified name of owo-config's `@Nest` annotation.
pub const NEST_MARKER: &str = "io.wispforest.owo.config.annotation.Nest";
/// Qualified name of owo-config's `@Hook` annotation.
pub const HOOK_MARKER: &str = "io.wispforest.owo.config.annotation.Hook";

/// Handle to a declaration of a [`SymbolSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(usize);

impl DeclarationId {
    /// Wraps a source-specific index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Source-specific index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to a property of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId {
    declaration: DeclarationId,
    index: usize,
}

impl PropertyId {
    /// Wraps the declaring handle and the property's position.
    #[must_use]
    pub const fn new(declaration: DeclarationId, index: usize) -> Self {
        Self { declaration, index }
    }

    /// Declaration owning the property.
    #[must_use]
    pub const fn declaration(self) -> DeclarationId {
        self.declaration
    }

    /// Position of the property in declaration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Anything annotations can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotated {
    /// A declaration.
    Declaration(DeclarationId),
    /// A property.
    Property(PropertyId),
}

/// Kind of a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `class`
    #[default]
    Class,
    /// `interface`
    Interface,
    /// `object`
    Object,
    /// `enum class`
    Enum,
    /// `annotation class`
    Annotation,
    /// `typealias`
    TypeAlias,
}

impl DeclarationKind {
    /// Whether declarations of this kind can model configuration.
    #[must_use]
    pub const fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Object | Self::Enum)
    }
}

/// Facts about a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationInfo {
    /// Qualified name.
    pub name: ClassName,
    /// Declaration kind.
    pub kind: DeclarationKind,
    /// Containing source file, if the declaration comes from source.
    pub source: Option<Utf8PathBuf>,
}

/// Facts about a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Simple name.
    pub name: String,
    /// Whether the property is a `var`.
    pub mutable: bool,
    /// Whether the property stores state (as opposed to a computed getter).
    pub has_backing_field: bool,
}

/// A single annotation argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// String literal or enum entry name.
    Str(String),
    /// Array argument.
    List(Vec<AnnotationValue>),
}

/// Arguments of one annotation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationArgs(BTreeMap<String, AnnotationValue>);

impl AnnotationArgs {
    /// Creates an empty argument map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets an argument, returning the map for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Raw argument value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.0.get(key)
    }

    /// String argument, if present and a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(AnnotationValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Boolean argument, if present and a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(AnnotationValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Qualified names of the annotations the generator reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Marks a model class; carries `wrapperName` and `defaultHook`.
    pub config: String,
    /// Marks a property whose class becomes a nested section.
    pub nest: String,
    /// Marks a property that gets a subscription hook.
    pub hook: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            config: CONFIG_MARKER.to_owned(),
            nest: NEST_MARKER.to_owned(),
            hook: HOOK_MARKER.to_owned(),
        }
    }
}

/// Read-only view of the declaration universe.
///
/// Handles passed in must have been produced by the same source. Lookups of
/// foreign handles return `None`, an empty list, or [`TypeRef::Error`].
pub trait SymbolSource {
    /// Declarations annotated with `marker`, in frontend order.
    fn find_marked(&self, marker: &str) -> Vec<DeclarationId>;

    /// Facts about a declaration.
    fn declaration(&self, id: DeclarationId) -> Option<&DeclarationInfo>;

    /// Properties of a declaration in declaration order.
    fn list_properties(&self, id: DeclarationId) -> Vec<PropertyId>;

    /// Facts about a property.
    fn property(&self, id: PropertyId) -> Option<&PropertyInfo>;

    /// Resolved type of a property.
    fn resolve_type(&self, id: PropertyId) -> TypeRef;

    /// Declaration named by `name`, if it belongs to the universe.
    fn resolve_declaration(&self, name: &ClassName) -> Option<DeclarationId>;

    /// Arguments of `marker` on `target`, or `None` when not annotated.
    fn annotation_args(&self, target: Annotated, marker: &str) -> Option<AnnotationArgs>;

    /// Whether every type the declaration references is resolved.
    fn is_fully_resolved(&self, id: DeclarationId) -> bool;

    /// Whether `target` carries `marker`.
    fn has_annotation(&self, target: Annotated, marker: &str) -> bool {
        self.annotation_args(target, marker).is_some()
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        unfulfilled_lint_expectations,
        reason = "clippy::expect_used is denied globally; tests may not hit those branches"
    )]
    #![expect(clippy::expect_used, reason = "test panics are acceptable")]
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn annotation_args_read_typed_values() {
        let args = AnnotationArgs::new()
            .with("wrapperName", AnnotationValue::Str("MyConfig".to_owned()))
            .with("defaultHook", AnnotationValue::Bool(true));
        assert_eq!(args.get_str("wrapperName"), Some("MyConfig"));
        assert_eq!(args.get_bool("defaultHook"), Some(true));
        assert_eq!(args.get_bool("wrapperName"), None);
        assert_eq!(args.get_str("missing"), None);
    }

    #[rstest]
    fn annotation_values_deserialise_untagged() {
        let args: AnnotationArgs =
            serde_json::from_str(r#"{"name": "demo", "defaultHook": false, "order": 3, "tags": ["a"]}"#)
                .expect("parse args");
        assert_eq!(args.get("order"), Some(&AnnotationValue::Int(3)));
        assert_eq!(
            args.get("tags"),
            Some(&AnnotationValue::List(vec![AnnotationValue::Str("a".to_owned())]))
        );
    }

    #[rstest]
    #[case(DeclarationKind::Class, true)]
    #[case(DeclarationKind::Object, true)]
    #[case(DeclarationKind::Annotation, false)]
    #[case(DeclarationKind::TypeAlias, false)]
    fn class_like_kinds(#[case] kind: DeclarationKind, #[case] expected: bool) {
        assert_eq!(kind.is_class_like(), expected);
    }
}
