//! JSON-backed [`SymbolSource`].
//!
//! A symbol dump lists declarations with their annotations and properties.
//! Names and types are written as text and parsed once on load:
//!
//! ```json
//! {
//!   "declarations": [
//!     {
//!       "name": "dev.example.Model",
//!       "source": "src/main/kotlin/dev/example/Model.kt",
//!       "annotations": {
//!         "io.wispforest.owo.config.annotation.Config": { "name": "model", "wrapperName": "ModelConfig" }
//!       },
//!       "properties": [
//!         { "name": "count", "type": "kotlin.Int", "mutable": true }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};

use super::{
    Annotated, AnnotationArgs, DeclarationId, DeclarationInfo, DeclarationKind, PropertyId,
    PropertyInfo, SymbolSource,
};
use crate::error::KowoError;
use crate::types::{ClassName, TypeRef, parse_type_ref};

/// Serialised form of the declaration universe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDump {
    /// Declarations in frontend order.
    #[serde(default)]
    pub declarations: Vec<DeclarationDump>,
}

/// Serialised declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationDump {
    /// Qualified name; `package/Outer.Inner` pins the package boundary.
    pub name: String,
    /// Declaration kind; defaults to `class`.
    #[serde(default)]
    pub kind: DeclarationKind,
    /// Containing source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Utf8PathBuf>,
    /// Names of the declaration's type parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    /// Annotations keyed by qualified annotation name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, AnnotationArgs>,
    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDump>,
}

/// Serialised property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDump {
    /// Simple name.
    pub name: String,
    /// Declared type as written by the frontend.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Whether the property is a `var`.
    #[serde(default)]
    pub mutable: bool,
    /// Whether the property has a backing field.
    #[serde(default = "default_true")]
    pub backing_field: bool,
    /// Whether the frontend resolved the type.
    #[serde(default = "default_true")]
    pub resolved: bool,
    /// Annotations keyed by qualified annotation name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, AnnotationArgs>,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug)]
struct DeclarationEntry {
    info: DeclarationInfo,
    annotations: BTreeMap<String, AnnotationArgs>,
    properties: Vec<PropertyEntry>,
    resolved: bool,
}

#[derive(Debug)]
struct PropertyEntry {
    info: PropertyInfo,
    ty: TypeRef,
    annotations: BTreeMap<String, AnnotationArgs>,
}

/// In-memory declaration universe.
#[derive(Debug, Default)]
pub struct SymbolTable {
    declarations: Vec<DeclarationEntry>,
    by_name: BTreeMap<String, DeclarationId>,
}

impl SymbolTable {
    /// Builds a table from a parsed dump.
    ///
    /// # Errors
    ///
    /// Returns [`KowoError::TypeRef`] when a declaration name does not parse,
    /// and [`KowoError::DuplicateDeclaration`] when two declarations share a
    /// qualified name. Property types outside the grammar are kept verbatim
    /// as [`TypeRef::Other`].
    pub fn from_dump(dump: SymbolDump) -> Result<Self, KowoError> {
        let mut table = Self::default();
        for declaration in dump.declarations {
            let id = DeclarationId::new(table.declarations.len());
            let entry = build_entry(declaration)?;
            let canonical = entry.info.name.canonical_name();
            if table.by_name.insert(canonical.clone(), id).is_some() {
                return Err(KowoError::DuplicateDeclaration(canonical));
            }
            table.declarations.push(entry);
        }
        Ok(table)
    }

    /// Parses a JSON symbol dump.
    ///
    /// # Errors
    ///
    /// Returns [`KowoError::SymbolDump`] for malformed JSON, otherwise as
    /// [`SymbolTable::from_dump`].
    pub fn from_json_str(text: &str) -> Result<Self, KowoError> {
        let dump: SymbolDump = serde_json::from_str(text)?;
        Self::from_dump(dump)
    }

    /// Reads a JSON symbol dump from disk.
    ///
    /// # Errors
    ///
    /// Returns [`KowoError::Io`] when the file cannot be read, otherwise as
    /// [`SymbolTable::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, KowoError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = path.file_name().ok_or_else(|| {
            KowoError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "symbol dump path has no file name"),
            )
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| KowoError::io(parent, err))?;
        let text = dir
            .read_to_string(file_name)
            .map_err(|err| KowoError::io(path, err))?;
        Self::from_json_str(&text)
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the table has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn entry(&self, id: DeclarationId) -> Option<&DeclarationEntry> {
        self.declarations.get(id.index())
    }

    fn property_entry(&self, id: PropertyId) -> Option<&PropertyEntry> {
        self.entry(id.declaration())?.properties.get(id.index())
    }
}

fn build_entry(declaration: DeclarationDump) -> Result<DeclarationEntry, KowoError> {
    let name = ClassName::parse(&declaration.name).map_err(|source| KowoError::TypeRef {
        symbol: declaration.name.clone(),
        source,
    })?;
    let canonical = name.canonical_name();
    let properties = declaration
        .properties
        .into_iter()
        .map(|property| build_property(&canonical, &declaration.type_parameters, property))
        .collect::<Vec<_>>();
    let resolved = properties.iter().all(|property| !property.ty.contains_error());
    Ok(DeclarationEntry {
        info: DeclarationInfo {
            name,
            kind: declaration.kind,
            source: declaration.source,
        },
        annotations: declaration.annotations,
        properties,
        resolved,
    })
}

fn build_property(
    owner: &str,
    type_parameters: &[String],
    property: PropertyDump,
) -> PropertyEntry {
    let ty = if property.resolved {
        match parse_type_ref(&property.type_ref) {
            Ok(parsed) => bind_type_parameters(parsed, type_parameters),
            Err(err) => {
                tracing::debug!(
                    symbol = %format!("{owner}.{}", property.name),
                    error = %err,
                    "keeping type reference as written"
                );
                TypeRef::Other(property.type_ref)
            }
        }
    } else {
        TypeRef::Error(property.type_ref)
    };
    PropertyEntry {
        info: PropertyInfo {
            name: property.name,
            mutable: property.mutable,
            has_backing_field: property.backing_field,
        },
        ty,
        annotations: property.annotations,
    }
}

/// Turns bare references to the owner's type parameters into type variables.
fn bind_type_parameters(ty: TypeRef, type_parameters: &[String]) -> TypeRef {
    if type_parameters.is_empty() {
        return ty;
    }
    match ty {
        TypeRef::Named(name)
            if name.package().is_empty()
                && name.simple_names().len() == 1
                && type_parameters.iter().any(|param| param == name.simple_name()) =>
        {
            TypeRef::TypeVariable(name.simple_name().to_owned())
        }
        TypeRef::Parameterized { raw, args } => TypeRef::Parameterized {
            raw,
            args: args
                .into_iter()
                .map(|arg| bind_type_parameters(arg, type_parameters))
                .collect(),
        },
        TypeRef::Nullable(inner) => {
            TypeRef::Nullable(Box::new(bind_type_parameters(*inner, type_parameters)))
        }
        TypeRef::Projection { variance, ty: inner } => TypeRef::Projection {
            variance,
            ty: Box::new(bind_type_parameters(*inner, type_parameters)),
        },
        TypeRef::Function { params, ret } => TypeRef::Function {
            params: params
                .into_iter()
                .map(|param| bind_type_parameters(param, type_parameters))
                .collect(),
            ret: Box::new(bind_type_parameters(*ret, type_parameters)),
        },
        other => other,
    }
}

impl SymbolSource for SymbolTable {
    fn find_marked(&self, marker: &str) -> Vec<DeclarationId> {
        self.declarations
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.annotations.contains_key(marker))
            .map(|(index, _)| DeclarationId::new(index))
            .collect()
    }

    fn declaration(&self, id: DeclarationId) -> Option<&DeclarationInfo> {
        self.entry(id).map(|entry| &entry.info)
    }

    fn list_properties(&self, id: DeclarationId) -> Vec<PropertyId> {
        self.entry(id).map_or_else(Vec::new, |entry| {
            (0..entry.properties.len())
                .map(|index| PropertyId::new(id, index))
                .collect()
        })
    }

    fn property(&self, id: PropertyId) -> Option<&PropertyInfo> {
        self.property_entry(id).map(|entry| &entry.info)
    }

    fn resolve_type(&self, id: PropertyId) -> TypeRef {
        self.property_entry(id).map_or_else(
            || TypeRef::Error(format!("<unknown property {}>", id.index())),
            |entry| entry.ty.clone(),
        )
    }

    fn resolve_declaration(&self, name: &ClassName) -> Option<DeclarationId> {
        self.by_name.get(&name.canonical_name()).copied()
    }

    fn annotation_args(&self, target: Annotated, marker: &str) -> Option<AnnotationArgs> {
        let annotations = match target {
            Annotated::Declaration(id) => &self.entry(id)?.annotations,
            Annotated::Property(id) => &self.property_entry(id)?.annotations,
        };
        annotations.get(marker).cloned()
    }

    fn is_fully_resolved(&self, id: DeclarationId) -> bool {
        self.entry(id).is_some_and(|entry| entry.resolved)
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
    use crate::symbols::CONFIG_MARKER;
    use rstest::{fixture, rstest};

    const DUMP: &str = r#"{
        "declarations": [
            {
                "name": "dev.example.Model",
                "source": "src/Model.kt",
                "annotations": {
                    "io.wispforest.owo.config.annotation.Config": { "wrapperName": "ModelConfig" }
                },
                "properties": [
                    { "name": "count", "type": "kotlin.Int", "mutable": true },
                    { "name": "derived", "type": "kotlin.String", "backing_field": false }
                ]
            },
            {
                "name": "dev.example.Box",
                "type_parameters": ["T"],
                "properties": [
                    { "name": "item", "type": "T?" },
                    { "name": "items", "type": "kotlin.collections.List<T>" }
                ]
            },
            {
                "name": "dev.example.Pending",
                "annotations": {
                    "io.wispforest.owo.config.annotation.Config": { "wrapperName": "PendingConfig" }
                },
                "properties": [
                    { "name": "other", "type": "com.elsewhere.Missing", "resolved": false }
                ]
            }
        ]
    }"#;

    #[fixture]
    fn table() -> SymbolTable {
        SymbolTable::from_json_str(DUMP).expect("load dump")
    }

    #[rstest]
    fn finds_marked_declarations_in_order(table: SymbolTable) {
        let marked = table.find_marked(CONFIG_MARKER);
        let names: Vec<_> = marked
            .iter()
            .filter_map(|id| table.declaration(*id))
            .map(|info| info.name.canonical_name())
            .collect();
        assert_eq!(names, ["dev.example.Model", "dev.example.Pending"]);
    }

    #[rstest]
    fn exposes_property_facts(table: SymbolTable) {
        let model = table
            .resolve_declaration(&ClassName::new("dev.example", ["Model"]))
            .expect("model declared");
        let properties = table.list_properties(model);
        assert_eq!(properties.len(), 2);
        let derived = properties.get(1).and_then(|id| table.property(*id)).expect("derived");
        assert_eq!(derived.name, "derived");
        assert!(!derived.has_backing_field);
        assert!(!derived.mutable);
    }

    #[rstest]
    fn binds_type_parameters(table: SymbolTable) {
        let holder = table
            .resolve_declaration(&ClassName::new("dev.example", ["Box"]))
            .expect("box declared");
        let types: Vec<_> = table
            .list_properties(holder)
            .into_iter()
            .map(|id| table.resolve_type(id))
            .collect();
        assert!(types.first().is_some_and(TypeRef::is_type_variable));
        assert_eq!(
            types.get(1).map(ToString::to_string).as_deref(),
            Some("kotlin.collections.List<T>")
        );
        assert!(matches!(
            types.get(1),
            Some(TypeRef::Parameterized { args, .. }) if matches!(args.first(), Some(TypeRef::TypeVariable(_)))
        ));
    }

    #[rstest]
    fn unresolved_properties_defer_their_declaration(table: SymbolTable) {
        let pending = table
            .resolve_declaration(&ClassName::new("dev.example", ["Pending"]))
            .expect("pending declared");
        let model = table
            .resolve_declaration(&ClassName::new("dev.example", ["Model"]))
            .expect("model declared");
        assert!(!table.is_fully_resolved(pending));
        assert!(table.is_fully_resolved(model));
    }

    #[rstest]
    fn rejects_duplicate_declarations() {
        let dump = r#"{"declarations": [{"name": "a.B"}, {"name": "a/B"}]}"#;
        let err = SymbolTable::from_json_str(dump).expect_err("duplicate");
        assert!(matches!(err, KowoError::DuplicateDeclaration(name) if name == "a.B"));
    }

    #[rstest]
    #[case("kotlin.Int.() -> kotlin.Unit")]
    #[case("suspend () -> kotlin.Unit")]
    #[case("kotlin.collections.List<@Ann kotlin.Int>")]
    fn keeps_unparseable_types_verbatim(#[case] written: &str) {
        let dump = serde_json::json!({"declarations": [{
            "name": "a.B",
            "properties": [{"name": "cb", "type": written}, {"name": "ok", "type": "kotlin.Int"}]
        }]});
        let table = SymbolTable::from_json_str(&dump.to_string()).expect("load dump");
        let holder = DeclarationId::new(0);
        let types: Vec<_> = table
            .list_properties(holder)
            .into_iter()
            .map(|id| table.resolve_type(id))
            .collect();
        assert_eq!(types.first(), Some(&TypeRef::Other(written.to_owned())));
        assert_eq!(types.get(1).map(ToString::to_string).as_deref(), Some("kotlin.Int"));
        assert!(table.is_fully_resolved(holder));
    }

    #[rstest]
    fn rejects_unparseable_declaration_names() {
        let dump = r#"{"declarations": [{"name": "a.<B>"}]}"#;
        let err = SymbolTable::from_json_str(dump).expect_err("bad name");
        assert!(matches!(err, KowoError::TypeRef { symbol, .. } if symbol == "a.<B>"));
    }

    #[rstest]
    fn foreign_handles_resolve_to_nothing(table: SymbolTable) {
        let bogus = DeclarationId::new(99);
        assert!(table.declaration(bogus).is_none());
        assert!(table.list_properties(bogus).is_empty());
        assert!(!table.is_fully_resolved(bogus));
        assert!(matches!(
            table.resolve_type(PropertyId::new(bogus, 0)),
            TypeRef::Error(_)
        ));
    }
}
