//! Builders for JSON symbol dumps.
//!
//! Fixtures are produced as JSON text so tests can feed them through the same
//! loading path the command line uses.
//!
//! ```
//! use kowo_config_test_helpers::symbols::{Declaration, Property, dump};
//!
//! let text = dump([Declaration::new("dev.example.Model")
//!     .config("ModelConfig")
//!     .property(Property::new("count", "kotlin.Int").mutable())]);
//! assert!(text.contains("ModelConfig"));
//! ```

use serde_json::{Map, Value, json};

/// Qualified name of the config marker.
pub const CONFIG: &str = "io.wispforest.owo.config.annotation.Config";
/// Qualified name of the nest marker.
pub const NEST: &str = "io.wispforest.owo.config.annotation.Nest";
/// Qualified name of the hook marker.
pub const HOOK: &str = "io.wispforest.owo.config.annotation.Hook";

/// A property entry of a symbol dump.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    ty: String,
    mutable: bool,
    backing_field: bool,
    resolved: bool,
    annotations: Map<String, Value>,
}

impl Property {
    /// An immutable, stored, resolved property.
    #[must_use]
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_owned(),
            ty: ty.to_owned(),
            mutable: false,
            backing_field: true,
            resolved: true,
            annotations: Map::new(),
        }
    }

    /// Marks the property as a `var`.
    #[must_use]
    pub const fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }

    /// Removes the backing field.
    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.backing_field = false;
        self
    }

    /// Leaves the type unresolved.
    #[must_use]
    pub const fn unresolved(mut self) -> Self {
        self.resolved = false;
        self
    }

    /// Adds the nest marker.
    #[must_use]
    pub fn nest(self) -> Self {
        self.annotate(NEST)
    }

    /// Adds the hook marker.
    #[must_use]
    pub fn hook(self) -> Self {
        self.annotate(HOOK)
    }

    /// Adds an argument-less annotation.
    #[must_use]
    pub fn annotate(mut self, marker: &str) -> Self {
        self.annotations.insert(marker.to_owned(), json!({}));
        self
    }

    fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.ty,
            "mutable": self.mutable,
            "backing_field": self.backing_field,
            "resolved": self.resolved,
            "annotations": self.annotations,
        })
    }
}

/// A declaration entry of a symbol dump.
#[derive(Debug, Clone)]
pub struct Declaration {
    name: String,
    kind: Option<String>,
    source: Option<String>,
    type_parameters: Vec<String>,
    annotations: Map<String, Value>,
    properties: Vec<Property>,
}

impl Declaration {
    /// A plain class with no annotations or properties.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind: None,
            source: None,
            type_parameters: Vec::new(),
            annotations: Map::new(),
            properties: Vec::new(),
        }
    }

    /// Adds the config marker naming the wrapper.
    #[must_use]
    pub fn config(self, wrapper_name: &str) -> Self {
        self.config_with(json!({ "wrapperName": wrapper_name }))
    }

    /// Adds the config marker with arbitrary arguments.
    #[must_use]
    pub fn config_with(mut self, args: Value) -> Self {
        self.annotations.insert(CONFIG.to_owned(), args);
        self
    }

    /// Sets the declaration kind, e.g. `"object"`.
    #[must_use]
    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_owned());
        self
    }

    /// Sets the containing source file.
    #[must_use]
    pub fn source(mut self, path: &str) -> Self {
        self.source = Some(path.to_owned());
        self
    }

    /// Declares a type parameter.
    #[must_use]
    pub fn type_parameter(mut self, name: &str) -> Self {
        self.type_parameters.push(name.to_owned());
        self
    }

    /// Appends a property.
    #[must_use]
    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    fn to_value(&self) -> Value {
        let mut value = Map::new();
        value.insert("name".to_owned(), json!(self.name));
        if let Some(kind) = &self.kind {
            value.insert("kind".to_owned(), json!(kind));
        }
        if let Some(source) = &self.source {
            value.insert("source".to_owned(), json!(source));
        }
        value.insert("type_parameters".to_owned(), json!(self.type_parameters));
        value.insert("annotations".to_owned(), Value::Object(self.annotations.clone()));
        value.insert(
            "properties".to_owned(),
            Value::Array(self.properties.iter().map(Property::to_value).collect()),
        );
        Value::Object(value)
    }
}

/// Renders declarations as a symbol dump.
#[must_use]
pub fn dump(declarations: impl IntoIterator<Item = Declaration>) -> String {
    let declarations: Vec<Value> = declarations
        .into_iter()
        .map(|declaration| declaration.to_value())
        .collect();
    json!({ "declarations": declarations }).to_string()
}

/// `Model { count: Int, name: String, @Nest sub: Sub { enabled: Boolean } }`.
#[must_use]
pub fn nested_model() -> String {
    dump([
        Declaration::new("dev.example.Model")
            .config("ModelConfig")
            .source("src/main/kotlin/dev/example/Model.kt")
            .property(Property::new("count", "kotlin.Int").mutable())
            .property(Property::new("name", "kotlin.String").mutable())
            .property(Property::new("sub", "dev.example.Sub").nest()),
        Declaration::new("dev.example.Sub")
            .source("src/main/kotlin/dev/example/Model.kt")
            .property(Property::new("enabled", "kotlin.Boolean").mutable()),
    ])
}

/// A model whose `volume` field carries the hook marker.
#[must_use]
pub fn hooked_model() -> String {
    dump([Declaration::new("dev.example.Audio")
        .config("AudioConfig")
        .source("src/main/kotlin/dev/example/Audio.kt")
        .property(Property::new("volume", "kotlin.collections.List<dev.example.Level>").mutable().hook())
        .property(Property::new("muted", "kotlin.Boolean").mutable())])
}

/// `class A { @Nest a: A; x: Int }`.
#[must_use]
pub fn self_nesting_model() -> String {
    dump([Declaration::new("dev.example.A")
        .config("AConfig")
        .source("src/main/kotlin/dev/example/A.kt")
        .property(Property::new("a", "dev.example.A").nest())
        .property(Property::new("x", "kotlin.Int").mutable())])
}

/// A model with `count` scalar fields named `field0`, `field1`, ...
#[must_use]
pub fn scalar_model(count: usize) -> String {
    let types = ["kotlin.Int", "kotlin.String", "kotlin.Boolean", "kotlin.Double"];
    let model = types.iter().cycle().take(count).enumerate().fold(
        Declaration::new("dev.example.Scalars").config("ScalarsConfig"),
        |declaration, (index, ty)| {
            declaration.property(Property::new(&format!("field{index}"), ty).mutable())
        },
    );
    dump([model])
}

/// A ready model plus a model whose only field is resolved per `resolved`.
#[must_use]
pub fn deferred_models(resolved: bool) -> String {
    let target = Property::new("target", "dev.example.later.Target");
    let pending = if resolved { target } else { target.unresolved() };
    dump([
        Declaration::new("dev.example.Ready")
            .config("ReadyConfig")
            .property(Property::new("on", "kotlin.Boolean").mutable()),
        Declaration::new("dev.example.Pending")
            .config("PendingConfig")
            .property(pending),
    ])
}

/// `Model { @Nest sub: Sub { later: com.other.Thing } }` with `later`
/// resolved per `resolved`.
#[must_use]
pub fn nested_pending_model(resolved: bool) -> String {
    let property = Property::new("later", "com.other.Thing");
    let later = if resolved { property } else { property.unresolved() };
    dump([
        Declaration::new("dev.example.Model")
            .config("ModelConfig")
            .property(Property::new("sub", "dev.example.Sub").nest()),
        Declaration::new("dev.example.Sub").property(later),
    ])
}
