//! Kotlin source rendering for owo-config wrappers.
//!
//! [`emit`] is a pure function of the model and its collected members: the
//! same input always renders byte-identical text.
//!
//! For a model `dev.example.Model` with wrapper name `ModelConfig` and a
//! single `var count: Int` the output reads:
//!
//! ```text
//! package dev.example
//!
//! import io.wispforest.owo.config.ConfigWrapper
//! import io.wispforest.owo.config.Option
//! import kotlin.reflect.KProperty
//!
//! class ModelConfig private constructor(builder: BuilderConsumer) : ConfigWrapper<Model>(Model::class.java, builder) {
//!     private val parentKey = Option.Key.ROOT
//!
//!     constructor() : this({})
//!
//!     companion object {
//!         fun createAndLoad(builder: BuilderConsumer = BuilderConsumer {}): ModelConfig {
//!             return ModelConfig(builder).apply {
//!                 load()
//!             }
//!         }
//!     }
//!
//!     var count: Int by optionForKey(parentKey.child("count"))!!
//! }
//!
//! private operator fun <T> Option<T>.getValue(thisRef: Any?, property: KProperty<*>): T = this.value()
//!
//! private operator fun <T> Option<T>.setValue(thisRef: Any?, property: KProperty<*>, value: T): Unit = this.set(value)
//! ```

mod writer;

use crate::model::{ConfigField, ConfigModel, NestField, NestedClass, NestedClassSet, ValueField};
use writer::SourceWriter;

const IMPORTS: &[&str] = &[
    "io.wispforest.owo.config.ConfigWrapper",
    "io.wispforest.owo.config.Option",
    "kotlin.reflect.KProperty",
];

const DELEGATE_GLUE: &[&str] = &[
    "private operator fun <T> Option<T>.getValue(thisRef: Any?, property: KProperty<*>): T = this.value()",
    "private operator fun <T> Option<T>.setValue(thisRef: Any?, property: KProperty<*>, value: T): Unit = this.set(value)",
];

/// Renders the wrapper source file for `model`.
///
/// Identifiers are written as given; callers must supply legal Kotlin names.
#[must_use]
pub fn emit(model: &ConfigModel, fields: &[ConfigField], nested: &NestedClassSet) -> String {
    let mut out = SourceWriter::new();
    if !model.package().is_empty() {
        out.line(&format!("package {}", model.package()));
        out.blank();
    }
    for import in IMPORTS {
        out.line(&format!("import {import}"));
    }
    out.blank();

    write_wrapper_class(&mut out, model, fields, nested);

    for glue in DELEGATE_GLUE {
        out.blank();
        out.line(glue);
    }
    out.finish()
}

fn write_wrapper_class(
    out: &mut SourceWriter,
    model: &ConfigModel,
    fields: &[ConfigField],
    nested: &NestedClassSet,
) {
    let wrapper = &model.wrapper_name;
    let target = model.name.nested_name();
    out.open(&format!(
        "class {wrapper} private constructor(builder: BuilderConsumer) : ConfigWrapper<{target}>({target}::class.java, builder)"
    ));
    out.line("private val parentKey = Option.Key.ROOT");
    out.blank();
    out.line("constructor() : this({})");
    out.blank();
    out.open("companion object");
    out.open(&format!(
        "fun createAndLoad(builder: BuilderConsumer = BuilderConsumer {{}}): {wrapper}"
    ));
    out.open(&format!("return {wrapper}(builder).apply"));
    out.line("load()");
    out.close();
    out.close();
    out.close();

    for field in fields {
        out.blank();
        write_field(out, field);
    }
    for class in nested {
        out.blank();
        write_nested_class(out, class);
    }
    out.close();
}

fn write_nested_class(out: &mut SourceWriter, class: &NestedClass) {
    out.open(&format!(
        "inner class {}(private val parentKey: Option.Key)",
        class.name
    ));
    for (index, field) in class.fields.iter().enumerate() {
        if index > 0 {
            out.blank();
        }
        write_field(out, field);
    }
    out.close();
}

fn write_field(out: &mut SourceWriter, field: &ConfigField) {
    match field {
        ConfigField::Value(value) => write_value_field(out, value),
        ConfigField::Nest(nest) => write_nest_field(out, nest),
    }
}

fn write_value_field(out: &mut SourceWriter, field: &ValueField) {
    let keyword = if field.mutable { "var" } else { "val" };
    let ValueField {
        name,
        key,
        type_name,
        ..
    } = field;
    out.line(&format!(
        "{keyword} {name}: {type_name} by optionForKey(parentKey.child(\"{key}\"))!!"
    ));
    if field.subscribe {
        out.blank();
        out.open(&format!(
            "fun subscribeTo{}(subscriber: ({type_name}) -> Unit)",
            capitalize(name)
        ));
        out.line(&format!(
            "optionForKey<{type_name}>(parentKey.child(\"{key}\"))!!.observe(subscriber)"
        ));
        out.close();
    }
}

fn write_nest_field(out: &mut SourceWriter, field: &NestField) {
    out.line(&format!(
        "val {} = {}(parentKey.child(\"{}\"))",
        field.name, field.class_name, field.key
    ));
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
