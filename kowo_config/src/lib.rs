//! Generates typed owo-config wrappers for annotated Kotlin config models.
//!
//! The crate reads declarations through a [`SymbolSource`], finds those
//! carrying the `@Config` marker, and renders one Kotlin wrapper per model:
//! delegated properties bound to option keys, optional change subscriptions,
//! and inner classes for `@Nest` sections. [`Processor`] ties the stages
//! together across incremental rounds:
//!
//! 1. [`scan`] splits marked declarations into ready and deferred.
//! 2. [`FieldCollector`] walks each model's properties recursively.
//! 3. [`emit`] renders the collected members as source text.
//! 4. [`OutputWriter`] persists the file atomically with a dependency record.
//!
//! ```
//! use kowo_config::{ProcessorOptions, SymbolSource, SymbolTable, build_model, generate};
//!
//! let table = SymbolTable::from_json_str(r#"{
//!     "declarations": [{
//!         "name": "dev.example.Model",
//!         "annotations": {
//!             "io.wispforest.owo.config.annotation.Config": { "wrapperName": "ModelConfig" }
//!         },
//!         "properties": [{ "name": "count", "type": "kotlin.Int", "mutable": true }]
//!     }]
//! }"#)?;
//! let options = ProcessorOptions::default();
//! let id = table.find_marked(&options.markers.config)[0];
//! let model = build_model(&table, id, &options.markers).map_err(|d| d.to_string())?;
//! let generation = generate(&table, &model, &options);
//! assert!(generation.file.content.contains("var count: Int by optionForKey"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod collect;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod model;
pub mod output;
pub mod processor;
pub mod scan;
pub mod symbols;
pub mod types;

pub use collect::{Collected, FieldCollector};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use emit::emit;
pub use error::KowoError;
pub use model::{
    ConfigField, ConfigModel, NestField, NestedClass, NestedClassSet, OptionKey, ValueField,
    key_paths,
};
pub use output::{DependencyRecord, GeneratedFile, OutputWriter, WriteStatus, WrittenFile};
pub use processor::{Generation, Processor, ProcessorOptions, RoundOutcome, build_model, generate};
pub use scan::{ScanResult, scan};
pub use symbols::{
    Annotated, AnnotationArgs, AnnotationValue, DeclarationId, DeclarationKind, Markers,
    PropertyId, SymbolSource, SymbolTable,
};
pub use types::{ClassName, TypeNameSimplifier, TypeRef, parse_type_ref};
