//! Generation rounds: scan, collect, emit and write.

use std::collections::BTreeSet;

use crate::collect::FieldCollector;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::emit::emit;
use crate::error::KowoError;
use crate::model::{ConfigModel, key_paths};
use crate::output::{GeneratedFile, OutputWriter, WrittenFile};
use crate::scan::scan;
use crate::symbols::{Annotated, DeclarationId, Markers, SymbolSource};
use crate::types::TypeNameSimplifier;
use crate::types::simplify::default_namespaces;

/// Config marker argument naming the generated wrapper class.
pub const WRAPPER_NAME_ARG: &str = "wrapperName";
/// Config marker argument enabling hooks on every field.
pub const DEFAULT_HOOK_ARG: &str = "defaultHook";

/// Knobs shared by every model of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// Annotations the generator reacts to.
    pub markers: Markers,
    /// Namespaces always rendered by simple name, besides the model package.
    pub simplified_namespaces: Vec<String>,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            simplified_namespaces: default_namespaces(),
        }
    }
}

/// A rendered wrapper together with what was found while rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// File to persist.
    pub file: GeneratedFile,
    /// Diagnostics raised while collecting fields.
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything one round produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Files persisted this round.
    pub written: Vec<WrittenFile>,
    /// Qualified names of models waiting for a later round.
    pub deferred: Vec<String>,
    /// All diagnostics, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl RoundOutcome {
    /// Number of error diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error)
            .count()
    }

    /// Whether any error diagnostic was raised.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Drives generation across incremental rounds.
///
/// The only state kept between rounds is the set of models already handled,
/// so a model resubmitted after deferral is generated exactly once.
#[derive(Debug)]
pub struct Processor {
    options: ProcessorOptions,
    writer: OutputWriter,
    handled: BTreeSet<String>,
}

impl Processor {
    /// Creates a processor writing through `writer`.
    #[must_use]
    pub const fn new(options: ProcessorOptions, writer: OutputWriter) -> Self {
        Self {
            options,
            writer,
            handled: BTreeSet::new(),
        }
    }

    /// Runs one round over `source`.
    ///
    /// Ready models not handled in an earlier round are generated and
    /// written; unresolved ones are reported as deferred.
    ///
    /// # Errors
    ///
    /// Returns [`KowoError`] when an output file cannot be written. The model
    /// whose write failed stays unhandled, so a later round retries it.
    /// Problems with individual models are reported as diagnostics instead.
    pub fn process_round<S>(&mut self, source: &S) -> Result<RoundOutcome, KowoError>
    where
        S: SymbolSource + ?Sized,
    {
        let scanned = scan(source, &self.options.markers);
        let mut outcome = RoundOutcome::default();

        for id in scanned.deferred {
            let name = qualified_name(source, id);
            let diagnostic = Diagnostic::new(
                DiagnosticKind::DeferredSymbol,
                name.clone(),
                "declaration is not fully resolved; deferring to a later round",
            );
            diagnostic.log();
            outcome.diagnostics.push(diagnostic);
            outcome.deferred.push(name);
        }

        for id in scanned.ready {
            let name = qualified_name(source, id);
            if self.handled.contains(&name) {
                tracing::debug!(model = %name, "already generated in an earlier round");
                continue;
            }
            let model = match build_model(source, id, &self.options.markers) {
                Ok(model) => model,
                Err(diagnostic) => {
                    diagnostic.log();
                    outcome.diagnostics.push(diagnostic);
                    self.handled.insert(name);
                    continue;
                }
            };
            let generation = generate(source, &model, &self.options);
            for diagnostic in &generation.diagnostics {
                diagnostic.log();
            }
            outcome.diagnostics.extend(generation.diagnostics);
            outcome.written.push(self.writer.write(&generation.file)?);
            self.handled.insert(name);
        }
        Ok(outcome)
    }
}

/// Reads the config marker on `id` into a [`ConfigModel`].
///
/// # Errors
///
/// Returns a [`DiagnosticKind::MissingWrapperName`] diagnostic when the
/// marker has no usable `wrapperName`.
pub fn build_model<S>(
    source: &S,
    id: DeclarationId,
    markers: &Markers,
) -> Result<ConfigModel, Diagnostic>
where
    S: SymbolSource + ?Sized,
{
    let name = qualified_name(source, id);
    let info = source.declaration(id).ok_or_else(|| {
        Diagnostic::new(
            DiagnosticKind::MissingWrapperName,
            name.clone(),
            "declaration is not part of the symbol source",
        )
    })?;
    let args = source
        .annotation_args(Annotated::Declaration(id), &markers.config)
        .unwrap_or_default();
    let wrapper_name = args
        .get_str(WRAPPER_NAME_ARG)
        .filter(|wrapper| !wrapper.is_empty())
        .ok_or_else(|| {
            Diagnostic::new(
                DiagnosticKind::MissingWrapperName,
                name,
                format!("config marker has no `{WRAPPER_NAME_ARG}`; no wrapper generated"),
            )
        })?;
    Ok(ConfigModel {
        declaration: id,
        name: info.name.clone(),
        wrapper_name: wrapper_name.to_owned(),
        default_hook: args.get_bool(DEFAULT_HOOK_ARG).unwrap_or(false),
        source: info.source.clone(),
    })
}

/// Collects and renders the wrapper for `model` without touching disk.
#[must_use]
pub fn generate<S>(source: &S, model: &ConfigModel, options: &ProcessorOptions) -> Generation
where
    S: SymbolSource + ?Sized,
{
    let simplifier = TypeNameSimplifier::new(model.package(), &options.simplified_namespaces);
    let collected = FieldCollector::new(source, &options.markers, simplifier)
        .collect(model.declaration, model.default_hook);

    for key in key_paths(&collected.fields, &collected.nested) {
        tracing::debug!(model = %model.name, key = %key, "option key");
    }

    let content = emit(model, &collected.fields, &collected.nested);
    Generation {
        file: GeneratedFile {
            package: model.package().to_owned(),
            file_name: model.wrapper_name.clone(),
            content,
            sources: model.source.iter().cloned().collect(),
            aggregating: true,
        },
        diagnostics: collected.diagnostics,
    }
}

fn qualified_name<S>(source: &S, id: DeclarationId) -> String
where
    S: SymbolSource + ?Sized,
{
    source.declaration(id).map_or_else(
        || format!("<declaration {}>", id.index()),
        |info| info.name.canonical_name(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(
        unfulfilled_lint_expectations,
        reason = "clippy::expect_used is denied globally; tests may not hit those branches"
    )]
    #![expect(clippy::expect_used, reason = "test panics are acceptable")]
    use super::*;
    use crate::symbols::SymbolTable;
    use camino::Utf8PathBuf;
    use rstest::rstest;

    fn table(config_args: &str) -> SymbolTable {
        SymbolTable::from_json_str(&format!(
            r#"{{"declarations": [{{
                "name": "dev.example.Model",
                "source": "src/Model.kt",
                "annotations": {{"io.wispforest.owo.config.annotation.Config": {config_args}}},
                "properties": [{{"name": "count", "type": "kotlin.Int", "mutable": true}}]
            }}]}}"#
        ))
        .expect("load table")
    }

    #[rstest]
    #[case(r#"{}"#)]
    #[case(r#"{"wrapperName": ""}"#)]
    #[case(r#"{"wrapperName": true}"#)]
    fn missing_wrapper_name_is_an_error(#[case] args: &str) {
        let symbols = table(args);
        let err = build_model(&symbols, DeclarationId::new(0), &Markers::default())
            .expect_err("no wrapper name");
        assert_eq!(err.kind, DiagnosticKind::MissingWrapperName);
        assert_eq!(err.symbol, "dev.example.Model");
    }

    #[rstest]
    fn model_reads_marker_arguments() {
        let symbols = table(r#"{"wrapperName": "ModelConfig", "defaultHook": true}"#);
        let model = build_model(&symbols, DeclarationId::new(0), &Markers::default())
            .expect("model");
        assert_eq!(model.wrapper_name, "ModelConfig");
        assert!(model.default_hook);
        assert_eq!(model.package(), "dev.example");
    }

    #[rstest]
    fn default_hook_subscribes_every_field() {
        let symbols = table(r#"{"wrapperName": "ModelConfig", "defaultHook": true}"#);
        let model = build_model(&symbols, DeclarationId::new(0), &Markers::default())
            .expect("model");
        let generation = generate(&symbols, &model, &ProcessorOptions::default());
        assert!(generation.file.content.contains("fun subscribeToCount(subscriber: (Int) -> Unit)"));
        assert_eq!(generation.file.file_name, "ModelConfig");
        assert_eq!(generation.file.sources, [Utf8PathBuf::from("src/Model.kt")]);
    }

    #[rstest]
    fn error_count_ignores_warnings() {
        let outcome = RoundOutcome {
            diagnostics: vec![
                Diagnostic::new(DiagnosticKind::MissingStorageSlot, "a", "w"),
                Diagnostic::new(DiagnosticKind::InvalidFieldShape, "b", "e"),
            ],
            ..RoundOutcome::default()
        };
        assert_eq!(outcome.error_count(), 1);
        assert!(outcome.has_errors());
    }
}
