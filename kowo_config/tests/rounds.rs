//! Incremental rounds and persisted output.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface fixture mistakes"
)]

use anyhow::Result;
use camino::Utf8PathBuf;
use kowo_config::{
    DependencyRecord, DiagnosticKind, OutputWriter, Processor, ProcessorOptions, SymbolTable,
    WriteStatus,
};
use rstest::{fixture, rstest};
use test_helpers::fs::TempWorkspace;
use test_helpers::symbols::{deferred_models, nested_model, nested_pending_model};

#[fixture]
fn workspace() -> TempWorkspace {
    TempWorkspace::new().expect("create workspace")
}

fn processor(workspace: &TempWorkspace) -> Processor {
    Processor::new(
        ProcessorOptions::default(),
        OutputWriter::new(workspace.path("kotlin"), workspace.path("deps")),
    )
}

#[rstest]
fn writes_source_and_dependency_record(workspace: TempWorkspace) -> Result<()> {
    let table = SymbolTable::from_json_str(&nested_model())?;
    let outcome = processor(&workspace).process_round(&table)?;

    assert_eq!(outcome.written.len(), 1);
    assert!(outcome.deferred.is_empty());
    let written = outcome.written.first().expect("one file");
    assert_eq!(written.status, WriteStatus::Written);
    assert_eq!(written.path, workspace.path("kotlin/dev/example/ModelConfig.kt"));

    let content = workspace.read("kotlin/dev/example/ModelConfig.kt")?;
    assert!(content.contains("class ModelConfig private constructor"));

    let record: DependencyRecord =
        serde_json::from_str(&workspace.read("deps/dev.example.ModelConfig.json")?)?;
    assert_eq!(record.output, written.path);
    assert_eq!(
        record.sources,
        [Utf8PathBuf::from("src/main/kotlin/dev/example/Model.kt")]
    );
    assert!(record.aggregating);
    assert_eq!(record.sha256, kowo_config::output::sha256_hex(&content));
    Ok(())
}

#[rstest]
fn regenerating_unchanged_model_leaves_file_alone(workspace: TempWorkspace) -> Result<()> {
    let table = SymbolTable::from_json_str(&nested_model())?;
    processor(&workspace).process_round(&table)?;
    let again = processor(&workspace).process_round(&table)?;
    let status = again.written.first().map(|file| file.status);
    assert_eq!(status, Some(WriteStatus::Unchanged));
    Ok(())
}

#[rstest]
fn deferred_models_are_generated_once_resolved(workspace: TempWorkspace) -> Result<()> {
    let mut processor = processor(&workspace);

    let first = processor.process_round(&SymbolTable::from_json_str(&deferred_models(false))?)?;
    assert_eq!(first.deferred, ["dev.example.Pending"]);
    assert_eq!(first.written.len(), 1);
    assert!(
        first
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::DeferredSymbol && d.symbol == "dev.example.Pending")
    );
    assert!(!first.has_errors());

    let second = processor.process_round(&SymbolTable::from_json_str(&deferred_models(true))?)?;
    assert!(second.deferred.is_empty());
    let paths: Vec<_> = second.written.iter().map(|file| file.path.clone()).collect();
    assert_eq!(paths, [workspace.path("kotlin/dev/example/PendingConfig.kt")]);
    Ok(())
}

#[rstest]
fn self_reference_counts_as_an_error(workspace: TempWorkspace) -> Result<()> {
    let table = SymbolTable::from_json_str(&test_helpers::symbols::self_nesting_model())?;
    let outcome = processor(&workspace).process_round(&table)?;
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.written.len(), 1);
    Ok(())
}

#[rstest]
fn unresolved_nested_section_defers_its_model(workspace: TempWorkspace) -> Result<()> {
    let mut processor = processor(&workspace);

    let first = processor.process_round(&SymbolTable::from_json_str(&nested_pending_model(false))?)?;
    assert_eq!(first.deferred, ["dev.example.Model"]);
    assert!(first.written.is_empty());
    assert!(!workspace.path("kotlin/dev/example/ModelConfig.kt").exists());

    let second = processor.process_round(&SymbolTable::from_json_str(&nested_pending_model(true))?)?;
    assert!(second.deferred.is_empty());
    assert_eq!(second.written.len(), 1);
    let content = workspace.read("kotlin/dev/example/ModelConfig.kt")?;
    assert!(content.contains("val later: com.other.Thing by optionForKey(parentKey.child(\"later\"))!!"));
    Ok(())
}

#[rstest]
fn failed_write_is_retried_next_round(workspace: TempWorkspace) -> Result<()> {
    let mut processor = processor(&workspace);
    let table = SymbolTable::from_json_str(&nested_model())?;

    workspace.write("kotlin", "not a directory")?;
    assert!(processor.process_round(&table).is_err());

    std::fs::remove_file(workspace.path("kotlin"))?;
    let retry = processor.process_round(&table)?;
    assert_eq!(retry.written.len(), 1);
    assert!(workspace.path("kotlin/dev/example/ModelConfig.kt").is_file());
    Ok(())
}
