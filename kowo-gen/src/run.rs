//! One generation run driven by a resolved [`GenConfig`].

use kowo_config::output::write_atomic;
use kowo_config::{OutputWriter, Processor, RoundOutcome, SymbolTable, WriteStatus};

use crate::config::GenConfig;
use crate::error::{KowoGenError, Result};

/// Loads the symbol dump, generates every ready model and writes the output.
///
/// The deferred list is written even when no model is deferred so a stale
/// list never survives a later run.
///
/// # Errors
///
/// Returns [`KowoGenError::MissingSymbols`] when no dump is configured,
/// [`KowoGenError::Core`] when loading or writing fails, and
/// [`KowoGenError::Diagnostics`] when error diagnostics were reported and
/// `allow_errors` is off. Output files are written before the diagnostics
/// check.
pub fn run(config: &GenConfig) -> Result<RoundOutcome> {
    let symbols = config
        .symbols
        .as_deref()
        .ok_or(KowoGenError::MissingSymbols)?;
    let table = SymbolTable::load(symbols)?;
    tracing::debug!(path = %symbols, declarations = table.len(), "loaded symbol dump");

    let writer = OutputWriter::new(config.sources_dir(), config.records_dir());
    let mut processor = Processor::new(config.processor_options(), writer);
    let outcome = processor.process_round(&table)?;

    if let Some(path) = config.deferred_file.as_deref() {
        let mut listing = outcome.deferred.join("\n");
        if !listing.is_empty() {
            listing.push('\n');
        }
        write_atomic(path, &listing)?;
    }

    let unchanged = outcome
        .written
        .iter()
        .filter(|file| file.status == WriteStatus::Unchanged)
        .count();
    tracing::info!(
        generated = outcome.written.len(),
        unchanged,
        deferred = outcome.deferred.len(),
        errors = outcome.error_count(),
        "generation round complete"
    );

    if outcome.has_errors() && !config.allow_errors {
        return Err(KowoGenError::Diagnostics {
            count: outcome.error_count(),
        });
    }
    Ok(outcome)
}
