//! Error types for `kowo-gen`.

use camino::Utf8PathBuf;
use kowo_config::KowoError;
use thiserror::Error;

/// Errors surfaced by the `kowo-gen` pipeline.
#[derive(Debug, Error)]
pub enum KowoGenError {
    /// Configuration layers could not be merged or extracted.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// An explicitly requested configuration file is missing.
    #[error("configuration file {0} does not exist")]
    MissingConfig(Utf8PathBuf),

    /// No symbol dump was configured.
    #[error("no symbol dump given; pass --symbols or set `symbols` in kowo-gen.toml")]
    MissingSymbols,

    /// Loading symbols or writing output failed.
    #[error(transparent)]
    Core(#[from] KowoError),

    /// Generation finished but reported error diagnostics.
    #[error("{count} error diagnostic(s) reported; pass --allow-errors to accept the output")]
    Diagnostics {
        /// Number of error diagnostics.
        count: usize,
    },
}

/// Result alias for `kowo-gen` operations.
pub type Result<T, E = KowoGenError> = std::result::Result<T, E>;
