//! Error types for `kowo_config`.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::types::TypeParseError;

/// Failures that stop a generation round.
///
/// Problems with individual models or fields are reported as
/// [`Diagnostic`](crate::diagnostic::Diagnostic)s instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KowoError {
    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The symbol dump is not valid JSON or does not match the schema.
    #[error("failed to parse symbol dump: {0}")]
    SymbolDump(#[from] serde_json::Error),

    /// A name or type in the symbol dump does not parse.
    #[error("invalid type reference on {symbol}: {source}")]
    TypeRef {
        /// Declaration or property carrying the reference.
        symbol: String,
        /// Parser error.
        #[source]
        source: TypeParseError,
    },

    /// Two declarations in the symbol dump share a qualified name.
    #[error("declaration `{0}` appears more than once in the symbol dump")]
    DuplicateDeclaration(String),

    /// A dependency record could not be serialised.
    #[error("failed to serialise dependency record for {path}: {source}")]
    Record {
        /// Output file the record describes.
        path: Utf8PathBuf,
        /// Serialiser error.
        #[source]
        source: serde_json::Error,
    },
}

impl KowoError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
