//! Build diagnostics raised while generating wrappers.
//!
//! Diagnostics never stop a wrapper from being written. They are returned to
//! the caller and logged through `tracing` at the matching level.

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational; never fails a build.
    Info,
    /// Something was skipped but the output is still usable.
    Warning,
    /// The output is missing something the model asked for.
    Error,
}

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The declaration is not fully resolved and waits for a later round.
    DeferredSymbol,
    /// A field declared with a type parameter.
    InvalidFieldShape,
    /// A nested field whose type is an enclosing declaration.
    IllegalSelfReference,
    /// A computed property without backing state.
    MissingStorageSlot,
    /// A nest marker on a type that is not a model class.
    NestOnValueType,
    /// A config marker without a wrapper name.
    MissingWrapperName,
}

impl DiagnosticKind {
    /// Severity attached to this kind.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::DeferredSymbol => Severity::Info,
            Self::MissingStorageSlot | Self::NestOnValueType => Severity::Warning,
            Self::InvalidFieldShape | Self::IllegalSelfReference | Self::MissingWrapperName => {
                Severity::Error
            }
        }
    }

    /// Stable identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeferredSymbol => "deferred-symbol",
            Self::InvalidFieldShape => "invalid-field-shape",
            Self::IllegalSelfReference => "illegal-self-reference",
            Self::MissingStorageSlot => "missing-storage-slot",
            Self::NestOnValueType => "nest-on-value-type",
            Self::MissingWrapperName => "missing-wrapper-name",
        }
    }
}

/// A message attached to a declaration or property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Qualified name of the declaration or `Declaration.property`.
    pub symbol: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(kind: DiagnosticKind, symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Severity derived from the kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Writes the diagnostic to the build log.
    pub fn log(&self) {
        let kind = self.kind.as_str();
        match self.severity() {
            Severity::Info => tracing::info!(kind, symbol = %self.symbol, "{}", self.message),
            Severity::Warning => tracing::warn!(kind, symbol = %self.symbol, "{}", self.message),
            Severity::Error => tracing::error!(kind, symbol = %self.symbol, "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.symbol, self.message, self.kind.as_str())
    }
}
