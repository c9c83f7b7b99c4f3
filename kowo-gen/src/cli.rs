//! Command-line interface definitions for `kowo-gen`.

use camino::Utf8PathBuf;
use clap::Parser;
use serde::Serialize;

/// Parsed CLI arguments for `kowo-gen`.
///
/// Every option left unset falls through to `kowo-gen.toml`, then to
/// `KOWO_GEN_*` environment variables, then to built-in defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Parser, Serialize)]
#[command(name = "kowo-gen")]
#[command(about = "Generate typed owo-config wrappers from a symbol dump")]
#[command(version)]
pub struct Args {
    /// Configuration file to read instead of `kowo-gen.toml`.
    #[arg(long, value_name = "path")]
    #[serde(skip)]
    pub config: Option<Utf8PathBuf>,
    /// JSON symbol dump describing the declarations.
    #[arg(long, value_name = "path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Utf8PathBuf>,
    /// Root for generated sources and dependency records.
    #[arg(long, value_name = "path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<Utf8PathBuf>,
    /// Directory for generated sources (default: `<out-dir>/kotlin`).
    #[arg(long, value_name = "path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_dir: Option<Utf8PathBuf>,
    /// Directory for dependency records (default: `<out-dir>/deps`).
    #[arg(long, value_name = "path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_dir: Option<Utf8PathBuf>,
    /// File receiving the qualified names of deferred models.
    #[arg(long, value_name = "path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_file: Option<Utf8PathBuf>,
    /// Namespace always written by simple name (repeat; replaces the defaults).
    #[arg(long = "simplify", value_name = "package")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub simplified_namespaces: Vec<String>,
    /// Exit successfully even when error diagnostics were reported.
    #[arg(long = "allow-errors")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_errors: bool,
}
