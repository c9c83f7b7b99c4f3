//! Layered configuration for `kowo-gen`.
//!
//! Layers merge in increasing precedence: built-in defaults, the TOML file,
//! `KOWO_GEN_*` environment variables (nested keys split on `__`), then
//! command-line arguments.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use kowo_config::{Markers, ProcessorOptions};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::{KowoGenError, Result};

/// Configuration file read from the working directory when present.
pub const CONFIG_FILE: &str = "kowo-gen.toml";
/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "KOWO_GEN_";
/// Output root used when none is configured.
pub const DEFAULT_OUT_DIR: &str = "build/generated/kowo";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// JSON symbol dump to read.
    pub symbols: Option<Utf8PathBuf>,
    /// Root for generated sources and dependency records.
    pub out_dir: Utf8PathBuf,
    /// Overrides `<out_dir>/kotlin`.
    pub sources_dir: Option<Utf8PathBuf>,
    /// Overrides `<out_dir>/deps`.
    pub records_dir: Option<Utf8PathBuf>,
    /// Receives deferred model names, one per line.
    pub deferred_file: Option<Utf8PathBuf>,
    /// Namespaces always written by simple name.
    pub simplified_namespaces: Vec<String>,
    /// Annotation names to react to.
    pub markers: Markers,
    /// Succeed even when error diagnostics were reported.
    pub allow_errors: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        let options = ProcessorOptions::default();
        Self {
            symbols: None,
            out_dir: Utf8PathBuf::from(DEFAULT_OUT_DIR),
            sources_dir: None,
            records_dir: None,
            deferred_file: None,
            simplified_namespaces: options.simplified_namespaces,
            markers: options.markers,
            allow_errors: false,
        }
    }
}

impl GenConfig {
    /// Merges every configuration layer for `args`.
    ///
    /// # Errors
    ///
    /// Returns [`KowoGenError::MissingConfig`] when `--config` names a file
    /// that does not exist, and [`KowoGenError::Config`] when a layer is
    /// malformed.
    pub fn load(args: &Args) -> Result<Self> {
        figment(args)?
            .extract()
            .map_err(|err| KowoGenError::Config(Box::new(err)))
    }

    /// Directory receiving generated sources.
    #[must_use]
    pub fn sources_dir(&self) -> Utf8PathBuf {
        self.sources_dir
            .clone()
            .unwrap_or_else(|| self.out_dir.join("kotlin"))
    }

    /// Directory receiving dependency records.
    #[must_use]
    pub fn records_dir(&self) -> Utf8PathBuf {
        self.records_dir
            .clone()
            .unwrap_or_else(|| self.out_dir.join("deps"))
    }

    /// Options handed to the processor.
    #[must_use]
    pub fn processor_options(&self) -> ProcessorOptions {
        ProcessorOptions {
            markers: self.markers.clone(),
            simplified_namespaces: self.simplified_namespaces.clone(),
        }
    }
}

fn figment(args: &Args) -> Result<Figment> {
    let file = match args.config.as_deref() {
        Some(path) => explicit_file(path)?,
        None => Toml::file(CONFIG_FILE),
    };
    Ok(Figment::from(Serialized::defaults(GenConfig::default()))
        .merge(file)
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(args)))
}

fn explicit_file(path: &Utf8Path) -> Result<figment::providers::Data<Toml>> {
    if path.is_file() {
        Ok(Toml::file_exact(path))
    } else {
        Err(KowoGenError::MissingConfig(path.to_path_buf()))
    }
}
