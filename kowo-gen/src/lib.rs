//! Library interface for the `kowo-gen` command.
//!
//! Resolves layered configuration, then runs one generation round over a
//! JSON symbol dump using [`kowo_config`].

pub mod cli;
pub mod config;
pub mod error;
pub mod run;

pub use config::GenConfig;
pub use error::{KowoGenError, Result};
