//! Test helpers shared across crates.
//!
//! Provides symbol dump fixtures, temporary UTF-8 workspaces and a
//! `figment::Jail` wrapper.

pub mod figment;
pub mod fs;
pub mod symbols;
