//! Runs configuration loading inside a `figment::Jail`.
//!
//! The jail isolates the working directory and environment, so configuration
//! files and `KOWO_GEN_*` variables created inside it never leak between
//! tests.

use anyhow::{Context, Result, anyhow};
use figment::Jail;

/// Prepares a jail with `setup`, then calls `load` inside it.
///
/// # Errors
///
/// Returns an error if `setup` fails or `load` returns an error.
pub fn with_jail<T, E, S, L>(setup: S, load: L) -> Result<T>
where
    S: FnOnce(&mut Jail) -> figment::error::Result<()>,
    L: FnOnce() -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut loaded = None;
    Jail::try_with(|jail| {
        setup(jail)?;
        loaded = Some(load());
        Ok(())
    })
    .map_err(|err| anyhow!("jail setup failed: {err}"))?;
    loaded
        .context("jail closure did not run")?
        .map_err(anyhow::Error::from)
}
