//! CLI entrypoint for `kowo-gen`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kowo_gen::cli::Args;
use kowo_gen::{GenConfig, Result};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = GenConfig::load(&args)?;
    kowo_gen::run::run(&config)?;
    Ok(())
}

/// Logs to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
