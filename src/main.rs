//! Clip Splicer CLI
//!
//! Imports a disc specification JSON document into an in-memory session
//! timeline and writes the availability report next to the document.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use clip_splicer::cli::{commands, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Clip Splicer v{}", env!("CARGO_PKG_VERSION"));

    commands::run_import(&cli)
        .with_context(|| format!("failed to import {}", cli.spec.display()))?;

    Ok(())
}
