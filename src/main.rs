//! gisload
//!
//! Prepares column specs, provisions PostGIS tables, and bulk-loads them.
//!
//! Run `gisload --help` for the subcommands.
mod cli;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let file = gisload_core::log(cli.level())?;
    log::debug!("logging to {}", file.display());
    cli.run().await
}
