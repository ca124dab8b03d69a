//! CardLedger CLI — incremental price updater for the card inventory
//! spreadsheet.
//!
//! One invocation is one run: validate the partitions, refresh stale
//! prices under the daily budget, roll the weekly delta, overwrite the
//! status area.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
