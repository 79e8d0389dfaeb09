// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use zf_cli::{Cli, Commands, Parser};
use zf_logging::CliLogLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.clone().init("zipfill", CliLogLevel::Warn)?;

    let resolved = cli.load_config()?;
    match cli.command {
        Commands::Lookup(args) => args.run(resolved.settings).await,
        Commands::Fill(args) => args.run(resolved.settings).await,
        Commands::Config { subcommand } => subcommand.run(&resolved),
    }
}
