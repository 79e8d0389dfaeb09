// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use zf_logging::CliLoggingArgs;

pub use clap::Parser;

pub mod config_commands;
pub mod fill;
pub mod lookup;
pub mod offline;

#[derive(clap::Parser, Debug)]
#[command(
    name = "zipfill",
    about = "ZIP and address autocomplete engine",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Extra configuration file, applied above system/user/project files
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override a setting, e.g. `--set debounce-ms=150` (repeatable, before the subcommand)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one query the way a fired debounce timer would
    Lookup(lookup::LookupArgs),
    /// Type a query into a page description and commit a suggestion
    Fill(fill::FillArgs),
    Config {
        #[command(subcommand)]
        subcommand: config_commands::ConfigCommands,
    },
}

impl Cli {
    /// Resolve configuration from every layer, with `--config` and `--set` on top
    pub fn load_config(&self) -> Result<zf_config::Resolved> {
        let flags = self
            .set
            .iter()
            .map(String::as_str)
            .map(zf_config::env::parse_flag)
            .collect::<Result<Vec<_>>>()?;
        let pairs: Vec<(&str, &str)> =
            flags.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let cwd = std::env::current_dir().ok();
        let paths = zf_config::paths::discover_paths(cwd.as_deref());
        zf_config::load_all(&paths, self.config.as_deref(), &pairs)
    }
}
