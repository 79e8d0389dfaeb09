// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

//! Configuration inspection commands
use anyhow::{bail, Result};
use clap::Subcommand;
use serde_json::Value;
use zf_config::Resolved;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration values
    Show {
        /// Show a single dotted key
        key: Option<String>,
        /// Show which layer supplied each value
        #[arg(long)]
        show_origin: bool,
    },
}

impl ConfigCommands {
    pub fn run(self, resolved: &Resolved) -> Result<()> {
        match self {
            ConfigCommands::Show { key, show_origin } => {
                let effective = serde_json::to_value(&resolved.settings)?;
                let lines = flatten(&effective, "");
                let lines: Vec<_> = match key.as_deref() {
                    Some(filter) => lines
                        .into_iter()
                        .filter(|(path, _)| {
                            path == filter || path.starts_with(&format!("{filter}."))
                        })
                        .collect(),
                    None => lines,
                };
                if lines.is_empty() {
                    bail!("configuration key '{}' not found", key.unwrap_or_default());
                }
                for (path, value) in lines {
                    match resolved.provenance.winner.get(&path) {
                        Some(scope) if show_origin => println!("{path}={value} (from {scope})"),
                        _ if show_origin => println!("{path}={value} (default)"),
                        _ => println!("{path}={value}"),
                    }
                }
                Ok(())
            }
        }
    }
}

/// Leaf values of `value` keyed by dotted path
pub fn flatten(value: &Value, prefix: &str) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .iter()
            .flat_map(|(key, child)| {
                let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                flatten(child, &path)
            })
            .collect(),
        Value::Null => vec![(prefix.to_string(), "null".to_string())],
        other => vec![(prefix.to_string(), other.to_string())],
    }
}
