// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Which configuration layer supplied each value

use serde_json::Value as J;
use std::collections::BTreeMap;

/// Configuration scopes in precedence order (lowest first)
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Scope {
    System,
    User,
    Project,
    Env,
    CliConfig,
    Flags,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Scope::System => "system",
            Scope::User => "user",
            Scope::Project => "project",
            Scope::Env => "env",
            Scope::CliConfig => "cli-config",
            Scope::Flags => "flags",
        };
        f.write_str(name)
    }
}

#[derive(Default, Clone, Debug)]
pub struct Provenance {
    /// Maps dotted key paths to the scope whose value won
    pub winner: BTreeMap<String, Scope>,
}

impl Provenance {
    /// Record every leaf of `layer` as won by `scope`
    pub fn record_layer(&mut self, layer: &J, scope: Scope, prefix: &str) {
        match layer {
            J::Object(map) => {
                for (key, value) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    self.record_layer(value, scope, &path);
                }
            }
            J::Null => {}
            _ if !prefix.is_empty() => {
                self.winner.insert(prefix.to_string(), scope);
            }
            _ => {}
        }
    }
}
