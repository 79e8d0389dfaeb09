// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered configuration for zipfill.
//!
//! Configuration is assembled from TOML files, `ZF_*` environment variables
//! and `key=value` flags. Every layer is converted to JSON, file layers are
//! validated against the schema derived from [`AutocompleteSettings`], the
//! layers are deep-merged in precedence order and the result is extracted
//! into the typed settings.

pub mod env;
pub mod extract;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod provenance;
pub mod schema;

pub use provenance::{Provenance, Scope};
pub use schema::{
    AutocompleteSettings, DiscoverySection, FallbackEntry, FallbackSection, LookupSection,
    SettingsError,
};

use anyhow::Result;
use serde_json::Value as J;
use std::path::Path;

/// Final resolved configuration
#[derive(Debug)]
pub struct Resolved {
    /// Merged JSON of every layer
    pub json: J,
    /// Typed, validated settings
    pub settings: AutocompleteSettings,
    /// Which scope supplied each dotted key
    pub provenance: Provenance,
}

/// Load and merge all configuration layers
///
/// Precedence order: system < user < project < env < cli-config < flags.
/// A broken system or `--config` file is an error; broken user and project
/// files are reported and skipped.
pub fn load_all(
    paths: &paths::Paths,
    cli_config: Option<&Path>,
    flag_sets: &[(&str, &str)],
) -> Result<Resolved> {
    use Scope::*;

    let system_layer = if paths.system.exists() {
        Some(loader::read_layer_from_file(&paths.system, System)?)
    } else {
        None
    };
    let user_layer = optional_layer(&paths.user, User);
    let project_layer = paths.project.as_deref().and_then(|p| optional_layer(p, Project));
    let env_layer = env::env_overlay()?;
    let cli_layer = match cli_config {
        Some(path) => Some(loader::read_layer_from_file(path, CliConfig)?),
        None => None,
    };
    let flags_layer = env::flags_overlay(flag_sets);

    let layers = vec![
        (system_layer.as_ref().map(|l| &l.json), System),
        (user_layer.as_ref().map(|l| &l.json), User),
        (project_layer.as_ref().map(|l| &l.json), Project),
        (Some(&env_layer), Env),
        (cli_layer.as_ref().map(|l| &l.json), CliConfig),
        (Some(&flags_layer), Flags),
    ];

    resolve_layers(layers)
}

/// Merge already-loaded layers (lowest precedence first) and extract settings
pub fn resolve_layers(layers: Vec<(Option<&J>, Scope)>) -> Result<Resolved> {
    let mut prov = Provenance::default();
    let mut json = serde_json::json!({});

    for (layer, scope) in layers {
        let Some(layer) = layer else { continue };
        merge::merge_two_json(&mut json, layer.clone());
        prov.record_layer(layer, scope, "");
    }

    let settings: AutocompleteSettings = extract::get(&json)?;
    settings.validate()?;

    Ok(Resolved {
        json,
        settings,
        provenance: prov,
    })
}

fn optional_layer(path: &Path, scope: Scope) -> Option<loader::Layer> {
    if !path.exists() {
        return None;
    }
    match loader::read_layer_from_file(path, scope) {
        Ok(layer) => Some(layer),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                ?scope,
                error = %err,
                "ignoring unreadable config layer"
            );
            None
        }
    }
}
