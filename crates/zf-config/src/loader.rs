// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TOML loading and JSON schema validation

use anyhow::{Context, Result};
use serde_json::Value as J;
use std::path::Path;

/// Parse a TOML document into JSON for validation and merging
pub fn parse_toml_to_json(toml_str: &str) -> Result<J> {
    let value: toml::Value = toml_str.parse::<toml::Value>()?;
    Ok(serde_json::to_value(value)?)
}

/// Validate a layer against the schema derived from the settings types
pub fn validate_against_schema(v: &J) -> Result<()> {
    use jsonschema::{Draft, JSONSchema};
    use std::sync::OnceLock;

    static VALIDATOR: OnceLock<std::result::Result<JSONSchema, String>> = OnceLock::new();
    let validator = VALIDATOR.get_or_init(|| {
        let schema = serde_json::to_value(schemars::schema_for!(crate::AutocompleteSettings))
            .map_err(|e| e.to_string())?;
        JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(&schema)
            .map_err(|e| e.to_string())
    });
    let validator = match validator {
        Ok(validator) => validator,
        Err(err) => anyhow::bail!("Config schema failed to compile: {}", err),
    };

    if let Err(errors) = validator.validate(v) {
        let error_msg = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("\n  - ");
        anyhow::bail!("Config schema validation failed:\n  - {}", error_msg);
    }

    Ok(())
}

/// A loaded configuration layer
#[derive(Debug, Clone)]
pub struct Layer {
    pub scope: crate::Scope,
    pub json: J,
}

/// Read, parse and validate a configuration file
pub fn read_layer_from_file(path: &Path, scope: crate::Scope) -> Result<Layer> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config file {:?}", path))?;

    let json = parse_toml_to_json(&content).with_context(|| format!("parsing {:?}", path))?;
    validate_against_schema(&json).with_context(|| format!("validating {:?}", path))?;

    tracing::debug!(path = %path.display(), ?scope, "loaded config layer");
    Ok(Layer { scope, json })
}
