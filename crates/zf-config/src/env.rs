// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Environment variable and flag overlays

use anyhow::Result;
use serde_json::Value as J;

/// Prefix of environment variables read into the configuration
pub const ENV_PREFIX: &str = "ZF";

/// Build a JSON overlay from `ZF_*` environment variables.
///
/// `__` separates nesting levels and single underscores become dashes, so
/// `ZF_DEBOUNCE_MS=500` sets `debounce-ms` and `ZF_LOOKUP__BASE_URL` sets
/// `lookup.base-url`.
pub fn env_overlay() -> Result<J> {
    let built = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let raw = serde_json::to_value(built.try_deserialize::<serde_json::Map<String, J>>()?)?;
    Ok(kebab_keys(raw))
}

fn kebab_keys(value: J) -> J {
    match value {
        J::Object(map) => J::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase().replace('_', "-"), kebab_keys(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Build a JSON overlay from `key=value` flag pairs.
///
/// Values that parse as JSON scalars (numbers, booleans) keep their type,
/// everything else is taken as a string.
pub fn flags_overlay(kv_pairs: &[(&str, &str)]) -> J {
    let mut root = serde_json::json!({});
    for (k, v) in kv_pairs {
        let value = match serde_json::from_str::<J>(v) {
            Ok(parsed @ (J::Number(_) | J::Bool(_))) => parsed,
            _ => J::String(v.to_string()),
        };
        crate::merge::insert_dotted(&mut root, k, value);
    }
    root
}

/// Split `key=value` into its parts
pub fn parse_flag(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => anyhow::bail!("expected key=value, got '{}'", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    fn flags_keep_scalar_types() {
        let overlay = flags_overlay(&[
            ("debounce-ms", "450"),
            ("discovery.heuristics", "false"),
            ("default-county", "Cook"),
            ("lookup.base-url", "http://geo.local"),
        ]);
        assert_eq!(
            overlay,
            json!({
                "debounce-ms": 450,
                "discovery": { "heuristics": false },
                "default-county": "Cook",
                "lookup": { "base-url": "http://geo.local" }
            })
        );
    }

    #[test]
    fn parse_flag_requires_key() {
        assert_eq!(
            parse_flag("max-results=5").unwrap(),
            ("max-results".to_string(), "5".to_string())
        );
        assert!(parse_flag("=5").is_err());
        assert!(parse_flag("max-results").is_err());
    }

    #[test]
    #[serial]
    fn env_variables_map_to_kebab_keys() {
        std::env::set_var("ZF_DEBOUNCE_MS", "125");
        std::env::set_var("ZF_LOOKUP__BASE_URL", "http://env.local");
        let overlay = env_overlay().unwrap();
        std::env::remove_var("ZF_DEBOUNCE_MS");
        std::env::remove_var("ZF_LOOKUP__BASE_URL");

        assert_eq!(overlay["debounce-ms"], json!(125));
        assert_eq!(overlay["lookup"]["base-url"], json!("http://env.local"));
    }
}
