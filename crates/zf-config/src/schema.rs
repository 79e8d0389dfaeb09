// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed settings and the schema every file layer is validated against.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use zf_domain_types::{Candidate, DEFAULT_MIN_QUERY_LENGTH};

pub const DEFAULT_MAX_RESULTS: usize = 8;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_BLUR_GRACE_MS: u64 = 150;
pub const DEFAULT_COUNTY: &str = "Unknown";

/// Root settings for the autocomplete engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AutocompleteSettings {
    /// Characters required (after trimming) before a lookup runs
    pub min_query_length: usize,
    /// Result cap passed to the lookup endpoints
    pub max_results: usize,
    /// Quiet period after the last keystroke before searching
    pub debounce_ms: u64,
    /// Delay between an input losing focus and its overlay closing
    pub blur_grace_ms: u64,
    /// County used for candidates that arrive without one
    pub default_county: String,
    /// Drop search results that arrive after a newer one was applied
    pub discard_stale_responses: bool,
    pub lookup: LookupSection,
    pub discovery: DiscoverySection,
    pub fallback: FallbackSection,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            max_results: DEFAULT_MAX_RESULTS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            blur_grace_ms: DEFAULT_BLUR_GRACE_MS,
            default_county: DEFAULT_COUNTY.to_string(),
            discard_stale_responses: true,
            lookup: LookupSection::default(),
            discovery: DiscoverySection::default(),
            fallback: FallbackSection::default(),
        }
    }
}

impl AutocompleteSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_query_length == 0 {
            return Err(SettingsError::Invalid {
                key: "min-query-length",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_results == 0 {
            return Err(SettingsError::Invalid {
                key: "max-results",
                reason: "must be at least 1".into(),
            });
        }
        if self.fallback.limit == 0 {
            return Err(SettingsError::Invalid {
                key: "fallback.limit",
                reason: "must be at least 1".into(),
            });
        }
        if url::Url::parse(&self.lookup.base_url).is_err() {
            return Err(SettingsError::Invalid {
                key: "lookup.base-url",
                reason: format!("'{}' is not an absolute URL", self.lookup.base_url),
            });
        }
        Ok(())
    }
}

/// Remote lookup endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LookupSection {
    /// Any path prefix (`https://host/v2`) is kept; endpoint paths join onto it
    pub base_url: String,
    pub timeout_ms: u64,
    /// Relative to `base-url`. A leading `/` resolves from the host root instead.
    pub zip_path: String,
    pub address_path: String,
}

impl Default for LookupSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 5_000,
            zip_path: "api/zipcode/search".to_string(),
            address_path: "api/address/search".to_string(),
        }
    }
}

impl LookupSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// How inputs are recognized as autocomplete targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DiscoverySection {
    /// Sniff name/id/placeholder for "zip"/"postal" and related fields by pattern
    pub heuristics: bool,
    /// Marker class that binds an input as a ZIP field
    pub zip_class: String,
    /// Marker class that binds an input as a full-address field
    pub address_class: String,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            heuristics: true,
            zip_class: "zip-autocomplete".to_string(),
            address_class: "address-autocomplete".to_string(),
        }
    }
}

/// Offline candidate list used when the remote lookup fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct FallbackSection {
    pub limit: usize,
    /// Replaces the built-in list when present
    pub entries: Option<Vec<FallbackEntry>>,
}

impl Default for FallbackSection {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MAX_RESULTS,
            entries: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FallbackEntry {
    pub zip_code: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub county: Option<String>,
}

impl FallbackEntry {
    pub fn to_candidate(&self, default_county: &str) -> Candidate {
        Candidate::new(
            self.zip_code.clone(),
            self.city.clone(),
            self.state.clone(),
            self.county.clone().unwrap_or_else(|| default_county.to_string()),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}
