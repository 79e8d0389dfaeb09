// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Offline candidate list
//!
//! Searched locally whenever the remote lookup fails so the user still gets
//! suggestions for common locations. Results are never cached.

use zf_config::AutocompleteSettings;
use zf_domain_types::{zip_code, Candidate};

/// Built-in entries: (zip, city, state, county)
const BUILTIN: &[(&str, &str, &str, &str)] = &[
    ("90210", "Beverly Hills", "CA", "Los Angeles"),
    ("90211", "Beverly Hills", "CA", "Los Angeles"),
    ("90201", "Bell", "CA", "Los Angeles"),
    ("90220", "Compton", "CA", "Los Angeles"),
    ("90230", "Culver City", "CA", "Los Angeles"),
    ("90245", "El Segundo", "CA", "Los Angeles"),
    ("90250", "Hawthorne", "CA", "Los Angeles"),
    ("90254", "Hermosa Beach", "CA", "Los Angeles"),
    ("90265", "Malibu", "CA", "Los Angeles"),
    ("90266", "Manhattan Beach", "CA", "Los Angeles"),
    ("90277", "Redondo Beach", "CA", "Los Angeles"),
    ("90001", "Los Angeles", "CA", "Los Angeles"),
    ("92101", "San Diego", "CA", "San Diego"),
    ("94102", "San Francisco", "CA", "San Francisco"),
    ("95101", "San Jose", "CA", "Santa Clara"),
    ("10001", "New York", "NY", "New York"),
    ("60601", "Chicago", "IL", "Cook"),
    ("77001", "Houston", "TX", "Harris"),
    ("75201", "Dallas", "TX", "Dallas"),
    ("73301", "Austin", "TX", "Travis"),
    ("78201", "San Antonio", "TX", "Bexar"),
    ("85001", "Phoenix", "AZ", "Maricopa"),
    ("19101", "Philadelphia", "PA", "Philadelphia"),
    ("98101", "Seattle", "WA", "King"),
    ("80201", "Denver", "CO", "Denver"),
    ("02108", "Boston", "MA", "Suffolk"),
    ("30301", "Atlanta", "GA", "Fulton"),
    ("33101", "Miami", "FL", "Miami-Dade"),
];

pub const DEFAULT_LIMIT: usize = 8;

#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    entries: Vec<Candidate>,
    limit: usize,
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::builtin(DEFAULT_LIMIT)
    }
}

impl FallbackCatalog {
    pub fn new(entries: Vec<Candidate>, limit: usize) -> Self {
        Self { entries, limit }
    }

    pub fn builtin(limit: usize) -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(zip, city, state, county)| Candidate::new(*zip, *city, *state, *county))
            .collect();
        Self::new(entries, limit)
    }

    /// Built-in list, or the configured replacement, capped at `fallback.limit`
    pub fn from_settings(settings: &AutocompleteSettings) -> Self {
        match &settings.fallback.entries {
            Some(entries) => Self::new(
                entries.iter().map(|e| e.to_candidate(&settings.default_county)).collect(),
                settings.fallback.limit,
            ),
            None => Self::builtin(settings.fallback.limit),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Entries whose ZIP starts with `query` or whose city contains it
    /// (case-insensitive), in catalog order, capped at the catalog limit.
    /// A full ZIP+4 query matches on its five-digit base.
    pub fn filter(&self, query: &str) -> Vec<Candidate> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let full_zip = zip_code::is_well_formed(&needle).then(|| zip_code::base(&needle));
        self.entries
            .iter()
            .filter(|c| {
                c.zip_code.starts_with(&needle)
                    || full_zip.is_some_and(|base| zip_code::base(&c.zip_code) == base)
                    || c.city.to_lowercase().contains(&needle)
            })
            .take(self.limit)
            .cloned()
            .collect()
    }
}
