// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Normalized lookup queries
//!
//! A [`Query`] is the trimmed, lowercased form of what the user typed and
//! is the key of the suggestion cache. Raw input shorter than the minimum
//! length never becomes a `Query`, so it can neither reach a lookup nor be
//! stored.

use serde::{Deserialize, Serialize};

/// Default minimum number of characters before a lookup is attempted
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Normalize raw input, returning `None` when it is shorter than `min_len`
    /// characters after trimming.
    pub fn normalize(raw: &str, min_len: usize) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < min_len {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trims_and_lowercases() {
        let query = Query::normalize("  Beverly ", 2).unwrap();
        assert_eq!(query.as_str(), "beverly");
    }

    #[test]
    fn rejects_short_input_after_trimming() {
        assert!(Query::normalize("9", 2).is_none());
        assert!(Query::normalize(" 9  ", 2).is_none());
        assert!(Query::normalize("", 2).is_none());
        assert!(Query::normalize("90", 2).is_some());
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(Query::normalize("é", 2).is_none());
        assert!(Query::normalize("éa", 2).is_some());
    }

    proptest! {
        #[test]
        fn normalized_queries_meet_minimum_length(raw in ".{0,12}", min_len in 1usize..5) {
            if let Some(query) = Query::normalize(&raw, min_len) {
                prop_assert!(query.as_str().chars().count() >= min_len);
                prop_assert_eq!(query.as_str(), query.as_str().trim());
            }
        }
    }
}
